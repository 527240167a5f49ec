//! Configuration module for rbz-host.
//!
//! This module handles parsing and validation of registry settings: the
//! base domain for generated addresses, transition timing and event
//! history size. Configurations load from JSON or YAML files or strings.
//!
//! # Examples
//!
//! Loading a configuration from a file:
//!
//! ```no_run
//! use rbz_host::config::Config;
//!
//! let config = Config::from_file("rbz.json").unwrap();
//! println!("Demo servers live under {}", config.base_domain);
//! ```
//!
//! Creating a configuration programmatically:
//! ```
//! use rbz_host::{ServerRegistry, config::{Config, TimingConfig}};
//!
//! let config = Config {
//!     base_domain: "play.example".to_string(),
//!     timing: TimingConfig { tick_millis: 250, ..Default::default() },
//!     port_seed: Some(7),
//!     ..Default::default()
//! };
//! rbz_host::config::validate_config(&config).unwrap();
//! let registry = ServerRegistry::new(config);
//! assert!(registry.is_empty());
//! ```
mod parser;
pub mod validator;

pub use parser::{Config, DEFAULT_BASE_DOMAIN, TimingConfig};
pub use validator::validate_config;
