//! Server management module for rbz-host.
//!
//! This module holds the simulated server model: records and their
//! lifecycle status, the creation spec, address generation, the lifecycle
//! event log and the tokio driver that turns virtual ticks into wall-clock
//! delays.
//!
//! # Components
//!
//! * `record` - Server records, identifiers and partial updates
//! * `spec` - Creation spec, memory plans and version catalog
//! * `address` - Subdomain and port generation for demo servers
//! * `lifecycle` - Lifecycle event history and live subscriptions
//! * `driver` - Background task advancing a shared registry in real time
//!
//! # Examples
//!
//! Following a server through start-up:
//!
//! ```
//! use rbz_host::ServerRegistry;
//! use rbz_host::config::Config;
//! use rbz_host::server::{CreateServerSpec, ServerLifecycleEvent, ServerStatus};
//!
//! let mut registry = ServerRegistry::new(Config::default());
//! let id = registry.create(CreateServerSpec::named("Lobby")).id();
//!
//! registry.start(id).unwrap();
//! registry.advance(3);
//!
//! assert_eq!(registry.get(id).unwrap().status(), ServerStatus::Online);
//! let events = registry.events().server_events(id, Some(1));
//! assert_eq!(events[0].event, ServerLifecycleEvent::Online);
//! ```
pub mod address;
pub mod driver;
pub mod lifecycle;
mod record;
pub mod spec;

pub use address::{generate_address, subdomain_token};
pub use driver::{RegistryDriver, RegistryDriverConfig, SharedRegistry};
pub use lifecycle::{ServerEvent, ServerLifecycleEvent, ServerLifecycleManager};
pub use record::{
    Difficulty, Edition, GameMode, HostingKind, LifecycleAction, MemoryUsage, PlayerCounts,
    ServerAddress, ServerId, ServerRecord, ServerStatus, ServerUpdate,
};
pub use spec::{CreateServerSpec, MemorySize};
