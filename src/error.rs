//! Error handling module for rbz-host.
//!
//! This module defines the error types used throughout the library.
//! Most registry operations cannot fail; the errors below cover the
//! few places where a caller can ask for something that does not exist
//! or is not allowed in the current lifecycle state.
//!
//! # Example
//!
//! ```
//! use rbz_host::error::{Error, Result};
//!
//! fn handle_error(result: Result<()>) {
//!     match result {
//!         Ok(_) => println!("Operation succeeded"),
//!         Err(Error::ServerNotFound(id)) => println!("Server '{}' not found", id),
//!         Err(Error::InvalidTransition { action, status, .. }) => {
//!             println!("Cannot {} a server that is {}", action, status)
//!         }
//!         Err(e) => println!("Other error: {}", e),
//!     }
//! }
//! ```
use crate::server::{LifecycleAction, ServerId, ServerStatus};
use thiserror::Error;

/// Errors that can occur in the rbz-host library.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to parse configuration from a file or string.
    ///
    /// This error occurs when:
    /// - The configuration file cannot be read
    /// - The JSON or YAML is malformed
    /// - Field types are incorrect
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(String),

    /// Configuration parsed but contains values that cannot be used.
    ///
    /// This error occurs when:
    /// - The base domain is empty or not a hostname
    /// - A tick length or transition delay is zero
    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    /// No server with the given identifier is in the registry.
    #[error("Server not found: {0}")]
    ServerNotFound(String),

    /// A lifecycle action was requested from a state it cannot start from.
    ///
    /// Overlapping transitions are rejected: starting a server that is
    /// already `starting`, stopping one that is `offline`, and so on.
    #[error("Cannot {action} server {id} while it is {status}")]
    InvalidTransition {
        /// Server the action targeted
        id: ServerId,
        /// Requested action
        action: LifecycleAction,
        /// Status the server was in
        status: ServerStatus,
    },

    /// A required form field was missing or inconsistent.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Reading or writing persisted key/value state failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Error in serializing or deserializing data.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Any other error not covered by the above categories.
    #[error("Other error: {0}")]
    Other(String),
}

/// Result type for rbz-host operations.
pub type Result<T> = std::result::Result<T, Error>;
