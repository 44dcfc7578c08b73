//! Error types for the batching layer
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! ## Taxonomy
//!
//! - `InvalidArgument`: input that cannot be turned into a canonical record
//!   or key. Raised before anything is buffered.
//! - `Backend`: the datastore call failed. Propagated verbatim; the pool
//!   keeps its buffer so a retried flush resends the same batch.
//! - `Configuration`: pool budgets or the config file are unusable.

use thiserror::Error;

/// Boxed error source carried by backend failures
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias for batching operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the batching layer
#[derive(Debug, Error)]
pub enum Error {
    /// Input could not be converted into a canonical record or key
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The backend write or delete call failed
    #[error("Backend error: {message}")]
    Backend {
        /// Description of the failed call
        message: String,
        /// Underlying error reported by the backend, if any
        #[source]
        source: Option<BoxedSource>,
    },

    /// Pool configuration is unusable
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Build an `InvalidArgument` error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }

    /// Build a `Backend` error without an underlying source
    pub fn backend(message: impl Into<String>) -> Self {
        Error::Backend {
            message: message.into(),
            source: None,
        }
    }

    /// Build a `Backend` error wrapping the backend's own error
    pub fn backend_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Error::Backend {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Build a `Configuration` error
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration(message.into())
    }

    /// True for errors raised by the backend call
    pub fn is_backend(&self) -> bool {
        matches!(self, Error::Backend { .. })
    }

    /// True for errors caused by caller input
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }
}

impl From<bincode::Error> for Error {
    fn from(e: bincode::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<base64::DecodeError> for Error {
    fn from(e: base64::DecodeError) -> Self {
        Error::InvalidArgument(format!("malformed key string: {}", e))
    }
}
