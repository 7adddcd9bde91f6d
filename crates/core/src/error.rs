//! Error types for shelter
//!
//! Three fault classes reach callers:
//! - validation: a write was called with an empty required argument
//! - store: the backing store failed; carried through unchanged
//! - configuration: invalid settings, raised when a collection is opened
//!
//! There is no cache fault. A cache miss is an ordinary outcome.

use thiserror::Error;

/// Result type alias for store adapter calls
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result type alias for shelter operations
pub type Result<T> = std::result::Result<T, Error>;

/// Faults reported by a store adapter.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The store refused the query as malformed
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// The store received the operation but refused to apply it
    #[error("Operation rejected: {0}")]
    Rejected(String),
}

/// Error type for collection operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A required argument was empty; nothing was sent to the store
    #[error("Validation failed: {reason}")]
    Validation {
        /// What was wrong with the input
        reason: String,
    },

    /// The store failed; index and cache were left untouched
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration or record text could not be parsed
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Create a validation error
    pub fn validation(reason: impl Into<String>) -> Self {
        Error::Validation {
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    /// True for validation faults
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation { .. })
    }

    /// True for store faults
    pub fn is_store(&self) -> bool {
        matches!(self, Error::Store(_))
    }

    /// True for configuration faults
    pub fn is_config(&self) -> bool {
        matches!(self, Error::Config(_))
    }

    /// The underlying store fault, if this is one
    pub fn as_store(&self) -> Option<&StoreError> {
        match self {
            Error::Store(e) => Some(e),
            _ => None,
        }
    }
}
