//! Error types for driver configuration.
//!
//! Failures of the retried operation are never represented here: the driver
//! hands them back to the caller exactly as the operation produced them.

use thiserror::Error;

/// Result type alias for fallible configuration steps.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while configuring strategies or drivers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A strategy or driver was given a value it cannot work with.
    #[error("{0}")]
    InvalidConfiguration(String),
}

impl Error {
    /// Create an `InvalidConfiguration` error.
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }
}
