//! Wide-column store error types.

use thiserror::Error;

use crate::errors::BackendFailure;

/// Errors from wide-column store operations.
#[derive(Debug, Clone, Error)]
pub enum ColumnStoreError {
    /// Invalid provider configuration (e.g., a malformed endpoint).
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The column store could not be reached or did not answer in time.
    #[error("Column store unavailable: {0}")]
    Unavailable(String),

    /// The column store answered with a non-success status.
    #[error("Column store returned status {status}: {reason}")]
    Backend { status: u16, reason: String },
}

impl ColumnStoreError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create an unavailable error.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create an error for a non-success backend status.
    pub fn backend(status: u16, reason: impl Into<String>) -> Self {
        Self::Backend {
            status,
            reason: reason.into(),
        }
    }

    /// Classify this error for the caller.
    pub fn failure(&self) -> BackendFailure {
        match self {
            Self::Unavailable(_) => BackendFailure::Unavailable,
            Self::Backend { status, .. } => BackendFailure::from_status(*status),
            Self::ConfigError(_) => BackendFailure::Rejected,
        }
    }
}

impl From<reqwest::Error> for ColumnStoreError {
    fn from(err: reqwest::Error) -> Self {
        Self::Unavailable(err.to_string())
    }
}
