//! Search index error types.

use thiserror::Error;

use crate::errors::BackendFailure;

/// Errors from search index operations.
///
/// Used by the `SearchIndexProvider` trait and its implementations.
#[derive(Debug, Clone, Error)]
pub enum SearchIndexError {
    /// Invalid provider configuration (e.g., a malformed backend URL).
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The search backend could not be reached or did not answer in time.
    #[error("Search backend unavailable: {0}")]
    Unavailable(String),

    /// The search backend answered with a non-success status.
    #[error("Search backend returned status {status}: {reason}")]
    Backend { status: u16, reason: String },

    /// Failed to create the search index.
    #[error("Index creation error: {0}")]
    IndexCreationError(String),

    /// Failed to parse a response from the search backend.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Failed to serialize data for the search backend.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl SearchIndexError {
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

    /// Create an index creation error.
    pub fn index_creation(msg: impl Into<String>) -> Self {
        Self::IndexCreationError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }

    /// Classify this error for the caller.
    pub fn failure(&self) -> BackendFailure {
        match self {
            Self::Unavailable(_) => BackendFailure::Unavailable,
            Self::Backend { status, .. } => BackendFailure::from_status(*status),
            Self::ConfigError(_)
            | Self::IndexCreationError(_)
            | Self::ParseError(_)
            | Self::SerializationError(_) => BackendFailure::Rejected,
        }
    }
}

impl From<::opensearch::Error> for SearchIndexError {
    fn from(err: ::opensearch::Error) -> Self {
        Self::Unavailable(err.to_string())
    }
}
