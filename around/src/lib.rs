//! # Around
//!
//! HTTP service that accepts geotagged posts, stores them in a search index
//! and a wide-column store, and answers geo-radius queries over the index.
//!
//! ## Architecture
//!
//! Each request flows through one orchestrator:
//!
//! 1. **Ingestion**: validates a post, assigns it an identity, writes the
//!    search document and then the wide-column row
//! 2. **Query**: parses coordinates and radius, runs a geo-distance search and
//!    projects the hits back into posts
//!
//! ## Modules
//!
//! - [`config`]: Settings and dependency wiring
//! - [`identity`]: Post identity generation
//! - [`ingestion`]: Dual-write ingestion flow
//! - [`query`]: Geo-radius query flow
//! - [`server`]: axum router, handlers and error responses
//! - [`errors`]: Error types for the request flows

pub mod config;
pub mod errors;
pub mod identity;
pub mod ingestion;
pub mod query;
pub mod server;

pub use config::{ConnectionMode, Dependencies, Settings};
pub use errors::{IngestError, QueryError};

use thiserror::Error;

/// Errors that abort service startup or the server loop.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Configuration or bootstrap error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The HTTP listener could not be bound or failed while serving.
    #[error("Server error: {0}")]
    ServerError(#[from] std::io::Error),
}

impl ServiceError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
