//! Error types for the ingestion and query flows.

use thiserror::Error;

use around_repository::{BackendFailure, ColumnStoreError, SearchIndexError};
use around_shared::{LocationError, PostId};

/// Errors that can occur while ingesting a post.
#[derive(Error, Debug)]
pub enum IngestError {
    /// The post failed validation; nothing was written.
    #[error("Invalid post: {0}")]
    InvalidPost(#[from] LocationError),

    /// The search index write failed; the wide-column store was not touched.
    #[error("Index write failed: {0}")]
    IndexWriteFailed(#[source] SearchIndexError),

    /// The index write succeeded but the wide-column write did not. The
    /// document `id` stays searchable without a matching row.
    #[error("Column write failed for post {id}: {source}")]
    ColumnWriteFailed {
        id: PostId,
        #[source]
        source: ColumnStoreError,
    },
}

impl IngestError {
    /// Backend classification, if the failure came from a backend.
    pub fn failure(&self) -> Option<BackendFailure> {
        match self {
            Self::InvalidPost(_) => None,
            Self::IndexWriteFailed(e) => Some(e.failure()),
            Self::ColumnWriteFailed { source, .. } => Some(source.failure()),
        }
    }
}

/// Errors that can occur while answering a radius query.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Search failed: {0}")]
    SearchFailed(#[from] SearchIndexError),
}

impl QueryError {
    /// Create an invalid coordinates error.
    pub fn invalid_coordinates(msg: impl Into<String>) -> Self {
        Self::InvalidCoordinates(msg.into())
    }

    /// Create an invalid range error.
    pub fn invalid_range(msg: impl Into<String>) -> Self {
        Self::InvalidRange(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_failure_classification() {
        let invalid = IngestError::from(LocationError::LatitudeOutOfRange(91.0));
        assert_eq!(invalid.failure(), None);

        let index = IngestError::IndexWriteFailed(SearchIndexError::unavailable("refused"));
        assert_eq!(index.failure(), Some(BackendFailure::Unavailable));

        let column = IngestError::ColumnWriteFailed {
            id: PostId::from("p1"),
            source: ColumnStoreError::backend(404, "table not found"),
        };
        assert_eq!(column.failure(), Some(BackendFailure::Rejected));
        assert!(column.to_string().contains("p1"));
    }
}
