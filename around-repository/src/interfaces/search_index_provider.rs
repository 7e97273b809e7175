//! Search index provider trait definition.
//!
//! This module defines the abstract interface for search index operations,
//! allowing for different backend implementations (OpenSearch, Elasticsearch, etc.).

use async_trait::async_trait;

use around_shared::{PostId, SearchDocument};

use crate::errors::SearchIndexError;
use crate::types::{RadiusQuery, SearchHit};

/// Abstracts the underlying search index implementation.
///
/// Implementations are shared across concurrent requests behind an `Arc`, so
/// they must be `Send + Sync` and hold only concurrency-safe clients.
///
/// # Index Initialization
///
/// Callers should run `ensure_index_exists` during application startup and
/// refuse to serve if it fails: without the `geo_point` mapping on `location`
/// radius queries cannot work.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Ensure the search index exists, creating it with the post schema if absent.
    ///
    /// Idempotent: when the index already exists no creation call is made.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the index is ready for use
    /// * `Err(SearchIndexError)` - If the existence check or the creation fails
    async fn ensure_index_exists(&self) -> Result<(), SearchIndexError>;

    /// Write a document under the given identity, overwriting any previous one.
    ///
    /// # Arguments
    ///
    /// * `id` - The post identity, used as the document id
    /// * `document` - The document to store
    /// * `refresh` - Make the document searchable before returning
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the document was stored
    /// * `Err(SearchIndexError)` - If the backend is unreachable or rejected the document
    async fn put_document(
        &self,
        id: &PostId,
        document: &SearchDocument,
        refresh: bool,
    ) -> Result<(), SearchIndexError>;

    /// Return every document whose location lies within the query radius.
    ///
    /// Hits are returned in the backend's order. An empty vector is a valid
    /// result, distinct from an error.
    async fn search_by_radius(
        &self,
        query: &RadiusQuery,
    ) -> Result<Vec<SearchHit>, SearchIndexError>;
}
