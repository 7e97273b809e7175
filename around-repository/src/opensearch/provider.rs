//! OpenSearch provider implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! using the OpenSearch Rust crate.

use std::time::Duration;

use ::opensearch::{
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    http::response::Response,
    indices::{IndicesCreateParts, IndicesExistsParts},
    params::Refresh,
    IndexParts, OpenSearch, SearchParts,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};
use url::Url;

use around_shared::{PostId, SearchDocument};

use crate::errors::{BackendFailure, SearchIndexError};
use crate::interfaces::SearchIndexProvider;
use crate::opensearch::index_config::{geo_distance_query, get_index_settings, IndexConfig};
use crate::types::{RadiusQuery, SearchHit};

/// OpenSearch provider implementation.
///
/// Holds one `OpenSearch` client for the lifetime of the service. The client
/// pools connections internally and is safe to share across requests.
///
/// # Example
///
/// ```ignore
/// use around_repository::{IndexConfig, OpenSearchProvider, SearchIndexProvider};
/// let provider = OpenSearchProvider::new(
///     "http://localhost:9200",
///     IndexConfig::default(),
///     Duration::from_secs(10),
/// )
/// .await?;
/// provider.ensure_index_exists().await?;
/// ```
pub struct OpenSearchProvider {
    client: OpenSearch,
    index_config: IndexConfig,
}

/// Shape of a `_search` response, limited to the fields we read.
#[derive(Debug, Deserialize)]
struct SearchResponseBody {
    #[serde(default)]
    took: u64,
    hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    #[serde(default)]
    total: Option<TotalHits>,
    #[serde(default)]
    hits: Vec<RawHit>,
}

/// `hits.total` is a bare number on old clusters and an object on newer ones.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TotalHits {
    Count(u64),
    Object { value: u64 },
}

impl TotalHits {
    fn value(&self) -> u64 {
        match self {
            Self::Count(value) | Self::Object { value } => *value,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawHit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_source", default)]
    source: Value,
}

/// A decoded search response.
#[derive(Debug)]
struct DecodedSearch {
    took_ms: u64,
    total: u64,
    hits: Vec<SearchHit>,
}

impl OpenSearchProvider {
    /// Create a new OpenSearch provider connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    /// * `index_config` - The index name, document type and search window
    /// * `timeout` - Per-request timeout applied to every backend call
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchProvider)` - A new provider instance
    /// * `Err(SearchIndexError)` - If the URL is invalid or the transport cannot be built
    pub async fn new(
        url: &str,
        index_config: IndexConfig,
        timeout: Duration,
    ) -> Result<Self, SearchIndexError> {
        let parsed_url = Url::parse(url).map_err(|e| SearchIndexError::config(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .timeout(timeout)
            .build()
            .map_err(|e| SearchIndexError::config(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(
            url = %url,
            index = %index_config.name,
            doc_type = %index_config.doc_type,
            timeout_ms = timeout.as_millis() as u64,
            "Created OpenSearch provider"
        );

        Ok(Self {
            client,
            index_config,
        })
    }

    /// The index configuration this provider writes to.
    pub fn index_config(&self) -> &IndexConfig {
        &self.index_config
    }

    /// Turn a non-success response into an error, logging the backend's body.
    async fn error_from_response(response: Response, operation: &str) -> SearchIndexError {
        let status = response.status_code().as_u16();
        let error_body = response.text().await.unwrap_or_default();
        error!(status = status, body = %error_body, operation = operation, "Search backend request failed");
        SearchIndexError::backend(status, error_body)
    }

    /// Decode a `_search` response body into hits.
    ///
    /// Hits whose `_source` does not have the post shape are skipped with a
    /// warning rather than failing the whole query.
    fn decode_search_response(body: &str) -> Result<DecodedSearch, SearchIndexError> {
        let parsed: SearchResponseBody =
            serde_json::from_str(body).map_err(|e| SearchIndexError::parse(e.to_string()))?;

        let total = parsed
            .hits
            .total
            .as_ref()
            .map(TotalHits::value)
            .unwrap_or(parsed.hits.hits.len() as u64);

        let mut hits = Vec::with_capacity(parsed.hits.hits.len());
        for raw in parsed.hits.hits {
            match serde_json::from_value::<SearchDocument>(raw.source) {
                Ok(document) => hits.push(SearchHit {
                    id: PostId::from(raw.id),
                    document,
                }),
                Err(e) => {
                    warn!(doc_id = %raw.id, error = %e, "Skipping hit with unexpected document shape");
                }
            }
        }

        Ok(DecodedSearch {
            took_ms: parsed.took,
            total,
            hits,
        })
    }

    /// Whether a failed create call only lost a race with another creator.
    fn is_already_exists(body: &str) -> bool {
        body.contains("resource_already_exists_exception")
    }
}

#[async_trait]
impl SearchIndexProvider for OpenSearchProvider {
    async fn ensure_index_exists(&self) -> Result<(), SearchIndexError> {
        let index = self.index_config.name.as_str();

        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[index]))
            .send()
            .await?;

        match response.status_code().as_u16() {
            200 => {
                debug!(index = %index, "Index already exists");
                return Ok(());
            }
            404 => {
                info!(index = %index, "Index missing, creating it");
            }
            status => {
                error!(index = %index, status = status, "Index existence check failed");
                return Err(SearchIndexError::backend(
                    status,
                    "unexpected status from index existence check",
                ));
            }
        }

        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index))
            .body(get_index_settings(&self.index_config.doc_type))
            .send()
            .await?;

        let status = response.status_code();
        if status.is_success() {
            info!(index = %index, "Index created");
            return Ok(());
        }

        let error_body = response.text().await.unwrap_or_default();
        if Self::is_already_exists(&error_body) {
            debug!(index = %index, "Index was created concurrently");
            return Ok(());
        }

        // 5xx/429 did not refuse the mapping and stays retryable.
        if BackendFailure::from_status(status.as_u16()) == BackendFailure::Unavailable {
            error!(status = %status, body = %error_body, "Index creation could not complete");
            return Err(SearchIndexError::backend(status.as_u16(), error_body));
        }

        error!(status = %status, body = %error_body, "Index creation failed");
        Err(SearchIndexError::index_creation(format!(
            "Creating index {} failed with status {}: {}",
            index, status, error_body
        )))
    }

    async fn put_document(
        &self,
        id: &PostId,
        document: &SearchDocument,
        refresh: bool,
    ) -> Result<(), SearchIndexError> {
        let body = serde_json::to_value(document)
            .map_err(|e| SearchIndexError::serialization(e.to_string()))?;

        // POST /{index}/_doc/{id}: creates or replaces the document.
        let mut request = self
            .client
            .index(IndexParts::IndexId(&self.index_config.name, id.as_str()))
            .body(body);
        if refresh {
            request = request.refresh(Refresh::True);
        }

        let response = request.send().await?;
        if !response.status_code().is_success() {
            return Err(Self::error_from_response(response, "index").await);
        }

        debug!(doc_id = %id, refresh = refresh, "Document indexed");
        Ok(())
    }

    async fn search_by_radius(
        &self,
        query: &RadiusQuery,
    ) -> Result<Vec<SearchHit>, SearchIndexError> {
        let body = geo_distance_query(query, self.index_config.max_results);

        let response = self
            .client
            .search(SearchParts::Index(&[self.index_config.name.as_str()]))
            .pretty(query.pretty)
            .body(body)
            .send()
            .await?;

        if !response.status_code().is_success() {
            return Err(Self::error_from_response(response, "search").await);
        }

        let text = response.text().await?;
        let decoded = Self::decode_search_response(&text)?;

        info!(
            took_ms = decoded.took_ms,
            total_hits = decoded.total,
            returned = decoded.hits.len(),
            lat = query.center.lat,
            lon = query.center.lon,
            distance = %query.distance(),
            "Radius query completed"
        );

        Ok(decoded.hits)
    }
}
