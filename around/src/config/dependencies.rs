//! Dependency initialization and wiring for the around service.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, warn};

use around_repository::{
    BackendFailure, BigtableProvider, OpenSearchProvider, SearchIndexError, SearchIndexProvider,
};

use crate::config::settings::{ConnectionMode, Settings};
use crate::ingestion::IngestionOrchestrator;
use crate::query::{QueryConfig, QueryOrchestrator};
use crate::server::AppState;
use crate::ServiceError;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// Handler state holding both orchestrators.
    pub state: AppState,
}

impl Dependencies {
    /// Connect both backends and build the orchestrators.
    ///
    /// The post index is created if it does not exist yet. Failing to reach
    /// OpenSearch is fatal unless `connection_mode` is `Retry`, in which case
    /// startup waits for it.
    pub async fn new(settings: &Settings) -> Result<Self, ServiceError> {
        info!(
            opensearch_url = %settings.opensearch_url,
            index = %settings.index.name,
            bigtable_endpoint = %settings.bigtable.endpoint,
            bigtable_table = %settings.bigtable_table,
            connection_mode = ?settings.connection_mode,
            retry_interval_secs = settings.retry_interval.as_secs(),
            "Initializing dependencies"
        );

        let search_provider = OpenSearchProvider::new(
            &settings.opensearch_url,
            settings.index.clone(),
            settings.backend_timeout,
        )
        .await
        .map_err(|e| {
            ServiceError::config(format!("Failed to create OpenSearch provider: {}", e))
        })?;

        Self::ensure_index(
            &search_provider,
            settings.connection_mode,
            settings.retry_interval,
        )
        .await?;

        info!("OpenSearch index ready");

        let column_provider =
            BigtableProvider::new(settings.bigtable.clone(), settings.backend_timeout).map_err(
                |e| ServiceError::config(format!("Failed to create Bigtable provider: {}", e)),
            )?;

        let search: Arc<dyn SearchIndexProvider> = Arc::new(search_provider);

        let ingestion = IngestionOrchestrator::new(
            search.clone(),
            Arc::new(column_provider),
            settings.bigtable_table.clone(),
        );
        let query = QueryOrchestrator::new(
            search,
            QueryConfig {
                default_radius_km: settings.default_radius_km,
                pretty: settings.search_pretty,
                lenient_coordinates: settings.lenient_coordinates,
            },
        );

        Ok(Self {
            state: AppState::new(ingestion, query),
        })
    }

    /// Make sure the post index exists, retrying while OpenSearch is
    /// unreachable if the connection mode allows it.
    ///
    /// A backend that answers but refuses the index is never retried.
    async fn ensure_index(
        provider: &impl SearchIndexProvider,
        mode: ConnectionMode,
        retry_interval: Duration,
    ) -> Result<(), ServiceError> {
        loop {
            match provider.ensure_index_exists().await {
                Ok(()) => return Ok(()),
                Err(e) if Self::should_retry(&e, mode) => {
                    warn!(
                        error = %e,
                        retry_interval_secs = retry_interval.as_secs(),
                        "Failed to connect to OpenSearch, retrying..."
                    );
                    sleep(retry_interval).await;
                }
                Err(e) => {
                    return Err(ServiceError::config(format!(
                        "Failed to ensure index exists: {}",
                        e
                    )));
                }
            }
        }
    }

    fn should_retry(err: &SearchIndexError, mode: ConnectionMode) -> bool {
        mode == ConnectionMode::Retry && err.failure() == BackendFailure::Unavailable
    }
}
