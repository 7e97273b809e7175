use std::sync::Arc;

use crate::ingestion::IngestionOrchestrator;
use crate::query::QueryOrchestrator;

/// Shared handler state. Cloned per request; everything inside is shared.
#[derive(Clone)]
pub struct AppState {
    pub ingestion: Arc<IngestionOrchestrator>,
    pub query: Arc<QueryOrchestrator>,
}

impl AppState {
    pub fn new(ingestion: IngestionOrchestrator, query: QueryOrchestrator) -> Self {
        Self {
            ingestion: Arc::new(ingestion),
            query: Arc::new(query),
        }
    }
}
