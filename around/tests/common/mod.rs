//! In-memory backends shared by the service integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;

use around::ingestion::IngestionOrchestrator;
use around::query::{QueryConfig, QueryOrchestrator};
use around::server::{create_app, AppState};
use around_repository::{
    ColumnStoreError, ColumnStoreProvider, RadiusQuery, SearchHit, SearchIndexError,
    SearchIndexProvider,
};
use around_shared::{Location, PostId, PostRecord, SearchDocument, WriteTime};

const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Great-circle distance between two points in kilometers.
pub fn haversine_km(a: Location, b: Location) -> f64 {
    let (lat1, lat2) = (a.lat.to_radians(), b.lat.to_radians());
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Search index that keeps documents in insertion order and filters them by
/// great-circle distance.
#[derive(Default)]
pub struct InMemoryIndex {
    pub documents: Mutex<Vec<(PostId, SearchDocument)>>,
    pub queries: Mutex<Vec<RadiusQuery>>,
    pub fail_with: Mutex<Option<SearchIndexError>>,
}

impl InMemoryIndex {
    pub fn fail_with(&self, error: SearchIndexError) {
        *self.fail_with.lock().unwrap() = Some(error);
    }

    fn check(&self) -> Result<(), SearchIndexError> {
        match self.fail_with.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SearchIndexProvider for InMemoryIndex {
    async fn ensure_index_exists(&self) -> Result<(), SearchIndexError> {
        self.check()
    }

    async fn put_document(
        &self,
        id: &PostId,
        document: &SearchDocument,
        _refresh: bool,
    ) -> Result<(), SearchIndexError> {
        self.check()?;
        let mut documents = self.documents.lock().unwrap();
        match documents.iter_mut().find(|(existing, _)| existing == id) {
            Some(entry) => entry.1 = document.clone(),
            None => documents.push((id.clone(), document.clone())),
        }
        Ok(())
    }

    async fn search_by_radius(
        &self,
        query: &RadiusQuery,
    ) -> Result<Vec<SearchHit>, SearchIndexError> {
        self.queries.lock().unwrap().push(query.clone());
        self.check()?;
        Ok(self
            .documents
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, doc)| haversine_km(query.center, doc.location) <= query.radius_km)
            .map(|(id, doc)| SearchHit {
                id: id.clone(),
                document: doc.clone(),
            })
            .collect())
    }
}

/// Column store that records every mutation.
#[derive(Default)]
pub struct RecordingColumns {
    pub rows: Mutex<Vec<(String, PostId, PostRecord, WriteTime)>>,
    pub fail_with: Mutex<Option<ColumnStoreError>>,
}

impl RecordingColumns {
    pub fn fail_with(&self, error: ColumnStoreError) {
        *self.fail_with.lock().unwrap() = Some(error);
    }
}

#[async_trait]
impl ColumnStoreProvider for RecordingColumns {
    async fn apply_mutation(
        &self,
        table: &str,
        row_key: &PostId,
        record: &PostRecord,
        write_time: WriteTime,
    ) -> Result<(), ColumnStoreError> {
        if let Some(error) = self.fail_with.lock().unwrap().clone() {
            return Err(error);
        }
        self.rows.lock().unwrap().push((
            table.to_string(),
            row_key.clone(),
            record.clone(),
            write_time,
        ));
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub index: Arc<InMemoryIndex>,
    pub columns: Arc<RecordingColumns>,
}

pub fn test_app() -> TestApp {
    test_app_with(QueryConfig::default())
}

pub fn test_app_with(config: QueryConfig) -> TestApp {
    let index = Arc::new(InMemoryIndex::default());
    let columns = Arc::new(RecordingColumns::default());

    let ingestion = IngestionOrchestrator::new(index.clone(), columns.clone(), "post");
    let query = QueryOrchestrator::new(index.clone(), config);
    let router = create_app(AppState::new(ingestion, query), Duration::from_secs(5));

    TestApp {
        router,
        index,
        columns,
    }
}
