//! Dual-write ingestion of posts.
//!
//! A post is written to the search index first and to the wide-column store
//! second. There is no cross-store transaction: when the second write fails
//! the indexed document stays in place and the failure carries its id.

use std::sync::Arc;

use tracing::{debug, error, info, instrument};

use around_repository::{ColumnStoreProvider, SearchIndexProvider};
use around_shared::{Post, PostId, PostRecord, SearchDocument, WriteTime};

use crate::errors::IngestError;
use crate::identity::{IdGenerator, TimeOrderedIds};

/// Outcome of a successful ingestion.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestionReceipt {
    /// Identity shared by the index document and the column row.
    pub id: PostId,
    /// Message text of the ingested post, echoed in the acknowledgement.
    pub message: String,
}

/// Coordinates the two writes of one post.
pub struct IngestionOrchestrator {
    ids: Arc<dyn IdGenerator>,
    search: Arc<dyn SearchIndexProvider>,
    columns: Arc<dyn ColumnStoreProvider>,
    table: String,
}

impl IngestionOrchestrator {
    /// Create an orchestrator that writes rows into `table`.
    pub fn new(
        search: Arc<dyn SearchIndexProvider>,
        columns: Arc<dyn ColumnStoreProvider>,
        table: impl Into<String>,
    ) -> Self {
        Self {
            ids: Arc::new(TimeOrderedIds),
            search,
            columns,
            table: table.into(),
        }
    }

    /// Replace the identity source.
    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Validate, identify and store one post.
    ///
    /// The index write uses an immediate refresh so the post is searchable as
    /// soon as this returns. If it fails the column store is never called.
    #[instrument(skip(self, post), fields(user = %post.user))]
    pub async fn ingest(&self, post: Post) -> Result<IngestionReceipt, IngestError> {
        post.location.validate()?;

        let id = self.ids.generate();
        debug!(post_id = %id, "Assigned post identity");

        let document = SearchDocument::from(&post);
        self.search
            .put_document(&id, &document, true)
            .await
            .map_err(|e| {
                error!(post_id = %id, error = %e, "Index write failed");
                IngestError::IndexWriteFailed(e)
            })?;

        let record = PostRecord::from(&post);
        let write_time = WriteTime::now();
        if let Err(e) = self
            .columns
            .apply_mutation(&self.table, &id, &record, write_time)
            .await
        {
            error!(
                post_id = %id,
                table = %self.table,
                error = %e,
                "Column write failed, indexed document has no matching row"
            );
            return Err(IngestError::ColumnWriteFailed { id, source: e });
        }

        info!(post_id = %id, "Post saved");

        Ok(IngestionReceipt {
            id,
            message: post.message,
        })
    }
}
