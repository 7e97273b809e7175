//! Wide-column store provider trait definition.

use async_trait::async_trait;

use around_shared::{PostId, PostRecord, WriteTime};

use crate::errors::ColumnStoreError;

/// Abstracts the wide-column store that keeps the durable copy of every post.
#[async_trait]
pub trait ColumnStoreProvider: Send + Sync {
    /// Apply all cells of `record` to row `row_key` of `table` as one atomic mutation.
    ///
    /// Every cell is stamped with `write_time`. Existing versions are kept; a
    /// later write with the same key adds a newer version.
    async fn apply_mutation(
        &self,
        table: &str,
        row_key: &PostId,
        record: &PostRecord,
        write_time: WriteTime,
    ) -> Result<(), ColumnStoreError>;
}
