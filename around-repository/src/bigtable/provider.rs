//! Bigtable provider implementation.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error, info};

use around_shared::{PostId, PostRecord, WriteTime};

use crate::bigtable::config::BigtableConfig;
use crate::bigtable::credentials::Credentials;
use crate::bigtable::mutation::MutateRowRequest;
use crate::errors::ColumnStoreError;
use crate::interfaces::ColumnStoreProvider;

/// Column store provider backed by the Bigtable Data API.
///
/// The inner `reqwest::Client` pools connections and is shared by all requests.
pub struct BigtableProvider {
    client: reqwest::Client,
    config: BigtableConfig,
    credentials: Credentials,
}

impl BigtableProvider {
    /// Create a new provider.
    ///
    /// # Arguments
    ///
    /// * `config` - Endpoint, project, instance and credentials; see
    ///   [`BigtableConfig::auth_mode`] for how requests are authenticated
    /// * `timeout` - Per-request timeout applied to every backend call
    pub fn new(config: BigtableConfig, timeout: Duration) -> Result<Self, ColumnStoreError> {
        // Fail at startup on a malformed endpoint rather than on the first post.
        config.mutate_row_url("post")?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ColumnStoreError::config(e.to_string()))?;

        info!(
            endpoint = %config.endpoint,
            project_id = %config.project_id,
            instance_id = %config.instance_id,
            auth_mode = ?config.auth_mode(),
            "Created Bigtable provider"
        );

        let credentials = Credentials::for_config(&config);
        Ok(Self {
            client,
            config,
            credentials,
        })
    }
}

#[async_trait]
impl ColumnStoreProvider for BigtableProvider {
    async fn apply_mutation(
        &self,
        table: &str,
        row_key: &PostId,
        record: &PostRecord,
        write_time: WriteTime,
    ) -> Result<(), ColumnStoreError> {
        let url = self.config.mutate_row_url(table)?;
        let body = MutateRowRequest::from_record(row_key, record, write_time);

        let mut request = self.client.post(url).json(&body);
        if let Some(token) = self.credentials.bearer_token().await? {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, table = %table, "mutateRow request failed");
            return Err(ColumnStoreError::backend(status.as_u16(), error_body));
        }

        debug!(
            row_key = %row_key,
            table = %table,
            cells = record.cells.len(),
            timestamp_micros = write_time.as_micros(),
            "Row mutation applied"
        );
        Ok(())
    }
}
