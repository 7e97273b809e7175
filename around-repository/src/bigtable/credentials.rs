//! Bearer tokens for Data API requests.

use std::sync::Arc;

use gcp_auth::TokenProvider;
use tokio::sync::OnceCell;
use tracing::info;

use crate::bigtable::config::{AuthMode, BigtableConfig};
use crate::errors::ColumnStoreError;

/// OAuth2 scope for reading and writing table data.
pub const BIGTABLE_DATA_SCOPE: &str = "https://www.googleapis.com/auth/bigtable.data";

/// Source of the `Authorization` header of each request.
pub(crate) enum Credentials {
    Anonymous,
    Static(String),
    /// Resolved on first use and cached; `gcp_auth` refreshes tokens before
    /// they expire.
    ApplicationDefault(OnceCell<Arc<dyn TokenProvider>>),
}

impl Credentials {
    pub(crate) fn for_config(config: &BigtableConfig) -> Self {
        match (config.auth_mode(), &config.access_token) {
            (AuthMode::StaticToken, Some(token)) => Self::Static(token.clone()),
            (AuthMode::ApplicationDefault, _) => Self::ApplicationDefault(OnceCell::new()),
            _ => Self::Anonymous,
        }
    }

    /// Current bearer token, if requests are authenticated.
    pub(crate) async fn bearer_token(&self) -> Result<Option<String>, ColumnStoreError> {
        match self {
            Self::Anonymous => Ok(None),
            Self::Static(token) => Ok(Some(token.clone())),
            Self::ApplicationDefault(cell) => {
                let provider = cell
                    .get_or_try_init(|| async {
                        let provider = gcp_auth::provider().await.map_err(|e| {
                            ColumnStoreError::unavailable(format!(
                                "Application Default Credentials unavailable: {}",
                                e
                            ))
                        })?;
                        let project_id = provider.project_id().await.ok();
                        info!(
                            project_id = ?project_id,
                            "Resolved Application Default Credentials"
                        );
                        Ok::<_, ColumnStoreError>(provider)
                    })
                    .await?;

                let token = provider
                    .token(&[BIGTABLE_DATA_SCOPE])
                    .await
                    .map_err(|e| {
                        ColumnStoreError::unavailable(format!("Failed to get access token: {}", e))
                    })?;
                Ok(Some(token.as_str().to_string()))
            }
        }
    }
}
