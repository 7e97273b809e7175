//! Bigtable connection configuration.

use url::Url;

use crate::errors::ColumnStoreError;

/// Public endpoint of the Bigtable Data API.
pub const DEFAULT_ENDPOINT: &str = "https://bigtable.googleapis.com";

/// Bigtable configuration.
#[derive(Debug, Clone)]
pub struct BigtableConfig {
    /// Base URL of the Data API (or a local proxy in development).
    pub endpoint: String,
    /// GCP project ID.
    pub project_id: String,
    /// Bigtable instance ID.
    pub instance_id: String,
    /// Fixed OAuth2 bearer token sent with every request, if set. When unset,
    /// see [`BigtableConfig::auth_mode`].
    pub access_token: Option<String>,
}

/// How requests to the Data API are authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Send the configured `access_token` as is.
    StaticToken,
    /// Fetch and refresh tokens through Application Default Credentials.
    ApplicationDefault,
    /// Send no credentials. Used for emulators and local proxies.
    Anonymous,
}

impl Default for BigtableConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            project_id: "around-xxx".to_string(),
            instance_id: "around-post".to_string(),
            access_token: None,
        }
    }
}

impl BigtableConfig {
    pub fn new(project_id: impl Into<String>, instance_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            instance_id: instance_id.into(),
            ..Self::default()
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_access_token(mut self, token: Option<String>) -> Self {
        self.access_token = token;
        self
    }

    /// Fully qualified table name, e.g. `projects/p/instances/i/tables/post`.
    pub fn table_name(&self, table: &str) -> String {
        format!(
            "projects/{}/instances/{}/tables/{}",
            self.project_id, self.instance_id, table
        )
    }

    /// Pick the authentication for this configuration.
    ///
    /// An explicit token always wins. Otherwise the public Google endpoint
    /// gets Application Default Credentials and any other endpoint is assumed
    /// to be an emulator that takes no credentials.
    pub fn auth_mode(&self) -> AuthMode {
        if self.access_token.is_some() {
            AuthMode::StaticToken
        } else if self.endpoint.trim_end_matches('/') == DEFAULT_ENDPOINT {
            AuthMode::ApplicationDefault
        } else {
            AuthMode::Anonymous
        }
    }

    /// URL of the `mutateRow` method for `table`.
    pub fn mutate_row_url(&self, table: &str) -> Result<Url, ColumnStoreError> {
        let base = self.endpoint.trim_end_matches('/');
        let raw = format!("{}/v2/{}:mutateRow", base, self.table_name(table));
        Url::parse(&raw).map_err(|e| ColumnStoreError::config(format!("{}: {}", raw, e)))
    }
}
