//! Service settings read from the environment.

use std::env;
use std::fmt::Display;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use around_repository::opensearch::{DEFAULT_DOC_TYPE, DEFAULT_INDEX_NAME, DEFAULT_MAX_RESULTS};
use around_repository::{BigtableConfig, IndexConfig};

const DEFAULT_SERVER_PORT: u16 = 8080;

/// Largest `size` OpenSearch accepts under the default `index.max_result_window`.
const MAX_RESULT_WINDOW: usize = 10_000;

/// Default OpenSearch URL.
const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// Radius used when a search request does not carry one.
const DEFAULT_SEARCH_RADIUS_KM: f64 = 200.0;

const DEFAULT_BIGTABLE_PROJECT_ID: &str = "around-xxx";
const DEFAULT_BIGTABLE_INSTANCE_ID: &str = "around-post";
const DEFAULT_BIGTABLE_TABLE: &str = "post";

const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 10;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default connection retry interval in seconds.
const DEFAULT_RETRY_INTERVAL_SECS: u64 = 15;

/// How startup reacts when OpenSearch cannot be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionMode {
    /// Fail immediately if connection fails.
    FailFast,
    /// Retry on a fixed interval until the backend answers.
    Retry,
}

impl ConnectionMode {
    /// Parse a connection mode.
    ///
    /// Valid values: "fail-fast" or "retry" (case-insensitive).
    fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "fail-fast" | "failfast" | "fail_fast" => Some(Self::FailFast),
            "retry" => Some(Self::Retry),
            _ => None,
        }
    }
}

/// Everything the service needs to start, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server_addr: SocketAddr,
    pub opensearch_url: String,
    pub index: IndexConfig,
    /// Radius in kilometers applied when a query omits `range`.
    pub default_radius_km: f64,
    /// Whether OpenSearch is asked for pretty-printed responses.
    pub search_pretty: bool,
    /// Treat missing or unparseable coordinates as zero instead of rejecting them.
    pub lenient_coordinates: bool,
    pub bigtable: BigtableConfig,
    pub bigtable_table: String,
    /// Timeout for every individual backend call.
    pub backend_timeout: Duration,
    /// Overall deadline for one HTTP request.
    pub request_timeout: Duration,
    pub connection_mode: ConnectionMode,
    pub retry_interval: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Settings {
    /// Load settings from process environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SERVER_HOST` / `SERVER_PORT`: listen address (default: 0.0.0.0:8080)
    /// - `OPENSEARCH_URL`: OpenSearch server URL (default: http://localhost:9200)
    /// - `INDEX_NAME`: post index name (default: "around")
    /// - `DOC_TYPE`: document type recorded in the mapping (default: "post")
    /// - `DEFAULT_SEARCH_RADIUS_KM`: radius when a query omits `range` (default: 200)
    /// - `SEARCH_MAX_RESULTS`: hits requested per search, 1 to 10000 (default: 10000)
    /// - `SEARCH_PRETTY`: ask OpenSearch for pretty output (default: true)
    /// - `LENIENT_COORDINATES`: default bad coordinates to zero (default: false)
    /// - `BIGTABLE_ENDPOINT`: Data API base URL (default: https://bigtable.googleapis.com)
    /// - `BIGTABLE_PROJECT_ID`: project (default: "around-xxx")
    /// - `BIGTABLE_INSTANCE_ID`: instance (default: "around-post")
    /// - `BIGTABLE_TABLE`: table for post rows (default: "post")
    /// - `BIGTABLE_ACCESS_TOKEN`: fixed bearer token; when unset the Google
    ///   endpoint uses Application Default Credentials and other endpoints
    ///   (emulators) send none
    /// - `BACKEND_TIMEOUT_SECS`: per backend call timeout (default: 10)
    /// - `REQUEST_TIMEOUT_SECS`: per HTTP request deadline (default: 30)
    /// - `OPENSEARCH_CONNECTION_MODE`: "fail-fast" or "retry" (default: fail-fast)
    /// - `OPENSEARCH_RETRY_INTERVAL_SECS`: retry interval in seconds (default: 15)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup.
    ///
    /// Unset keys take their default. Keys that are set but do not parse, or
    /// parse to a value no request could succeed with, are logged and also
    /// take their default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let host = parse_or(&get, "SERVER_HOST", IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        let port = parse_or(&get, "SERVER_PORT", DEFAULT_SERVER_PORT);

        let max_results = parse_valid(
            &get,
            "SEARCH_MAX_RESULTS",
            DEFAULT_MAX_RESULTS,
            |v| (1..=MAX_RESULT_WINDOW).contains(v),
            "must be between 1 and 10000",
        );
        let index = IndexConfig::new(
            get("INDEX_NAME").unwrap_or_else(|| DEFAULT_INDEX_NAME.to_string()),
            get("DOC_TYPE").unwrap_or_else(|| DEFAULT_DOC_TYPE.to_string()),
        )
        .with_max_results(max_results);

        let default_radius_km = parse_valid(
            &get,
            "DEFAULT_SEARCH_RADIUS_KM",
            DEFAULT_SEARCH_RADIUS_KM,
            |v| v.is_finite() && *v > 0.0,
            "must be positive",
        );

        let mut bigtable = BigtableConfig::new(
            get("BIGTABLE_PROJECT_ID").unwrap_or_else(|| DEFAULT_BIGTABLE_PROJECT_ID.to_string()),
            get("BIGTABLE_INSTANCE_ID")
                .unwrap_or_else(|| DEFAULT_BIGTABLE_INSTANCE_ID.to_string()),
        )
        .with_access_token(get("BIGTABLE_ACCESS_TOKEN"));
        if let Some(endpoint) = get("BIGTABLE_ENDPOINT") {
            bigtable = bigtable.with_endpoint(endpoint);
        }

        let connection_mode = match get("OPENSEARCH_CONNECTION_MODE") {
            None => ConnectionMode::FailFast,
            Some(raw) => ConnectionMode::parse(&raw).unwrap_or_else(|| {
                warn!(value = %raw, "Invalid OPENSEARCH_CONNECTION_MODE, defaulting to 'fail-fast'");
                ConnectionMode::FailFast
            }),
        };

        Self {
            server_addr: SocketAddr::new(host, port),
            opensearch_url: get("OPENSEARCH_URL")
                .unwrap_or_else(|| DEFAULT_OPENSEARCH_URL.to_string()),
            index,
            default_radius_km,
            search_pretty: parse_or(&get, "SEARCH_PRETTY", true),
            lenient_coordinates: parse_or(&get, "LENIENT_COORDINATES", false),
            bigtable,
            bigtable_table: get("BIGTABLE_TABLE")
                .unwrap_or_else(|| DEFAULT_BIGTABLE_TABLE.to_string()),
            backend_timeout: Duration::from_secs(parse_valid(
                &get,
                "BACKEND_TIMEOUT_SECS",
                DEFAULT_BACKEND_TIMEOUT_SECS,
                |v| *v > 0,
                "must be positive",
            )),
            request_timeout: Duration::from_secs(parse_valid(
                &get,
                "REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
                |v| *v > 0,
                "must be positive",
            )),
            connection_mode,
            retry_interval: Duration::from_secs(parse_or(
                &get,
                "OPENSEARCH_RETRY_INTERVAL_SECS",
                DEFAULT_RETRY_INTERVAL_SECS,
            )),
        }
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> T
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(key = key, value = %raw, "Invalid configuration value, using default");
            default
        }),
    }
}

/// Like [`parse_or`], but a parsed value failing `valid` also falls back.
fn parse_valid<T, G>(
    get: &G,
    key: &str,
    default: T,
    valid: impl Fn(&T) -> bool,
    requirement: &str,
) -> T
where
    T: FromStr + Display,
    G: Fn(&str) -> Option<String>,
{
    let value = match get(key) {
        None => return default,
        Some(raw) => match raw.parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!(key = key, value = %raw, "Invalid configuration value, using default");
                return default;
            }
        },
    };

    if valid(&value) {
        value
    } else {
        warn!(
            key = key,
            value = %value,
            requirement = requirement,
            "Configuration value out of range, using default"
        );
        default
    }
}
