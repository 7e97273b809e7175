//! OpenSearch index configuration, mappings and the geo-distance query.

use serde_json::{json, Value};

use crate::types::RadiusQuery;

/// Default name of the post index.
pub const DEFAULT_INDEX_NAME: &str = "around";

/// Default document type name, recorded in the mapping metadata.
pub const DEFAULT_DOC_TYPE: &str = "post";

/// Default number of hits requested per search.
///
/// Matches the backend's default `index.max_result_window`, so a radius query
/// returns every match unless the window was lowered.
pub const DEFAULT_MAX_RESULTS: usize = 10_000;

/// Configuration for the post index.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// The index name used for all operations.
    pub name: String,
    /// The document type / schema name stored in the mapping `_meta`.
    pub doc_type: String,
    /// Maximum number of hits a radius search asks for.
    pub max_results: usize,
}

impl IndexConfig {
    /// Create a new index configuration.
    ///
    /// # Arguments
    ///
    /// * `name` - The index name
    /// * `doc_type` - The document type name
    pub fn new(name: impl Into<String>, doc_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc_type: doc_type.into(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self::new(DEFAULT_INDEX_NAME, DEFAULT_DOC_TYPE)
    }
}

/// Get the index settings and mappings for the post index.
///
/// The mapping declares:
/// - **location**: `geo_point`, required for geo-distance queries
/// - **user**: `keyword`, exact-match author name
/// - **message**: `text`, full-text searchable body
///
/// # Sharding Configuration
///
/// - 1 primary shard
/// - 1 replica for redundancy
pub fn get_index_settings(doc_type: &str) -> Value {
    json!({
        "settings": {
            "number_of_shards": 1,
            "number_of_replicas": 1
        },
        "mappings": {
            "_meta": {
                "doc_type": doc_type
            },
            "properties": {
                "user": {
                    "type": "keyword"
                },
                "message": {
                    "type": "text"
                },
                "location": {
                    "type": "geo_point"
                }
            }
        }
    })
}

/// Build the search body for a geo-radius query.
///
/// The geo-distance predicate selects documents whose `location` lies within
/// `radius_km` of the center. No sort is added, so hits come back in the
/// backend's default order.
pub fn geo_distance_query(query: &RadiusQuery, max_results: usize) -> Value {
    json!({
        "size": max_results,
        "query": {
            "geo_distance": {
                "distance": query.distance(),
                "location": {
                    "lat": query.center.lat,
                    "lon": query.center.lon
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use around_shared::Location;

    #[test]
    fn test_index_settings_structure() {
        let settings = get_index_settings("post");

        assert!(settings["settings"]["number_of_shards"].is_number());
        assert!(settings["settings"]["number_of_replicas"].is_number());

        assert_eq!(
            settings["mappings"]["properties"]["location"]["type"],
            "geo_point"
        );
        assert_eq!(settings["mappings"]["properties"]["user"]["type"], "keyword");
        assert_eq!(settings["mappings"]["properties"]["message"]["type"], "text");
        assert_eq!(settings["mappings"]["_meta"]["doc_type"], "post");
    }

    #[test]
    fn test_default_config() {
        let config = IndexConfig::default();
        assert_eq!(config.name, "around");
        assert_eq!(config.doc_type, "post");
        assert_eq!(config.max_results, 10_000);
    }

    #[test]
    fn test_geo_distance_query() {
        let query = RadiusQuery::new(Location::new(47.6, -122.3), 10.0);
        let body = geo_distance_query(&query, 50);

        assert_eq!(body["size"], 50);
        let predicate = &body["query"]["geo_distance"];
        assert_eq!(predicate["distance"], "10km");
        assert_eq!(predicate["location"]["lat"], 47.6);
        assert_eq!(predicate["location"]["lon"], -122.3);
        assert!(body.get("sort").is_none());
    }
}
