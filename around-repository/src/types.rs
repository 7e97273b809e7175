//! Request and response types for search index operations.

use around_shared::{Location, PostId, SearchDocument};

/// A geo-radius search request.
#[derive(Debug, Clone, PartialEq)]
pub struct RadiusQuery {
    /// Center of the search circle.
    pub center: Location,
    /// Radius of the search circle in kilometers.
    pub radius_km: f64,
    /// Ask the backend for a pretty-printed response body.
    pub pretty: bool,
}

impl RadiusQuery {
    pub fn new(center: Location, radius_km: f64) -> Self {
        Self {
            center,
            radius_km,
            pretty: false,
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// The radius in the backend's distance syntax, e.g. `"200km"`.
    pub fn distance(&self) -> String {
        format!("{}km", self.radius_km)
    }
}

/// A document returned by a search, paired with its identity.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub id: PostId,
    pub document: SearchDocument,
}
