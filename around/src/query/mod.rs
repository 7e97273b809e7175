//! Geo-radius queries over the post index.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, instrument};

use around_repository::{RadiusQuery, SearchIndexProvider};
use around_shared::{Location, Post};

use crate::errors::QueryError;

/// Raw query string parameters of a search request.
///
/// Everything arrives as text so that parsing and its failure modes stay
/// under the orchestrator's control.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    pub lat: Option<String>,
    pub lon: Option<String>,
    /// Radius in kilometers.
    pub range: Option<String>,
    /// Overrides the configured pretty flag for this request.
    pub pretty: Option<bool>,
}

/// Query behavior fixed at startup.
#[derive(Debug, Clone)]
pub struct QueryConfig {
    pub default_radius_km: f64,
    pub pretty: bool,
    /// Missing or unparseable coordinates become 0 instead of an error.
    pub lenient_coordinates: bool,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_radius_km: 200.0,
            pretty: true,
            lenient_coordinates: false,
        }
    }
}

pub struct QueryOrchestrator {
    search: Arc<dyn SearchIndexProvider>,
    config: QueryConfig,
}

impl QueryOrchestrator {
    pub fn new(search: Arc<dyn SearchIndexProvider>, config: QueryConfig) -> Self {
        Self { search, config }
    }

    /// Turn request parameters into a radius query.
    pub fn build_query(&self, params: &SearchParams) -> Result<RadiusQuery, QueryError> {
        let center = if self.config.lenient_coordinates {
            Location::new(
                parse_lenient(params.lat.as_deref()),
                parse_lenient(params.lon.as_deref()),
            )
        } else {
            let center = Location::new(
                parse_strict("lat", params.lat.as_deref())?,
                parse_strict("lon", params.lon.as_deref())?,
            );
            center
                .validate()
                .map_err(|e| QueryError::invalid_coordinates(e.to_string()))?;
            center
        };

        let radius_km = match params.range.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => parse_radius(raw)?,
            _ => self.config.default_radius_km,
        };

        Ok(RadiusQuery::new(center, radius_km)
            .with_pretty(params.pretty.unwrap_or(self.config.pretty)))
    }

    /// Find every post within the requested radius, in backend order.
    #[instrument(skip(self, params))]
    pub async fn search(&self, params: &SearchParams) -> Result<Vec<Post>, QueryError> {
        let query = self.build_query(params)?;
        debug!(
            lat = query.center.lat,
            lon = query.center.lon,
            radius_km = query.radius_km,
            "Searching posts"
        );

        let hits = self.search.search_by_radius(&query).await?;

        Ok(hits.into_iter().map(|hit| hit.document.into_post()).collect())
    }
}

fn parse_strict(name: &str, raw: Option<&str>) -> Result<f64, QueryError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| QueryError::invalid_coordinates(format!("{name} is required")))?;

    raw.parse::<f64>()
        .map_err(|_| QueryError::invalid_coordinates(format!("{name} '{raw}' is not a number")))
}

fn parse_lenient(raw: Option<&str>) -> f64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

fn parse_radius(raw: &str) -> Result<f64, QueryError> {
    match raw.parse::<f64>() {
        Ok(km) if km.is_finite() && km > 0.0 => Ok(km),
        _ => Err(QueryError::invalid_range(format!(
            "range '{raw}' must be a positive number of kilometers"
        ))),
    }
}
