//! Post model types.
//!
//! A [`Post`] is the canonical shape accepted by the ingestion endpoint and
//! returned by the search endpoint. It carries no identity of its own; the
//! [`PostId`] is assigned when the post is ingested and joins the search
//! document with the wide-column row.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// A geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

/// Reasons a [`Location`] is not usable as a geo point.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocationError {
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

impl Location {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Check that both coordinates are finite and inside the WGS84 ranges.
    ///
    /// NaN and infinities fail the range comparison and are rejected too.
    pub fn validate(&self) -> Result<(), LocationError> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(LocationError::LatitudeOutOfRange(self.lat));
        }
        if !(-180.0..=180.0).contains(&self.lon) {
            return Err(LocationError::LongitudeOutOfRange(self.lon));
        }
        Ok(())
    }
}

/// A geotagged short text post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    pub user: String,
    pub message: String,
    pub location: Location,
}

impl Post {
    pub fn new(user: impl Into<String>, message: impl Into<String>, location: Location) -> Self {
        Self {
            user: user.into(),
            message: message.into(),
            location,
        }
    }
}

/// Opaque identity assigned to a post at ingestion time.
///
/// Used as the document id in the search index and as the row key in the
/// wide-column store. Ids read back from the index are accepted verbatim, so
/// the inner value is not required to be a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(String);

impl PostId {
    /// Generate a new time-ordered identity (UUIDv7).
    ///
    /// The millisecond timestamp prefix plus 74 random bits make collisions
    /// practically impossible without any coordination between processes.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for PostId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for PostId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl AsRef<str> for PostId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_post_json_shape() {
        let post = Post::new("alice", "hello", Location::new(47.6, -122.3));
        let json = serde_json::to_value(&post).unwrap();

        assert_eq!(json["user"], "alice");
        assert_eq!(json["message"], "hello");
        assert_eq!(json["location"]["lat"], 47.6);
        assert_eq!(json["location"]["lon"], -122.3);
    }

    #[test]
    fn test_post_decodes_from_request_body() {
        let body = r#"{"user":"bob","message":"hi there","location":{"lat":37.77,"lon":-122.41}}"#;
        let post: Post = serde_json::from_str(body).unwrap();

        assert_eq!(post.user, "bob");
        assert_eq!(post.message, "hi there");
        assert_eq!(post.location, Location::new(37.77, -122.41));
    }

    #[test]
    fn test_post_missing_location_is_rejected() {
        let body = r#"{"user":"bob","message":"hi there"}"#;
        assert!(serde_json::from_str::<Post>(body).is_err());
    }

    #[test]
    fn test_location_validate() {
        assert!(Location::new(0.0, 0.0).validate().is_ok());
        assert!(Location::new(90.0, 180.0).validate().is_ok());
        assert!(Location::new(-90.0, -180.0).validate().is_ok());

        assert_eq!(
            Location::new(90.5, 0.0).validate(),
            Err(LocationError::LatitudeOutOfRange(90.5))
        );
        assert_eq!(
            Location::new(0.0, -181.0).validate(),
            Err(LocationError::LongitudeOutOfRange(-181.0))
        );
        assert!(Location::new(f64::NAN, 0.0).validate().is_err());
        assert!(Location::new(0.0, f64::INFINITY).validate().is_err());
    }

    #[test]
    fn test_generated_ids_are_distinct_uuids() {
        let ids: HashSet<PostId> = (0..1000).map(|_| PostId::generate()).collect();
        assert_eq!(ids.len(), 1000);

        for id in &ids {
            let parsed = Uuid::parse_str(id.as_str()).unwrap();
            assert_eq!(parsed.get_version_num(), 7);
        }
    }

    #[test]
    fn test_post_id_serializes_as_plain_string() {
        let id = PostId::from("abc-123");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc-123\"");
        assert_eq!(id.to_string(), "abc-123");
    }
}
