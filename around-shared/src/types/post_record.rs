//! Wide-column projection of a post.
//!
//! The column store has no typed values: every cell is an opaque byte string.
//! A post is written as four cells in two column families:
//!
//! | family     | qualifier | value                         |
//! |------------|-----------|-------------------------------|
//! | `post`     | `user`    | UTF-8 user name               |
//! | `post`     | `message` | UTF-8 message                 |
//! | `location` | `lat`     | exact decimal of the latitude |
//! | `location` | `lon`     | exact decimal of the longitude|

use chrono::{DateTime, Utc};

use crate::types::post::Post;

pub const POST_FAMILY: &str = "post";
pub const LOCATION_FAMILY: &str = "location";

/// A single cell of a row mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub family: String,
    pub qualifier: String,
    pub value: Vec<u8>,
}

impl Cell {
    pub fn new(family: &str, qualifier: &str, value: impl Into<Vec<u8>>) -> Self {
        Self {
            family: family.to_string(),
            qualifier: qualifier.to_string(),
            value: value.into(),
        }
    }
}

/// The set of cells written for one post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRecord {
    pub cells: Vec<Cell>,
}

impl PostRecord {
    /// Look up a cell value by family and qualifier.
    pub fn get(&self, family: &str, qualifier: &str) -> Option<&[u8]> {
        self.cells
            .iter()
            .find(|c| c.family == family && c.qualifier == qualifier)
            .map(|c| c.value.as_slice())
    }
}

impl From<&Post> for PostRecord {
    fn from(post: &Post) -> Self {
        Self {
            cells: vec![
                Cell::new(POST_FAMILY, "user", post.user.as_bytes()),
                Cell::new(POST_FAMILY, "message", post.message.as_bytes()),
                Cell::new(
                    LOCATION_FAMILY,
                    "lat",
                    encode_coordinate(post.location.lat),
                ),
                Cell::new(
                    LOCATION_FAMILY,
                    "lon",
                    encode_coordinate(post.location.lon),
                ),
            ],
        }
    }
}

/// Encode a coordinate as its exact decimal string.
///
/// `f64`'s `Display` produces the shortest digit string that parses back to
/// the same value and never switches to exponent notation, so
/// `encode_coordinate(x).parse::<f64>() == Ok(x)` for every finite `x`.
pub fn encode_coordinate(value: f64) -> String {
    format!("{}", value)
}

/// Cell timestamp of a mutation, in microseconds since the Unix epoch.
///
/// Truncated to whole milliseconds, the granularity column stores accept by
/// default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct WriteTime(i64);

impl WriteTime {
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self(at.timestamp_millis() * 1000)
    }

    pub fn as_micros(&self) -> i64 {
        self.0
    }
}
