//! Search index document type.
//!
//! The index stores a post as flat JSON with the same shape as [`Post`]. The
//! `location` field is mapped as `geo_point` by the index schema, which is what
//! makes geo-distance queries possible.

use serde::{Deserialize, Serialize};

use crate::types::post::{Location, Post};

/// Document representation of a post in the search index.
///
/// Keyed in the index by the post's `PostId`; writing the same id again
/// overwrites the document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchDocument {
    pub user: String,
    pub message: String,
    pub location: Location,
}

impl SearchDocument {
    /// Project the document back into the public post shape.
    pub fn into_post(self) -> Post {
        Post {
            user: self.user,
            message: self.message,
            location: self.location,
        }
    }
}

impl From<&Post> for SearchDocument {
    fn from(post: &Post) -> Self {
        Self {
            user: post.user.clone(),
            message: post.message.clone(),
            location: post.location,
        }
    }
}
