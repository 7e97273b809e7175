//! Core data structures of the around service.
//!
//! - [`post`]: the post model and its identity
//! - [`search_document`]: the search index copy of a post
//! - [`post_record`]: the wide-column projection of a post

pub mod post;
pub mod post_record;
pub mod search_document;
