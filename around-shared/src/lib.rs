//! # Around Shared
//!
//! Data structures exchanged at every boundary of the around service: the
//! incoming [`Post`], the identity assigned to it at ingestion, the document
//! stored in the search index and the row projection written to the
//! wide-column store.

pub mod types;

pub use types::post::{Location, LocationError, Post, PostId};
pub use types::post_record::{encode_coordinate, Cell, PostRecord, WriteTime};
pub use types::search_document::SearchDocument;
