//! # Around Repository
//!
//! Gateways to the two backing stores of the around service:
//!
//! - the search index, abstracted by [`SearchIndexProvider`] and implemented for
//!   OpenSearch by [`OpenSearchProvider`]
//! - the wide-column store, abstracted by [`ColumnStoreProvider`] and
//!   implemented for Cloud Bigtable by [`BigtableProvider`]
//!
//! Both gateways classify their failures as [`BackendFailure::Unavailable`] or
//! [`BackendFailure::Rejected`] so callers can map them to responses without
//! knowing which backend produced them.

pub mod bigtable;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod types;

pub use crate::bigtable::{AuthMode, BigtableConfig, BigtableProvider};
pub use crate::errors::{BackendFailure, ColumnStoreError, SearchIndexError};
pub use crate::interfaces::{ColumnStoreProvider, SearchIndexProvider};
pub use crate::opensearch::{IndexConfig, OpenSearchProvider};
pub use crate::types::{RadiusQuery, SearchHit};
