//! Interface definitions for the two backing stores.
//!
//! The traits allow dependency injection of the concrete backends and easy
//! testing with mock implementations.

mod column_store_provider;
mod search_index_provider;

pub use column_store_provider::ColumnStoreProvider;
pub use search_index_provider::SearchIndexProvider;
