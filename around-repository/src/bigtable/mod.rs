//! Cloud Bigtable implementation of the column store provider.
//!
//! Posts are written through the Data API v2 `mutateRow` REST method, one
//! request per post. Table layout:
//!
//! ## Post Table
//! - Row key: the post identity
//! - Column family: `post`
//!   - `user`: author name (String)
//!   - `message`: post text (String)
//! - Column family: `location`
//!   - `lat`: latitude as exact decimal (String)
//!   - `lon`: longitude as exact decimal (String)

mod config;
mod credentials;
mod mutation;
mod provider;

pub use config::{AuthMode, BigtableConfig};
pub use credentials::BIGTABLE_DATA_SCOPE;
pub use mutation::{MutateRowRequest, Mutation, SetCell};
pub use provider::BigtableProvider;
