//! Error types for the around repository.
//!
//! Each gateway has its own error enum. Both expose a [`BackendFailure`]
//! classification so the service layer can tell an unreachable backend from
//! one that refused the request.

mod column_store_error;
mod search_index_error;

pub use column_store_error::ColumnStoreError;
pub use search_index_error::SearchIndexError;

/// Coarse classification of a backend failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendFailure {
    /// The backend could not be reached, timed out, or reported itself overloaded.
    Unavailable,
    /// The backend answered but refused the request (bad document, bad query, bad schema).
    Rejected,
}

impl BackendFailure {
    /// Classify a non-success HTTP status returned by a backend.
    ///
    /// 5xx and 429 mean the backend cannot serve right now; every other
    /// status is a semantic rejection of this particular request.
    pub fn from_status(status: u16) -> Self {
        if status >= 500 || status == 429 {
            Self::Unavailable
        } else {
            Self::Rejected
        }
    }
}
