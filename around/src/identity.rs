//! Post identity generation.

use around_shared::PostId;

/// Source of fresh post identities.
///
/// Implementations must be safe to call from many tasks at once and must never
/// hand out the same id twice.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> PostId;
}

/// Time-ordered UUIDv7 ids.
#[derive(Debug, Default, Clone, Copy)]
pub struct TimeOrderedIds;

impl IdGenerator for TimeOrderedIds {
    fn generate(&self) -> PostId {
        PostId::generate()
    }
}
