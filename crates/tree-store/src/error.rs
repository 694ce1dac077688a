//! Error types for store operations.

use tree_types::ItemId;

/// Errors that can occur during store operations.
///
/// Every error is raised before any state changes, so the store is left as
/// it was before the failed call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Construction input referenced a parent that is not in the input.
    #[error("missing parent item {parent:?} for item {id:?}")]
    Initialization {
        /// The item carrying the bad reference.
        id: ItemId,
        /// The missing parent.
        parent: ItemId,
    },

    /// An item with this id is already in the store.
    #[error("duplicate item id: {0:?}")]
    DuplicateId(ItemId),

    /// The named item (or named parent) is not in the store.
    #[error("item not found: {0:?}")]
    NotFound(ItemId),

    /// Attaching `id` under `parent` would make `id` its own ancestor.
    #[error("cycle detected: {parent:?} is {id:?} or one of its descendants")]
    CycleDetected {
        /// The item being moved.
        id: ItemId,
        /// The rejected parent.
        parent: ItemId,
    },

    /// Structural check failure reported by [`TreeStore::validate`].
    ///
    /// [`TreeStore::validate`]: crate::TreeStore::validate
    #[error("inconsistent tree: {0}")]
    Inconsistent(String),

    /// The lock around a shared store was poisoned by a panicking holder.
    #[error("store lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Convenience alias for store results.
pub type StoreResult<T> = Result<T, StoreError>;
