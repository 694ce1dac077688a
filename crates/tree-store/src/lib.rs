//! Hierarchical item store for TreeStore.
//!
//! Holds a collection of [`Item`]s, each with a unique [`ItemId`] and an
//! optional parent, and answers navigation queries (children, full subtree,
//! ancestor chain) and mutations (insert, delete-with-subtree, reparent).
//!
//! # Invariants
//!
//! After every public operation returns:
//!
//! - Every non-root item's parent resolves to an item in the store.
//! - An item appears in its parent's child list iff its `parent` names it.
//! - Following parents from any item reaches a root within `len()` steps.
//! - Ids are unique.
//!
//! A failed operation leaves the store exactly as it was.
//!
//! # Modules
//!
//! - [`error`]: [`StoreError`] and the [`StoreResult`] alias
//! - [`node`]: Store-owned [`Node`] wrapping an item with its child links
//! - [`cache`]: [`SnapshotCache`] backing [`TreeStore::get_all`]
//! - [`store`]: The [`TreeStore`] itself
//! - [`shared`]: [`SharedTreeStore`], one lock around a store

pub mod cache;
pub mod error;
pub mod node;
pub mod shared;
pub mod store;

pub use cache::SnapshotCache;
pub use error::{StoreError, StoreResult};
pub use node::Node;
pub use shared::SharedTreeStore;
pub use store::{Ancestors, TreeStore};

pub use tree_types::{Item, ItemId, ItemPatch, Operation};
