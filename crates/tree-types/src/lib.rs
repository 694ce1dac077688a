//! Foundation types for TreeStore.
//!
//! This crate provides the data shapes shared by every other TreeStore
//! crate: identifiers, the externally visible item record, partial updates,
//! and serializable operations.
//!
//! # Key Types
//!
//! - [`ItemId`]: Integer or string identifier; `1` and `"1"` are distinct
//! - [`Item`]: Externally visible record (id, parent, label)
//! - [`ItemPatch`]: Partial update with a tri-state parent field
//! - [`Operation`]: Serializable add/remove/update request

pub mod error;
pub mod id;
pub mod item;
pub mod operation;

pub use error::TypeError;
pub use id::ItemId;
pub use item::{Item, ItemPatch};
pub use operation::Operation;
