//! Headless tree-table model for TreeStore.
//!
//! [`TreeTableModel`] is what a grid adapter talks to: it owns a
//! [`TreeStore`](tree_store::TreeStore), turns row intents (add, remove,
//! rename, drag onto a new parent) into store calls, generates ids for new
//! rows, and exposes the row keys and data paths a tree grid needs. Nothing
//! here renders anything.

pub mod config;
pub mod error;
pub mod ids;
pub mod model;

pub use config::{IdKind, ModelConfig};
pub use error::{ModelError, ModelResult};
pub use ids::{IdSource, SequentialIds, UuidIds};
pub use model::TreeTableModel;
