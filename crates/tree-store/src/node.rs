//! Store-owned node type.
//!
//! A [`Node`] wraps an [`Item`] with the ordered ids of its direct children.
//! The parent link is the item's own `parent` id, resolved through the
//! store's index, so the index is the single owner of every node and links
//! in both directions are plain ids.

use tree_types::{Item, ItemId};

/// An item plus its position in the hierarchy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub(crate) item: Item,
    pub(crate) children: Vec<ItemId>,
    /// Insertion sequence number; orders the flattened listing.
    pub(crate) seq: u64,
}

impl Node {
    pub(crate) fn new(item: Item, seq: u64) -> Self {
        Self {
            item,
            children: Vec::new(),
            seq,
        }
    }

    pub fn item(&self) -> &Item {
        &self.item
    }

    pub fn id(&self) -> &ItemId {
        &self.item.id
    }

    pub fn parent(&self) -> Option<&ItemId> {
        self.item.parent.as_ref()
    }

    /// Direct child ids in insertion order.
    pub fn children(&self) -> &[ItemId] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.item.is_root()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn unlink_child(&mut self, child: &ItemId) {
        self.children.retain(|c| c != child);
    }
}
