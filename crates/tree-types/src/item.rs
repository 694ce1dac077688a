//! The externally visible item record and partial updates to it.

use serde::{Deserialize, Deserializer, Serialize};

use crate::id::ItemId;

/// A single row of the hierarchy.
///
/// `parent` is `None` for roots. The label is opaque to the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub parent: Option<ItemId>,
    pub label: String,
}

impl Item {
    pub fn new(id: impl Into<ItemId>, parent: Option<ItemId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent,
            label: label.into(),
        }
    }

    /// A root item (no parent).
    pub fn root(id: impl Into<ItemId>, label: impl Into<String>) -> Self {
        Self::new(id, None, label)
    }

    /// An item attached to `parent`.
    pub fn child(
        id: impl Into<ItemId>,
        parent: impl Into<ItemId>,
        label: impl Into<String>,
    ) -> Self {
        Self::new(id, Some(parent.into()), label)
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// A partial update addressed to an existing item.
///
/// `parent` is tri-state:
///
/// - `None`: not provided; linkage is left untouched
/// - `Some(None)`: make the item a root
/// - `Some(Some(id))`: move the item under `id`
///
/// In JSON an absent `parent` key and `"parent": null` are distinguished.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPatch {
    pub id: ItemId,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent: Option<Option<ItemId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl ItemPatch {
    /// An empty patch for `id`.
    pub fn new(id: impl Into<ItemId>) -> Self {
        Self {
            id: id.into(),
            parent: None,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the new parent; `None` makes the item a root.
    pub fn with_parent(mut self, parent: Option<ItemId>) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Full replacement of an item's fields, as sent by a row drag.
    pub fn from_item(item: &Item) -> Self {
        Self {
            id: item.id.clone(),
            parent: Some(item.parent.clone()),
            label: Some(item.label.clone()),
        }
    }

    /// The requested parent, if one was provided and it differs from
    /// `current`.
    pub fn parent_change(&self, current: Option<&ItemId>) -> Option<Option<&ItemId>> {
        match &self.parent {
            Some(requested) if requested.as_ref() != current => Some(requested.as_ref()),
            _ => None,
        }
    }
}

// A present field (even `null`) deserializes to `Some(..)`; an absent one
// falls back to `#[serde(default)]`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}
