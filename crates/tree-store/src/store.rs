//! The core tree store and its traversal algorithms.
//!
//! [`TreeStore`] keeps every [`Node`] in a [`HashMap`] keyed by [`ItemId`]
//! and an insertion-ordered index used for the flattened listing. Parent and
//! child links are ids resolved through the map, never owning references.
//!
//! Subtree walks (descendant listing, subtree removal, reachability) use an
//! explicit stack so that deep trees cannot overflow the call stack.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::debug;

use tree_types::{Item, ItemId, ItemPatch, Operation};

use crate::cache::SnapshotCache;
use crate::error::{StoreError, StoreResult};
use crate::node::Node;

/// In-memory hierarchy of items.
///
/// Query results borrow from the store and reflect the latest data; the
/// borrow checker forbids holding them across a mutation, so callers
/// re-query after mutating.
#[derive(Clone, Debug, Default)]
pub struct TreeStore {
    /// All nodes, keyed by item id.
    nodes: HashMap<ItemId, Node>,
    /// Insertion order: sequence number -> id.
    order: BTreeMap<u64, ItemId>,
    next_seq: u64,
    cache: SnapshotCache,
}

impl TreeStore {
    /// Create an empty store.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a store from a copy of `items`.
    ///
    /// See [`from_items`](Self::from_items).
    pub fn new(items: &[Item]) -> StoreResult<Self> {
        Self::from_items(items.iter().cloned())
    }

    /// Build a store from `items`, kept in input order.
    ///
    /// Nodes are created first and linked to their parents in a second pass,
    /// so children may precede their parents in the input. Fails with
    /// [`StoreError::Initialization`] if a parent is missing,
    /// [`StoreError::DuplicateId`] on a repeated id, and
    /// [`StoreError::CycleDetected`] if the input items form a loop.
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> StoreResult<Self> {
        let mut store = Self::default();
        let mut snapshot = Vec::new();

        for item in items {
            if store.nodes.contains_key(&item.id) {
                return Err(StoreError::DuplicateId(item.id));
            }
            snapshot.push(item.clone());
            store.insert_unlinked(item);
        }

        for item in &snapshot {
            if let Some(parent) = &item.parent {
                let parent_node =
                    store
                        .nodes
                        .get_mut(parent)
                        .ok_or_else(|| StoreError::Initialization {
                            id: item.id.clone(),
                            parent: parent.clone(),
                        })?;
                parent_node.children.push(item.id.clone());
            }
        }

        if let Some(stranded) = store.first_unreachable() {
            return Err(stranded.cycle_error());
        }

        store.cache = SnapshotCache::filled(snapshot);
        debug!(items = store.len(), roots = store.roots().len(), "built tree store");
        Ok(store)
    }

    /// Total number of items.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the store holds no items.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.nodes.contains_key(id)
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    /// All items in insertion order.
    ///
    /// Construction order first, later additions appended; updated items
    /// keep their position. Served from the snapshot cache.
    pub fn get_all(&self) -> &[Item] {
        self.cache.get_or_rebuild(|| self.collect_all())
    }

    /// Recompute the flattened listing without touching the cache.
    ///
    /// Always equal to [`get_all`](Self::get_all).
    pub fn collect_all(&self) -> Vec<Item> {
        self.order
            .values()
            .filter_map(|id| self.nodes.get(id))
            .map(|node| node.item.clone())
            .collect()
    }

    /// Look up an item. Absence is a normal outcome, not an error.
    pub fn get_item(&self, id: &ItemId) -> Option<&Item> {
        self.nodes.get(id).map(|node| &node.item)
    }

    /// Look up the node wrapping an item.
    pub fn get_node(&self, id: &ItemId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Direct children of `id`, in child-list order.
    pub fn get_children(&self, id: &ItemId) -> StoreResult<Vec<&Item>> {
        let node = self.node(id)?;
        Ok(node
            .children
            .iter()
            .filter_map(|child| self.get_item(child))
            .collect())
    }

    /// Every descendant of `id`, excluding `id` itself.
    ///
    /// Pre-order, left to right, each descendant exactly once.
    pub fn get_all_children(&self, id: &ItemId) -> StoreResult<Vec<&Item>> {
        let node = self.node(id)?;

        let mut result = Vec::new();
        let mut stack: Vec<&ItemId> = node.children.iter().rev().collect();

        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get(current) {
                result.push(&node.item);
                stack.extend(node.children.iter().rev());
            }
        }

        Ok(result)
    }

    /// The path from `id` up to its root: `[self, parent, ..., root]`.
    pub fn get_all_parents(&self, id: &ItemId) -> StoreResult<Vec<&Item>> {
        self.node(id)?;
        Ok(self.ancestors(id).collect())
    }

    /// Iterate from `id` (inclusive) up to its root.
    ///
    /// Yields nothing for an unknown id. The walk is capped at `len()`
    /// steps.
    pub fn ancestors<'a>(&'a self, id: &ItemId) -> Ancestors<'a> {
        Ancestors {
            store: self,
            next: self.nodes.get_key_value(id).map(|(key, _)| key),
            remaining: self.len(),
        }
    }

    /// Number of ancestors above `id`; roots have depth 0.
    pub fn depth(&self, id: &ItemId) -> StoreResult<usize> {
        self.node(id)?;
        Ok(self.ancestors(id).count() - 1)
    }

    /// Root items in insertion order.
    pub fn roots(&self) -> Vec<&Item> {
        self.order
            .values()
            .filter_map(|id| self.nodes.get(id))
            .filter(|node| node.is_root())
            .map(|node| &node.item)
            .collect()
    }

    // ---------------------------------------------------------------
    // Mutation
    // ---------------------------------------------------------------

    /// Insert a new item.
    ///
    /// A child is appended as the last child of its parent; an item without
    /// a parent becomes a new root.
    pub fn add_item(&mut self, item: Item) -> StoreResult<()> {
        if self.nodes.contains_key(&item.id) {
            return Err(StoreError::DuplicateId(item.id));
        }

        if let Some(parent) = &item.parent {
            let parent_node = self
                .nodes
                .get_mut(parent)
                .ok_or_else(|| StoreError::NotFound(parent.clone()))?;
            parent_node.children.push(item.id.clone());
        }

        debug!(id = ?item.id, parent = ?item.parent, "added item");
        self.insert_unlinked(item);
        self.cache.invalidate();
        Ok(())
    }

    /// Delete `id` and its entire subtree.
    ///
    /// Returns the removed items, `id` first, then its descendants in
    /// pre-order.
    pub fn remove_item(&mut self, id: &ItemId) -> StoreResult<Vec<Item>> {
        let parent = self.node(id)?.item.parent.clone();

        if let Some(parent) = parent {
            if let Some(parent_node) = self.nodes.get_mut(&parent) {
                parent_node.unlink_child(id);
            }
        }

        let mut removed = Vec::new();
        let mut stack = vec![id.clone()];

        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                self.order.remove(&node.seq);
                stack.extend(node.children.into_iter().rev());
                removed.push(node.item);
            }
        }

        debug!(id = ?id, removed = removed.len(), "removed subtree");
        self.cache.invalidate();
        Ok(removed)
    }

    /// Merge `patch` onto an existing item, reparenting if requested.
    ///
    /// Reparenting happens only when `patch.parent` is provided and differs
    /// from the current parent. The new parent must exist and must not be
    /// the item itself or one of its descendants. All checks run before
    /// anything changes.
    pub fn update_item(&mut self, patch: ItemPatch) -> StoreResult<()> {
        let node = self.node(&patch.id)?;
        let reparent = patch
            .parent_change(node.parent())
            .map(|parent| parent.cloned());

        if let Some(Some(new_parent)) = &reparent {
            if !self.nodes.contains_key(new_parent) {
                return Err(StoreError::NotFound(new_parent.clone()));
            }
            // Walking up from the new parent must not meet the moved item.
            if self.ancestors(new_parent).any(|item| item.id == patch.id) {
                return Err(StoreError::CycleDetected {
                    id: patch.id,
                    parent: new_parent.clone(),
                });
            }
        }

        if let Some(new_parent) = reparent {
            self.relink(&patch.id, new_parent);
        }

        if let Some(label) = patch.label {
            if let Some(node) = self.nodes.get_mut(&patch.id) {
                node.item.label = label;
            }
        }

        debug!(id = ?patch.id, "updated item");
        self.cache.invalidate();
        Ok(())
    }

    /// Dispatch a serialized [`Operation`].
    pub fn apply(&mut self, op: Operation) -> StoreResult<()> {
        match op {
            Operation::Add { item } => self.add_item(item),
            Operation::Remove { id } => self.remove_item(&id).map(|_| ()),
            Operation::Update { patch } => self.update_item(patch),
        }
    }

    // ---------------------------------------------------------------
    // Validation
    // ---------------------------------------------------------------

    /// Check the store's structural integrity.
    ///
    /// Verifies that every parent reference resolves, that parent and child
    /// links agree in both directions, and that every item is reachable from
    /// a root (no cycles).
    pub fn validate(&self) -> StoreResult<()> {
        for node in self.nodes.values() {
            if let Some(parent) = node.parent() {
                let parent_node = self.nodes.get(parent).ok_or_else(|| {
                    StoreError::Inconsistent(format!(
                        "item {:?} references missing parent {:?}",
                        node.id(),
                        parent
                    ))
                })?;
                let listed = parent_node
                    .children
                    .iter()
                    .filter(|child| *child == node.id())
                    .count();
                if listed != 1 {
                    return Err(StoreError::Inconsistent(format!(
                        "item {:?} is listed {} times under parent {:?}",
                        node.id(),
                        listed,
                        parent
                    )));
                }
            }

            for child in &node.children {
                let child_parent = self.nodes.get(child).and_then(|c| c.parent());
                if child_parent != Some(node.id()) {
                    return Err(StoreError::Inconsistent(format!(
                        "item {:?} lists {:?} as a child, which does not point back",
                        node.id(),
                        child
                    )));
                }
            }
        }

        if self.order.len() != self.nodes.len() {
            return Err(StoreError::Inconsistent(format!(
                "order index holds {} ids for {} items",
                self.order.len(),
                self.nodes.len()
            )));
        }

        match self.first_unreachable() {
            Some(stranded) => Err(stranded.cycle_error()),
            None => Ok(()),
        }
    }

    // ---------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------

    fn node(&self, id: &ItemId) -> StoreResult<&Node> {
        self.nodes
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn insert_unlinked(&mut self, item: Item) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.order.insert(seq, item.id.clone());
        self.nodes.insert(item.id.clone(), Node::new(item, seq));
    }

    /// Move `id` from its current parent's child list to `new_parent`'s.
    /// Callers have already checked existence and cycles.
    fn relink(&mut self, id: &ItemId, new_parent: Option<ItemId>) {
        let old_parent = self
            .nodes
            .get(id)
            .and_then(|node| node.item.parent.clone());

        if let Some(old_parent) = old_parent {
            if let Some(parent_node) = self.nodes.get_mut(&old_parent) {
                parent_node.unlink_child(id);
            }
        }

        if let Some(parent) = &new_parent {
            if let Some(parent_node) = self.nodes.get_mut(parent) {
                parent_node.children.push(id.clone());
            }
        }

        debug!(id = ?id, parent = ?new_parent, "reparented item");
        if let Some(node) = self.nodes.get_mut(id) {
            node.item.parent = new_parent;
        }
    }

    /// First node (in insertion order) not reachable from any root.
    ///
    /// Only nodes caught in a parent loop, or hanging below one, are
    /// unreachable.
    fn first_unreachable(&self) -> Option<&Node> {
        let mut seen: HashSet<&ItemId> = HashSet::with_capacity(self.nodes.len());
        let mut stack: Vec<&ItemId> = self
            .nodes
            .values()
            .filter(|node| node.is_root())
            .map(|node| node.id())
            .collect();

        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            if let Some(node) = self.nodes.get(current) {
                stack.extend(node.children.iter());
            }
        }

        if seen.len() == self.nodes.len() {
            return None;
        }
        self.order
            .values()
            .filter_map(|id| self.nodes.get(id))
            .find(|node| !seen.contains(node.id()))
    }
}

impl Node {
    fn cycle_error(&self) -> StoreError {
        match self.parent() {
            Some(parent) => StoreError::CycleDetected {
                id: self.id().clone(),
                parent: parent.clone(),
            },
            None => StoreError::Inconsistent(format!(
                "root {:?} is unreachable from the root set",
                self.id()
            )),
        }
    }
}

impl TryFrom<Vec<Item>> for TreeStore {
    type Error = StoreError;

    fn try_from(items: Vec<Item>) -> StoreResult<Self> {
        Self::from_items(items)
    }
}

/// Iterator from an item up to its root, see [`TreeStore::ancestors`].
pub struct Ancestors<'a> {
    store: &'a TreeStore,
    next: Option<&'a ItemId>,
    remaining: usize,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a Item;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.store.nodes.get(self.next?)?;
        self.remaining -= 1;
        self.next = node.parent();
        Some(&node.item)
    }
}
