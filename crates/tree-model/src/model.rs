//! The tree-table model.
//!
//! Every action validates through the store first; rows change only when
//! the store accepted the change, and a rejected action leaves the model
//! untouched. [`TreeTableModel::revision`] advances after each accepted
//! mutation so a renderer knows when to re-read [`TreeTableModel::rows`].

use tracing::{debug, warn};

use tree_store::{StoreResult, TreeStore};
use tree_types::{Item, ItemId, ItemPatch};

use crate::config::ModelConfig;
use crate::error::ModelResult;
use crate::ids::IdSource;

/// Headless model behind an editable tree grid.
pub struct TreeTableModel {
    tree: TreeStore,
    config: ModelConfig,
    ids: Box<dyn IdSource>,
    edit_mode: bool,
    revision: u64,
}

impl TreeTableModel {
    /// Build a model over a copy of `items`.
    pub fn new(items: &[Item], config: ModelConfig) -> ModelResult<Self> {
        let ids = config.id_kind.source();
        Self::with_id_source(items, config, ids)
    }

    /// Build a model with a caller-supplied id source.
    pub fn with_id_source(
        items: &[Item],
        config: ModelConfig,
        ids: Box<dyn IdSource>,
    ) -> ModelResult<Self> {
        let tree = TreeStore::new(items)?;
        Ok(Self {
            tree,
            edit_mode: config.start_in_edit_mode,
            config,
            ids,
            revision: 0,
        })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// The underlying store, for read-only queries.
    pub fn store(&self) -> &TreeStore {
        &self.tree
    }

    /// Rows to display, in listing order.
    pub fn rows(&self) -> &[Item] {
        self.tree.get_all()
    }

    /// Number of accepted mutations so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn toggle_mode(&mut self) {
        self.edit_mode = !self.edit_mode;
        debug!(edit_mode = self.edit_mode, "toggled table mode");
    }

    // ---- Row actions ----

    /// Append a new root row with a fresh id and the configured label.
    pub fn add_row(&mut self) -> ModelResult<ItemId> {
        let id = self.fresh_id();
        let item = Item::root(id.clone(), self.config.new_item_label.clone());
        let result = self.tree.add_item(item);
        self.commit("add row", result)?;
        Ok(id)
    }

    /// Remove a row and every row below it.
    pub fn remove_row(&mut self, id: &ItemId) -> ModelResult<Vec<Item>> {
        let result = self.tree.remove_item(id);
        self.commit("remove row", result)
    }

    pub fn change_row_label(&mut self, id: &ItemId, label: impl Into<String>) -> ModelResult<()> {
        let result = self
            .tree
            .update_item(ItemPatch::new(id.clone()).with_label(label));
        self.commit("rename row", result)
    }

    /// Move a row under `new_parent`, or to the top level with `None`.
    ///
    /// Dropping a row onto its current parent does nothing.
    pub fn move_row_to_parent(
        &mut self,
        id: &ItemId,
        new_parent: Option<&ItemId>,
    ) -> ModelResult<()> {
        if let Some(item) = self.tree.get_item(id) {
            if item.parent.as_ref() == new_parent {
                return Ok(());
            }
        }
        let patch = ItemPatch::new(id.clone()).with_parent(new_parent.cloned());
        let result = self.tree.update_item(patch);
        self.commit("move row", result)
    }

    // ---- Grid accessors ----

    /// Row keys from the top-level ancestor down to `id` itself.
    pub fn data_path(&self, id: &ItemId) -> ModelResult<Vec<String>> {
        let mut path: Vec<String> = self
            .tree
            .get_all_parents(id)?
            .into_iter()
            .map(|item| item.id.row_key())
            .collect();
        path.reverse();
        Ok(path)
    }

    /// Unique key for a row; integer and string ids never collide.
    pub fn row_id(item: &Item) -> String {
        item.id.row_key()
    }

    /// Resolve a key produced by [`row_id`](Self::row_id).
    pub fn row_by_key(&self, key: &str) -> ModelResult<Option<&Item>> {
        let id: ItemId = key.parse()?;
        Ok(self.tree.get_item(&id))
    }

    /// Direct children of a row; no row means no children.
    pub fn children(&self, id: Option<&ItemId>) -> ModelResult<Vec<Item>> {
        match id {
            Some(id) => Ok(self.tree.get_children(id)?.into_iter().cloned().collect()),
            None => Ok(Vec::new()),
        }
    }

    /// Category column text: the group label for rows with children, the
    /// item label otherwise.
    pub fn category(&self, id: &ItemId) -> ModelResult<&str> {
        let label: &str = if self.tree.get_children(id)?.is_empty() {
            &self.config.item_label
        } else {
            &self.config.group_label
        };
        Ok(label)
    }

    // ---- Internals ----

    fn fresh_id(&mut self) -> ItemId {
        loop {
            let id = self.ids.next_id();
            if !self.tree.contains(&id) {
                return id;
            }
        }
    }

    fn commit<T>(&mut self, action: &str, result: StoreResult<T>) -> ModelResult<T> {
        match result {
            Ok(value) => {
                self.revision += 1;
                debug!(action, revision = self.revision, "row action applied");
                Ok(value)
            }
            Err(err) => {
                warn!(action, error = %err, "row action rejected");
                Err(err.into())
            }
        }
    }
}

impl std::fmt::Debug for TreeTableModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeTableModel")
            .field("rows", &self.tree.len())
            .field("edit_mode", &self.edit_mode)
            .field("revision", &self.revision)
            .finish()
    }
}
