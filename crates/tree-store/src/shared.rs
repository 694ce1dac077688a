//! A [`TreeStore`] behind one lock.
//!
//! [`SharedTreeStore`] takes a single `Mutex` for the whole of each public
//! call, so no caller ever observes a half-applied mutation such as a
//! reparent in progress. Results are owned copies because a borrow cannot
//! outlive the lock guard.

use std::sync::{Mutex, MutexGuard};

use tree_types::{Item, ItemId, ItemPatch, Operation};

use crate::error::{StoreError, StoreResult};
use crate::store::TreeStore;

/// Thread-safe wrapper around a [`TreeStore`].
#[derive(Debug, Default)]
pub struct SharedTreeStore {
    inner: Mutex<TreeStore>,
}

impl SharedTreeStore {
    /// Build a shared store from a copy of `items`.
    pub fn new(items: &[Item]) -> StoreResult<Self> {
        Ok(Self::from_store(TreeStore::new(items)?))
    }

    pub fn from_store(store: TreeStore) -> Self {
        Self {
            inner: Mutex::new(store),
        }
    }

    /// Unwrap the inner store.
    pub fn into_inner(self) -> StoreResult<TreeStore> {
        self.inner
            .into_inner()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }

    /// Run `f` against the store while holding the lock.
    pub fn read<R>(&self, f: impl FnOnce(&TreeStore) -> R) -> StoreResult<R> {
        Ok(f(&*self.lock()?))
    }

    pub fn len(&self) -> StoreResult<usize> {
        self.read(TreeStore::len)
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        self.read(TreeStore::is_empty)
    }

    pub fn get_all(&self) -> StoreResult<Vec<Item>> {
        self.read(|store| store.get_all().to_vec())
    }

    pub fn get_item(&self, id: &ItemId) -> StoreResult<Option<Item>> {
        self.read(|store| store.get_item(id).cloned())
    }

    pub fn get_children(&self, id: &ItemId) -> StoreResult<Vec<Item>> {
        self.read(|store| store.get_children(id).map(owned))?
    }

    pub fn get_all_children(&self, id: &ItemId) -> StoreResult<Vec<Item>> {
        self.read(|store| store.get_all_children(id).map(owned))?
    }

    pub fn get_all_parents(&self, id: &ItemId) -> StoreResult<Vec<Item>> {
        self.read(|store| store.get_all_parents(id).map(owned))?
    }

    pub fn add_item(&self, item: Item) -> StoreResult<()> {
        self.lock()?.add_item(item)
    }

    pub fn remove_item(&self, id: &ItemId) -> StoreResult<Vec<Item>> {
        self.lock()?.remove_item(id)
    }

    pub fn update_item(&self, patch: ItemPatch) -> StoreResult<()> {
        self.lock()?.update_item(patch)
    }

    pub fn apply(&self, op: Operation) -> StoreResult<()> {
        self.lock()?.apply(op)
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, TreeStore>> {
        self.inner
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }
}

fn owned(items: Vec<&Item>) -> Vec<Item> {
    items.into_iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn queries_return_owned_copies() {
        let shared = SharedTreeStore::new(&[Item::root(1, "Root"), Item::child(2, 1, "Child")])
            .unwrap();

        let before = shared.get_item(&ItemId::Int(2)).unwrap().unwrap();
        shared
            .update_item(ItemPatch::new(2).with_label("Renamed"))
            .unwrap();

        assert_eq!(before.label, "Child");
        assert_eq!(
            shared.get_item(&ItemId::Int(2)).unwrap().unwrap().label,
            "Renamed"
        );
    }

    #[test]
    fn read_sees_the_locked_store() {
        let shared = SharedTreeStore::new(&[
            Item::root(1, "Root"),
            Item::child(2, 1, "Child"),
            Item::root(3, "Other"),
        ])
        .unwrap();
        assert_eq!(shared.read(|store| store.roots().len()).unwrap(), 2);
        assert_eq!(shared.read(TreeStore::len).unwrap(), 3);
        assert_eq!(
            shared.get_all_parents(&ItemId::Int(2)).unwrap(),
            vec![Item::child(2, 1, "Child"), Item::root(1, "Root")]
        );
    }

    #[test]
    fn errors_pass_through() {
        let shared = SharedTreeStore::default();
        assert_eq!(
            shared.get_children(&ItemId::Int(1)).unwrap_err(),
            StoreError::NotFound(ItemId::Int(1))
        );
        assert!(shared.is_empty().unwrap());
    }

    #[test]
    fn concurrent_adds_are_serialized() {
        let shared = Arc::new(SharedTreeStore::new(&[Item::root(0, "Root")]).unwrap());

        let handles: Vec<_> = (1..=8)
            .map(|worker: i64| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || {
                    for n in 0..50 {
                        let id = worker * 1000 + n;
                        shared.add_item(Item::child(id, 0, "row")).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(shared.len().unwrap(), 1 + 8 * 50);
        assert_eq!(shared.get_children(&ItemId::Int(0)).unwrap().len(), 8 * 50);
        let store = Arc::try_unwrap(shared).unwrap().into_inner().unwrap();
        assert!(store.validate().is_ok());
    }

    #[test]
    fn poisoned_lock_is_reported() {
        let shared = Arc::new(SharedTreeStore::default());
        let poisoner = Arc::clone(&shared);
        let _ = thread::spawn(move || {
            let _guard = poisoner.inner.lock().unwrap();
            panic!("poison the store lock");
        })
        .join();

        assert!(matches!(
            shared.get_all(),
            Err(StoreError::LockPoisoned(_))
        ));
    }
}
