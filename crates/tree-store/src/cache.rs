//! Snapshot cache for the flattened item listing.
//!
//! `get_all` is the hot path for a UI that re-renders after every change.
//! The cache keeps the last flattened list; mutations drop it and the next
//! read rebuilds it once. A filled cell means the snapshot is valid.

use std::cell::OnceCell;

use tracing::trace;
use tree_types::Item;

/// Cached flattened list plus its validity.
#[derive(Clone, Debug, Default)]
pub struct SnapshotCache {
    items: OnceCell<Vec<Item>>,
}

impl SnapshotCache {
    /// A valid cache holding `items`.
    pub fn filled(items: Vec<Item>) -> Self {
        Self {
            items: OnceCell::from(items),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.items.get().is_some()
    }

    /// Mark the snapshot stale.
    pub fn invalidate(&mut self) {
        self.items.take();
    }

    /// The cached snapshot, rebuilt with `rebuild` if stale.
    pub fn get_or_rebuild(&self, rebuild: impl FnOnce() -> Vec<Item>) -> &[Item] {
        self.items.get_or_init(|| {
            let items = rebuild();
            trace!(len = items.len(), "rebuilt item snapshot");
            items
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn default_cache_is_stale() {
        assert!(!SnapshotCache::default().is_valid());
    }

    #[test]
    fn rebuilds_once_until_invalidated() {
        let rebuilds = Cell::new(0);
        let rebuild = || {
            rebuilds.set(rebuilds.get() + 1);
            vec![Item::root(1, "Root")]
        };

        let mut cache = SnapshotCache::default();
        assert_eq!(cache.get_or_rebuild(rebuild).len(), 1);
        assert_eq!(cache.get_or_rebuild(rebuild).len(), 1);
        assert_eq!(rebuilds.get(), 1);
        assert!(cache.is_valid());

        cache.invalidate();
        assert!(!cache.is_valid());
        cache.get_or_rebuild(rebuild);
        assert_eq!(rebuilds.get(), 2);
    }

    #[test]
    fn filled_cache_skips_rebuild() {
        let cache = SnapshotCache::filled(vec![Item::root("a", "A")]);
        let items = cache.get_or_rebuild(|| panic!("filled cache must not rebuild"));
        assert_eq!(items, &[Item::root("a", "A")]);
    }
}
