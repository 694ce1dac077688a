//! Id generation for new rows.

use tree_types::ItemId;
use uuid::Uuid;

/// Supplies ids for rows created by the model.
///
/// The model skips any id already present in the store, so a source only
/// has to avoid repeating itself.
pub trait IdSource: Send {
    fn next_id(&mut self) -> ItemId;
}

/// UUIDv7 string ids.
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidIds;

impl IdSource for UuidIds {
    fn next_id(&mut self) -> ItemId {
        ItemId::Str(Uuid::now_v7().to_string())
    }
}

/// Integer ids counting up.
///
/// Wraps to `i64::MIN` after `i64::MAX`; the model skips any id that is
/// already taken.
#[derive(Clone, Debug)]
pub struct SequentialIds {
    next: i64,
}

impl SequentialIds {
    pub fn new(start: i64) -> Self {
        Self { next: start }
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> ItemId {
        let id = ItemId::Int(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_ids_are_unique_strings() {
        let mut ids = UuidIds;
        let a = ids.next_id();
        let b = ids.next_id();
        assert!(!a.is_int());
        assert_ne!(a, b);
    }

    #[test]
    fn sequential_ids_count_up() {
        let mut ids = SequentialIds::new(10);
        assert_eq!(ids.next_id(), ItemId::Int(10));
        assert_eq!(ids.next_id(), ItemId::Int(11));
    }

    #[test]
    fn sequential_ids_wrap_at_the_top() {
        let mut ids = SequentialIds::new(i64::MAX);
        assert_eq!(ids.next_id(), ItemId::Int(i64::MAX));
        assert_eq!(ids.next_id(), ItemId::Int(i64::MIN));
    }
}
