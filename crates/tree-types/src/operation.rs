//! Serializable mutation requests.

use serde::{Deserialize, Serialize};

use crate::id::ItemId;
use crate::item::{Item, ItemPatch};

/// One mutation against a store, tagged by `op` in JSON:
///
/// ```json
/// [
///   {"op": "add", "item": {"id": 4, "parent": 1, "label": "New"}},
///   {"op": "update", "patch": {"id": 4, "parent": null}},
///   {"op": "remove", "id": 4}
/// ]
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    Add { item: Item },
    Remove { id: ItemId },
    Update { patch: ItemPatch },
}

impl Operation {
    /// The id the operation is addressed to.
    pub fn target(&self) -> &ItemId {
        match self {
            Self::Add { item } => &item.id,
            Self::Remove { id } => id,
            Self::Update { patch } => &patch.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_operation_script() {
        let script = r#"[
            {"op": "add", "item": {"id": 4, "parent": 1, "label": "New"}},
            {"op": "update", "patch": {"id": 4, "parent": null}},
            {"op": "update", "patch": {"id": 4, "label": "Renamed"}},
            {"op": "remove", "id": "4"}
        ]"#;
        let ops: Vec<Operation> = serde_json::from_str(script).unwrap();
        assert_eq!(ops.len(), 4);
        assert_eq!(
            ops[0],
            Operation::Add {
                item: Item::child(4, 1, "New")
            }
        );
        assert_eq!(
            ops[1],
            Operation::Update {
                patch: ItemPatch::new(4).with_parent(None)
            }
        );
        assert_eq!(
            ops[2],
            Operation::Update {
                patch: ItemPatch::new(4).with_label("Renamed")
            }
        );
        assert_eq!(ops[3].target(), &ItemId::from("4"));
    }

    #[test]
    fn unknown_op_is_rejected() {
        let err = serde_json::from_str::<Operation>(r#"{"op": "move", "id": 1}"#);
        assert!(err.is_err());
    }
}
