use serde::{Deserialize, Serialize};

use crate::ids::{IdSource, SequentialIds, UuidIds};

/// How ids for new rows are generated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IdKind {
    /// UUIDv7 strings.
    Uuid,
    /// Integers counting up from `start`.
    Sequential { start: i64 },
}

impl IdKind {
    pub fn source(&self) -> Box<dyn IdSource> {
        match self {
            Self::Uuid => Box::new(UuidIds),
            Self::Sequential { start } => Box::new(SequentialIds::new(*start)),
        }
    }
}

/// Configuration for a [`TreeTableModel`](crate::TreeTableModel).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Label given to rows created by `add_row`.
    pub new_item_label: String,
    /// Id generation for new rows.
    pub id_kind: IdKind,
    /// Whether the model starts in edit mode.
    pub start_in_edit_mode: bool,
    /// Category shown for rows that have children.
    pub group_label: String,
    /// Category shown for leaf rows.
    pub item_label: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            new_item_label: "New item".into(),
            id_kind: IdKind::Uuid,
            start_in_edit_mode: false,
            group_label: "Group".into(),
            item_label: "Item".into(),
        }
    }
}

impl ModelConfig {
    /// Integer ids counting up from `start`; handy for tests and demos.
    pub fn sequential(start: i64) -> Self {
        Self {
            id_kind: IdKind::Sequential { start },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = ModelConfig::default();
        assert_eq!(c.new_item_label, "New item");
        assert_eq!(c.id_kind, IdKind::Uuid);
        assert!(!c.start_in_edit_mode);
        assert_eq!(c.group_label, "Group");
        assert_eq!(c.item_label, "Item");
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let c: ModelConfig =
            serde_json::from_str(r#"{"id_kind": {"kind": "sequential", "start": 100}}"#).unwrap();
        assert_eq!(c.id_kind, IdKind::Sequential { start: 100 });
        assert_eq!(c.new_item_label, "New item");
    }
}
