//! Text and JSON rendering of store contents.

use colored::Colorize;
use serde::Serialize;

use tree_store::TreeStore;
use tree_types::Item;

pub fn json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// `id  label  ↑ parent`, with the parent part omitted for roots.
pub fn item_line(item: &Item) -> String {
    let id = format!("{:?}", item.id).yellow();
    match &item.parent {
        None => format!("{id}  {}", item.label),
        Some(parent) => format!(
            "{id}  {}  {}",
            item.label,
            format!("↑ {parent:?}").dimmed()
        ),
    }
}

pub fn item_lines<'a>(items: impl IntoIterator<Item = &'a Item>) -> String {
    let lines: Vec<String> = items.into_iter().map(item_line).collect();
    if lines.is_empty() {
        return "(no items)".dimmed().to_string();
    }
    lines.join("\n")
}

/// Indented outline of every root and its subtree.
pub fn tree(store: &TreeStore) -> String {
    let mut lines = Vec::new();
    let mut stack: Vec<(&Item, usize)> = store
        .roots()
        .into_iter()
        .rev()
        .map(|item| (item, 0))
        .collect();

    while let Some((item, depth)) = stack.pop() {
        lines.push(format!(
            "{}{}  {}",
            "  ".repeat(depth),
            format!("{:?}", item.id).yellow(),
            item.label
        ));
        if let Ok(children) = store.get_children(&item.id) {
            stack.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
        }
    }

    if lines.is_empty() {
        return "(no items)".dimmed().to_string();
    }
    lines.join("\n")
}
