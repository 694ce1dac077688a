use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use colored::Colorize;
use tracing::{debug, info};

use tree_store::TreeStore;
use tree_types::{Item, ItemId, Operation};

use crate::cli::*;
use crate::render;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let path = cli
        .file
        .as_deref()
        .context("no item file given; pass --file or set TREESTORE_FILE")?;
    let mut store = load_store(path)?;
    let output = execute(&mut store, cli.command, cli.format, cli.string_ids)?;
    println!("{output}");
    Ok(())
}

/// Read a JSON array of items and build a store from it.
pub fn load_store(path: &Path) -> anyhow::Result<TreeStore> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading items from {}", path.display()))?;
    let items: Vec<Item> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing items in {}", path.display()))?;
    let store = TreeStore::from_items(items)
        .with_context(|| format!("building tree from {}", path.display()))?;
    debug!(path = %path.display(), items = store.len(), "loaded store");
    Ok(store)
}

/// Read a JSON array of operations.
pub fn load_ops(path: &Path) -> anyhow::Result<Vec<Operation>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading operations from {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing operations in {}", path.display()))
}

pub fn execute(
    store: &mut TreeStore,
    command: Command,
    format: OutputFormat,
    string_ids: bool,
) -> anyhow::Result<String> {
    let parse = |raw: &str| ItemId::parse_loose(raw, string_ids);
    match command {
        Command::List => cmd_list(store, format),
        Command::Get(args) => cmd_get(store, &parse(&args.id), format),
        Command::Children(args) => cmd_children(store, &parse(&args.id), args.all, format),
        Command::Ancestors(args) => cmd_ancestors(store, &parse(&args.id), format),
        Command::Tree => cmd_tree(store, format),
        Command::Check => cmd_check(store, format),
        Command::Apply(args) => {
            let ops = load_ops(&args.ops)?;
            cmd_apply(store, ops, format)
        }
    }
}

fn listing(items: &[&Item], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(render::item_lines(items.iter().copied())),
        OutputFormat::Json => render::json(items),
    }
}

fn cmd_list(store: &TreeStore, format: OutputFormat) -> anyhow::Result<String> {
    let items: Vec<&Item> = store.get_all().iter().collect();
    listing(&items, format)
}

fn cmd_get(store: &TreeStore, id: &ItemId, format: OutputFormat) -> anyhow::Result<String> {
    let Some(item) = store.get_item(id) else {
        bail!("item {id:?} not found");
    };
    match format {
        OutputFormat::Text => Ok(render::item_line(item)),
        OutputFormat::Json => render::json(item),
    }
}

fn cmd_children(
    store: &TreeStore,
    id: &ItemId,
    all: bool,
    format: OutputFormat,
) -> anyhow::Result<String> {
    let items = if all {
        store.get_all_children(id)
    } else {
        store.get_children(id)
    }
    .with_context(|| format!("listing children of {id:?}"))?;
    listing(&items, format)
}

fn cmd_ancestors(store: &TreeStore, id: &ItemId, format: OutputFormat) -> anyhow::Result<String> {
    let items = store
        .get_all_parents(id)
        .with_context(|| format!("listing ancestors of {id:?}"))?;
    listing(&items, format)
}

fn cmd_tree(store: &TreeStore, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(render::tree(store)),
        OutputFormat::Json => render::json(store.get_all()),
    }
}

fn cmd_check(store: &TreeStore, format: OutputFormat) -> anyhow::Result<String> {
    store.validate().context("hierarchy check failed")?;
    let roots = store.roots().len();
    match format {
        OutputFormat::Text => Ok(format!(
            "{} {} items, {} roots, hierarchy consistent",
            "✓".green().bold(),
            store.len(),
            roots
        )),
        OutputFormat::Json => render::json(&serde_json::json!({
            "items": store.len(),
            "roots": roots,
            "valid": true,
        })),
    }
}

fn cmd_apply(
    store: &mut TreeStore,
    ops: Vec<Operation>,
    format: OutputFormat,
) -> anyhow::Result<String> {
    let count = ops.len();
    for (index, op) in ops.into_iter().enumerate() {
        let target = op.target().clone();
        store
            .apply(op)
            .with_context(|| format!("operation #{} on {target:?} rejected", index + 1))?;
    }
    info!(applied = count, items = store.len(), "applied operations");
    cmd_list(store, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const ITEMS: &str = r#"[
        {"id": 1, "parent": null, "label": "Root"},
        {"id": 2, "parent": 1, "label": "Child"},
        {"id": "2", "parent": 2, "label": "String child"},
        {"id": 3, "parent": 1, "label": "Child 2"}
    ]"#;

    fn json_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn store() -> TreeStore {
        colored::control::set_override(false);
        let file = json_file(ITEMS);
        load_store(file.path()).unwrap()
    }

    fn run(store: &mut TreeStore, command: Command, format: OutputFormat) -> anyhow::Result<String> {
        execute(store, command, format, false)
    }

    #[test]
    fn load_reports_missing_parent() {
        let file = json_file(r#"[{"id": 2, "parent": 1, "label": "Orphan"}]"#);
        let err = load_store(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("missing parent item 1"));
    }

    #[test]
    fn load_reports_bad_json() {
        let file = json_file("{not json");
        let err = load_store(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("parsing items"));
    }

    #[test]
    fn list_text() {
        let mut store = store();
        let out = run(&mut store, Command::List, OutputFormat::Text).unwrap();
        assert_eq!(
            out,
            "1  Root\n2  Child  ↑ 1\n\"2\"  String child  ↑ 2\n3  Child 2  ↑ 1"
        );
    }

    #[test]
    fn get_respects_id_kind() {
        let mut store = store();
        let out = execute(
            &mut store,
            Command::Get(IdArgs { id: "2".into() }),
            OutputFormat::Text,
            true,
        )
        .unwrap();
        assert_eq!(out, "\"2\"  String child  ↑ 2");

        let out = run(&mut store, Command::Get(IdArgs { id: "2".into() }), OutputFormat::Text).unwrap();
        assert_eq!(out, "2  Child  ↑ 1");
    }

    #[test]
    fn get_missing_is_error() {
        let mut store = store();
        let err = run(&mut store, Command::Get(IdArgs { id: "9".into() }), OutputFormat::Text)
            .unwrap_err();
        assert_eq!(err.to_string(), "item 9 not found");
    }

    #[test]
    fn children_direct_and_all() {
        let mut store = store();
        let direct = run(
            &mut store,
            Command::Children(ChildrenArgs { id: "1".into(), all: false }),
            OutputFormat::Json,
        )
        .unwrap();
        let direct: Vec<Item> = serde_json::from_str(&direct).unwrap();
        assert_eq!(direct, vec![Item::child(2, 1, "Child"), Item::child(3, 1, "Child 2")]);

        let all = run(
            &mut store,
            Command::Children(ChildrenArgs { id: "1".into(), all: true }),
            OutputFormat::Json,
        )
        .unwrap();
        let all: Vec<Item> = serde_json::from_str(&all).unwrap();
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn ancestors_nearest_first() {
        let mut store = store();
        let out = execute(
            &mut store,
            Command::Ancestors(IdArgs { id: "2".into() }),
            OutputFormat::Json,
            true,
        )
        .unwrap();
        let path: Vec<Item> = serde_json::from_str(&out).unwrap();
        let ids: Vec<ItemId> = path.into_iter().map(|item| item.id).collect();
        assert_eq!(ids, vec![ItemId::from("2"), ItemId::Int(2), ItemId::Int(1)]);
    }

    #[test]
    fn check_reports_counts() {
        let mut store = store();
        let out = run(&mut store, Command::Check, OutputFormat::Text).unwrap();
        assert_eq!(out, "✓ 4 items, 1 roots, hierarchy consistent");
    }

    #[test]
    fn apply_runs_operations_in_order() {
        let mut store = store();
        let ops = json_file(
            r#"[
                {"op": "add", "item": {"id": 4, "parent": 3, "label": "New"}},
                {"op": "update", "patch": {"id": 3, "parent": null}},
                {"op": "remove", "id": 2}
            ]"#,
        );
        let out = run(
            &mut store,
            Command::Apply(ApplyArgs { ops: ops.path().to_path_buf() }),
            OutputFormat::Json,
        )
        .unwrap();
        let items: Vec<Item> = serde_json::from_str(&out).unwrap();
        assert_eq!(
            items,
            vec![
                Item::root(1, "Root"),
                Item::root(3, "Child 2"),
                Item::child(4, 3, "New"),
            ]
        );
    }

    #[test]
    fn apply_stops_at_rejected_operation() {
        let mut store = store();
        let ops = json_file(
            r#"[
                {"op": "update", "patch": {"id": 3, "label": "Renamed"}},
                {"op": "update", "patch": {"id": 1, "parent": 2}}
            ]"#,
        );
        let err = run(
            &mut store,
            Command::Apply(ApplyArgs { ops: ops.path().to_path_buf() }),
            OutputFormat::Text,
        )
        .unwrap_err();
        assert!(err.to_string().contains("operation #2 on 1 rejected"));
        assert_eq!(store.get_item(&ItemId::Int(3)).unwrap().label, "Renamed");
        assert_eq!(store.get_item(&ItemId::Int(1)).unwrap().parent, None);
    }
}
