use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "treestore",
    about = "Inspect and edit TreeStore item hierarchies",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// JSON file holding an array of items
    #[arg(short, long, global = true, env = "TREESTORE_FILE")]
    pub file: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Treat every id argument as a string id, even if it looks numeric
    #[arg(long, global = true)]
    pub string_ids: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// List every item in order
    List,
    /// Show a single item
    Get(IdArgs),
    /// Show the children of an item
    Children(ChildrenArgs),
    /// Show the path from an item up to its root
    Ancestors(IdArgs),
    /// Draw the whole hierarchy
    Tree,
    /// Verify the hierarchy is consistent
    Check,
    /// Apply a JSON array of operations and print the result
    Apply(ApplyArgs),
}

#[derive(Args)]
pub struct IdArgs {
    pub id: String,
}

#[derive(Args)]
pub struct ChildrenArgs {
    pub id: String,
    /// Include every descendant, not just direct children
    #[arg(short, long)]
    pub all: bool,
}

#[derive(Args)]
pub struct ApplyArgs {
    pub ops: PathBuf,
}
