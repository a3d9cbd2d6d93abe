use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "zktree",
    about = "Export coordination-service node trees to the filesystem.",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(visible_alias = "x", about = "Write a tree out as files and directories")]
    Export(ExportArgs),

    #[command(visible_aliases = ["l", "ls"], about = "List the nodes of a tree")]
    List(ListArgs),

    #[command(about = "Print a node's metadata document")]
    Stat(StatArgs),
}

#[derive(Debug, clap::Args)]
#[command(after_help = "\
\x1b[1m\x1b[4mLayout:\x1b[0m
  /a/b          -> DIR/a/b
  /a (parent)   -> DIR/a/_znode
  ephemeral /a  -> DIR/a.metadata.xml

\x1b[1m\x1b[4mExamples:\x1b[0m
  zktree export dump.json -o out/
  zktree export dump.json --znode /services --all-metadata --acl -o out/")]
pub struct ExportArgs {
    /// JSON snapshot of the tree
    pub snapshot: PathBuf,

    /// Output directory (defaults to current directory)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Node to start from
    #[arg(long = "znode", default_value = "/")]
    pub znode: String,

    /// Write metadata for every node, not only ephemeral ones
    #[arg(long)]
    pub all_metadata: bool,

    /// Write each node's ACL list as `<name>.acl.xml`
    #[arg(long)]
    pub acl: bool,

    /// Suppress output
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Process nodes sequentially (disable parallel export)
    #[arg(long)]
    pub serial: bool,

    /// Number of parallel export tasks (default: CPU count)
    #[arg(short = 'j', long = "jobs")]
    pub jobs: Option<usize>,
}

#[derive(Debug, clap::Args)]
pub struct ListArgs {
    /// JSON snapshot of the tree
    pub snapshot: PathBuf,

    /// Node to start from
    #[arg(long = "znode", default_value = "/")]
    pub znode: String,
}

#[derive(Debug, clap::Args)]
pub struct StatArgs {
    /// JSON snapshot of the tree
    pub snapshot: PathBuf,

    /// Node to print, e.g. /services/web
    pub znode: String,

    /// Print the ACL list instead of the metadata
    #[arg(long)]
    pub acl: bool,
}
