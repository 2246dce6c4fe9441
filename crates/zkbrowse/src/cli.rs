//! Clap derive structures for the `zkbrowse` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Also compiled by `build.rs` for man page generation, so this file may
//! only depend on clap and clap_complete.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// zkbrowse -- browse and edit ZooKeeper namespaces through an HTTP gateway
#[derive(Debug, Parser)]
#[command(
    name = "zkbrowse",
    version,
    about = "Browse and edit ZooKeeper namespaces from the command line",
    long_about = "Reads and writes ZooKeeper nodes through the namespace gateway.\n\n\
        Creates build missing parents, deletes are recursive, and the\n\
        protected prefix (default /zookeeper) is never written to.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Gateway profile to use
    #[arg(long, short = 'p', env = "ZKBROWSE_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Gateway URL (overrides profile)
    #[arg(long, short = 'g', env = "ZKBROWSE_GATEWAY", global = true)]
    pub gateway: Option<String>,

    /// Cluster address, e.g. zk1:2181 (overrides profile)
    #[arg(long, short = 'c', env = "ZKBROWSE_CLUSTER", global = true)]
    pub cluster: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "ZKBROWSE_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "ZKBROWSE_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "ZKBROWSE_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List and manage clusters known to the gateway
    #[command(alias = "cl")]
    Clusters(ClustersArgs),

    /// Show the node tree below a path
    #[command(alias = "ls")]
    Tree(TreeArgs),

    /// Show a single node with its data and stat
    Get(GetArgs),

    /// Create a node, building missing parents
    #[command(alias = "mk")]
    Create(CreateArgs),

    /// Replace a node's data
    Set(SetArgs),

    /// Delete a node and everything below it
    #[command(alias = "delete")]
    Rm(RmArgs),

    /// Export a subtree as a path -> data JSON map
    Export(ExportArgs),

    /// Import a path -> data JSON map
    Import(ImportArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Clusters ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ClustersArgs {
    /// Defaults to `list`
    #[command(subcommand)]
    pub command: Option<ClustersCommand>,
}

#[derive(Debug, Subcommand)]
pub enum ClustersCommand {
    /// List clusters known to the gateway
    #[command(alias = "ls")]
    List,

    /// Register a cluster
    Add(ClusterAddArgs),

    /// Change a registered cluster
    Update(ClusterUpdateArgs),

    /// Remove a cluster from the registry
    #[command(alias = "delete")]
    Rm {
        /// Registry id
        id: i64,
    },
}

#[derive(Debug, Args)]
pub struct ClusterAddArgs {
    /// Host name or address
    pub host: String,

    #[command(flatten)]
    pub fields: ClusterFields,
}

#[derive(Debug, Args)]
pub struct ClusterUpdateArgs {
    /// Registry id
    pub id: i64,

    /// New host name or address
    #[arg(long)]
    pub host: Option<String>,

    #[command(flatten)]
    pub fields: ClusterFields,
}

#[derive(Debug, Args)]
pub struct ClusterFields {
    /// Display name
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Client port
    #[arg(long)]
    pub port: Option<u16>,

    /// Connection retries
    #[arg(long)]
    pub retry_count: Option<u32>,

    /// Session timeout in milliseconds
    #[arg(long)]
    pub session_timeout: Option<u32>,

    /// Free-form description
    #[arg(long, short = 'd')]
    pub description: Option<String>,
}

// ── Node commands ────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TreeArgs {
    /// Path to start from
    #[arg(default_value = "/")]
    pub path: String,

    /// Maximum depth below the start path
    #[arg(long, short = 'd')]
    pub depth: Option<usize>,
}

#[derive(Debug, Args)]
pub struct GetArgs {
    /// Node path
    pub path: String,
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Node path; missing parents are created empty
    pub path: String,

    /// Node data
    #[arg(default_value = "")]
    pub data: String,

    /// Create mode of the final node
    #[arg(long, short = 'm', default_value = "persistent")]
    pub mode: ModeArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Persistent,
    PersistentSequential,
    Ephemeral,
    EphemeralSequential,
}

#[derive(Debug, Args)]
pub struct SetArgs {
    /// Node path
    pub path: String,

    /// New data
    pub data: String,
}

#[derive(Debug, Args)]
#[command(disable_version_flag = true)]
pub struct RmArgs {
    /// Node path
    pub path: String,

    /// Expected version of the node; fails if it changed
    #[arg(long)]
    pub version: Option<i32>,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Subtree root
    #[arg(default_value = "/")]
    pub path: String,

    /// Write the JSON map to a file instead of stdout
    #[arg(long, short = 'f')]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// JSON file holding a path -> data map
    pub file: PathBuf,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive config setup
    Init,

    /// Show resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
