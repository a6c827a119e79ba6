//! CLI command definitions and handlers

use clap::{Args, Parser, Subcommand};
pub use clap_complete::Shell;

pub mod args;
pub mod cache;
pub mod completion;
pub mod context;
pub mod directory;
pub mod init;
pub mod node;
pub mod status;

pub use args::{GlobalOptions, OutputFormat};
pub use context::CommandContext;

use crate::tree::NodePatch;

/// orgtree - manage an organization chart stored in a hosted database
#[derive(Parser, Debug)]
#[command(name = "orgtree")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (pretty, table, json)
    #[arg(
        long,
        global = true,
        env = "ORGTREE_FORMAT",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: Option<OutputFormat>,

    /// Override config file location
    #[arg(long, global = true, env = "ORGTREE_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Override the database URL from the config file
    #[arg(long, global = true, env = "ORGTREE_STORE_URL", hide_env = true)]
    pub store_url: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "ORGTREE_DEBUG", hide_env = true)]
    pub debug: bool,

    /// Bypass the snapshot cache, fetch the tree from the database
    #[arg(long, global = true, env = "ORGTREE_NO_CACHE", hide_env = true)]
    pub no_cache: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Configure the database connection
    Init,

    /// Show configuration status
    Status,

    /// Display version information
    Version,

    /// Show the organization tree
    #[command(after_help = "EXAMPLES:\n  \
            orgtree show                    # Whole organization\n  \
            orgtree show --root cto         # Only the CTO's subtree\n  \
            orgtree show --depth 1          # Root and direct reports")]
    Show {
        /// Start from this node instead of the root
        #[arg(long)]
        root: Option<String>,

        /// Levels below the starting node to display
        #[arg(long)]
        depth: Option<usize>,
    },

    /// Show one node with its derived contact and location
    Find {
        /// Node ID
        id: String,
    },

    /// Create the root node of an empty organization
    Root {
        #[command(flatten)]
        node: NodeArgs,
    },

    /// Add a node as the last direct report of a parent
    Add {
        /// ID of the parent node
        parent_id: String,

        #[command(flatten)]
        node: NodeArgs,

        /// Show what would change without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Change attributes of a node
    Update {
        /// Node ID
        id: String,

        #[command(flatten)]
        patch: PatchArgs,

        /// Show what would change without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Remove a node and everyone reporting to it
    Remove {
        /// Node ID
        id: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,

        /// Show what would be removed without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Derive the contact handle for a person's name
    Contact {
        /// Display name, e.g. "Marc Évrard"
        name: String,
    },

    /// Derive the location code for a person
    Location {
        /// Display name
        name: String,

        /// Job title
        title: String,
    },

    /// Manage the local snapshot cache
    #[command(subcommand)]
    Cache(CacheCommands),

    /// Generate shell completions
    #[command(after_help = "\
Install:
  bash:   orgtree completion bash > /etc/bash_completion.d/orgtree
  zsh:    orgtree completion zsh > \"${fpath[1]}/_orgtree\"
  fish:   orgtree completion fish > ~/.config/fish/completions/orgtree.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Attributes of a node being created
#[derive(Debug, Clone, Args)]
pub struct NodeArgs {
    /// Display name
    pub name: String,

    /// Job title
    pub title: String,

    /// Portrait URL
    #[arg(long)]
    pub image: Option<String>,

    /// Headcount shown next to the node
    #[arg(long)]
    pub count: Option<u32>,
}

/// Attributes to change on an existing node
#[derive(Debug, Clone, Args, Default)]
pub struct PatchArgs {
    /// New display name
    #[arg(long)]
    pub name: Option<String>,

    /// New job title
    #[arg(long)]
    pub title: Option<String>,

    /// New portrait URL
    #[arg(long)]
    pub image: Option<String>,

    /// New headcount
    #[arg(long)]
    pub count: Option<u32>,
}

impl From<PatchArgs> for NodePatch {
    fn from(args: PatchArgs) -> Self {
        Self {
            name: args.name,
            title: args.title,
            image: args.image,
            count: args.count,
        }
    }
}

/// Cache management subcommands
#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Show cache statistics
    Status,

    /// Clear all cached snapshots
    Clear,

    /// Print cache directory path
    Path,
}
