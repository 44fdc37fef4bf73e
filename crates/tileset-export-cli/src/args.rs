use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "tileset-export")]
#[command(about = "Export an item catalog into per-category map-editor tilesets")]
#[command(version)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Base directory holding config.toml (default: ~/.tileset-export)
    #[arg(long, global = true)]
    pub base_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read the item catalog and write one tileset per category
    Export {
        /// Item catalog (default: config paths.items)
        #[arg(long, env = "TILESET_ITEMS")]
        items: Option<PathBuf>,

        /// Output directory (default: config paths.output_dir)
        #[arg(short, long, env = "TILESET_OUTPUT_DIR")]
        output_dir: Option<PathBuf>,

        /// Show what would be written without touching any file
        #[arg(long)]
        dry_run: bool,

        /// Delete tileset files of categories that have no items
        #[arg(long)]
        prune: bool,

        /// Create the output directory if it does not exist
        #[arg(long)]
        create_dir: bool,
    },

    /// List the category table
    Categories,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Key (e.g., paths.items)
        key: String,
    },

    /// Set a config value
    Set {
        /// Key (e.g., paths.output_dir)
        key: String,
        /// Value
        value: String,
    },

    /// List all config values
    List,

    /// Create config.toml with defaults
    Init,

    /// Show config file path
    Path,
}
