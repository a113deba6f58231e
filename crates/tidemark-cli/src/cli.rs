use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tidemark")]
#[command(about = "Locate the newest consistent replication checkpoint on a Redis target")]
#[command(version)]
pub struct Cli {
    /// Path to tidemark.toml config file
    #[arg(short, long, global = true, default_value = "tidemark.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create tidemark.toml and .env.example in the current directory
    Init,

    /// Reconcile checkpoints and remove stale copies
    Load {
        /// Only reconcile this source address
        #[arg(long)]
        source: Option<String>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show every database's checkpoint without modifying anything
    Inspect {
        /// Only inspect this source address
        #[arg(long)]
        source: Option<String>,
    },

    /// Remove a source's checkpoint fields from every database (forces a full resync)
    Clear {
        /// Only clear this source address
        #[arg(long)]
        source: Option<String>,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}
