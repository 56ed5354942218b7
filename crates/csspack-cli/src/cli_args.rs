//! CLI argument definitions for the csspack command-line interface.
//!
//! All `#[derive(Parser)]` and `#[derive(Subcommand)]` types are defined here,
//! keeping `main.rs` focused on dispatch logic.

use clap::{Parser, Subcommand};

/// csspack - stylesheet bundling with golden-fixture case runs
#[derive(Parser)]
#[command(name = "csspack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Build from a JSON configuration file
    Build {
        /// Path to the build configuration (JSON)
        #[arg(short, long)]
        config: String,

        /// Directory entry requests resolve against (overrides the config)
        #[arg(long)]
        context: Option<String>,

        /// Output directory (overrides the config)
        #[arg(short, long)]
        out: Option<String>,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Run golden-fixture cases and compare their output
    Cases {
        /// Directory holding one subdirectory per case
        #[arg(long)]
        root: String,

        /// Build output root (default: a temporary directory)
        #[arg(short, long)]
        out: Option<String>,

        /// Snapshot root (default: `snapshots` next to the cases root)
        #[arg(long)]
        snapshots: Option<String>,

        /// Comma-separated case names to run (default: all, or CSSPACK_CASES)
        #[arg(long)]
        cases: Option<String>,

        /// Rewrite snapshots from the current output
        #[arg(long)]
        update_snapshots: bool,

        /// Also fail on produced files that have no expectation
        #[arg(long)]
        strict: bool,

        /// Output machine-readable JSON results (no colored output)
        #[arg(long)]
        json: bool,
    },
}
