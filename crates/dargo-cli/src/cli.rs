//! CLI argument definitions for dargo.
//!
//! Uses `clap` derive macros to define the command surface. Each command
//! corresponds to a handler in the [`super::commands`] module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "dargo",
    version,
    about = "Dependency resolver for content-addressed packages",
    long_about = "Dargo resolves install and upgrade requests against a snapshot of a \
                  content-addressed package registry, producing a consistent version \
                  assignment for every affected package or a diagnosis of the conflict."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve an install request against a repository snapshot
    Resolve {
        /// Install request: name, name@version, name@range, or name@latest
        request: String,
        /// Path to the repository snapshot (JSON)
        #[arg(long)]
        repo: PathBuf,
        /// Path to the installed-state snapshot (JSON)
        #[arg(long)]
        state: Option<PathBuf>,
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
        /// Search budget in seconds
        #[arg(long)]
        budget_secs: Option<u64>,
    },

    /// Show the candidate version set for a version request
    Versions {
        /// Package name
        name: String,
        /// Version request: exact, range, /ipfs/ address, or latest
        request: String,
        /// Path to the repository snapshot (JSON)
        #[arg(long)]
        repo: PathBuf,
        /// Print the set as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn parse() -> Cli {
    Cli::parse()
}
