//! CLI argument parsing for statverdict

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "statverdict")]
#[command(version)]
#[command(
    about = "Statistical verdicts for latency and paired review experiments",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Per-variant latency overhead against the baseline variant
    Latency {
        /// Latency results CSV (variant|label, duration_ms, status)
        csv: PathBuf,
    },

    /// Paired comparison of two review methods
    Reflective {
        /// Review results CSV (cycle|run, method, score, tp, fp, recall, parse_ok)
        csv: PathBuf,

        /// Optional session log CSV (status, attempt)
        session_csv: Option<PathBuf>,
    },
}

impl Command {
    /// Primary input table of the command
    pub fn input(&self) -> &PathBuf {
        match self {
            Command::Latency { csv } | Command::Reflective { csv, .. } => csv,
        }
    }
}
