use anyhow::Result;
use clap::Parser;
use statverdict::analysis::{LatencySummary, ReflectiveSummary};
use statverdict::cli::{Cli, Command};
use statverdict::commands::{self, AnalysisOutcome};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber; `RUST_LOG` overrides the default `warn` level
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Print the report for a completed analysis, or the rejection message
fn print_outcome<T>(outcome: AnalysisOutcome<T>, report: impl Fn(&T) -> String) {
    match outcome {
        AnalysisOutcome::Completed {
            summary,
            summary_path,
        } => {
            println!("  Summary written to: {}", summary_path.display());
            print!("{}", report(&summary));
        }
        AnalysisOutcome::Rejected(e) => println!("ERROR: {}", e),
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing();

    let input = args.command.input();
    if !input.exists() {
        anyhow::bail!("File not found: {}", input.display());
    }

    let config = commands::load_config()?;

    match &args.command {
        Command::Latency { csv } => {
            let outcome = commands::run_latency(csv, &config)?;
            print_outcome(outcome, LatencySummary::to_report_string);
        }
        Command::Reflective { csv, session_csv } => {
            let outcome = commands::run_reflective(csv, session_csv.as_deref(), &config)?;
            print_outcome(outcome, ReflectiveSummary::to_report_string);
        }
    }

    Ok(())
}
