//! Command layer: read a log, normalize it, analyze it, write the summary
//!
//! Analyzers stay pure; this module owns the file system side effects.
//! Input-shape problems are returned as `AnalysisOutcome::Rejected` so the
//! CLI can report them and exit cleanly, while I/O failures propagate as
//! `anyhow` errors.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::analysis::{
    analyze_latency, analyze_reflective, check_session_stability, AnalysisConfig, LatencySummary,
    ReflectiveSummary, SessionStability,
};
use crate::csv_input::read_records;
use crate::error::AnalysisError;
use crate::json_output::{summary_path, write_summary};
use crate::records::{normalize, LatencyRecord, ReviewRecord, SessionRecord};

/// Environment variable naming an optional TOML configuration file
pub const CONFIG_ENV: &str = "STATVERDICT_CONFIG";

/// Result of running one analysis command
#[derive(Debug)]
pub enum AnalysisOutcome<T> {
    /// Analysis ran and its summary was written to `summary_path`
    Completed { summary: T, summary_path: PathBuf },
    /// Input was unusable; nothing was written
    Rejected(AnalysisError),
}

/// Summary as written to disk, tagged with the input it came from
#[derive(Serialize)]
struct SourcedSummary<'a, T> {
    csv_path: String,
    #[serde(flatten)]
    summary: &'a T,
}

/// Configuration from `STATVERDICT_CONFIG`, or defaults when unset
pub fn load_config() -> Result<AnalysisConfig> {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) => {
            tracing::debug!("Loading configuration from {:?}", path);
            AnalysisConfig::from_file(PathBuf::from(path))
        }
        None => Ok(AnalysisConfig::default()),
    }
}

/// Run the latency analysis on a CSV log
pub fn run_latency(
    csv_path: &Path,
    config: &AnalysisConfig,
) -> Result<AnalysisOutcome<LatencySummary>> {
    let rows = read_records(csv_path)?;

    let summary = match normalize(&rows, LatencyRecord::from_raw)
        .and_then(|records| analyze_latency(&records, config))
    {
        Ok(summary) => summary,
        Err(e) => return Ok(reject(csv_path, e)),
    };

    complete(csv_path, summary)
}

/// Run the paired review comparison on a CSV log
///
/// The session log is optional. A path that does not exist is skipped with
/// a warning and the sessions count as stable.
pub fn run_reflective(
    csv_path: &Path,
    session_path: Option<&Path>,
    config: &AnalysisConfig,
) -> Result<AnalysisOutcome<ReflectiveSummary>> {
    let rows = read_records(csv_path)?;

    let session = load_session(session_path)?;

    let summary = match normalize(&rows, ReviewRecord::from_raw)
        .and_then(|records| analyze_reflective(&records, session, config))
    {
        Ok(summary) => summary,
        Err(e) => return Ok(reject(csv_path, e)),
    };

    complete(csv_path, summary)
}

/// Session stability from an optional log
///
/// A malformed session log is an I/O-level failure, not a rejected analysis.
fn load_session(session_path: Option<&Path>) -> Result<Option<SessionStability>> {
    let Some(path) = session_path else {
        return Ok(None);
    };

    if !path.exists() {
        tracing::warn!(
            "Session log {} not found, treating sessions as stable",
            path.display()
        );
        return Ok(None);
    }

    let rows = read_records(path)?;
    let records = normalize(&rows, SessionRecord::from_raw)
        .with_context(|| format!("Invalid session log {}", path.display()))?;
    Ok(Some(check_session_stability(&records)))
}

fn reject<T>(csv_path: &Path, error: AnalysisError) -> AnalysisOutcome<T> {
    tracing::warn!("Analysis of {} rejected: {}", csv_path.display(), error);
    AnalysisOutcome::Rejected(error)
}

fn complete<T: Serialize>(csv_path: &Path, summary: T) -> Result<AnalysisOutcome<T>> {
    let path = summary_path(csv_path);
    write_summary(
        &path,
        &SourcedSummary {
            csv_path: csv_path.display().to_string(),
            summary: &summary,
        },
    )?;

    Ok(AnalysisOutcome::Completed {
        summary,
        summary_path: path,
    })
}
