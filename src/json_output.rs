//! JSON summary output
//!
//! Summaries are written next to the input table as `<stem>-summary.json`,
//! pretty-printed with 2-space indentation. Non-finite floats have no JSON
//! number form, so they are written as the strings `"NaN"`, `"Infinity"`
//! and `"-Infinity"`.

use anyhow::{Context, Result};
use serde::{Serialize, Serializer};
use std::fs;
use std::path::{Path, PathBuf};

/// Serialize an f64, writing non-finite values as their string form
pub fn finite_or_string<S>(value: &f64, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if value.is_nan() {
        serializer.serialize_str("NaN")
    } else if value.is_infinite() {
        serializer.serialize_str(if *value > 0.0 { "Infinity" } else { "-Infinity" })
    } else {
        serializer.serialize_f64(*value)
    }
}

/// Path of the summary file for an input table
///
/// The input's extension is replaced by `-summary.json` in the same directory.
///
/// # Example
/// ```
/// use statverdict::json_output::summary_path;
/// use std::path::Path;
///
/// let path = summary_path(Path::new("runs/latency.csv"));
/// assert_eq!(path, Path::new("runs/latency-summary.json"));
/// ```
pub fn summary_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{}-summary.json", stem))
}

/// Serialize a summary to pretty JSON
pub fn to_json<T: Serialize>(summary: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(summary)?)
}

/// Write a summary to `path`, overwriting any previous summary
pub fn write_summary<T: Serialize>(path: &Path, summary: &T) -> Result<()> {
    let mut json = to_json(summary)?;
    json.push('\n');
    fs::write(path, json)
        .with_context(|| format!("Failed to write summary to {}", path.display()))?;
    tracing::info!("Summary written to {}", path.display());
    Ok(())
}
