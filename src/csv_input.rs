//! CSV input for experiment logs
//!
//! The first row is the header; every following row becomes a `RawRecord`
//! keyed by header name. Rows shorter than the header are accepted and the
//! missing trailing cells are simply absent fields.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::records::RawRecord;

/// Read every data row of a CSV file
pub fn read_records(path: &Path) -> Result<Vec<RawRecord>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let records = read_records_from_reader(file)
        .with_context(|| format!("Failed to read CSV from {}", path.display()))?;

    tracing::debug!("Read {} rows from {}", records.len(), path.display());
    Ok(records)
}

/// Read every data row from any CSV source
pub fn read_records_from_reader<R: Read>(reader: R) -> Result<Vec<RawRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers().context("Failed to read CSV header")?.clone();

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let line = index + 1;
        let row = row.with_context(|| format!("Malformed CSV row {}", line))?;

        let fields: HashMap<String, String> = headers
            .iter()
            .zip(row.iter())
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        records.push(RawRecord::new(line, fields));
    }

    Ok(records)
}
