//! Canonical experiment records
//!
//! Raw table rows arrive as column name → string maps. Every column with
//! more than one accepted spelling is resolved here, once, so the analyzers
//! only ever see typed canonical records.
//!
//! | Logical field | Accepted columns |
//! |---|---|
//! | variant | `variant`, `label` |
//! | cycle | `cycle`, `run` |
//! | true positives | `tp`, `true_positives` |
//! | false positives | `fp`, `false_positives` |
//! | parse validity | `parse_ok` (positive), `parse_failed` (negated) |

use crate::error::{AnalysisError, Result};
use std::collections::HashMap;

/// Column spellings for one logical field, in precedence order
#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub names: &'static [&'static str],
}

pub const VARIANT: Field = Field {
    names: &["variant", "label"],
};
pub const CYCLE: Field = Field {
    names: &["cycle", "run"],
};
pub const TRUE_POSITIVES: Field = Field {
    names: &["tp", "true_positives"],
};
pub const FALSE_POSITIVES: Field = Field {
    names: &["fp", "false_positives"],
};
pub const METHOD: Field = Field { names: &["method"] };
pub const SCORE: Field = Field { names: &["score"] };
pub const RECALL: Field = Field { names: &["recall"] };
pub const DURATION_MS: Field = Field {
    names: &["duration_ms"],
};
pub const STATUS: Field = Field { names: &["status"] };
pub const ATTEMPT: Field = Field {
    names: &["attempt"],
};

const PARSE_OK: &str = "parse_ok";
const PARSE_FAILED: &str = "parse_failed";
const SUCCEEDED: &str = "succeeded";

/// One row of an input table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    /// 1-based data line (header excluded)
    pub line: usize,
    fields: HashMap<String, String>,
}

impl RawRecord {
    pub fn new(line: usize, fields: HashMap<String, String>) -> Self {
        Self { line, fields }
    }

    /// Build a record from literal pairs (tests and fixtures)
    pub fn from_pairs(line: usize, pairs: &[(&str, &str)]) -> Self {
        let fields = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self { line, fields }
    }

    /// Raw value of a single column
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Value of the first present spelling of `field`
    pub fn lookup(&self, field: Field) -> Option<&str> {
        field.names.iter().find_map(|name| self.get(name))
    }

    fn require(&self, field: Field) -> Result<&str> {
        self.lookup(field).ok_or(AnalysisError::MissingField {
            line: self.line,
            field: field.names[0],
        })
    }

    fn require_number(&self, field: Field) -> Result<f64> {
        let raw = self.require(field)?;
        parse_number(raw).ok_or_else(|| AnalysisError::InvalidNumber {
            line: self.line,
            field: field.names[0],
            value: raw.to_string(),
        })
    }

    /// Present and non-empty values must parse; empty cells count as absent
    fn optional_number(&self, field: Field) -> Result<Option<f64>> {
        match self.lookup(field) {
            None | Some("") => Ok(None),
            Some(raw) => parse_number(raw)
                .map(Some)
                .ok_or_else(|| AnalysisError::InvalidNumber {
                    line: self.line,
                    field: field.names[0],
                    value: raw.to_string(),
                }),
        }
    }

    /// Parse validity from `parse_ok` or the negated `parse_failed` column
    fn parse_valid(&self) -> bool {
        if let Some(value) = self.get(PARSE_OK) {
            matches!(value.to_lowercase().as_str(), "true" | "1" | "yes")
        } else if let Some(value) = self.get(PARSE_FAILED) {
            matches!(value.to_lowercase().as_str(), "false" | "0" | "no")
        } else {
            true
        }
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}

/// Outcome of one latency run
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Succeeded { variant: String, duration_ms: f64 },
    /// Any status other than `succeeded`, including an empty cell
    NotSucceeded { status: String },
}

/// Canonical latency run record
#[derive(Debug, Clone, PartialEq)]
pub struct LatencyRecord {
    pub outcome: RunOutcome,
}

impl LatencyRecord {
    /// Normalize a raw row; variant and duration are only required on success
    pub fn from_raw(raw: &RawRecord) -> Result<Self> {
        let status = raw.lookup(STATUS).unwrap_or(SUCCEEDED);
        let outcome = if status == SUCCEEDED {
            RunOutcome::Succeeded {
                variant: raw.require(VARIANT)?.to_string(),
                duration_ms: raw.require_number(DURATION_MS)?,
            }
        } else {
            RunOutcome::NotSucceeded {
                status: status.to_string(),
            }
        };
        Ok(Self { outcome })
    }

    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, RunOutcome::Succeeded { .. })
    }
}

/// Canonical paired-review record (one method on one cycle)
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewRecord {
    pub cycle: String,
    pub method: String,
    pub score: f64,
    pub true_positives: f64,
    pub false_positives: f64,
    pub recall: Option<f64>,
    pub parse_ok: bool,
}

impl ReviewRecord {
    pub fn from_raw(raw: &RawRecord) -> Result<Self> {
        Ok(Self {
            cycle: raw.require(CYCLE)?.to_string(),
            method: raw.require(METHOD)?.to_string(),
            score: raw.require_number(SCORE)?,
            true_positives: raw.require_number(TRUE_POSITIVES)?,
            false_positives: raw.require_number(FALSE_POSITIVES)?,
            recall: raw.optional_number(RECALL)?,
            parse_ok: raw.parse_valid(),
        })
    }
}

/// Canonical session-log record
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub status: Option<String>,
    /// Defaults to 1 when the column is absent or empty
    pub attempt: u32,
}

impl SessionRecord {
    pub fn from_raw(raw: &RawRecord) -> Result<Self> {
        let attempt = match raw.lookup(ATTEMPT).map(str::trim) {
            None | Some("") => 1,
            Some(value) => value
                .parse::<u32>()
                .map_err(|_| AnalysisError::InvalidNumber {
                    line: raw.line,
                    field: ATTEMPT.names[0],
                    value: value.to_string(),
                })?,
        };

        Ok(Self {
            status: raw.lookup(STATUS).map(str::to_string),
            attempt,
        })
    }
}

/// Normalize every row, stopping at the first malformed one
pub fn normalize<T, F>(rows: &[RawRecord], convert: F) -> Result<Vec<T>>
where
    F: Fn(&RawRecord) -> Result<T>,
{
    rows.iter().map(convert).collect()
}
