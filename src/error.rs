//! Input-shape errors reported by the analyzers
//!
//! These are expected outcomes of malformed or incomplete experiment logs,
//! not faults: the command layer prints them and exits cleanly. Statistical
//! degeneracy (no nonzero differences, small samples) is never an error and
//! is expressed through sentinel results instead.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("No data rows found")]
    NoData,

    #[error("x and y must have same length, got {x_len} and {y_len}")]
    LengthMismatch { x_len: usize, y_len: usize },

    #[error("Expected exactly 2 methods, found {found}: {methods:?}")]
    UnexpectedMethodCount { found: usize, methods: Vec<String> },

    #[error("No baseline variant ('none' or 'baseline') found")]
    NoBaseline,

    #[error("Line {line}: missing required column '{field}'")]
    MissingField { line: usize, field: &'static str },

    #[error("Line {line}: column '{field}' is not a number: '{value}'")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },
}

/// Result type for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(AnalysisError::NoData.to_string(), "No data rows found");
        assert_eq!(
            AnalysisError::UnexpectedMethodCount {
                found: 1,
                methods: vec!["current".to_string()],
            }
            .to_string(),
            "Expected exactly 2 methods, found 1: [\"current\"]"
        );
        assert_eq!(
            AnalysisError::InvalidNumber {
                line: 3,
                field: "score",
                value: "n/a".to_string(),
            }
            .to_string(),
            "Line 3: column 'score' is not a number: 'n/a'"
        );
    }
}
