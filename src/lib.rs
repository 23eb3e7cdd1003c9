//! statverdict - Statistical verdicts for experiment logs
//!
//! This library turns CSV experiment logs into reproducible verdicts:
//! latency overhead of hook variants against a baseline, and paired
//! comparison of two review methods over shared cycles. Confidence
//! intervals come from a seeded percentile bootstrap and paired
//! significance from a Wilcoxon signed-rank test.

pub mod analysis;
pub mod cli;
pub mod commands;
pub mod csv_input;
pub mod error;
pub mod json_output;
pub mod records;
pub mod report;
pub mod statistics;

pub use error::{AnalysisError, Result};
