// Latency overhead analysis
//
// Succeeded runs are grouped by variant and every non-baseline variant is
// compared with the baseline by median. The overhead CI resamples the
// variant and baseline groups independently in each bootstrap iteration.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::analysis::config::AnalysisConfig;
use crate::analysis::verdict::{
    classify_overhead, latency_decision_class, DecisionClass, OverheadClass,
};
use crate::error::{AnalysisError, Result};
use crate::records::{LatencyRecord, RunOutcome};
use crate::statistics::{
    bootstrap_ci, bootstrap_difference_ci, median, round_to, BootstrapResult,
};

/// Baseline variant labels, in preference order
pub const BASELINE_LABELS: [&str; 2] = ["none", "baseline"];

/// Baseline group statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaselineSummary {
    pub variant: String,
    pub n: usize,
    #[serde(serialize_with = "crate::json_output::finite_or_string")]
    pub median_ms: f64,
    pub bootstrap_ci: BootstrapResult,
}

/// Overhead of one variant against the baseline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantSummary {
    pub n: usize,
    #[serde(serialize_with = "crate::json_output::finite_or_string")]
    pub median_ms: f64,
    /// Median difference to the baseline, rounded to 0.1 ms
    #[serde(serialize_with = "crate::json_output::finite_or_string")]
    pub overhead_ms: f64,
    pub classification: OverheadClass,
    /// Latency evidence is observational, so this never exceeds OBSERVED
    pub proof_level: DecisionClass,
    pub bootstrap_ci_overhead: BootstrapResult,
}

/// Result of a latency analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatencySummary {
    pub total_runs: usize,
    pub failed_runs: usize,
    /// Rounded to 4 decimals
    pub failure_rate: f64,
    pub baseline: BaselineSummary,
    pub variants: BTreeMap<String, VariantSummary>,
    pub decision_class: DecisionClass,
}

/// Analyze latency runs against the baseline variant
///
/// # Errors
/// `NoData` for an empty run list, `NoBaseline` when no succeeded run is
/// labelled `none` or `baseline`.
pub fn analyze_latency(records: &[LatencyRecord], config: &AnalysisConfig) -> Result<LatencySummary> {
    if records.is_empty() {
        return Err(AnalysisError::NoData);
    }

    let total_runs = records.len();
    let mut failed_runs = 0;
    let mut by_variant: BTreeMap<&str, Vec<f64>> = BTreeMap::new();

    for record in records {
        match &record.outcome {
            RunOutcome::Succeeded {
                variant,
                duration_ms,
            } => by_variant
                .entry(variant.as_str())
                .or_default()
                .push(*duration_ms),
            RunOutcome::NotSucceeded { .. } => failed_runs += 1,
        }
    }

    let failure_rate = round_to(failed_runs as f64 / total_runs as f64, 4);

    let (baseline_label, baseline_values) = BASELINE_LABELS
        .iter()
        .find_map(|label| by_variant.get_key_value(label))
        .ok_or(AnalysisError::NoBaseline)?;

    let baseline_median = median(baseline_values);
    let baseline = BaselineSummary {
        variant: baseline_label.to_string(),
        n: baseline_values.len(),
        median_ms: baseline_median,
        bootstrap_ci: bootstrap_ci(baseline_values, median, &config.bootstrap),
    };

    tracing::debug!(
        baseline = %baseline.variant,
        n = baseline.n,
        median_ms = baseline_median,
        "baseline grouped"
    );

    let mut variants = BTreeMap::new();
    for (label, durations) in &by_variant {
        if label == baseline_label {
            continue;
        }

        let variant_median = median(durations);
        let overhead = variant_median - baseline_median;
        let classification = classify_overhead(overhead, &config.latency);
        let overhead_ci =
            bootstrap_difference_ci(durations, baseline_values, median, &config.bootstrap);

        tracing::debug!(
            variant = %label,
            n = durations.len(),
            overhead_ms = overhead,
            class = %classification,
            "variant compared"
        );

        variants.insert(
            label.to_string(),
            VariantSummary {
                n: durations.len(),
                median_ms: variant_median,
                overhead_ms: round_to(overhead, 1),
                classification,
                proof_level: DecisionClass::Observed,
                bootstrap_ci_overhead: overhead_ci,
            },
        );
    }

    let min_runs = variants.values().map(|v| v.n).min().unwrap_or(0);
    let max_ci_width = widest_finite_ci(variants.values().map(|v| &v.bootstrap_ci_overhead));
    let decision_class =
        latency_decision_class(min_runs, failure_rate, max_ci_width, &config.latency);

    tracing::info!(
        total_runs,
        failed_runs,
        variants = variants.len(),
        decision = %decision_class,
        "latency analysis complete"
    );

    Ok(LatencySummary {
        total_runs,
        failed_runs,
        failure_rate,
        baseline,
        variants,
        decision_class,
    })
}

/// Widest CI among intervals with a defined upper bound (+∞ when there are none)
fn widest_finite_ci<'a>(intervals: impl Iterator<Item = &'a BootstrapResult>) -> f64 {
    intervals
        .filter(|ci| !ci.ci_upper.is_nan())
        .map(BootstrapResult::width)
        .reduce(f64::max)
        .unwrap_or(f64::INFINITY)
}
