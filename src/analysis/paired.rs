// Paired method comparison
//
// Two review methods run on the same cycles. A cycle enters the paired
// sample only when both methods reported it and both outputs parsed; every
// row still counts toward the parse-failure rate.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use crate::analysis::config::AnalysisConfig;
use crate::analysis::session::SessionStability;
use crate::analysis::verdict::{
    derive_verdict, reflective_decision_class, DecisionClass, Verdict, VerdictEvidence,
};
use crate::error::{AnalysisError, Result};
use crate::records::ReviewRecord;
use crate::statistics::{
    bootstrap_ci, mean, round_to, sample_stddev, wilcoxon_signed_rank, BootstrapResult,
    SignedRankResult,
};

/// Method label treated as the baseline when present
pub const BASELINE_METHOD: &str = "current";

/// Paired score statistics (rounded to 4 decimals)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreSummary {
    #[serde(serialize_with = "crate::json_output::finite_or_string")]
    pub mean_a: f64,
    #[serde(serialize_with = "crate::json_output::finite_or_string")]
    pub mean_b: f64,
    #[serde(serialize_with = "crate::json_output::finite_or_string")]
    pub mean_delta: f64,
    #[serde(serialize_with = "crate::json_output::finite_or_string")]
    pub stdev_a: f64,
    #[serde(serialize_with = "crate::json_output::finite_or_string")]
    pub stdev_b: f64,
    #[serde(serialize_with = "crate::json_output::finite_or_string")]
    pub stdev_ratio: f64,
}

/// Secondary detection metrics (rounded to 4 decimals)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecondarySummary {
    #[serde(serialize_with = "crate::json_output::finite_or_string")]
    pub mean_tp_a: f64,
    #[serde(serialize_with = "crate::json_output::finite_or_string")]
    pub mean_tp_b: f64,
    #[serde(serialize_with = "crate::json_output::finite_or_string")]
    pub mean_fp_a: f64,
    #[serde(serialize_with = "crate::json_output::finite_or_string")]
    pub mean_fp_b: f64,
    #[serde(serialize_with = "crate::json_output::finite_or_string")]
    pub delta_fp: f64,
    #[serde(serialize_with = "crate::json_output::finite_or_string")]
    pub mean_recall_a: f64,
    #[serde(serialize_with = "crate::json_output::finite_or_string")]
    pub mean_recall_b: f64,
    #[serde(serialize_with = "crate::json_output::finite_or_string")]
    pub delta_recall: f64,
}

/// Result of a paired method comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReflectiveSummary {
    /// Baseline method
    pub method_a: String,
    /// Treatment method
    pub method_b: String,
    pub n_paired: usize,
    pub total_runs: usize,
    pub parse_failures: usize,
    /// Rounded to 4 decimals
    pub parse_rate: f64,
    pub scores: ScoreSummary,
    pub secondary: SecondarySummary,
    pub wilcoxon: SignedRankResult,
    pub bootstrap_ci_delta: BootstrapResult,
    pub verdict: Verdict,
    pub decision_class: DecisionClass,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_stability: Option<SessionStability>,
}

/// Paired observations, one entry per usable cycle
#[derive(Debug, Default)]
struct PairedSample {
    cycles: Vec<String>,
    scores_a: Vec<f64>,
    scores_b: Vec<f64>,
    tp_a: Vec<f64>,
    tp_b: Vec<f64>,
    fp_a: Vec<f64>,
    fp_b: Vec<f64>,
    recall_a: Vec<f64>,
    recall_b: Vec<f64>,
}

impl PairedSample {
    fn push(&mut self, cycle: &str, a: &ReviewRecord, b: &ReviewRecord) {
        self.cycles.push(cycle.to_string());
        self.scores_a.push(a.score);
        self.scores_b.push(b.score);
        self.tp_a.push(a.true_positives);
        self.tp_b.push(b.true_positives);
        self.fp_a.push(a.false_positives);
        self.fp_b.push(b.false_positives);
        // Recall is optional per row, so the two sides may differ in length
        self.recall_a.extend(a.recall);
        self.recall_b.extend(b.recall);
    }

    fn deltas(&self) -> Vec<f64> {
        self.scores_b
            .iter()
            .zip(&self.scores_a)
            .map(|(b, a)| b - a)
            .collect()
    }
}

/// Order cycle keys: all-digit keys by numeric value first, then the rest
/// lexicographically
///
/// # Example
/// ```
/// use statverdict::analysis::compare_cycle_keys;
///
/// let mut cycles = vec!["10", "b", "2", "a", "1"];
/// cycles.sort_by(|a, b| compare_cycle_keys(a, b));
/// assert_eq!(cycles, vec!["1", "2", "10", "a", "b"]);
/// ```
pub fn compare_cycle_keys(a: &str, b: &str) -> Ordering {
    fn is_numeric(key: &str) -> bool {
        !key.is_empty() && key.bytes().all(|c| c.is_ascii_digit())
    }

    match (is_numeric(a), is_numeric(b)) {
        (true, true) => {
            let a_digits = a.trim_start_matches('0');
            let b_digits = b.trim_start_matches('0');
            a_digits
                .len()
                .cmp(&b_digits.len())
                .then_with(|| a_digits.cmp(b_digits))
                .then_with(|| a.cmp(b))
        }
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.cmp(b),
    }
}

/// Pick (baseline, treatment) from exactly two distinct method labels
fn select_methods(records: &[ReviewRecord]) -> Result<(String, String)> {
    let methods: BTreeSet<&str> = records.iter().map(|r| r.method.as_str()).collect();
    if methods.len() != 2 {
        return Err(AnalysisError::UnexpectedMethodCount {
            found: methods.len(),
            methods: methods.into_iter().map(str::to_string).collect(),
        });
    }

    let mut sorted = methods.into_iter();
    let (first, second) = match (sorted.next(), sorted.next()) {
        (Some(first), Some(second)) => (first, second),
        _ => return Err(AnalysisError::NoData),
    };

    if second == BASELINE_METHOD {
        Ok((second.to_string(), first.to_string()))
    } else {
        Ok((first.to_string(), second.to_string()))
    }
}

/// Compare two review methods over paired cycles
///
/// # Arguments
/// * `records` - Normalized review rows for both methods
/// * `session` - Session log summary; `None` counts as stable
/// * `config` - Bootstrap parameters and decision thresholds
///
/// # Errors
/// `NoData` for an empty row list, `UnexpectedMethodCount` unless exactly
/// two distinct methods are present.
pub fn analyze_reflective(
    records: &[ReviewRecord],
    session: Option<SessionStability>,
    config: &AnalysisConfig,
) -> Result<ReflectiveSummary> {
    if records.is_empty() {
        return Err(AnalysisError::NoData);
    }

    let (method_a, method_b) = select_methods(records)?;

    // Later rows for the same cycle and method replace earlier ones
    let mut by_cycle: HashMap<&str, HashMap<&str, &ReviewRecord>> = HashMap::new();
    for record in records {
        by_cycle
            .entry(record.cycle.as_str())
            .or_default()
            .insert(record.method.as_str(), record);
    }

    let total_runs = records.len();
    let parse_failures = records.iter().filter(|r| !r.parse_ok).count();
    let parse_rate = parse_failures as f64 / total_runs as f64;

    let mut cycles: Vec<&str> = by_cycle.keys().copied().collect();
    cycles.sort_by(|a, b| compare_cycle_keys(a, b));

    let mut paired = PairedSample::default();
    for cycle in cycles {
        let methods = &by_cycle[cycle];
        let (Some(a), Some(b)) = (
            methods.get(method_a.as_str()),
            methods.get(method_b.as_str()),
        ) else {
            continue;
        };
        if !a.parse_ok || !b.parse_ok {
            continue;
        }
        paired.push(cycle, a, b);
    }

    let n_paired = paired.cycles.len();
    let deltas = paired.deltas();

    let mean_a = mean(&paired.scores_a);
    let mean_b = mean(&paired.scores_b);
    let mean_delta = mean(&deltas);

    let wilcoxon = wilcoxon_signed_rank(&paired.scores_b, &paired.scores_a)?;
    let delta_ci = bootstrap_ci(&deltas, mean, &config.bootstrap);

    let mean_fp_a = mean(&paired.fp_a);
    let mean_fp_b = mean(&paired.fp_b);
    let delta_fp = mean_fp_b - mean_fp_a;

    let mean_recall_a = mean(&paired.recall_a);
    let mean_recall_b = mean(&paired.recall_b);
    let delta_recall = mean_recall_b - mean_recall_a;

    let (stdev_a, stdev_b) = if n_paired > 1 {
        (
            sample_stddev(&paired.scores_a),
            sample_stddev(&paired.scores_b),
        )
    } else {
        (0.0, 0.0)
    };
    let pooled_mean = if n_paired > 0 {
        (mean_a + mean_b) / 2.0
    } else {
        1.0
    };
    let stdev_ratio = if pooled_mean > 0.0 {
        stdev_a.max(stdev_b) / pooled_mean
    } else {
        f64::INFINITY
    };

    tracing::debug!(
        method_a = %method_a,
        method_b = %method_b,
        n_paired,
        mean_delta,
        p_value = wilcoxon.p_value,
        stdev_ratio,
        "paired sample built"
    );

    let verdict = derive_verdict(
        &VerdictEvidence {
            mean_delta,
            delta_ci: &delta_ci,
            p_value: wilcoxon.p_value,
            delta_recall,
            delta_fp,
        },
        &config.reflective,
    );

    let session_stable = session.map_or(true, |s| s.stable);
    let decision_class = reflective_decision_class(
        n_paired,
        parse_rate,
        stdev_ratio,
        session_stable,
        &config.reflective,
    );

    tracing::info!(
        verdict = %verdict,
        decision = %decision_class,
        n_paired,
        parse_failures,
        "reflective analysis complete"
    );

    Ok(ReflectiveSummary {
        method_a,
        method_b,
        n_paired,
        total_runs,
        parse_failures,
        parse_rate: round_to(parse_rate, 4),
        scores: ScoreSummary {
            mean_a: round_to(mean_a, 4),
            mean_b: round_to(mean_b, 4),
            mean_delta: round_to(mean_delta, 4),
            stdev_a: round_to(stdev_a, 4),
            stdev_b: round_to(stdev_b, 4),
            stdev_ratio: round_to(stdev_ratio, 4),
        },
        secondary: SecondarySummary {
            mean_tp_a: round_to(mean(&paired.tp_a), 4),
            mean_tp_b: round_to(mean(&paired.tp_b), 4),
            mean_fp_a: round_to(mean_fp_a, 4),
            mean_fp_b: round_to(mean_fp_b, 4),
            delta_fp: round_to(delta_fp, 4),
            mean_recall_a: round_to(mean_recall_a, 4),
            mean_recall_b: round_to(mean_recall_b, 4),
            delta_recall: round_to(delta_recall, 4),
        },
        wilcoxon,
        bootstrap_ci_delta: delta_ci,
        verdict,
        decision_class,
        session_stability: session,
    })
}
