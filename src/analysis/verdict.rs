// Verdict and decision-class rules
//
// The rules are ordered guarded branches. Guards overlap (a CONFIRMED
// result also satisfies the PARTIAL guard), so evaluation order is part of
// the contract. Every comparison against NaN is false, which makes an
// undefined metric fail its guard rather than satisfy it.

use serde::Serialize;
use std::fmt;

use crate::analysis::config::{LatencyThresholds, ReflectiveThresholds};
use crate::statistics::BootstrapResult;

/// Latency overhead class relative to the baseline median
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverheadClass {
    Fast,
    Moderate,
    Slow,
    Blocking,
}

/// Confidence tier of an analysis, independent of its substantive verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionClass {
    Verified,
    Observed,
    Inconclusive,
}

/// Outcome of a paired method comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// Treatment beats baseline on score and on a secondary metric
    Confirmed,
    /// Treatment is reliably worse
    Denied,
    /// The score difference is reliable but the other criteria are not met
    Partial,
    Inconclusive,
}

impl fmt::Display for OverheadClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OverheadClass::Fast => "FAST",
            OverheadClass::Moderate => "MODERATE",
            OverheadClass::Slow => "SLOW",
            OverheadClass::Blocking => "BLOCKING",
        };
        f.write_str(label)
    }
}

impl fmt::Display for DecisionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DecisionClass::Verified => "VERIFIED",
            DecisionClass::Observed => "OBSERVED",
            DecisionClass::Inconclusive => "INCONCLUSIVE",
        };
        f.write_str(label)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Verdict::Confirmed => "CONFIRMED",
            Verdict::Denied => "DENIED",
            Verdict::Partial => "PARTIAL",
            Verdict::Inconclusive => "INCONCLUSIVE",
        };
        f.write_str(label)
    }
}

/// Classify a latency overhead in milliseconds
///
/// # Example
/// ```
/// use statverdict::analysis::{classify_overhead, LatencyThresholds, OverheadClass};
///
/// let thresholds = LatencyThresholds::default();
/// assert_eq!(classify_overhead(4_999.0, &thresholds), OverheadClass::Fast);
/// assert_eq!(classify_overhead(20_000.0, &thresholds), OverheadClass::Slow);
/// ```
pub fn classify_overhead(overhead_ms: f64, thresholds: &LatencyThresholds) -> OverheadClass {
    if overhead_ms < thresholds.fast_ms {
        OverheadClass::Fast
    } else if overhead_ms < thresholds.moderate_ms {
        OverheadClass::Moderate
    } else if overhead_ms < thresholds.slow_ms {
        OverheadClass::Slow
    } else {
        OverheadClass::Blocking
    }
}

/// Decision class for a latency analysis
///
/// # Arguments
/// * `min_variant_runs` - Smallest non-baseline sample size (0 with no variants)
/// * `failure_rate` - Failed runs over all runs
/// * `max_ci_width_ms` - Widest finite overhead CI (+∞ when none is finite)
pub fn latency_decision_class(
    min_variant_runs: usize,
    failure_rate: f64,
    max_ci_width_ms: f64,
    thresholds: &LatencyThresholds,
) -> DecisionClass {
    if min_variant_runs >= thresholds.verified_min_runs
        && failure_rate <= thresholds.verified_max_failure_rate
        && max_ci_width_ms <= thresholds.verified_max_ci_width_ms
    {
        DecisionClass::Verified
    } else if min_variant_runs >= thresholds.observed_min_runs {
        DecisionClass::Observed
    } else {
        DecisionClass::Inconclusive
    }
}

/// Inputs to the paired-comparison verdict
#[derive(Debug, Clone, Copy)]
pub struct VerdictEvidence<'a> {
    pub mean_delta: f64,
    pub delta_ci: &'a BootstrapResult,
    /// Wilcoxon p-value; NaN when the test was not applied
    pub p_value: f64,
    pub delta_recall: f64,
    pub delta_fp: f64,
}

/// Derive the paired-comparison verdict
pub fn derive_verdict(evidence: &VerdictEvidence<'_>, thresholds: &ReflectiveThresholds) -> Verdict {
    let ci_excludes_zero = evidence.delta_ci.excludes_zero();
    let secondary_improved = evidence.delta_recall >= thresholds.min_delta_recall
        || evidence.delta_fp <= thresholds.max_delta_fp;

    if evidence.mean_delta >= thresholds.min_mean_delta
        && ci_excludes_zero
        && evidence.p_value < thresholds.significance_level
        && secondary_improved
    {
        Verdict::Confirmed
    } else if evidence.mean_delta < 0.0 && ci_excludes_zero {
        Verdict::Denied
    } else if ci_excludes_zero {
        Verdict::Partial
    } else {
        Verdict::Inconclusive
    }
}

/// Decision class for a paired comparison
pub fn reflective_decision_class(
    n_paired: usize,
    parse_rate: f64,
    stdev_ratio: f64,
    session_stable: bool,
    thresholds: &ReflectiveThresholds,
) -> DecisionClass {
    if n_paired >= thresholds.verified_min_pairs
        && parse_rate <= thresholds.verified_max_parse_rate
        && stdev_ratio <= thresholds.verified_max_stdev_ratio
        && session_stable
    {
        DecisionClass::Verified
    } else if n_paired >= thresholds.observed_min_pairs
        && parse_rate <= thresholds.observed_max_parse_rate
    {
        DecisionClass::Observed
    } else {
        DecisionClass::Inconclusive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::BootstrapConfig;

    fn ci(lower: f64, upper: f64) -> BootstrapResult {
        BootstrapResult {
            point_estimate: (lower + upper) / 2.0,
            ci_lower: lower,
            ci_upper: upper,
            ci_level: 0.95,
            n: 20,
            n_resamples: 10_000,
        }
    }

    fn evidence(ci: &BootstrapResult) -> VerdictEvidence<'_> {
        VerdictEvidence {
            mean_delta: 2.0,
            delta_ci: ci,
            p_value: 0.001,
            delta_recall: 0.2,
            delta_fp: 0.0,
        }
    }

    #[test]
    fn test_classify_overhead_boundaries() {
        let t = LatencyThresholds::default();
        assert_eq!(classify_overhead(-200.0, &t), OverheadClass::Fast);
        assert_eq!(classify_overhead(5_000.0, &t), OverheadClass::Moderate);
        assert_eq!(classify_overhead(15_000.0, &t), OverheadClass::Slow);
        assert_eq!(classify_overhead(60_000.0, &t), OverheadClass::Blocking);
    }

    #[test]
    fn test_latency_decision_class() {
        let t = LatencyThresholds::default();
        assert_eq!(
            latency_decision_class(10, 0.1, 5_000.0, &t),
            DecisionClass::Verified
        );
        assert_eq!(
            latency_decision_class(10, 0.11, 100.0, &t),
            DecisionClass::Observed
        );
        assert_eq!(
            latency_decision_class(12, 0.0, f64::INFINITY, &t),
            DecisionClass::Observed
        );
        assert_eq!(
            latency_decision_class(4, 0.0, 100.0, &t),
            DecisionClass::Inconclusive
        );
        assert_eq!(
            latency_decision_class(0, 0.0, f64::INFINITY, &t),
            DecisionClass::Inconclusive
        );
    }

    #[test]
    fn test_verdict_confirmed() {
        let interval = ci(1.5, 2.5);
        let t = ReflectiveThresholds::default();
        assert_eq!(derive_verdict(&evidence(&interval), &t), Verdict::Confirmed);
    }

    #[test]
    fn test_verdict_confirmed_by_fp_when_recall_missing() {
        let interval = ci(1.5, 2.5);
        let mut e = evidence(&interval);
        e.delta_recall = f64::NAN;
        e.delta_fp = -0.5;
        assert_eq!(
            derive_verdict(&e, &ReflectiveThresholds::default()),
            Verdict::Confirmed
        );
    }

    #[test]
    fn test_verdict_partial_without_secondary_improvement() {
        let interval = ci(1.5, 2.5);
        let mut e = evidence(&interval);
        e.delta_recall = f64::NAN;
        e.delta_fp = f64::NAN;
        assert_eq!(
            derive_verdict(&e, &ReflectiveThresholds::default()),
            Verdict::Partial
        );
    }

    #[test]
    fn test_verdict_partial_when_wilcoxon_not_applied() {
        let interval = ci(1.5, 2.5);
        let mut e = evidence(&interval);
        e.p_value = f64::NAN;
        assert_eq!(
            derive_verdict(&e, &ReflectiveThresholds::default()),
            Verdict::Partial
        );
    }

    #[test]
    fn test_verdict_denied() {
        let interval = ci(-2.0, -0.5);
        let mut e = evidence(&interval);
        e.mean_delta = -1.2;
        assert_eq!(
            derive_verdict(&e, &ReflectiveThresholds::default()),
            Verdict::Denied
        );
    }

    #[test]
    fn test_verdict_inconclusive() {
        let interval = ci(-0.5, 0.5);
        assert_eq!(
            derive_verdict(&evidence(&interval), &ReflectiveThresholds::default()),
            Verdict::Inconclusive
        );

        let empty = BootstrapResult::empty(&BootstrapConfig::default());
        let mut e = evidence(&empty);
        e.mean_delta = f64::NAN;
        assert_eq!(
            derive_verdict(&e, &ReflectiveThresholds::default()),
            Verdict::Inconclusive
        );
    }

    #[test]
    fn test_reflective_decision_class() {
        let t = ReflectiveThresholds::default();
        assert_eq!(
            reflective_decision_class(20, 0.05, 0.35, true, &t),
            DecisionClass::Verified
        );
        assert_eq!(
            reflective_decision_class(25, 0.0, 0.1, false, &t),
            DecisionClass::Observed
        );
        assert_eq!(
            reflective_decision_class(25, 0.0, f64::INFINITY, true, &t),
            DecisionClass::Observed
        );
        assert_eq!(
            reflective_decision_class(12, 0.11, 0.1, true, &t),
            DecisionClass::Inconclusive
        );
        assert_eq!(
            reflective_decision_class(9, 0.0, 0.1, true, &t),
            DecisionClass::Inconclusive
        );
    }

    #[test]
    fn test_labels_serialize_uppercase() {
        assert_eq!(
            serde_json::to_string(&OverheadClass::Blocking).unwrap(),
            "\"BLOCKING\""
        );
        assert_eq!(
            serde_json::to_string(&DecisionClass::Inconclusive).unwrap(),
            "\"INCONCLUSIVE\""
        );
        assert_eq!(Verdict::Confirmed.to_string(), "CONFIRMED");
    }
}
