// Experiment analysis and verdict derivation
//
// Two analyses share the statistical primitives:
// - Latency: per-variant median overhead against a baseline variant, with a
//   bootstrap CI on the overhead and a FAST/MODERATE/SLOW/BLOCKING class
// - Reflective: paired comparison of two review methods over shared cycles,
//   with a Wilcoxon signed-rank test, a bootstrap CI on the mean score delta
//   and secondary detection metrics
//
// Both produce a confidence tier (VERIFIED/OBSERVED/INCONCLUSIVE) from
// sample-size and stability thresholds held in `AnalysisConfig`. Analyzers
// are pure: they take normalized records and return a summary value, and
// input-shape problems come back as `AnalysisError`.

mod config;
mod latency;
mod paired;
mod session;
mod verdict;

pub use config::{AnalysisConfig, LatencyThresholds, ReflectiveThresholds};
pub use latency::{analyze_latency, BaselineSummary, LatencySummary, VariantSummary, BASELINE_LABELS};
pub use paired::{
    analyze_reflective, compare_cycle_keys, ReflectiveSummary, ScoreSummary, SecondarySummary,
    BASELINE_METHOD,
};
pub use session::{check_session_stability, SessionStability};
pub use verdict::{
    classify_overhead, derive_verdict, latency_decision_class, reflective_decision_class,
    DecisionClass, OverheadClass, Verdict, VerdictEvidence,
};
