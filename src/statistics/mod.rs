// Statistical primitives for experiment verdicts
//
// Only the procedures the analyzers need live here:
// - Midrank transform (ties share the average rank)
// - Percentile bootstrap CI for an arbitrary estimator, one-sample and
//   two-sample difference forms, with an explicitly seeded generator
// - Paired Wilcoxon signed-rank test with normal approximation and tie
//   correction, implemented without a statistics library
// - Descriptive helpers (mean, median, sample stdev, percentiles)

mod bootstrap;
mod descriptive;
mod rank;
mod signed_rank;

pub use bootstrap::{bootstrap_ci, bootstrap_difference_ci, BootstrapConfig, BootstrapResult};
pub use descriptive::{mean, median, percentile_sorted, round_to, sample_stddev};
pub use rank::rank_with_ties;
pub use signed_rank::{
    normal_cdf, wilcoxon_signed_rank, SignedRankMethod, SignedRankResult,
    MIN_NORMAL_APPROXIMATION_SIZE,
};
