// Percentile bootstrap confidence intervals
//
// Resampling uses a xoshiro256++ generator seeded per call, so identical
// (values, seed, n_resamples) reproduce identical bounds. Bounds are the
// alpha/2 and 1-alpha/2 percentiles of the resampled estimates with linear
// interpolation between order statistics.

use rand::Rng;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};

use super::descriptive::{percentile_sorted, sort_ascending};

/// Resampling parameters for bootstrap estimation
///
/// # Example
/// ```
/// use statverdict::statistics::BootstrapConfig;
///
/// let config = BootstrapConfig::default();
/// assert_eq!(config.n_resamples, 10_000);
/// assert_eq!(config.seed, 42);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Number of bootstrap resamples (default: 10,000)
    pub n_resamples: usize,

    /// Confidence level of the interval (default: 0.95)
    pub confidence: f64,

    /// Generator seed; reusing a seed is the reproducibility contract (default: 42)
    pub seed: u64,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            n_resamples: 10_000,
            confidence: 0.95,
            seed: 42,
        }
    }
}

impl BootstrapConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(self.confidence > 0.0 && self.confidence < 1.0) {
            return Err(format!(
                "confidence must be in (0, 1), got {}",
                self.confidence
            ));
        }

        if self.n_resamples == 0 {
            return Err("n_resamples must be >= 1".to_string());
        }

        Ok(())
    }

    fn percentile_bounds(&self) -> (f64, f64) {
        let alpha = 1.0 - self.confidence;
        (100.0 * alpha / 2.0, 100.0 * (1.0 - alpha / 2.0))
    }
}

/// Bootstrap confidence interval for a point estimator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BootstrapResult {
    /// Estimator applied to the original (unresampled) data
    #[serde(serialize_with = "crate::json_output::finite_or_string")]
    pub point_estimate: f64,

    #[serde(serialize_with = "crate::json_output::finite_or_string")]
    pub ci_lower: f64,

    #[serde(serialize_with = "crate::json_output::finite_or_string")]
    pub ci_upper: f64,

    pub ci_level: f64,

    /// Sample size (0 marks the NaN sentinel)
    pub n: usize,

    pub n_resamples: usize,
}

impl BootstrapResult {
    /// Sentinel for an empty sample: NaN estimates, requested level and resample count
    pub fn empty(config: &BootstrapConfig) -> Self {
        Self {
            point_estimate: f64::NAN,
            ci_lower: f64::NAN,
            ci_upper: f64::NAN,
            ci_level: config.confidence,
            n: 0,
            n_resamples: config.n_resamples,
        }
    }

    /// True when both bounds are defined and the interval does not contain zero
    pub fn excludes_zero(&self) -> bool {
        !self.ci_lower.is_nan()
            && !self.ci_upper.is_nan()
            && (self.ci_lower > 0.0 || self.ci_upper < 0.0)
    }

    /// Interval width (NaN for the sentinel)
    pub fn width(&self) -> f64 {
        self.ci_upper - self.ci_lower
    }
}

/// Percentile bootstrap CI of `estimator` over `values`
///
/// # Arguments
/// * `values` - Observed sample
/// * `estimator` - Statistic applied to the sample and to every resample
/// * `config` - Resample count, confidence level and seed
///
/// # Example
/// ```
/// use statverdict::statistics::{bootstrap_ci, median, BootstrapConfig};
///
/// let result = bootstrap_ci(&[4.0, 4.0, 4.0], median, &BootstrapConfig::default());
/// assert_eq!(result.point_estimate, 4.0);
/// assert_eq!(result.ci_lower, 4.0);
/// assert_eq!(result.ci_upper, 4.0);
/// ```
pub fn bootstrap_ci<F>(values: &[f64], estimator: F, config: &BootstrapConfig) -> BootstrapResult
where
    F: Fn(&[f64]) -> f64,
{
    if values.is_empty() {
        return BootstrapResult::empty(config);
    }

    let mut rng = Xoshiro256PlusPlus::seed_from_u64(config.seed);
    let mut resample = vec![0.0; values.len()];
    let mut estimates = Vec::with_capacity(config.n_resamples);

    for _ in 0..config.n_resamples {
        fill_resample(&mut rng, values, &mut resample);
        estimates.push(estimator(&resample));
    }

    let (lower, upper) = interval(&mut estimates, config);

    BootstrapResult {
        point_estimate: estimator(values),
        ci_lower: lower,
        ci_upper: upper,
        ci_level: config.confidence,
        n: values.len(),
        n_resamples: config.n_resamples,
    }
}

/// Percentile bootstrap CI of `estimator(treatment) - estimator(baseline)`
///
/// Each iteration draws a treatment resample and then a baseline resample
/// from the same generator. The reported `n` is the treatment sample size.
pub fn bootstrap_difference_ci<F>(
    treatment: &[f64],
    baseline: &[f64],
    estimator: F,
    config: &BootstrapConfig,
) -> BootstrapResult
where
    F: Fn(&[f64]) -> f64,
{
    if treatment.is_empty() || baseline.is_empty() {
        return BootstrapResult::empty(config);
    }

    let mut rng = Xoshiro256PlusPlus::seed_from_u64(config.seed);
    let mut treatment_resample = vec![0.0; treatment.len()];
    let mut baseline_resample = vec![0.0; baseline.len()];
    let mut differences = Vec::with_capacity(config.n_resamples);

    for _ in 0..config.n_resamples {
        fill_resample(&mut rng, treatment, &mut treatment_resample);
        fill_resample(&mut rng, baseline, &mut baseline_resample);
        differences.push(estimator(&treatment_resample) - estimator(&baseline_resample));
    }

    let (lower, upper) = interval(&mut differences, config);

    BootstrapResult {
        point_estimate: estimator(treatment) - estimator(baseline),
        ci_lower: lower,
        ci_upper: upper,
        ci_level: config.confidence,
        n: treatment.len(),
        n_resamples: config.n_resamples,
    }
}

fn fill_resample<R: Rng>(rng: &mut R, source: &[f64], target: &mut [f64]) {
    let n = source.len();
    for slot in target.iter_mut() {
        *slot = source[rng.gen_range(0..n)];
    }
}

fn interval(estimates: &mut [f64], config: &BootstrapConfig) -> (f64, f64) {
    sort_ascending(estimates);
    let (lower_q, upper_q) = config.percentile_bounds();
    (
        percentile_sorted(estimates, lower_q),
        percentile_sorted(estimates, upper_q),
    )
}
