// Wilcoxon signed-rank test for paired samples
//
// Implemented directly (no statistics library): zero differences are
// dropped, |d| is ranked with midranks, and for n >= 10 the normal
// approximation is applied with the tie correction
//     var = n(n+1)(2n+1)/24 - sum_t t(t^2-1)/48
// over every group of tied |d| values with t > 1.

use serde::Serialize;
use std::collections::BTreeMap;

use super::descriptive::round_to;
use super::rank::rank_with_ties;
use crate::error::AnalysisError;

/// Below this many nonzero differences the normal approximation is not applied
pub const MIN_NORMAL_APPROXIMATION_SIZE: usize = 10;

/// How the signed-rank significance was (or was not) computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignedRankMethod {
    /// Every paired difference was zero
    NoNonzeroDifferences,
    /// Fewer than ten nonzero differences
    InsufficientSampleSize,
    /// Tie-corrected variance collapsed to zero
    NormalApproximationDegenerate,
    NormalApproximation,
}

impl std::fmt::Display for SignedRankMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SignedRankMethod::NoNonzeroDifferences => "no_nonzero_differences",
            SignedRankMethod::InsufficientSampleSize => "insufficient_sample_size",
            SignedRankMethod::NormalApproximationDegenerate => "normal_approximation_degenerate",
            SignedRankMethod::NormalApproximation => "normal_approximation",
        };
        f.write_str(name)
    }
}

/// Result of a Wilcoxon signed-rank test
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignedRankResult {
    /// Sum of ranks of positive differences
    #[serde(rename = "T_plus")]
    pub t_plus: f64,

    /// Sum of ranks of negative differences
    #[serde(rename = "T_minus")]
    pub t_minus: f64,

    /// min(T+, T-)
    #[serde(rename = "T_stat")]
    pub t_stat: f64,

    pub n_nonzero: usize,

    /// Rounded to 4 decimals (NaN when the approximation was not applied)
    #[serde(serialize_with = "crate::json_output::finite_or_string")]
    pub z_stat: f64,

    /// Two-sided p-value rounded to 6 decimals
    #[serde(serialize_with = "crate::json_output::finite_or_string")]
    pub p_value: f64,

    /// Whether the sample was large enough for the normal approximation
    pub sufficient: bool,

    pub method: SignedRankMethod,
}

/// Paired Wilcoxon signed-rank test of `x` against `y`
///
/// # Errors
/// Returns [`AnalysisError::LengthMismatch`] when the samples differ in length.
///
/// # Example
/// ```
/// use statverdict::statistics::{wilcoxon_signed_rank, SignedRankMethod};
///
/// let x: Vec<f64> = (1..=11).map(f64::from).collect();
/// let y = [2.0, 1.0, 4.0, 3.0, 6.0, 5.0, 8.0, 7.0, 10.0, 9.0, 12.0];
///
/// let result = wilcoxon_signed_rank(&x, &y).unwrap();
/// assert_eq!(result.method, SignedRankMethod::NormalApproximation);
/// assert_eq!(result.z_stat, -0.3015);
/// ```
pub fn wilcoxon_signed_rank(x: &[f64], y: &[f64]) -> Result<SignedRankResult, AnalysisError> {
    if x.len() != y.len() {
        return Err(AnalysisError::LengthMismatch {
            x_len: x.len(),
            y_len: y.len(),
        });
    }

    let differences: Vec<f64> = x
        .iter()
        .zip(y)
        .map(|(a, b)| a - b)
        .filter(|d| *d != 0.0)
        .collect();
    let n = differences.len();

    if n == 0 {
        return Ok(SignedRankResult {
            t_plus: 0.0,
            t_minus: 0.0,
            t_stat: 0.0,
            n_nonzero: 0,
            z_stat: f64::NAN,
            p_value: 1.0,
            sufficient: false,
            method: SignedRankMethod::NoNonzeroDifferences,
        });
    }

    let magnitudes: Vec<f64> = differences.iter().map(|d| d.abs()).collect();
    let ranks = rank_with_ties(&magnitudes);

    let mut t_plus = 0.0;
    let mut t_minus = 0.0;
    for (d, rank) in differences.iter().zip(&ranks) {
        if *d > 0.0 {
            t_plus += rank;
        } else if *d < 0.0 {
            t_minus += rank;
        }
    }
    let t_stat = t_plus.min(t_minus);

    if n < MIN_NORMAL_APPROXIMATION_SIZE {
        return Ok(SignedRankResult {
            t_plus,
            t_minus,
            t_stat,
            n_nonzero: n,
            z_stat: f64::NAN,
            p_value: f64::NAN,
            sufficient: false,
            method: SignedRankMethod::InsufficientSampleSize,
        });
    }

    let nf = n as f64;
    let mean_t = nf * (nf + 1.0) / 4.0;
    let variance = nf * (nf + 1.0) * (2.0 * nf + 1.0) / 24.0 - tie_correction(&magnitudes);

    if variance <= 0.0 {
        return Ok(SignedRankResult {
            t_plus,
            t_minus,
            t_stat,
            n_nonzero: n,
            z_stat: 0.0,
            p_value: 1.0,
            sufficient: true,
            method: SignedRankMethod::NormalApproximationDegenerate,
        });
    }

    let z = (t_stat - mean_t) / variance.sqrt();
    let p_value = 2.0 * (1.0 - normal_cdf(z.abs()));

    Ok(SignedRankResult {
        t_plus,
        t_minus,
        t_stat,
        n_nonzero: n,
        z_stat: round_to(z, 4),
        p_value: round_to(p_value, 6),
        sufficient: true,
        method: SignedRankMethod::NormalApproximation,
    })
}

/// Standard normal CDF, Phi(z) = erfc(-z / sqrt(2)) / 2
pub fn normal_cdf(z: f64) -> f64 {
    0.5 * libm::erfc(-z / std::f64::consts::SQRT_2)
}

/// Sum of t(t^2-1)/48 over groups of exactly equal magnitudes with t > 1
fn tie_correction(magnitudes: &[f64]) -> f64 {
    let mut counts: BTreeMap<u64, usize> = BTreeMap::new();
    for m in magnitudes {
        *counts.entry(m.to_bits()).or_default() += 1;
    }

    counts
        .values()
        .filter(|&&t| t > 1)
        .map(|&t| {
            let t = t as f64;
            t * (t * t - 1.0) / 48.0
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_mismatch() {
        let err = wilcoxon_signed_rank(&[1.0, 2.0], &[1.0]).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::LengthMismatch { x_len: 2, y_len: 1 }
        ));
    }

    #[test]
    fn test_identical_samples() {
        let x = [1.0, 2.0, 3.0];
        let result = wilcoxon_signed_rank(&x, &x).unwrap();
        assert_eq!(result.n_nonzero, 0);
        assert_eq!(result.p_value, 1.0);
        assert!(result.z_stat.is_nan());
        assert!(!result.sufficient);
        assert_eq!(result.method, SignedRankMethod::NoNonzeroDifferences);
    }

    #[test]
    fn test_empty_samples() {
        let result = wilcoxon_signed_rank(&[], &[]).unwrap();
        assert_eq!(result.method, SignedRankMethod::NoNonzeroDifferences);
    }

    #[test]
    fn test_insufficient_sample_size() {
        let x = [1.83, 0.50, 1.62, 2.48, 1.68, 1.88, 1.55, 3.06, 1.30];
        let y = [0.878, 0.647, 0.598, 2.05, 1.06, 1.29, 1.06, 3.14, 1.29];

        let result = wilcoxon_signed_rank(&x, &y).unwrap();
        assert_eq!(result.n_nonzero, 9);
        assert_eq!(result.t_plus, 40.0);
        assert_eq!(result.t_minus, 5.0);
        assert_eq!(result.t_stat, 5.0);
        assert!(result.z_stat.is_nan());
        assert!(result.p_value.is_nan());
        assert!(!result.sufficient);
        assert_eq!(result.method, SignedRankMethod::InsufficientSampleSize);
    }

    #[test]
    fn test_alternating_ties() {
        // Every |d| = 1: ranks all 6, T+ = 30, T- = 36
        let x: Vec<f64> = (1..=11).map(f64::from).collect();
        let y = [2.0, 1.0, 4.0, 3.0, 6.0, 5.0, 8.0, 7.0, 10.0, 9.0, 12.0];

        let result = wilcoxon_signed_rank(&x, &y).unwrap();
        assert_eq!(result.n_nonzero, 11);
        assert_eq!(result.t_plus, 30.0);
        assert_eq!(result.t_minus, 36.0);
        assert_eq!(result.t_stat, 30.0);
        assert_eq!(result.z_stat, -0.3015);
        assert_eq!(result.p_value, 0.763025);
        assert!(result.sufficient);
    }

    #[test]
    fn test_zero_differences_dropped_with_partial_ties() {
        let x = [
            125.0, 115.0, 130.0, 140.0, 140.0, 115.0, 140.0, 125.0, 140.0, 135.0, 128.0, 150.0,
        ];
        let y = [
            110.0, 122.0, 125.0, 120.0, 140.0, 124.0, 123.0, 137.0, 135.0, 145.0, 118.0, 131.0,
        ];

        let result = wilcoxon_signed_rank(&x, &y).unwrap();
        assert_eq!(result.n_nonzero, 11);
        assert_eq!(result.t_plus, 46.5);
        assert_eq!(result.t_minus, 19.5);
        assert_eq!(result.z_stat, -1.2015);
        assert_eq!(result.p_value, 0.229563);
    }

    #[test]
    fn test_rank_sum_invariant() {
        let x = [3.0, 7.0, 1.0, 9.0, 4.0, 4.0, 6.0];
        let y = [1.0, 8.0, 1.0, 2.0, 6.0, 5.0, 6.5];
        let result = wilcoxon_signed_rank(&x, &y).unwrap();
        let n = result.n_nonzero as f64;
        assert_eq!(result.t_plus + result.t_minus, n * (n + 1.0) / 2.0);
    }

    #[test]
    fn test_tie_correction_groups() {
        // groups: {1.0 x3}, {2.0 x2}, {5.0 x1} → 3*8/48 + 2*3/48
        let correction = tie_correction(&[1.0, 2.0, 1.0, 5.0, 2.0, 1.0]);
        assert!((correction - (24.0 + 6.0) / 48.0).abs() < 1e-12);
    }

    #[test]
    fn test_normal_cdf_reference_points() {
        assert!((normal_cdf(0.0) - 0.5).abs() < 1e-15);
        assert!((normal_cdf(1.959963984540054) - 0.975).abs() < 1e-9);
        assert!((normal_cdf(-1.0) + normal_cdf(1.0) - 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_method_serializes_snake_case() {
        let json = serde_json::to_string(&SignedRankMethod::NormalApproximationDegenerate).unwrap();
        assert_eq!(json, "\"normal_approximation_degenerate\"");
        assert_eq!(
            SignedRankMethod::InsufficientSampleSize.to_string(),
            "insufficient_sample_size"
        );
    }
}
