// Configuration for verdict derivation
//
// Every threshold the decision rules use is an explicit field with a
// documented default, so tests and callers can override them without
// touching global state. Loaded from TOML; every section is optional.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::statistics::BootstrapConfig;

/// Thresholds for latency overhead classification and decision class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatencyThresholds {
    /// Overhead below this is FAST (default: 5000 ms)
    pub fast_ms: f64,

    /// Overhead below this is MODERATE (default: 15000 ms)
    pub moderate_ms: f64,

    /// Overhead below this is SLOW, anything else BLOCKING (default: 60000 ms)
    pub slow_ms: f64,

    /// Minimum runs per variant for VERIFIED (default: 10)
    pub verified_min_runs: usize,

    /// Maximum overall failure rate for VERIFIED (default: 0.10)
    pub verified_max_failure_rate: f64,

    /// Maximum overhead CI width for VERIFIED (default: 5000 ms)
    pub verified_max_ci_width_ms: f64,

    /// Minimum runs per variant for OBSERVED (default: 5)
    pub observed_min_runs: usize,
}

impl Default for LatencyThresholds {
    fn default() -> Self {
        Self {
            fast_ms: 5_000.0,
            moderate_ms: 15_000.0,
            slow_ms: 60_000.0,
            verified_min_runs: 10,
            verified_max_failure_rate: 0.10,
            verified_max_ci_width_ms: 5_000.0,
            observed_min_runs: 5,
        }
    }
}

/// Thresholds for the paired-comparison verdict and decision class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReflectiveThresholds {
    /// Minimum mean score delta for CONFIRMED (default: 0.5)
    pub min_mean_delta: f64,

    /// Wilcoxon p-value must be strictly below this for CONFIRMED (default: 0.05)
    pub significance_level: f64,

    /// Recall improvement that satisfies the secondary criterion (default: 0.15)
    pub min_delta_recall: f64,

    /// False-positive change that satisfies the secondary criterion (default: -0.5)
    pub max_delta_fp: f64,

    /// Minimum paired cycles for VERIFIED (default: 20)
    pub verified_min_pairs: usize,

    /// Maximum parse failure rate for VERIFIED (default: 0.05)
    pub verified_max_parse_rate: f64,

    /// Maximum stdev ratio for VERIFIED (default: 0.35)
    pub verified_max_stdev_ratio: f64,

    /// Minimum paired cycles for OBSERVED (default: 10)
    pub observed_min_pairs: usize,

    /// Maximum parse failure rate for OBSERVED (default: 0.10)
    pub observed_max_parse_rate: f64,
}

impl Default for ReflectiveThresholds {
    fn default() -> Self {
        Self {
            min_mean_delta: 0.5,
            significance_level: 0.05,
            min_delta_recall: 0.15,
            max_delta_fp: -0.5,
            verified_min_pairs: 20,
            verified_max_parse_rate: 0.05,
            verified_max_stdev_ratio: 0.35,
            observed_min_pairs: 10,
            observed_max_parse_rate: 0.10,
        }
    }
}

/// Full analysis configuration
///
/// # Example
/// ```
/// use statverdict::analysis::AnalysisConfig;
///
/// let config = AnalysisConfig::from_toml_str("[bootstrap]\nseed = 7\n").unwrap();
/// assert_eq!(config.bootstrap.seed, 7);
/// assert_eq!(config.bootstrap.n_resamples, 10_000);
/// assert_eq!(config.latency.fast_ms, 5_000.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub bootstrap: BootstrapConfig,
    pub latency: LatencyThresholds,
    pub reflective: ReflectiveThresholds,
}

impl AnalysisConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse TOML")?;
        config.validate().map_err(|e| anyhow::anyhow!(e))?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        self.bootstrap.validate()?;

        let latency = &self.latency;
        if !(latency.fast_ms <= latency.moderate_ms && latency.moderate_ms <= latency.slow_ms) {
            return Err(format!(
                "latency class thresholds must be non-decreasing, got fast={} moderate={} slow={}",
                latency.fast_ms, latency.moderate_ms, latency.slow_ms
            ));
        }

        if !(0.0..=1.0).contains(&latency.verified_max_failure_rate) {
            return Err(format!(
                "verified_max_failure_rate must be in [0, 1], got {}",
                latency.verified_max_failure_rate
            ));
        }

        let reflective = &self.reflective;
        if !(0.0..=1.0).contains(&reflective.significance_level) {
            return Err(format!(
                "significance_level must be in [0, 1], got {}",
                reflective.significance_level
            ));
        }

        for (name, rate) in [
            ("verified_max_parse_rate", reflective.verified_max_parse_rate),
            ("observed_max_parse_rate", reflective.observed_max_parse_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(format!("{} must be in [0, 1], got {}", name, rate));
            }
        }

        Ok(())
    }
}
