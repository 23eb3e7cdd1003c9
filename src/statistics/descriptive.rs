// Descriptive statistics used as bootstrap estimators and summary metrics
//
// All functions operate on f64 slices. Percentiles follow the linear
// interpolation between order statistics of the R-7 convention:
// index = q/100 * (n-1), interpolate between floor and ceil.

/// Arithmetic mean (NaN for an empty slice)
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median (NaN for an empty slice)
///
/// Even-length inputs average the two middle order statistics.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }

    let mut sorted = values.to_vec();
    sort_ascending(&mut sorted);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Sample standard deviation with the n-1 denominator
///
/// Returns NaN when fewer than two values are present.
pub fn sample_stddev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }

    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}

/// Percentile `q` (0..=100) of already sorted data, linear interpolation
pub fn percentile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }

    let index = (q / 100.0) * (sorted.len() - 1) as f64;
    let lower = index.floor() as usize;
    let upper = index.ceil() as usize;

    if lower == upper {
        sorted[lower]
    } else {
        let weight = index - lower as f64;
        sorted[lower] + (sorted[upper] - sorted[lower]) * weight
    }
}

/// Sort in place using the IEEE total order
pub fn sort_ascending(values: &mut [f64]) {
    values.sort_by(|a, b| a.total_cmp(b));
}

/// Round to a fixed number of decimal places (NaN and infinities pass through)
pub fn round_to(value: f64, decimals: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
