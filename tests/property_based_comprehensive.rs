//! Comprehensive property-based tests for the statistical core
//!
//! Properties covered:
//! 1. Midrank transform (rank sum, distinct inputs, all-equal inputs)
//! 2. Bootstrap CI (constant samples, reproducibility, point estimate)
//! 3. Wilcoxon signed-rank (rank-sum identity, identical inputs, length check)
//! 4. Record normalization and CSV reading never panic

use proptest::prelude::*;
use statverdict::statistics::{
    bootstrap_ci, mean, median, rank_with_ties, wilcoxon_signed_rank, BootstrapConfig,
    SignedRankMethod,
};

fn small_config(seed: u64) -> BootstrapConfig {
    BootstrapConfig {
        n_resamples: 200,
        seed,
        ..BootstrapConfig::default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_rank_sum_is_triangular(values in prop::collection::vec(-1000i32..1000, 0..60)) {
        let values: Vec<f64> = values.into_iter().map(f64::from).collect();
        let ranks = rank_with_ties(&values);
        let n = values.len() as f64;

        prop_assert_eq!(ranks.len(), values.len());
        let sum: f64 = ranks.iter().sum();
        prop_assert!((sum - n * (n + 1.0) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn prop_distinct_values_rank_in_sorted_order(
        values in prop::collection::btree_set(-10_000i32..10_000, 1..40)
    ) {
        // btree_set yields sorted distinct values; reverse to scramble input order
        let values: Vec<f64> = values.into_iter().rev().map(f64::from).collect();
        let ranks = rank_with_ties(&values);
        let n = values.len();

        for (i, rank) in ranks.iter().enumerate() {
            prop_assert_eq!(*rank, (n - i) as f64);
        }
    }

    #[test]
    fn prop_all_equal_values_share_midrank(value in -100.0f64..100.0, n in 1usize..50) {
        let ranks = rank_with_ties(&vec![value; n]);
        let midrank = (n as f64 + 1.0) / 2.0;
        prop_assert!(ranks.iter().all(|r| *r == midrank));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(40))]

    #[test]
    fn prop_constant_sample_collapses_ci(value in -1e6f64..1e6, n in 1usize..30, seed in any::<u64>()) {
        let result = bootstrap_ci(&vec![value; n], median, &small_config(seed));
        prop_assert_eq!(result.point_estimate, value);
        prop_assert_eq!(result.ci_lower, value);
        prop_assert_eq!(result.ci_upper, value);
        prop_assert_eq!(result.n, n);
    }

    #[test]
    fn prop_same_seed_same_bounds(
        values in prop::collection::vec(-500.0f64..500.0, 1..40),
        seed in any::<u64>()
    ) {
        let first = bootstrap_ci(&values, mean, &small_config(seed));
        let second = bootstrap_ci(&values, mean, &small_config(seed));
        prop_assert_eq!(first.ci_lower.to_bits(), second.ci_lower.to_bits());
        prop_assert_eq!(first.ci_upper.to_bits(), second.ci_upper.to_bits());
    }

    #[test]
    fn prop_bounds_ordered_within_range(
        values in prop::collection::vec(-500.0f64..500.0, 1..40),
        seed in any::<u64>()
    ) {
        let result = bootstrap_ci(&values, median, &small_config(seed));
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        prop_assert!(result.ci_lower <= result.ci_upper);
        prop_assert!(result.ci_lower >= min && result.ci_upper <= max);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_signed_rank_sums_match(
        pairs in prop::collection::vec((-50i32..50, -50i32..50), 0..60)
    ) {
        let x: Vec<f64> = pairs.iter().map(|(a, _)| f64::from(*a)).collect();
        let y: Vec<f64> = pairs.iter().map(|(_, b)| f64::from(*b)).collect();
        let result = wilcoxon_signed_rank(&x, &y).unwrap();

        let n = result.n_nonzero as f64;
        prop_assert!((result.t_plus + result.t_minus - n * (n + 1.0) / 2.0).abs() < 1e-9);
        prop_assert_eq!(result.t_stat, result.t_plus.min(result.t_minus));
        if result.sufficient {
            prop_assert!((0.0..=1.0).contains(&result.p_value));
        }
    }

    #[test]
    fn prop_identical_inputs_have_no_differences(values in prop::collection::vec(-1e3f64..1e3, 0..40)) {
        let result = wilcoxon_signed_rank(&values, &values).unwrap();
        prop_assert_eq!(result.n_nonzero, 0);
        prop_assert_eq!(result.p_value, 1.0);
        prop_assert_eq!(result.method, SignedRankMethod::NoNonzeroDifferences);
    }

    #[test]
    fn prop_length_mismatch_is_error(
        x in prop::collection::vec(-1e3f64..1e3, 0..20),
        extra in 1usize..5
    ) {
        let y = vec![0.0; x.len() + extra];
        prop_assert!(wilcoxon_signed_rank(&x, &y).is_err());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_csv_normalization_never_panics(
        rows in prop::collection::vec(
            ("[a-z]{0,6}", "[0-9.a-z-]{0,6}", "(succeeded|failed|timed_out|)"),
            0..20
        )
    ) {
        use statverdict::csv_input::read_records_from_reader;
        use statverdict::records::{normalize, LatencyRecord, ReviewRecord, SessionRecord};

        let mut csv = String::from("variant,duration_ms,status,cycle,method,score,tp,fp,attempt\n");
        for (label, number, status) in &rows {
            csv.push_str(&format!(
                "{label},{number},{status},{number},{label},{number},{number},{number},{number}\n"
            ));
        }

        let records = read_records_from_reader(csv.as_bytes()).unwrap();
        prop_assert_eq!(records.len(), rows.len());

        let _ = normalize(&records, LatencyRecord::from_raw);
        let _ = normalize(&records, ReviewRecord::from_raw);
        let _ = normalize(&records, SessionRecord::from_raw);
    }
}
