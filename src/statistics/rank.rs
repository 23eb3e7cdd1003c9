// Tie-averaged ranking (midranks)

/// Assign 1-based ranks, averaging ranks across ties
///
/// For a maximal run of equal values spanning sorted positions `[i, j)`,
/// every member receives the midrank `(i + 1 + j) / 2`.
///
/// # Example
/// ```
/// use statverdict::statistics::rank_with_ties;
///
/// let ranks = rank_with_ties(&[10.0, 30.0, 20.0, 20.0]);
/// assert_eq!(ranks, vec![1.0, 4.0, 2.5, 2.5]);
/// ```
pub fn rank_with_ties(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && values[order[j]] == values[order[i]] {
            j += 1;
        }

        let midrank = (i + 1 + j) as f64 / 2.0;
        for &idx in &order[i..j] {
            ranks[idx] = midrank;
        }
        i = j;
    }

    ranks
}
