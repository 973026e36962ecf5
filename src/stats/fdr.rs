// Benjamini–Hochberg false-discovery-rate correction.
//
// The adjustment needs every raw p-value in the batch at once: each adjusted
// value depends on its rank among all of them and on the adjusted values of
// every larger rank.

/// Adjust `raw` p-values with the Benjamini–Hochberg step-up procedure.
///
/// The output has the same length and order as the input. Ties in the raw
/// values keep their input order when ranked, which does not affect the
/// adjusted values. An empty input gives an empty output.
///
/// Every input must be a probability. A NaN would sort last and be skipped
/// by the running minimum, so callers turn it into a row error first.
pub fn correct(raw: &[f64]) -> Vec<f64> {
    debug_assert!(
        raw.iter().all(|p| (0.0..=1.0).contains(p)),
        "p-values must lie in [0, 1]: {raw:?}"
    );
    let n = raw.len();
    if n == 0 {
        return Vec::new();
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| raw[a].total_cmp(&raw[b]));

    let mut adjusted = vec![0.0; n];
    let mut running_min = f64::INFINITY;

    // Walk from the largest rank down, carrying the running minimum so the
    // adjusted values are non-decreasing in ascending raw order.
    for (rank0, &idx) in order.iter().enumerate().rev() {
        let rank = (rank0 + 1) as f64;
        let scaled = raw[idx] * n as f64 / rank;
        running_min = running_min.min(scaled);
        adjusted[idx] = running_min.min(1.0);
    }

    adjusted
}
