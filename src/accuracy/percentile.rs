//! Percentiles over sorted error arrays.

/// Sorts error values ascending. NaN values sort last.
pub fn sort_errors(values: &mut [f64]) {
    values.sort_unstable_by(f64::total_cmp);
}

/// Percentile `q` (0-100) of an ascending slice, using linear interpolation
/// between the two closest order statistics at rank `q / 100 * (n - 1)`.
///
/// Returns `None` for an empty slice.
pub fn percentile(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let rank = (q / 100.0).clamp(0.0, 1.0) * last as f64;
    let lower = rank.floor() as usize;
    let upper = (rank.ceil() as usize).min(last);
    let fraction = rank - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}
