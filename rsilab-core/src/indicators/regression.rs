//! Least-squares slope and companions.
//!
//! x is the position within the window (0, 1, 2, …), so the slope is in
//! series units per bar.

/// The last `count` finite values of `series`, in chronological order.
///
/// NaN and infinite values (indicator warm-up, gaps) are skipped, so the
/// window may reach further back than `count` bars.
pub fn trailing_finite(series: &[f64], count: usize) -> Vec<f64> {
    let mut values: Vec<f64> = series
        .iter()
        .rev()
        .copied()
        .filter(|v| v.is_finite())
        .take(count)
        .collect();
    values.reverse();
    values
}

/// Ordinary least-squares slope of `values` against their index.
///
/// `None` for fewer than two values or any non-finite value.
pub fn linear_regression_slope(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 || values.iter().any(|v| !v.is_finite()) {
        return None;
    }
    let n_f = n as f64;
    let mean_x = (n_f - 1.0) / 2.0;
    let mean_y = values.iter().sum::<f64>() / n_f;

    let (mut cov, mut var) = (0.0, 0.0);
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - mean_x;
        cov += dx * (y - mean_y);
        var += dx * dx;
    }
    Some(cov / var)
}

/// Mean absolute value; `None` when empty.
pub fn mean_abs(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().map(|v| v.abs()).sum::<f64>() / values.len() as f64)
}
