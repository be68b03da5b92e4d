//! Pivot detection: symmetric-neighbourhood local extrema.
//!
//! Index `i` is a pivot high of order `k` when its value is strictly greater
//! than every value at offsets ±1..=±k (strictly lower for a pivot low).
//! Indices within `k` bars of either edge are never pivots, so the most
//! recent `k` bars can only become pivots once later bars arrive.

use super::{PivotKind, PivotPoint};

/// Find all pivots of `kind` in `series` with neighbourhood `order`.
///
/// Returns pivots in chronological order. NaN values never qualify and, since
/// every comparison with NaN is false, also suppress their neighbours.
pub fn find_pivots(series: &[f64], order: usize, kind: PivotKind) -> Vec<PivotPoint> {
    let n = series.len();
    if order == 0 || n < 2 * order + 1 {
        return Vec::new();
    }

    (order..n - order)
        .filter(|&i| is_pivot(series, i, order, kind))
        .map(|index| PivotPoint {
            index,
            value: series[index],
            kind,
        })
        .collect()
}

fn is_pivot(series: &[f64], i: usize, order: usize, kind: PivotKind) -> bool {
    let value = series[i];
    if value.is_nan() {
        return false;
    }
    (1..=order).all(|offset| {
        let left = series[i - offset];
        let right = series[i + offset];
        match kind {
            PivotKind::High => value > left && value > right,
            PivotKind::Low => value < left && value < right,
        }
    })
}
