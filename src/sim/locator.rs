//! Time to position lookup
//!
//! Inverse of the integrator: given a time, find where the mass is on the
//! sampled curve by bisecting the (non-decreasing) time table.

use super::geometry::{Point, lerp};
use crate::consts::TIME_EPSILON;

/// Index pair `(lo, lo + 1)` with `table[lo] <= t <= table[lo + 1]`.
///
/// Requires `table.len() >= 2` and `table[0] < t < table[last]`.
pub fn bracket(table: &[f64], t: f64) -> (usize, usize) {
    // First index whose time exceeds t; always in 1..len
    let hi = table.partition_point(|&v| v <= t).clamp(1, table.len() - 1);
    (hi - 1, hi)
}

/// Interpolated position at time `t`.
///
/// Clamps to the first sample for `t <= 0` and to the last for
/// `t >= table[last]`. Zero-duration segments resolve to their first point.
pub fn position_at(curve: &[Point], table: &[f64], t: f64) -> Point {
    debug_assert_eq!(curve.len(), table.len());

    let (Some(&first), Some(&last)) = (curve.first(), curve.last()) else {
        return Point::ZERO;
    };
    let total = table.last().copied().unwrap_or(0.0);

    if t.is_nan() || t <= 0.0 || curve.len() < 2 {
        return first;
    }
    if t >= total {
        return last;
    }

    let (lo, hi) = bracket(table, t);
    let dt = table[hi] - table[lo];
    let alpha = if dt <= TIME_EPSILON {
        0.0
    } else {
        ((t - table[lo]) / dt).clamp(0.0, 1.0)
    };
    lerp(curve[lo], curve[hi], alpha)
}
