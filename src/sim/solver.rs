//! Bisection root solver
//!
//! Kept separate from the cycloid fit so bracketing and convergence can be
//! exercised on their own.

use serde::{Deserialize, Serialize};

/// Outcome of a bisection run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Root {
    /// Best estimate of the root
    pub x: f64,
    /// `f(x)` at the estimate
    pub residual: f64,
    /// Iterations actually spent
    pub iterations: u32,
    /// Whether the initial interval had a sign change
    pub bracketed: bool,
    /// Whether `|f(x)| <= tolerance` or the interval collapsed
    pub converged: bool,
}

/// Find a root of `f` in `[lo, hi]` by bisection.
///
/// Keeps the half `[lo, mid]` whenever `f(lo)·f(mid) <= 0`, otherwise
/// `[mid, hi]`. Stops after `max_iterations` or once `|f(mid)| < tolerance`.
/// A non-bracketing interval is still bisected (the loop is well defined) but
/// the result reports `bracketed = false` and is generally not a root.
pub fn bisect<F>(f: F, lo: f64, hi: f64, max_iterations: u32, tolerance: f64) -> Root
where
    F: Fn(f64) -> f64,
{
    let (mut lo, mut hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    let mut f_lo = f(lo);
    let f_hi = f(hi);
    let bracketed = f_lo * f_hi <= 0.0;

    let mut mid = 0.5 * (lo + hi);
    let mut f_mid = f(mid);
    let mut iterations = 0;

    while iterations < max_iterations {
        iterations += 1;
        mid = 0.5 * (lo + hi);
        f_mid = f(mid);

        if f_mid.abs() < tolerance {
            break;
        }

        if f_lo * f_mid <= 0.0 {
            hi = mid;
        } else {
            lo = mid;
            f_lo = f_mid;
        }

        if interval_collapsed(lo, hi, mid) {
            break;
        }
    }

    let converged = bracketed
        && f_mid.is_finite()
        && (f_mid.abs() <= tolerance || interval_collapsed(lo, hi, mid));

    Root {
        x: mid,
        residual: f_mid,
        iterations,
        bracketed,
        converged,
    }
}

/// No representable midpoint remains between `lo` and `hi`
#[inline]
fn interval_collapsed(lo: f64, hi: f64, mid: f64) -> bool {
    hi - lo <= f64::EPSILON * mid.abs().max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bisect_sqrt2() {
        let root = bisect(|x| x * x - 2.0, 0.0, 2.0, 200, 1e-14);
        assert!(root.bracketed);
        assert!(root.converged);
        assert!((root.x - 2.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_bisect_swapped_interval() {
        let root = bisect(|x| x - 1.0, 3.0, -3.0, 200, 1e-14);
        assert!(root.converged);
        assert!((root.x - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_bisect_not_bracketed() {
        let root = bisect(|x| x * x + 1.0, -1.0, 1.0, 50, 1e-12);
        assert!(!root.bracketed);
        assert!(!root.converged);
        assert!(root.x.is_finite());
    }

    #[test]
    fn test_bisect_respects_iteration_cap() {
        let root = bisect(|x| x - 0.3, 0.0, 1.0, 5, 0.0);
        assert_eq!(root.iterations, 5);
        assert!(!root.converged);
        assert!((root.x - 0.3).abs() < 1.0 / 32.0);
    }

    #[test]
    fn test_bisect_flat_region() {
        // Zero everywhere on the right half: first midpoint is accepted
        let root = bisect(|x| if x >= 0.5 { 0.0 } else { -1.0 }, 0.0, 1.0, 100, 1e-12);
        assert!(root.converged);
        assert_eq!(root.residual, 0.0);
        assert_eq!(root.iterations, 1);
    }

    #[test]
    fn test_bisect_root_at_bound() {
        let root = bisect(|x| x, 0.0, 1.0, 200, 1e-300);
        assert!(root.bracketed);
        assert!(root.x.abs() < 1e-12);
    }
}
