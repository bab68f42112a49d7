//! 2D geometry primitives
//!
//! World frame is y-up: larger y means more potential energy. Screen frames
//! (y-down) are the renderer's business.

use glam::DVec2;

/// A point in the world frame
pub type Point = DVec2;

/// Linear interpolation between two points, `t` in [0, 1]
#[inline]
pub fn lerp(a: Point, b: Point, t: f64) -> Point {
    a + (b - a) * t
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Point, b: Point) -> f64 {
    (b - a).length()
}

/// Quadratic Bézier (de Casteljau) through control point `c`
#[inline]
pub fn quadratic_bezier(a: Point, c: Point, b: Point, t: f64) -> Point {
    lerp(lerp(a, c, t), lerp(c, b, t), t)
}

/// Uniform parameter for sample `i` of `n` (n >= 2)
#[inline]
pub fn sample_param(i: usize, n: usize) -> f64 {
    i as f64 / (n - 1).max(1) as f64
}
