//! Curve generators
//!
//! Each generator maps the control points and a sample count to an ordered
//! point sequence from A (index 0) to B (index N-1). Endpoints are pinned to
//! the control points exactly.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use super::geometry::{Point, lerp, quadratic_bezier, sample_param};
use super::solver::bisect;
use crate::consts::*;
use crate::error::{SimResult, check_samples};
use crate::settings::SolverSettings;

/// Supported curve families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurveKind {
    Line,
    CircularArc,
    Bezier,
    #[default]
    Cycloid,
}

impl CurveKind {
    pub const ALL: [CurveKind; 4] = [
        CurveKind::Line,
        CurveKind::CircularArc,
        CurveKind::Bezier,
        CurveKind::Cycloid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CurveKind::Line => "line",
            CurveKind::CircularArc => "circular-arc",
            CurveKind::Bezier => "bezier",
            CurveKind::Cycloid => "cycloid",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "line" | "straight" => Some(CurveKind::Line),
            "circular-arc" | "circle" | "arc" => Some(CurveKind::CircularArc),
            "bezier" | "quadratic" => Some(CurveKind::Bezier),
            "cycloid" | "brachistochrone" => Some(CurveKind::Cycloid),
            _ => None,
        }
    }
}

/// Start, end and optional Bézier control point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlPoints {
    /// Release point
    pub a: Point,
    /// Finish point
    pub b: Point,
    /// User-placed Bézier control; `None` uses the default offset
    pub c: Option<Point>,
}

impl Default for ControlPoints {
    fn default() -> Self {
        Self {
            a: Point::new(0.0, 1.0),
            b: Point::new(1.0, 0.0),
            c: None,
        }
    }
}

impl ControlPoints {
    pub fn new(a: Point, b: Point) -> Self {
        Self { a, b, c: None }
    }

    pub fn with_control(mut self, c: Point) -> Self {
        self.c = Some(c);
        self
    }

    /// Length of the A-B chord
    pub fn chord_length(&self) -> f64 {
        (self.b - self.a).length()
    }

    /// Midpoint of the A-B chord
    pub fn midpoint(&self) -> Point {
        lerp(self.a, self.b, 0.5)
    }
}

/// Shape parameters shared by the generators
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveParams {
    /// Arc sag below the chord, in chord lengths
    pub arc_bulge: f64,
    /// Default Bézier control offset from the chord midpoint, in chord lengths
    pub bezier_offset: DVec2,
    /// Cycloid root solver
    pub solver: SolverSettings,
}

impl Default for CurveParams {
    fn default() -> Self {
        Self {
            arc_bulge: DEFAULT_ARC_BULGE,
            bezier_offset: DVec2::new(DEFAULT_BEZIER_OFFSET.0, DEFAULT_BEZIER_OFFSET.1),
            solver: SolverSettings::default(),
        }
    }
}

impl CurveParams {
    /// Effective Bézier control point: the user's, or the default offset
    pub fn bezier_control(&self, points: &ControlPoints) -> Point {
        points
            .c
            .unwrap_or_else(|| points.midpoint() + self.bezier_offset * points.chord_length())
    }

    /// Control point of the arc approximation, sagging toward lower potential
    pub fn arc_control(&self, points: &ControlPoints) -> Point {
        let chord = points.b - points.a;
        let mut normal = chord.perp().normalize_or_zero();
        if normal.y > 0.0 {
            normal = -normal;
        }
        points.midpoint() + normal * (self.arc_bulge * chord.length())
    }
}

/// Parameters of a fitted cycloid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CycloidFit {
    /// Rolling angle at B, in (0, 2π)
    pub theta_end: f64,
    /// Rolling circle radius
    pub radius: f64,
    /// `f(theta_end)` of the fit equation
    pub residual: f64,
    pub iterations: u32,
}

impl CycloidFit {
    /// Point at rolling angle `theta`, relative to A (world frame, y-up)
    #[inline]
    pub fn offset_at(&self, theta: f64) -> DVec2 {
        DVec2::new(
            self.radius * (theta - theta.sin()),
            -self.radius * (1.0 - theta.cos()),
        )
    }
}

/// `(1 - cos θ) / (θ - sin θ) - dy/dx`, zero at the cycloid's end angle
#[inline]
pub fn cycloid_residual(theta: f64, slope: f64) -> f64 {
    (1.0 - theta.cos()) / (theta - theta.sin()) - slope
}

/// Solve for the cycloid from `a` through `b`.
///
/// Returns `None` when B is not strictly right of and below A, or when the
/// solver does not land on the principal branch.
pub fn fit_cycloid(a: Point, b: Point, solver: &SolverSettings) -> Option<CycloidFit> {
    let dx = b.x - a.x;
    let dy = a.y - b.y;
    if dx <= 0.0 || dy <= 0.0 {
        return None;
    }

    let slope = dy / dx;
    // Beyond 2π the curve starts a second arch
    let hi = solver.hi.min(TAU);
    let root = bisect(
        |theta| cycloid_residual(theta, slope),
        solver.lo,
        hi,
        solver.max_iterations,
        solver.tolerance,
    );

    if !root.converged || root.x <= 0.0 || root.x >= TAU {
        log::warn!(
            "Cycloid solve failed (slope {:.4}, theta {:.6}, residual {:.3e})",
            slope,
            root.x,
            root.residual
        );
        return None;
    }

    let radius = dx / (root.x - root.x.sin());
    if !radius.is_finite() {
        return None;
    }

    Some(CycloidFit {
        theta_end: root.x,
        radius,
        residual: root.residual,
        iterations: root.iterations,
    })
}

/// A sampled curve plus how it was produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampledCurve {
    pub points: Vec<Point>,
    /// Family that was asked for
    pub kind: CurveKind,
    /// Family that was actually sampled
    pub drawn_kind: CurveKind,
    /// True when the requested family was replaced by a substitute
    pub used_fallback: bool,
    /// Fit parameters when a true cycloid was produced
    pub cycloid: Option<CycloidFit>,
}

impl SampledCurve {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn start(&self) -> Point {
        self.points[0]
    }

    pub fn end(&self) -> Point {
        self.points[self.points.len() - 1]
    }

    /// Total polyline length
    pub fn arc_length(&self) -> f64 {
        self.points.windows(2).map(|w| (w[1] - w[0]).length()).sum()
    }

    /// Highest sample (largest y)
    pub fn max_height(&self) -> f64 {
        self.points
            .iter()
            .map(|p| p.y)
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

fn sample<F>(n: usize, points: &ControlPoints, f: F) -> Vec<Point>
where
    F: Fn(f64) -> Point,
{
    let mut out: Vec<Point> = (0..n).map(|i| f(sample_param(i, n))).collect();
    out[0] = points.a;
    out[n - 1] = points.b;
    out
}

fn sample_line(points: &ControlPoints, n: usize) -> Vec<Point> {
    sample(n, points, |t| lerp(points.a, points.b, t))
}

fn sample_bezier(points: &ControlPoints, c: Point, n: usize) -> Vec<Point> {
    sample(n, points, |t| quadratic_bezier(points.a, c, points.b, t))
}

fn sample_cycloid(points: &ControlPoints, fit: &CycloidFit, n: usize) -> Vec<Point> {
    sample(n, points, |t| points.a + fit.offset_at(t * fit.theta_end))
}

/// Sample `kind` between the control points with `n` samples.
///
/// Rejects `n < 2`. A cycloid that cannot be fitted is replaced by the
/// default Bézier (or the line when A and B coincide) and flagged.
pub fn generate(
    kind: CurveKind,
    points: &ControlPoints,
    n: usize,
    params: &CurveParams,
) -> SimResult<SampledCurve> {
    let n = check_samples(n)?;

    let curve = match kind {
        CurveKind::Line => exact(kind, sample_line(points, n)),
        CurveKind::CircularArc => exact(kind, sample_bezier(points, params.arc_control(points), n)),
        CurveKind::Bezier => exact(kind, sample_bezier(points, params.bezier_control(points), n)),
        CurveKind::Cycloid => match fit_cycloid(points.a, points.b, &params.solver) {
            Some(fit) => SampledCurve {
                points: sample_cycloid(points, &fit, n),
                kind,
                drawn_kind: kind,
                used_fallback: false,
                cycloid: Some(fit),
            },
            None => {
                let (drawn_kind, samples) = if points.chord_length() == 0.0 {
                    (CurveKind::Line, sample_line(points, n))
                } else {
                    let c = points.midpoint()
                        + params.bezier_offset * points.chord_length();
                    (CurveKind::Bezier, sample_bezier(points, c, n))
                };
                log::warn!(
                    "No cycloid from {:?} to {:?}, drawing {} instead",
                    points.a,
                    points.b,
                    drawn_kind.as_str()
                );
                SampledCurve {
                    points: samples,
                    kind,
                    drawn_kind,
                    used_fallback: true,
                    cycloid: None,
                }
            }
        },
    };

    Ok(curve)
}

fn exact(kind: CurveKind, points: Vec<Point>) -> SampledCurve {
    SampledCurve {
        points,
        kind,
        drawn_kind: kind,
        used_fallback: false,
        cycloid: None,
    }
}
