//! Deterministic numeric core
//!
//! Everything that decides anything lives here. This module must stay pure:
//! - No rendering or platform dependencies
//! - No timers or loops; the host supplies frame deltas
//! - Stateless transforms except for `SimulationSession`

pub mod curve;
pub mod geometry;
pub mod integrator;
pub mod locator;
pub mod session;
pub mod solver;

pub use curve::{
    ControlPoints, CurveKind, CurveParams, CycloidFit, SampledCurve, cycloid_residual,
    fit_cycloid, generate,
};
pub use geometry::{Point, distance, lerp, quadratic_bezier};
pub use integrator::{SpeedPolicy, Traversal, integrate, integrate_points, is_feasible, speed_at};
pub use locator::{bracket, position_at};
pub use session::{DemoMode, Frame, Handle, SessionPhase, SimulationSession, Track};
pub use solver::{Root, bisect};
