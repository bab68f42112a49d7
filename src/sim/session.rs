//! Simulation session: the only mutable state
//!
//! Holds the inputs (curve family, control points, physics settings) and the
//! derived track (sampled curve + time table). The host drives animation by
//! calling [`SimulationSession::advance`] once per frame until the session
//! reports [`SessionPhase::Idle`].

use serde::{Deserialize, Serialize};

use super::curve::{ControlPoints, CurveKind, SampledCurve, generate};
use super::geometry::{Point, distance};
use super::integrator::{Traversal, integrate};
use super::locator::position_at;
use crate::error::{SimResult, check_gravity, check_samples};
use crate::settings::{Settings, check_time_scale};

/// Animation phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Showing `current_time` statically
    Idle,
    /// Time advancing every frame
    Running,
}

/// A draggable control point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handle {
    A,
    B,
    C,
}

/// Which handles the user may move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DemoMode {
    /// Endpoints fixed at their defaults
    FixedEndpoints,
    /// A and B draggable
    DraggableEndpoints,
    /// A, B and the Bézier control point draggable
    #[default]
    DraggableControl,
}

impl DemoMode {
    pub fn allows(&self, handle: Handle) -> bool {
        match (self, handle) {
            (DemoMode::FixedEndpoints, _) => false,
            (DemoMode::DraggableEndpoints, Handle::C) => false,
            _ => true,
        }
    }
}

/// Derived state, replaced as a unit on every rebuild
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub curve: SampledCurve,
    pub traversal: Traversal,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct Frame<'a> {
    pub kind: CurveKind,
    pub curve: &'a [Point],
    pub ball: Point,
    pub feasible: bool,
    pub used_fallback: bool,
    /// `None` when the curve is infeasible
    pub total_time: Option<f64>,
    pub current_time: f64,
    pub phase: SessionPhase,
}

#[derive(Debug, Clone)]
pub struct SimulationSession {
    settings: Settings,
    points: ControlPoints,
    track: Option<Track>,
    phase: SessionPhase,
    current_time: f64,
}

impl SimulationSession {
    /// Create a session; nothing is built until the first rebuild or start
    pub fn new(settings: Settings) -> SimResult<Self> {
        settings.validate()?;
        Ok(Self {
            points: settings.default_points,
            settings,
            track: None,
            phase: SessionPhase::Idle,
            current_time: 0.0,
        })
    }

    /// Recompute curve, time table and feasibility from the current inputs
    pub fn rebuild(&mut self) -> SimResult<()> {
        let track = build_track(&self.settings, &self.points)?;
        self.install(track);
        Ok(())
    }

    /// Swap in new control points together with their track; on error
    /// neither changes
    fn commit_points(&mut self, points: ControlPoints) -> SimResult<()> {
        let track = build_track(&self.settings, &points)?;
        self.points = points;
        self.install(track);
        Ok(())
    }

    /// Settings counterpart of [`Self::commit_points`]
    fn commit_settings(&mut self, settings: Settings) -> SimResult<()> {
        let track = build_track(&settings, &self.points)?;
        self.settings = settings;
        self.install(track);
        Ok(())
    }

    fn install(&mut self, track: Track) {
        self.track = Some(track);
        self.phase = SessionPhase::Idle;
        self.current_time = 0.0;
    }

    /// Begin animating from t = 0, building first if needed
    pub fn start(&mut self) -> SimResult<()> {
        if self.track.is_none() {
            self.rebuild()?;
        }
        self.current_time = 0.0;
        self.phase = SessionPhase::Running;
        log::info!(
            "Animation started ({}, {:?}s)",
            self.settings.kind.as_str(),
            self.reported_time()
        );
        Ok(())
    }

    /// Halt animation where it is
    pub fn stop(&mut self) {
        self.phase = SessionPhase::Idle;
    }

    /// Step animation by `real_dt` seconds of wall time.
    ///
    /// Negative or NaN deltas are treated as zero. Reaching the end clamps
    /// `current_time` to the total and returns to Idle.
    pub fn advance(&mut self, real_dt: f64) -> SessionPhase {
        if self.phase != SessionPhase::Running {
            return self.phase;
        }
        let Some(track) = &self.track else {
            self.phase = SessionPhase::Idle;
            return self.phase;
        };

        let step = if real_dt.is_finite() { real_dt.max(0.0) } else { 0.0 };
        let total = track.traversal.total_time;
        self.current_time += step * self.settings.time_scale;

        if self.current_time >= total {
            self.current_time = total;
            self.phase = SessionPhase::Idle;
            log::info!("Animation finished at {:.4}s", total);
        }
        self.phase
    }

    // === Inputs ===

    /// Move a control point and rebuild.
    ///
    /// Returns `false` (and changes nothing) while running or when the demo
    /// mode doesn't allow the handle. A failed rebuild keeps the old point.
    pub fn set_point(&mut self, handle: Handle, p: Point) -> SimResult<bool> {
        if self.phase == SessionPhase::Running || !self.settings.mode.allows(handle) {
            return Ok(false);
        }
        let mut points = self.points;
        match handle {
            Handle::A => points.a = p,
            Handle::B => points.b = p,
            Handle::C => points.c = Some(p),
        }
        self.commit_points(points)?;
        Ok(true)
    }

    /// Nearest movable handle within `radius` of `p`
    pub fn pick_handle(&self, p: Point, radius: f64) -> Option<Handle> {
        let mut candidates = vec![(Handle::A, self.points.a), (Handle::B, self.points.b)];
        if self.settings.kind == CurveKind::Bezier {
            let c = self.settings.curve_params().bezier_control(&self.points);
            candidates.push((Handle::C, c));
        }

        candidates
            .into_iter()
            .filter(|(h, _)| self.settings.mode.allows(*h))
            .map(|(h, q)| (h, distance(p, q)))
            .filter(|(_, d)| *d <= radius)
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(h, _)| h)
    }

    /// Restore the default control points and rebuild
    pub fn reset_points(&mut self) -> SimResult<()> {
        self.commit_points(self.settings.default_points)
    }

    pub fn set_kind(&mut self, kind: CurveKind) -> SimResult<()> {
        self.commit_settings(Settings {
            kind,
            ..self.settings.clone()
        })
    }

    pub fn set_gravity(&mut self, gravity: f64) -> SimResult<()> {
        self.commit_settings(Settings {
            gravity: check_gravity(gravity)?,
            ..self.settings.clone()
        })
    }

    pub fn set_samples(&mut self, samples: usize) -> SimResult<()> {
        self.commit_settings(Settings {
            samples: check_samples(samples)?,
            ..self.settings.clone()
        })
    }

    pub fn set_mode(&mut self, mode: DemoMode) {
        self.settings.mode = mode;
    }

    /// Presentation only; does not touch the track
    pub fn set_time_scale(&mut self, scale: f64) -> SimResult<()> {
        self.settings.time_scale = check_time_scale(scale)?;
        Ok(())
    }

    // === Outputs ===

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn points(&self) -> &ControlPoints {
        &self.points
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn track(&self) -> Option<&Track> {
        self.track.as_ref()
    }

    pub fn curve(&self) -> Option<&SampledCurve> {
        self.track.as_ref().map(|t| &t.curve)
    }

    pub fn traversal(&self) -> Option<&Traversal> {
        self.track.as_ref().map(|t| &t.traversal)
    }

    pub fn feasible(&self) -> Option<bool> {
        self.traversal().map(|t| t.feasible)
    }

    /// Total time, `None` if unbuilt or infeasible
    pub fn reported_time(&self) -> Option<f64> {
        self.traversal().and_then(Traversal::reported_time)
    }

    /// Mass position at `current_time`
    pub fn ball(&self) -> Option<Point> {
        self.track
            .as_ref()
            .map(|t| position_at(&t.curve.points, &t.traversal.table, self.current_time))
    }

    pub fn frame(&self) -> Option<Frame<'_>> {
        let track = self.track.as_ref()?;
        Some(Frame {
            kind: track.curve.kind,
            curve: &track.curve.points,
            ball: position_at(&track.curve.points, &track.traversal.table, self.current_time),
            feasible: track.traversal.feasible,
            used_fallback: track.curve.used_fallback,
            total_time: track.traversal.reported_time(),
            current_time: self.current_time,
            phase: self.phase,
        })
    }
}

/// Generate and time the curve for one set of inputs
fn build_track(settings: &Settings, points: &ControlPoints) -> SimResult<Track> {
    let curve = generate(
        settings.kind,
        points,
        settings.samples,
        &settings.curve_params(),
    )?;
    let traversal = integrate(&curve, settings.gravity, points.a, settings.speed_policy)?;

    log::debug!(
        "Rebuilt {} (N={}): total {:.6}s, feasible={}",
        curve.drawn_kind.as_str(),
        curve.len(),
        traversal.total_time,
        traversal.feasible
    );
    if !traversal.feasible {
        log::warn!(
            "{} rises above the release point; time undefined",
            curve.drawn_kind.as_str()
        );
    }

    Ok(Track { curve, traversal })
}

impl Default for SimulationSession {
    fn default() -> Self {
        Self {
            points: ControlPoints::default(),
            settings: Settings::default(),
            track: None,
            phase: SessionPhase::Idle,
            current_time: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;

    fn session(kind: CurveKind) -> SimulationSession {
        let settings = Settings {
            kind,
            samples: 200,
            ..Default::default()
        };
        let mut session = SimulationSession::new(settings).unwrap();
        session.rebuild().unwrap();
        session
    }

    #[test]
    fn test_new_rejects_invalid_settings() {
        let settings = Settings {
            samples: 1,
            ..Default::default()
        };
        assert!(SimulationSession::new(settings).is_err());
    }

    #[test]
    fn test_start_builds_implicitly() {
        let mut s = SimulationSession::default();
        assert!(s.curve().is_none());
        assert_eq!(s.ball(), None);
        s.start().unwrap();
        assert!(s.is_running());
        assert!(s.curve().is_some());
        assert_eq!(s.current_time(), 0.0);
        assert_eq!(s.ball(), Some(s.points().a));
    }

    #[test]
    fn test_advance_until_idle() {
        let mut s = session(CurveKind::Line);
        let total = s.traversal().unwrap().total_time;
        s.start().unwrap();

        let mut frames = 0;
        while s.advance(1.0 / 60.0) == SessionPhase::Running {
            frames += 1;
            assert!(s.current_time() < total);
            assert!(frames < 10_000);
        }
        assert_eq!(s.phase(), SessionPhase::Idle);
        assert_eq!(s.current_time(), total);
        assert_eq!(s.ball(), Some(s.points().b));
    }

    #[test]
    fn test_time_scale() {
        let mut s = session(CurveKind::Line);
        s.set_time_scale(0.5).unwrap();
        s.start().unwrap();
        s.advance(0.1);
        assert!((s.current_time() - 0.05).abs() < 1e-12);
        assert!(s.set_time_scale(0.0).is_err());
    }

    #[test]
    fn test_advance_ignores_bad_deltas() {
        let mut s = session(CurveKind::Line);
        s.start().unwrap();
        s.advance(-1.0);
        s.advance(f64::NAN);
        assert_eq!(s.current_time(), 0.0);
        assert!(s.is_running());
    }

    #[test]
    fn test_advance_while_idle_is_noop() {
        let mut s = session(CurveKind::Line);
        assert_eq!(s.advance(1.0), SessionPhase::Idle);
        assert_eq!(s.current_time(), 0.0);
    }

    #[test]
    fn test_stop_keeps_time() {
        let mut s = session(CurveKind::Cycloid);
        s.start().unwrap();
        s.advance(0.1);
        s.stop();
        assert_eq!(s.phase(), SessionPhase::Idle);
        assert!((s.current_time() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_rebuild_resets_to_idle() {
        let mut s = session(CurveKind::Line);
        s.start().unwrap();
        s.advance(0.1);
        s.rebuild().unwrap();
        assert_eq!(s.phase(), SessionPhase::Idle);
        assert_eq!(s.current_time(), 0.0);
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let mut s = session(CurveKind::Cycloid);
        let first = s.track().unwrap().clone();
        s.rebuild().unwrap();
        assert_eq!(s.track().unwrap(), &first);
    }

    #[test]
    fn test_drag_ignored_while_running() {
        let mut s = session(CurveKind::Line);
        s.start().unwrap();
        let moved = s.set_point(Handle::B, Point::new(5.0, -5.0)).unwrap();
        assert!(!moved);
        assert_eq!(s.points().b, Point::new(1.0, 0.0));
        assert!(s.is_running());
    }

    #[test]
    fn test_drag_rebuilds_when_idle() {
        let mut s = session(CurveKind::Line);
        let before = s.traversal().unwrap().total_time;
        assert!(s.set_point(Handle::B, Point::new(2.0, -1.0)).unwrap());
        assert_eq!(s.curve().unwrap().end(), Point::new(2.0, -1.0));
        assert_ne!(s.traversal().unwrap().total_time, before);
    }

    #[test]
    fn test_failed_drag_keeps_inputs_and_track() {
        let mut s = session(CurveKind::Line);
        let before = s.track().unwrap().clone();
        // Segment length overflows, so the time table can't be built
        let result = s.set_point(Handle::B, Point::new(1e200, -1e200));
        assert!(matches!(result, Err(SimError::NonFinite { .. })));
        assert_eq!(s.points().b, Point::new(1.0, 0.0));
        assert_eq!(s.track().unwrap(), &before);
        assert_eq!(s.curve().unwrap().end(), s.points().b);
    }

    #[test]
    fn test_failed_setting_change_keeps_settings() {
        let settings = Settings {
            kind: CurveKind::Line,
            default_points: ControlPoints::new(Point::ZERO, Point::new(1e200, -1e200)),
            ..Default::default()
        };
        let mut s = SimulationSession::new(settings).unwrap();
        assert!(s.rebuild().is_err());
        assert!(s.set_kind(CurveKind::Bezier).is_err());
        assert_eq!(s.settings().kind, CurveKind::Line);
        assert!(s.set_gravity(1.0).is_err());
        assert_eq!(s.settings().gravity, 9.81);
        assert!(s.track().is_none());
    }

    #[test]
    fn test_mode_gates_handles() {
        let mut s = session(CurveKind::Bezier);
        s.set_mode(DemoMode::FixedEndpoints);
        assert!(!s.set_point(Handle::A, Point::new(0.0, 2.0)).unwrap());

        s.set_mode(DemoMode::DraggableEndpoints);
        assert!(s.set_point(Handle::A, Point::new(0.0, 2.0)).unwrap());
        assert!(!s.set_point(Handle::C, Point::new(0.5, 0.0)).unwrap());
        assert_eq!(s.points().c, None);
    }

    #[test]
    fn test_bezier_control_above_start_is_infeasible() {
        let mut s = session(CurveKind::Bezier);
        assert_eq!(s.feasible(), Some(true));
        assert!(s.set_point(Handle::C, Point::new(0.5, 3.0)).unwrap());
        assert_eq!(s.feasible(), Some(false));
        assert_eq!(s.reported_time(), None);
        let frame = s.frame().unwrap();
        assert!(!frame.feasible);
        assert_eq!(frame.total_time, None);
    }

    #[test]
    fn test_pick_handle() {
        let s = session(CurveKind::Bezier);
        assert_eq!(s.pick_handle(Point::new(0.02, 0.98), 0.1), Some(Handle::A));
        assert_eq!(s.pick_handle(Point::new(1.0, 0.05), 0.1), Some(Handle::B));
        assert_eq!(s.pick_handle(Point::new(5.0, 5.0), 0.1), None);

        let c = s.settings().curve_params().bezier_control(s.points());
        assert_eq!(s.pick_handle(c, 0.01), Some(Handle::C));

        let line = session(CurveKind::Line);
        assert_eq!(line.pick_handle(c, 0.01), None);
    }

    #[test]
    fn test_reset_points() {
        let mut s = session(CurveKind::Bezier);
        s.set_point(Handle::C, Point::new(0.1, 0.1)).unwrap();
        s.set_point(Handle::B, Point::new(3.0, -2.0)).unwrap();
        s.reset_points().unwrap();
        assert_eq!(*s.points(), ControlPoints::default());
        assert_eq!(s.curve().unwrap().end(), Point::new(1.0, 0.0));
    }

    #[test]
    fn test_setters_validate() {
        let mut s = session(CurveKind::Line);
        assert!(s.set_samples(1).is_err());
        assert!(s.set_gravity(-9.81).is_err());
        s.set_samples(3).unwrap();
        assert_eq!(s.curve().unwrap().len(), 3);
        let slow = s.traversal().unwrap().total_time;
        s.set_gravity(4.0 * 9.81).unwrap();
        let fast = s.traversal().unwrap().total_time;
        assert!((slow / fast - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_set_kind_switches_curve() {
        let mut s = session(CurveKind::Line);
        s.set_kind(CurveKind::Cycloid).unwrap();
        assert_eq!(s.curve().unwrap().kind, CurveKind::Cycloid);
        assert!(s.curve().unwrap().cycloid.is_some());
    }

    #[test]
    fn test_frame_serializes() {
        let s = session(CurveKind::Line);
        let json = serde_json::to_string(&s.frame().unwrap()).unwrap();
        assert!(json.contains("\"phase\":\"Idle\""));
    }
}
