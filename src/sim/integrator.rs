//! Energy-conservation timing along a sampled curve
//!
//! A point released from rest at `start` has speed `v = sqrt(2·g·(start.y - y))`
//! at height `y`. Each segment's time is its length over a representative
//! speed; the running sum is the time table.

use serde::{Deserialize, Serialize};

use super::curve::SampledCurve;
use super::geometry::{Point, distance};
use crate::consts::*;
use crate::error::{SimError, SimResult, check_gravity};

/// Speed used for a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SpeedPolicy {
    /// Speed at the segment's far sample
    Endpoint,
    /// Mean of the speeds at both samples
    #[default]
    Average,
}

impl SpeedPolicy {
    #[inline]
    pub fn segment_speed(&self, v0: f64, v1: f64) -> f64 {
        match self {
            SpeedPolicy::Endpoint => v1,
            SpeedPolicy::Average => 0.5 * (v0 + v1),
        }
    }
}

/// Speed at height `y` after falling from `start_y`; zero at or above the start
#[inline]
pub fn speed_at(g: f64, start_y: f64, y: f64) -> f64 {
    (2.0 * g * (start_y - y)).max(0.0).sqrt()
}

/// Cumulative time table and derived facts for one curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Traversal {
    /// `table[i]` is the time to reach sample `i`; `table[0] = 0`
    pub table: Vec<f64>,
    /// `table[N-1]`
    pub total_time: f64,
    /// False when any sample rises above the release height
    pub feasible: bool,
}

impl Traversal {
    /// Total time, or `None` when the curve can't be ridden from rest
    pub fn reported_time(&self) -> Option<f64> {
        self.feasible.then_some(self.total_time)
    }
}

/// Build the time table for `curve` released from rest at `start`.
///
/// The table is produced even for infeasible curves; segments whose
/// representative speed is within `SPEED_EPSILON` of zero take no time.
pub fn integrate(
    curve: &SampledCurve,
    g: f64,
    start: Point,
    policy: SpeedPolicy,
) -> SimResult<Traversal> {
    integrate_points(&curve.points, g, start, policy)
}

/// Same as [`integrate`] over a bare point slice
pub fn integrate_points(
    points: &[Point],
    g: f64,
    start: Point,
    policy: SpeedPolicy,
) -> SimResult<Traversal> {
    let g = check_gravity(g)?;

    let mut table = Vec::with_capacity(points.len());
    let mut elapsed = 0.0;
    table.push(elapsed);

    let mut v_prev = points.first().map_or(0.0, |p| speed_at(g, start.y, p.y));
    for pair in points.windows(2) {
        let v = speed_at(g, start.y, pair[1].y);
        let ds = distance(pair[0], pair[1]);
        let speed = policy.segment_speed(v_prev, v);
        if speed > SPEED_EPSILON {
            elapsed += ds / speed;
        }
        table.push(elapsed);
        v_prev = v;
    }

    if !elapsed.is_finite() {
        return Err(SimError::NonFinite {
            location: "time table",
        });
    }

    let feasible = is_feasible(points, start);

    Ok(Traversal {
        table,
        total_time: elapsed,
        feasible,
    })
}

/// No sample may sit above the release height by more than `HEIGHT_TOLERANCE`
pub fn is_feasible(points: &[Point], start: Point) -> bool {
    points.iter().all(|p| p.y - start.y <= HEIGHT_TOLERANCE)
}
