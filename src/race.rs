//! Curve race: every family between the same two points
//!
//! Entries are ranked fastest first; infeasible curves rank after every
//! feasible one, in family order.

use serde::{Deserialize, Serialize};

use crate::error::SimResult;
use crate::settings::Settings;
use crate::sim::{ControlPoints, CurveKind, generate, integrate};

/// One curve's result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceEntry {
    pub kind: CurveKind,
    /// Family actually drawn (differs when a fallback was used)
    pub drawn_kind: CurveKind,
    /// Traversal time; `None` when infeasible
    pub time: Option<f64>,
    pub feasible: bool,
    pub used_fallback: bool,
    /// Polyline length of the sampled curve
    pub length: f64,
}

/// Ranked race results
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RaceBoard {
    pub entries: Vec<RaceEntry>,
}

impl RaceBoard {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert keeping rank order. Returns the 1-indexed rank.
    pub fn add(&mut self, entry: RaceEntry) -> usize {
        let pos = match entry.time {
            Some(t) => self
                .entries
                .iter()
                .position(|e| e.time.is_none_or(|other| t < other)),
            None => None,
        };
        match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        }
    }

    /// Fastest feasible curve
    pub fn winner(&self) -> Option<&RaceEntry> {
        self.entries.first().filter(|e| e.time.is_some())
    }

    /// 1-indexed rank of a family
    pub fn rank_of(&self, kind: CurveKind) -> Option<usize> {
        self.entries.iter().position(|e| e.kind == kind).map(|i| i + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Generate and time every curve family between `points`
pub fn race(points: &ControlPoints, settings: &Settings) -> SimResult<RaceBoard> {
    settings.validate()?;
    let params = settings.curve_params();

    let mut board = RaceBoard::new();
    for kind in CurveKind::ALL {
        let curve = generate(kind, points, settings.samples, &params)?;
        let traversal = integrate(&curve, settings.gravity, points.a, settings.speed_policy)?;
        let rank = board.add(RaceEntry {
            kind,
            drawn_kind: curve.drawn_kind,
            time: traversal.reported_time(),
            feasible: traversal.feasible,
            used_fallback: curve.used_fallback,
            length: curve.arc_length(),
        });
        log::debug!("Race: {} placed {}", kind.as_str(), rank);
    }

    Ok(board)
}
