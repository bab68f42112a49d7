//! Brachisto - fastest descent curve race
//!
//! Core modules:
//! - `sim`: Deterministic numeric core (curve sampling, timing, animation session)
//! - `race`: Side-by-side comparison of every curve family
//! - `settings`: Tunable parameters, persisted as JSON
//! - `error`: Error types for boundary validation
//! - `platform`: Browser binding driven by the host's frame callback

pub mod error;
pub mod platform;
pub mod race;
pub mod settings;
pub mod sim;

pub use error::{SimError, SimResult};
pub use race::{RaceBoard, RaceEntry, race};
pub use settings::{Settings, SolverSettings};

/// Simulation constants
pub mod consts {
    /// Standard gravity (world units/s²)
    pub const DEFAULT_GRAVITY: f64 = 9.81;
    /// Default number of samples per curve
    pub const DEFAULT_SAMPLES: usize = 400;
    /// Smallest usable sample count (start + end)
    pub const MIN_SAMPLES: usize = 2;

    /// Speeds below this produce a zero time increment
    pub const SPEED_EPSILON: f64 = 1e-10;
    /// Height above the release point tolerated before a curve is infeasible
    pub const HEIGHT_TOLERANCE: f64 = 1e-12;
    /// Time deltas at or below this are treated as a stationary segment
    pub const TIME_EPSILON: f64 = 1e-12;

    /// Cycloid solver bracket and budget
    pub const CYCLOID_THETA_LO: f64 = 0.01;
    pub const CYCLOID_THETA_HI: f64 = 10.0;
    pub const CYCLOID_MAX_ITERATIONS: u32 = 100;
    pub const CYCLOID_TOLERANCE: f64 = 1e-12;

    /// Circular-arc bulge, as a fraction of chord length
    pub const DEFAULT_ARC_BULGE: f64 = 0.25;
    /// Default Bézier control offset from the chord midpoint, in chord lengths
    pub const DEFAULT_BEZIER_OFFSET: (f64, f64) = (-0.15, -0.35);
}
