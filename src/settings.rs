//! Simulation settings
//!
//! Defaults cover the classic A=(0,1), B=(1,0) setup; callers may hand in
//! JSON to override any field.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{SimError, SimResult, check_gravity, check_samples};
use crate::sim::{ControlPoints, CurveKind, CurveParams, DemoMode, SpeedPolicy};

/// Bisection bracket and budget for the cycloid fit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverSettings {
    pub lo: f64,
    pub hi: f64,
    pub max_iterations: u32,
    pub tolerance: f64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            lo: CYCLOID_THETA_LO,
            hi: CYCLOID_THETA_HI,
            max_iterations: CYCLOID_MAX_ITERATIONS,
            tolerance: CYCLOID_TOLERANCE,
        }
    }
}

/// Session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Curve family selected at startup
    pub kind: CurveKind,
    /// Which handles may be dragged
    pub mode: DemoMode,

    // === Physics ===
    /// Gravitational acceleration (world units/s²)
    pub gravity: f64,
    /// Samples per curve
    pub samples: usize,
    /// Speed used to turn a segment length into a time
    pub speed_policy: SpeedPolicy,

    // === Shapes ===
    /// Arc sag below the chord, in chord lengths
    pub arc_bulge: f64,
    /// Default Bézier control offset from the chord midpoint, in chord lengths
    pub bezier_offset: DVec2,
    pub solver: SolverSettings,

    // === Animation ===
    /// Animation seconds per real second
    pub time_scale: f64,
    /// Points restored by "reset"
    pub default_points: ControlPoints,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            kind: CurveKind::Cycloid,
            mode: DemoMode::DraggableControl,

            gravity: DEFAULT_GRAVITY,
            samples: DEFAULT_SAMPLES,
            speed_policy: SpeedPolicy::Average,

            arc_bulge: DEFAULT_ARC_BULGE,
            bezier_offset: DVec2::new(DEFAULT_BEZIER_OFFSET.0, DEFAULT_BEZIER_OFFSET.1),
            solver: SolverSettings::default(),

            time_scale: 1.0,
            default_points: ControlPoints::default(),
        }
    }
}

impl Settings {
    /// Check the parameters the core refuses to work with
    pub fn validate(&self) -> SimResult<()> {
        check_samples(self.samples)?;
        check_gravity(self.gravity)?;
        check_time_scale(self.time_scale)?;
        Ok(())
    }

    /// Shape parameters handed to the generators
    pub fn curve_params(&self) -> CurveParams {
        CurveParams {
            arc_bulge: self.arc_bulge,
            bezier_offset: self.bezier_offset,
            solver: self.solver,
        }
    }

    /// Parse and validate settings JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> SimResult<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Reject non-positive or non-finite animation speed
pub fn check_time_scale(scale: f64) -> SimResult<f64> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(SimError::InvalidTimeScale { scale });
    }
    Ok(scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.gravity, 9.81);
        assert_eq!(settings.speed_policy, SpeedPolicy::Average);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let settings = Settings {
            samples: 1,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SimError::InvalidSampleCount { .. })
        ));

        let settings = Settings {
            gravity: 0.0,
            ..Default::default()
        };
        assert!(matches!(settings.validate(), Err(SimError::InvalidGravity { .. })));

        let settings = Settings {
            time_scale: -2.0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SimError::InvalidTimeScale { .. })
        ));
    }

    #[test]
    fn test_json_partial_uses_defaults() {
        let settings = Settings::from_json(r#"{ "gravity": 1.62, "kind": "Line" }"#).unwrap();
        assert_eq!(settings.gravity, 1.62);
        assert_eq!(settings.kind, CurveKind::Line);
        assert_eq!(settings.samples, DEFAULT_SAMPLES);
    }

    #[test]
    fn test_json_rejects_invalid() {
        assert!(matches!(
            Settings::from_json("{ not json"),
            Err(SimError::Settings(_))
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "samples": 0 }"#),
            Err(SimError::InvalidSampleCount { samples: 0 })
        ));
    }

    #[test]
    fn test_json_keeps_custom_points() {
        let mut settings = Settings::default();
        settings.default_points = ControlPoints::new(DVec2::new(-1.0, 2.0), DVec2::new(3.0, 0.0))
            .with_control(DVec2::new(0.0, 0.0));
        let json = settings.to_json().unwrap();
        let parsed = Settings::from_json(&json).unwrap();
        assert_eq!(parsed.default_points, settings.default_points);
    }
}
