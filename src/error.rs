//! Error types for boundary validation
//!
//! Only caller-supplied parameters are rejected. Degenerate geometry never
//! errors: the generators substitute a fallback curve and flag it instead.

use thiserror::Error;

/// Result type alias for brachisto operations.
pub type SimResult<T> = Result<T, SimError>;

#[derive(Debug, Error)]
pub enum SimError {
    /// Fewer than two samples cannot describe a curve.
    #[error("sample count {samples} is below the minimum of 2")]
    InvalidSampleCount { samples: usize },

    /// Gravity must be a positive finite number.
    #[error("gravity must be positive and finite, got {gravity}")]
    InvalidGravity { gravity: f64 },

    /// Animation time scale must be a positive finite number.
    #[error("time scale must be positive and finite, got {scale}")]
    InvalidTimeScale { scale: f64 },

    /// A NaN or infinity escaped into a result.
    #[error("non-finite value produced in {location}")]
    NonFinite { location: &'static str },

    /// Persisted settings could not be parsed.
    #[error("settings JSON error: {0}")]
    Settings(#[from] serde_json::Error),
}

/// Reject sample counts below two.
pub fn check_samples(samples: usize) -> SimResult<usize> {
    if samples < crate::consts::MIN_SAMPLES {
        return Err(SimError::InvalidSampleCount { samples });
    }
    Ok(samples)
}

/// Reject non-positive or non-finite gravity.
pub fn check_gravity(gravity: f64) -> SimResult<f64> {
    if !gravity.is_finite() || gravity <= 0.0 {
        return Err(SimError::InvalidGravity { gravity });
    }
    Ok(gravity)
}
