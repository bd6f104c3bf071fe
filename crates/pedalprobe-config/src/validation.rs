//! Sweep plan validation.
//!
//! [`validate_plan`] checks every field of a [`SweepPlan`] and reports all
//! problems at once, so a hand-edited plan can be fixed in one pass.
//!
//! # Example
//!
//! ```rust
//! use pedalprobe_config::{SweepPlan, ValidationError, validate_plan};
//!
//! let mut plan = SweepPlan::default();
//! plan.points = 0;
//! assert_eq!(validate_plan(&plan), Err(ValidationError::NoPoints));
//! ```

use crate::plan::SweepPlan;
use thiserror::Error;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Sweep has no points.
    #[error("sweep must contain at least one point")]
    NoPoints,

    /// A frequency bound is not a positive finite number.
    #[error("{field} must be a positive finite frequency, got {value}")]
    InvalidFrequency {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// Start frequency is not below the stop frequency.
    #[error("start_hz ({start}) must be below stop_hz ({stop}) for a multi-point sweep")]
    EmptyRange {
        /// Start of the sweep in Hz.
        start: f64,
        /// End of the sweep in Hz.
        stop: f64,
    },

    /// Stimulus amplitude is not a positive finite voltage.
    #[error("amplitude_vpp must be positive and finite, got {0}")]
    InvalidAmplitude(f64),

    /// A count field is zero.
    #[error("{0} must be greater than zero")]
    ZeroCount(&'static str),

    /// Too few samples per capture to form a positive spectrum.
    #[error("capture_points must be at least 4, got {0}")]
    TooFewCapturePoints(usize),

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate a sweep plan, collecting every problem found.
pub fn validate_plan(plan: &SweepPlan) -> ValidationResult<()> {
    let mut errors = Vec::new();

    if plan.points == 0 {
        errors.push(ValidationError::NoPoints);
    }

    let start_ok = check_frequency("start_hz", plan.start_hz, &mut errors);
    let stop_ok = check_frequency("stop_hz", plan.stop_hz, &mut errors);
    if start_ok && stop_ok && plan.points > 1 && plan.start_hz >= plan.stop_hz {
        errors.push(ValidationError::EmptyRange {
            start: plan.start_hz,
            stop: plan.stop_hz,
        });
    }

    if !(plan.amplitude_vpp.is_finite() && plan.amplitude_vpp > 0.0) {
        errors.push(ValidationError::InvalidAmplitude(plan.amplitude_vpp));
    }
    if plan.periods_per_capture == 0 {
        errors.push(ValidationError::ZeroCount("periods_per_capture"));
    }
    if plan.divisions == 0 {
        errors.push(ValidationError::ZeroCount("divisions"));
    }
    if plan.capture_points < 4 {
        errors.push(ValidationError::TooFewCapturePoints(plan.capture_points));
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}

fn check_frequency(field: &'static str, value: f64, errors: &mut Vec<ValidationError>) -> bool {
    let ok = value.is_finite() && value > 0.0;
    if !ok {
        errors.push(ValidationError::InvalidFrequency { field, value });
    }
    ok
}
