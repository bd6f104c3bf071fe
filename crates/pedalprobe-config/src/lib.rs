//! Sweep plan configuration for pedalprobe.
//!
//! A [`SweepPlan`] describes how a device is measured: which stimulus
//! frequencies are played, at what amplitude, and how the oscilloscope is
//! set up for each capture. Plans are stored as TOML and validated on load.
//!
//! # Example
//!
//! ```rust,no_run
//! use pedalprobe_config::{Spacing, SweepPlan};
//!
//! // Load a plan from file
//! let plan = SweepPlan::load("fuzz.toml").unwrap();
//!
//! // Or build one programmatically
//! let plan = SweepPlan::new("Tone stack")
//!     .with_description("Bass and treble at noon")
//!     .with_range(20.0, 20_000.0, 200)
//!     .with_spacing(Spacing::Log);
//!
//! for f in plan.frequencies() {
//!     println!("{f:.1} Hz at {:.3e} s/div", plan.time_per_division(f));
//! }
//! plan.save("plans/tone_stack.toml").unwrap();
//! ```

mod error;
mod plan;

/// Sweep plan validation.
pub mod validation;

pub use error::ConfigError;
pub use plan::{Spacing, SweepPlan};
pub use validation::{ValidationError, ValidationResult, validate_plan};
