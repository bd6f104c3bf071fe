//! Sweep plan file format and operations.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::validation::{ValidationResult, validate_plan};

/// Distribution of stimulus frequencies between `start_hz` and `stop_hz`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Spacing {
    /// Equal ratio between neighbouring points.
    #[default]
    Log,
    /// Equal difference between neighbouring points.
    Linear,
}

/// How a frequency sweep is driven and captured.
///
/// Plans are stored as TOML files. Missing fields take the values of
/// [`SweepPlan::default`], the standard 100 Hz to 10 kHz sweep.
///
/// # TOML Format
///
/// ```toml
/// name = "Fuzz face"
/// description = "Germanium fuzz, volume at noon"
/// start_hz = 100.0
/// stop_hz = 10000.0
/// points = 100
/// spacing = "log"
/// amplitude_vpp = 0.2
/// periods_per_capture = 10
/// divisions = 18
/// capture_points = 4096
/// settle_ms = 100
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SweepPlan {
    /// Name of the plan.
    pub name: String,

    /// Optional description, copied into the recorded sweep.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// First stimulus frequency in Hz.
    pub start_hz: f64,

    /// Last stimulus frequency in Hz.
    pub stop_hz: f64,

    /// Number of sweep points.
    pub points: usize,

    /// Frequency spacing.
    pub spacing: Spacing,

    /// Stimulus amplitude in volts peak-to-peak. A sine at this setting
    /// swings `amplitude_vpp / 2` either side of zero.
    pub amplitude_vpp: f64,

    /// Stimulus periods visible in each capture.
    pub periods_per_capture: u32,

    /// Horizontal divisions of the oscilloscope screen.
    pub divisions: u32,

    /// Samples per capture.
    pub capture_points: usize,

    /// Pause between instrument commands, in milliseconds.
    pub settle_ms: u64,
}

impl Default for SweepPlan {
    fn default() -> Self {
        Self {
            name: "Standard sweep".to_string(),
            description: None,
            start_hz: 100.0,
            stop_hz: 10_000.0,
            points: 100,
            spacing: Spacing::Log,
            amplitude_vpp: 0.2,
            periods_per_capture: 10,
            divisions: 18,
            capture_points: 4096,
            settle_ms: 100,
        }
    }
}

impl SweepPlan {
    /// Create the standard plan under a new name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Create a plan with a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the frequency range and point count.
    pub fn with_range(mut self, start_hz: f64, stop_hz: f64, points: usize) -> Self {
        self.start_hz = start_hz;
        self.stop_hz = stop_hz;
        self.points = points;
        self
    }

    /// Set the frequency spacing.
    pub fn with_spacing(mut self, spacing: Spacing) -> Self {
        self.spacing = spacing;
        self
    }

    /// Load and validate a plan from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load and validate a plan from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let plan: SweepPlan = toml::from_str(toml_str)?;
        plan.validate()?;
        Ok(plan)
    }

    /// Save the plan to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the plan to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every field; see [`validate_plan`].
    pub fn validate(&self) -> ValidationResult<()> {
        validate_plan(self)
    }

    /// Stimulus frequencies in Hz, ascending from `start_hz` to `stop_hz`.
    ///
    /// A single-point plan yields `[start_hz]`.
    pub fn frequencies(&self) -> Vec<f64> {
        match self.points {
            0 => Vec::new(),
            1 => vec![self.start_hz],
            n => {
                let last = (n - 1) as f64;
                (0..n)
                    .map(|i| {
                        let t = i as f64 / last;
                        match self.spacing {
                            Spacing::Log => self.start_hz * (self.stop_hz / self.start_hz).powf(t),
                            Spacing::Linear => self.start_hz + (self.stop_hz - self.start_hz) * t,
                        }
                    })
                    .collect()
            }
        }
    }

    /// Capture window in seconds for a stimulus at `frequency` Hz.
    pub fn capture_duration(&self, frequency: f64) -> f64 {
        self.periods_per_capture as f64 / frequency
    }

    /// Oscilloscope time-base (seconds per division) at `frequency` Hz.
    pub fn time_per_division(&self, frequency: f64) -> f64 {
        self.capture_duration(frequency) / self.divisions as f64
    }

    /// Sample interval in seconds of a capture at `frequency` Hz.
    pub fn sample_interval(&self, frequency: f64) -> f64 {
        self.capture_duration(frequency) / self.capture_points as f64
    }
}
