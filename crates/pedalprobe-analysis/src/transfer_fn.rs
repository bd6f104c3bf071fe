//! Linear response at the stimulus frequency

use crate::error::{Channel, Result};
use crate::spectrum::amplitude_to_db;
use crate::sweep::SweepAnalyzer;

/// Transfer function value at the fundamental of one sweep point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearPoint {
    /// Stimulus frequency (Hz)
    pub frequency: f64,
    /// |out / in| in dBV
    pub magnitude_db: f64,
    /// arg(out / in) in degrees, in (-180, 180]
    pub phase_deg: f64,
}

/// Linear response of the device across a sweep
#[derive(Debug, Clone, PartialEq)]
pub struct LinearResponse {
    /// Stimulus frequencies (Hz), in sweep order
    pub frequencies: Vec<f64>,
    /// Magnitude response (dBV)
    pub magnitude_db: Vec<f64>,
    /// Phase response (degrees)
    pub phase_deg: Vec<f64>,
}

impl LinearResponse {
    /// Number of sweep points.
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    /// True for an empty response.
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Find the -3dB point below `reference_db`.
    ///
    /// Walks the sweep in order and linearly interpolates the first
    /// downward crossing, so the sweep should be in ascending frequency.
    pub fn cutoff_frequency(&self, reference_db: f64) -> Option<f64> {
        let target = reference_db - 3.0;

        for i in 1..self.magnitude_db.len() {
            if self.magnitude_db[i] < target && self.magnitude_db[i - 1] >= target {
                let t = (target - self.magnitude_db[i - 1])
                    / (self.magnitude_db[i] - self.magnitude_db[i - 1]);
                return Some(
                    self.frequencies[i - 1] + t * (self.frequencies[i] - self.frequencies[i - 1]),
                );
            }
        }
        None
    }

    /// Phase with 360 degree jumps between consecutive points removed.
    pub fn unwrapped_phase_deg(&self) -> Vec<f64> {
        unwrap_phase_deg(&self.phase_deg)
    }
}

impl FromIterator<LinearPoint> for LinearResponse {
    fn from_iter<I: IntoIterator<Item = LinearPoint>>(iter: I) -> Self {
        let mut response = LinearResponse {
            frequencies: Vec::new(),
            magnitude_db: Vec::new(),
            phase_deg: Vec::new(),
        };
        for point in iter {
            response.frequencies.push(point.frequency);
            response.magnitude_db.push(point.magnitude_db);
            response.phase_deg.push(point.phase_deg);
        }
        response
    }
}

impl SweepAnalyzer {
    /// Complex ratio `out / in` at the fundamental bin of sweep point `index`.
    ///
    /// The fundamental is the input-axis bin nearest the stimulus
    /// frequency. A vanishing fundamental on either channel is reported as
    /// [`AnalysisError::DegenerateMeasurement`](crate::AnalysisError::DegenerateMeasurement),
    /// so results never carry an infinite or NaN magnitude.
    pub fn linear_response_at(&self, index: usize) -> Result<LinearPoint> {
        let point = self.point(index)?;
        let input = point.fundamental_amplitude(Channel::Input)?;
        let output = point.fundamental_amplitude(Channel::Output)?;
        let ratio = output / input;

        let linear = LinearPoint {
            frequency: point.frequency,
            magnitude_db: amplitude_to_db(ratio.norm()),
            phase_deg: ratio.arg().to_degrees(),
        };
        tracing::debug!(
            index,
            frequency = linear.frequency,
            magnitude_db = linear.magnitude_db,
            phase_deg = linear.phase_deg,
            "linear response point"
        );
        Ok(linear)
    }

    /// Linear response of every sweep point, index-aligned with the sweep.
    ///
    /// Fails on the first degenerate point; use
    /// [`linear_response_at`](Self::linear_response_at) to skip bad points.
    pub fn linear_response(&self) -> Result<LinearResponse> {
        (0..self.len()).map(|i| self.linear_response_at(i)).collect()
    }
}

/// Unwrap a phase sequence in degrees
///
/// Values are adjusted to be continuous by adding/subtracting multiples of
/// 360 when consecutive points jump by more than 180.
pub fn unwrap_phase_deg(phase: &[f64]) -> Vec<f64> {
    if phase.is_empty() {
        return Vec::new();
    }

    let mut unwrapped = Vec::with_capacity(phase.len());
    unwrapped.push(phase[0]);

    let mut correction = 0.0;
    for i in 1..phase.len() {
        let diff = phase[i] - phase[i - 1];
        if diff > 180.0 {
            correction -= 360.0;
        } else if diff < -180.0 {
            correction += 360.0;
        }
        unwrapped.push(phase[i] + correction);
    }

    unwrapped
}
