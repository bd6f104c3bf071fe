//! Simulated devices under test.
//!
//! A device is an optional first-order low-pass followed by a memoryless
//! transfer curve. The low-pass is applied to the stimulus analytically
//! (steady-state gain and phase), so short captures carry no start-up
//! transient.

use clap::ValueEnum;
use std::f64::consts::TAU;

/// Transfer curve of the simulated stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Curve {
    /// `gain * x`
    Linear,
    /// `gain * x` limited to `[-clip, clip]`
    HardClip,
    /// `clip * tanh(gain * x / clip)`
    SoftClip,
}

/// A simulated pedal.
#[derive(Debug, Clone, Copy)]
pub struct Device {
    /// Transfer curve.
    pub curve: Curve,
    /// Small-signal gain (V/V).
    pub gain: f64,
    /// Clipping level in volts.
    pub clip: f64,
    /// Low-pass corner in Hz, if any.
    pub cutoff: Option<f64>,
}

impl Device {
    /// Apply the transfer curve to one sample.
    pub fn shape(&self, x: f64) -> f64 {
        let y = self.gain * x;
        match self.curve {
            Curve::Linear => y,
            Curve::HardClip => y.clamp(-self.clip, self.clip),
            Curve::SoftClip => self.clip * (y / self.clip).tanh(),
        }
    }

    /// Steady-state gain and phase (radians) of the low-pass at `frequency`.
    pub fn filter_response(&self, frequency: f64) -> (f64, f64) {
        match self.cutoff {
            Some(fc) => {
                let ratio = frequency / fc;
                (1.0 / (1.0 + ratio * ratio).sqrt(), -ratio.atan())
            }
            None => (1.0, 0.0),
        }
    }

    /// Sample the stimulus and the device output at the given instants.
    pub fn drive(&self, frequency: f64, peak: f64, time: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let (filter_gain, filter_phase) = self.filter_response(frequency);
        time.iter()
            .map(|&t| {
                let phase = TAU * frequency * t;
                let input = peak * phase.sin();
                let filtered = peak * filter_gain * (phase + filter_phase).sin();
                (input, self.shape(filtered))
            })
            .unzip()
    }
}
