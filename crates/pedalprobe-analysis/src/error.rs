//! Error types for waveform and sweep analysis.

use std::fmt;
use thiserror::Error;

/// Which side of the device under test a capture belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Signal applied to the device input.
    Input,
    /// Signal measured at the device output.
    Output,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Input => f.write_str("input"),
            Channel::Output => f.write_str("output"),
        }
    }
}

/// Errors raised while building or analyzing captures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// Timestamp and sample arrays differ in length.
    #[error("time and data lengths differ: {time} timestamps vs {data} samples")]
    LengthMismatch {
        /// Number of timestamps.
        time: usize,
        /// Number of amplitude samples.
        data: usize,
    },

    /// A capture needs at least two samples to define a sample interval.
    #[error("a capture needs at least 2 samples, got {0}")]
    TooFewSamples(usize),

    /// Timestamps are not strictly increasing.
    #[error("sample interval must be positive, got {dt} before sample {index}")]
    NonPositiveInterval {
        /// Index of the sample that does not advance in time.
        index: usize,
        /// Offending interval in seconds.
        dt: f64,
    },

    /// A timestamp or amplitude is NaN or infinite.
    #[error("non-finite value at sample {index}")]
    NonFiniteSample {
        /// Index of the offending sample.
        index: usize,
    },

    /// The input, output and frequency lists of a sweep differ in length.
    #[error(
        "sweep lists differ in length: {inputs} inputs, {outputs} outputs, {frequencies} frequencies"
    )]
    SweepLengthMismatch {
        /// Number of input captures.
        inputs: usize,
        /// Number of output captures.
        outputs: usize,
        /// Number of stimulus frequencies.
        frequencies: usize,
    },

    /// A stimulus frequency is zero, negative, or not finite.
    #[error("stimulus frequency at sweep point {index} must be positive, got {frequency} Hz")]
    InvalidFrequency {
        /// Sweep point index.
        index: usize,
        /// Offending frequency in Hz.
        frequency: f64,
    },

    /// The stimulus amplitude is not finite.
    #[error("stimulus amplitude must be finite, got {0}")]
    InvalidAmplitude(f64),

    /// The fundamental used as a denominator is zero or vanishingly small.
    #[error(
        "degenerate measurement at sweep point {index}: {channel} fundamental at {frequency} Hz is {amplitude:e} V"
    )]
    DegenerateMeasurement {
        /// Sweep point index.
        index: usize,
        /// Channel whose fundamental vanished.
        channel: Channel,
        /// Stimulus frequency in Hz.
        frequency: f64,
        /// Measured fundamental amplitude.
        amplitude: f64,
    },

    /// Spectra that must line up bin for bin have different lengths.
    #[error("shape mismatch at sweep point {index}: expected {expected} bins, got {actual}")]
    ShapeMismatch {
        /// Sweep point index.
        index: usize,
        /// Expected number of positive-frequency bins.
        expected: usize,
        /// Actual number of positive-frequency bins.
        actual: usize,
    },

    /// A sweep point index past the end of the sweep.
    #[error("sweep point {index} out of range for a sweep of {len} points")]
    IndexOutOfRange {
        /// Requested sweep point.
        index: usize,
        /// Number of sweep points.
        len: usize,
    },

    /// The stimulus is below the spacing of the spectrum it is read from,
    /// so its harmonics cannot land on distinct bins.
    #[error(
        "stimulus at sweep point {index} ({frequency} Hz) is below the bin width of {bin_width} Hz"
    )]
    FundamentalBelowResolution {
        /// Sweep point index.
        index: usize,
        /// Stimulus frequency in Hz.
        frequency: f64,
        /// Spacing of the positive-frequency axis in Hz.
        bin_width: f64,
    },

    /// A capture is too short to contain any positive-frequency bin.
    #[error("capture at sweep point {index} has no positive-frequency bins")]
    EmptySpectrum {
        /// Sweep point index.
        index: usize,
    },
}

/// Convenience result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_display_names_channel_and_point() {
        let err = AnalysisError::DegenerateMeasurement {
            index: 3,
            channel: Channel::Input,
            frequency: 440.0,
            amplitude: 0.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("sweep point 3"), "got: {msg}");
        assert!(msg.contains("input fundamental"), "got: {msg}");
        assert!(msg.contains("440"), "got: {msg}");
    }

    #[test]
    fn sweep_length_display() {
        let err = AnalysisError::SweepLengthMismatch {
            inputs: 2,
            outputs: 3,
            frequencies: 2,
        };
        assert_eq!(
            err.to_string(),
            "sweep lists differ in length: 2 inputs, 3 outputs, 2 frequencies"
        );
    }

    #[test]
    fn index_out_of_range_display() {
        let err = AnalysisError::IndexOutOfRange { index: 5, len: 5 };
        assert_eq!(
            err.to_string(),
            "sweep point 5 out of range for a sweep of 5 points"
        );
    }

    #[test]
    fn shape_mismatch_display() {
        let err = AnalysisError::ShapeMismatch {
            index: 1,
            expected: 127,
            actual: 63,
        };
        assert_eq!(
            err.to_string(),
            "shape mismatch at sweep point 1: expected 127 bins, got 63"
        );
    }
}
