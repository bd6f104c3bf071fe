//! A single time-domain capture and its windowed spectrum.
//!
//! A [`Waveform`] is validated once at construction and never changes. Its
//! spectrum is computed on the first call to [`Waveform::spectrum`] or
//! [`Waveform::positive_spectrum`] and cached for the lifetime of the
//! capture; later calls return the cached arrays.

use crate::error::{AnalysisError, Result};
use crate::fft::{Fft, Window, bin_frequencies};
use crate::spectrum::nearest_bin;
use rustfft::num_complex::Complex64;
use std::sync::OnceLock;

/// Windowed DFT of a capture.
///
/// `frequencies` covers the first `N / 2` bins (DC included) while `bins`
/// holds all `N` complex values, negative frequencies in the upper half.
/// Only the first `frequencies.len()` entries of `bins` have a frequency
/// label; use [`Spectrum::positive`] for equal-length, labelled arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    /// Bin frequencies in Hz, ascending, length `N / 2`.
    pub frequencies: Vec<f64>,
    /// Complex amplitudes scaled by `2 / N`, length `N`.
    pub bins: Vec<Complex64>,
}

impl Spectrum {
    /// Bins strictly between DC and the folding bin: indices `[1, N / 2)`.
    pub fn positive(&self) -> PositiveSpectrum<'_> {
        let half = self.frequencies.len();
        let start = half.min(1);
        PositiveSpectrum {
            frequencies: &self.frequencies[start..half],
            bins: &self.bins[start..half],
        }
    }
}

/// Borrowed view of the strictly-positive half of a [`Spectrum`].
///
/// Both slices have length `N / 2 - 1` and share indices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositiveSpectrum<'a> {
    frequencies: &'a [f64],
    bins: &'a [Complex64],
}

impl<'a> PositiveSpectrum<'a> {
    /// Bin frequencies in Hz, strictly increasing.
    pub fn frequencies(&self) -> &'a [f64] {
        self.frequencies
    }

    /// Complex amplitudes, index-aligned with [`frequencies`](Self::frequencies).
    pub fn bins(&self) -> &'a [Complex64] {
        self.bins
    }

    /// Number of positive-frequency bins.
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    /// True when the capture was too short to have any positive bin.
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Highest labelled frequency in Hz.
    pub fn max_frequency(&self) -> Option<f64> {
        self.frequencies.last().copied()
    }

    /// Spacing of the axis in Hz, which is also the first bin frequency.
    pub fn bin_width(&self) -> Option<f64> {
        self.frequencies.first().copied()
    }

    /// Index of the bin nearest `frequency`.
    pub fn nearest_bin(&self, frequency: f64) -> Option<usize> {
        nearest_bin(self.frequencies, frequency)
    }

    /// Magnitudes of every bin.
    pub fn magnitudes(&self) -> Vec<f64> {
        self.bins.iter().map(|c| c.norm()).collect()
    }
}

/// One captured signal: uniformly spaced timestamps (s) and amplitudes (V).
#[derive(Debug, Clone)]
pub struct Waveform {
    time: Vec<f64>,
    data: Vec<f64>,
    sample_interval: f64,
    spectrum: OnceLock<Spectrum>,
}

impl Waveform {
    /// Build a capture from timestamps and amplitudes.
    ///
    /// Both sequences must have the same length (at least 2), be finite,
    /// and the timestamps must be strictly increasing. The sample interval
    /// is `time[1] - time[0]`; later intervals are assumed equal to it.
    pub fn new(time: Vec<f64>, data: Vec<f64>) -> Result<Self> {
        if time.len() != data.len() {
            return Err(AnalysisError::LengthMismatch {
                time: time.len(),
                data: data.len(),
            });
        }
        if time.len() < 2 {
            return Err(AnalysisError::TooFewSamples(time.len()));
        }
        if let Some(index) = time
            .iter()
            .zip(data.iter())
            .position(|(t, v)| !t.is_finite() || !v.is_finite())
        {
            return Err(AnalysisError::NonFiniteSample { index });
        }
        if let Some(index) = time.windows(2).position(|w| w[1] <= w[0]) {
            return Err(AnalysisError::NonPositiveInterval {
                index: index + 1,
                dt: time[index + 1] - time[index],
            });
        }

        let sample_interval = time[1] - time[0];
        Ok(Self {
            time,
            data,
            sample_interval,
            spectrum: OnceLock::new(),
        })
    }

    /// Build a capture from amplitudes sampled every `sample_interval`
    /// seconds, the first one at `start_time`.
    pub fn from_uniform(data: Vec<f64>, sample_interval: f64, start_time: f64) -> Result<Self> {
        if !(sample_interval.is_finite() && sample_interval > 0.0) {
            return Err(AnalysisError::NonPositiveInterval {
                index: 1,
                dt: sample_interval,
            });
        }
        let time = (0..data.len())
            .map(|i| start_time + i as f64 * sample_interval)
            .collect();
        Self::new(time, data)
    }

    /// Timestamps in seconds.
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    /// Amplitudes in volts.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Number of samples `N`.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false; a capture holds at least two samples.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Sample interval `dt` in seconds.
    pub fn sample_interval(&self) -> f64 {
        self.sample_interval
    }

    /// Sample rate `1 / dt` in Hz.
    pub fn sample_rate(&self) -> f64 {
        1.0 / self.sample_interval
    }

    /// Spectral resolution `1 / (N * dt)` in Hz.
    pub fn bin_width(&self) -> f64 {
        1.0 / (self.len() as f64 * self.sample_interval)
    }

    /// Hann-windowed spectrum scaled by `2 / N`.
    ///
    /// The amplitude of a bin-centred tone comes out multiplied by the Hann
    /// coherent gain (about 0.5); no correction is applied.
    pub fn spectrum(&self) -> &Spectrum {
        self.spectrum.get_or_init(|| self.compute_spectrum())
    }

    /// Strictly-positive half of [`spectrum`](Self::spectrum).
    pub fn positive_spectrum(&self) -> PositiveSpectrum<'_> {
        self.spectrum().positive()
    }

    fn compute_spectrum(&self) -> Spectrum {
        let n = self.len();
        let mut windowed = self.data.clone();
        Window::Hann.apply(&mut windowed);

        let scale = 2.0 / n as f64;
        let bins = Fft::new(n)
            .forward(&windowed)
            .into_iter()
            .map(|c| c * scale)
            .collect();

        tracing::trace!(samples = n, dt = self.sample_interval, "computed capture spectrum");

        Spectrum {
            frequencies: bin_frequencies(n, self.sample_interval),
            bins,
        }
    }
}
