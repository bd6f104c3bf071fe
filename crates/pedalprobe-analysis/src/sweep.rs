//! Frequency-sweep dataset and the spectral view shared by its metrics.
//!
//! A [`SweepAnalyzer`] owns one input and one output [`Waveform`] per
//! stimulus frequency. Metrics live next to their result types:
//! linear response in [`transfer_fn`](crate::transfer_fn), distortion and
//! harmonic maps in [`distortion`](crate::distortion). The raw
//! frequency-frequency map is computed here.

use crate::error::{AnalysisError, Channel, Result};
use crate::waveform::{PositiveSpectrum, Waveform};
use rustfft::num_complex::Complex64;

/// Fundamentals at or below this amplitude (V) are treated as absent.
pub const DEGENERATE_AMPLITUDE: f64 = 1e-12;

/// Input/output captures of a device driven at a list of frequencies.
#[derive(Debug, Clone)]
pub struct SweepAnalyzer {
    inputs: Vec<Waveform>,
    outputs: Vec<Waveform>,
    frequencies: Vec<f64>,
    amplitude: f64,
    description: Option<String>,
}

impl SweepAnalyzer {
    /// Build a sweep from index-aligned captures and stimulus frequencies.
    ///
    /// `inputs[i]` and `outputs[i]` were captured while driving the device
    /// at `frequencies[i]` Hz with a stimulus of `amplitude` volts.
    pub fn new(
        inputs: Vec<Waveform>,
        outputs: Vec<Waveform>,
        frequencies: Vec<f64>,
        amplitude: f64,
    ) -> Result<Self> {
        if inputs.len() != outputs.len() || inputs.len() != frequencies.len() {
            return Err(AnalysisError::SweepLengthMismatch {
                inputs: inputs.len(),
                outputs: outputs.len(),
                frequencies: frequencies.len(),
            });
        }
        if let Some((index, &frequency)) = frequencies
            .iter()
            .enumerate()
            .find(|(_, f)| !(f.is_finite() && **f > 0.0))
        {
            return Err(AnalysisError::InvalidFrequency { index, frequency });
        }
        if !amplitude.is_finite() {
            return Err(AnalysisError::InvalidAmplitude(amplitude));
        }

        Ok(Self {
            inputs,
            outputs,
            frequencies,
            amplitude,
            description: None,
        })
    }

    /// Attach a free-text description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Input captures, one per sweep point.
    pub fn inputs(&self) -> &[Waveform] {
        &self.inputs
    }

    /// Output captures, one per sweep point.
    pub fn outputs(&self) -> &[Waveform] {
        &self.outputs
    }

    /// Stimulus frequencies in Hz.
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// Stimulus amplitude in volts.
    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    /// Optional description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Number of sweep points.
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    /// True for a sweep with no points.
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Stimulus frequency of sweep point `index`, or
    /// [`AnalysisError::IndexOutOfRange`].
    fn frequency_at(&self, index: usize) -> Result<f64> {
        self.frequencies
            .get(index)
            .copied()
            .ok_or(AnalysisError::IndexOutOfRange {
                index,
                len: self.len(),
            })
    }

    /// Positive spectra of sweep point `index` with its fundamental located.
    pub(crate) fn point(&self, index: usize) -> Result<SweepPoint<'_>> {
        let frequency = self.frequency_at(index)?;
        let input = self.inputs[index].positive_spectrum();
        let output = self.outputs[index].positive_spectrum();
        if input.len() != output.len() {
            return Err(AnalysisError::ShapeMismatch {
                index,
                expected: input.len(),
                actual: output.len(),
            });
        }

        let fundamental = input
            .nearest_bin(frequency)
            .ok_or(AnalysisError::EmptySpectrum { index })?;

        Ok(SweepPoint {
            index,
            frequency,
            input,
            output,
            fundamental,
        })
    }

    /// Output spectrum of sweep point `index` with its fundamental located
    /// on the output's own axis. The input capture is not consulted.
    pub(crate) fn output_point(&self, index: usize) -> Result<OutputPoint<'_>> {
        let frequency = self.frequency_at(index)?;
        let spectrum = self.outputs[index].positive_spectrum();
        let fundamental = spectrum
            .nearest_bin(frequency)
            .ok_or(AnalysisError::EmptySpectrum { index })?;

        Ok(OutputPoint {
            index,
            frequency,
            spectrum,
            fundamental,
        })
    }

    /// Output spectrum of every sweep point against its stimulus frequency.
    ///
    /// Every output capture must yield the same number of positive bins
    /// (same `N`); otherwise this fails with
    /// [`AnalysisError::ShapeMismatch`] naming the first offending point.
    pub fn freq_freq_map(&self) -> Result<FreqFreqMap> {
        let mut map = FreqFreqMap {
            input_frequencies: Vec::with_capacity(self.len()),
            output_frequencies: Vec::with_capacity(self.len()),
            spectra: Vec::with_capacity(self.len()),
        };

        let mut expected = None;
        for (index, (output, &frequency)) in
            self.outputs.iter().zip(self.frequencies.iter()).enumerate()
        {
            let spectrum = output.positive_spectrum();
            let width = *expected.get_or_insert(spectrum.len());
            if spectrum.len() != width {
                return Err(AnalysisError::ShapeMismatch {
                    index,
                    expected: width,
                    actual: spectrum.len(),
                });
            }

            map.input_frequencies.push(vec![frequency; width]);
            map.output_frequencies.push(spectrum.frequencies().to_vec());
            map.spectra.push(spectrum.bins().to_vec());
        }

        tracing::debug!(
            rows = map.spectra.len(),
            columns = expected.unwrap_or(0),
            "built frequency-frequency map"
        );
        Ok(map)
    }
}

/// Spectra of one sweep point, aligned bin for bin.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SweepPoint<'a> {
    pub index: usize,
    pub frequency: f64,
    pub input: PositiveSpectrum<'a>,
    pub output: PositiveSpectrum<'a>,
    /// Bin nearest the stimulus frequency on the input axis.
    pub fundamental: usize,
}

impl SweepPoint<'_> {
    /// Fundamental of `channel`, rejected if it is too small to divide by.
    pub fn fundamental_amplitude(&self, channel: Channel) -> Result<Complex64> {
        let value = match channel {
            Channel::Input => self.input.bins()[self.fundamental],
            Channel::Output => self.output.bins()[self.fundamental],
        };
        check_fundamental(self.index, channel, self.frequency, value)
    }

    /// Fails when the stimulus sits below the spacing of the shared axis.
    pub fn ensure_resolved(&self) -> Result<()> {
        ensure_resolved(self.index, self.frequency, &self.input)
    }
}

/// Output spectrum of one sweep point on its own frequency axis.
#[derive(Debug, Clone, Copy)]
pub(crate) struct OutputPoint<'a> {
    pub index: usize,
    pub frequency: f64,
    pub spectrum: PositiveSpectrum<'a>,
    /// Bin nearest the stimulus frequency on the output axis.
    pub fundamental: usize,
}

impl OutputPoint<'_> {
    /// Output fundamental, rejected if it is too small to divide by.
    pub fn fundamental_amplitude(&self) -> Result<Complex64> {
        check_fundamental(
            self.index,
            Channel::Output,
            self.frequency,
            self.spectrum.bins()[self.fundamental],
        )
    }

    /// Fails when the stimulus sits below the spacing of the output axis.
    pub fn ensure_resolved(&self) -> Result<()> {
        ensure_resolved(self.index, self.frequency, &self.spectrum)
    }
}

fn check_fundamental(
    index: usize,
    channel: Channel,
    frequency: f64,
    value: Complex64,
) -> Result<Complex64> {
    let amplitude = value.norm();
    if amplitude <= DEGENERATE_AMPLITUDE || !amplitude.is_finite() {
        return Err(AnalysisError::DegenerateMeasurement {
            index,
            channel,
            frequency,
            amplitude,
        });
    }
    Ok(value)
}

/// Harmonics of a stimulus below one bin width all collapse onto the first
/// few bins, and their count grows without bound as the stimulus shrinks.
fn ensure_resolved(index: usize, frequency: f64, spectrum: &PositiveSpectrum<'_>) -> Result<()> {
    match spectrum.bin_width() {
        Some(bin_width) if frequency < bin_width => {
            Err(AnalysisError::FundamentalBelowResolution {
                index,
                frequency,
                bin_width,
            })
        }
        _ => Ok(()),
    }
}

/// Raw input-frequency by output-frequency energy map.
///
/// Row `i` belongs to sweep point `i`; all rows have the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct FreqFreqMap {
    /// Stimulus frequency repeated across each row (Hz).
    pub input_frequencies: Vec<Vec<f64>>,
    /// Output frequency axis of each row (Hz).
    pub output_frequencies: Vec<Vec<f64>>,
    /// Complex positive output spectrum of each row.
    pub spectra: Vec<Vec<Complex64>>,
}

impl FreqFreqMap {
    /// Number of rows (sweep points).
    pub fn rows(&self) -> usize {
        self.spectra.len()
    }

    /// Number of columns (positive output bins).
    pub fn columns(&self) -> usize {
        self.spectra.first().map_or(0, Vec::len)
    }

    /// Magnitudes of the map, row by row.
    pub fn magnitudes(&self) -> Vec<Vec<f64>> {
        self.spectra
            .iter()
            .map(|row| row.iter().map(|c| c.norm()).collect())
            .collect()
    }
}
