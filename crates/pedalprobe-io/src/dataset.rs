//! Sweep dataset persistence.
//!
//! A recorded sweep is stored as one JSON document holding the stimulus
//! amplitude, an optional description, and for every point the stimulus
//! frequency plus the raw input and output captures. Loading goes back
//! through the analysis constructors, so a file edited by hand is
//! validated exactly like a fresh measurement.

use crate::{Error, Result};
use pedalprobe_analysis::{SweepAnalyzer, Waveform};
use serde::{Deserialize, Serialize};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Current dataset layout version.
pub const FORMAT_VERSION: u32 = 1;

/// Serialized form of a [`SweepAnalyzer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepRecord {
    /// Layout version, [`FORMAT_VERSION`] when written by this crate.
    pub format_version: u32,
    /// Free-form description of the device under test.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Stimulus amplitude in volts.
    pub amplitude: f64,
    /// One entry per sweep point, in sweep order.
    pub points: Vec<PointRecord>,
}

/// One sweep point: stimulus frequency and both captures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    /// Stimulus frequency in Hz.
    pub frequency: f64,
    /// Capture at the device input.
    pub input: CaptureRecord,
    /// Capture at the device output.
    pub output: CaptureRecord,
}

/// Raw capture samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureRecord {
    /// Timestamps in seconds.
    pub time: Vec<f64>,
    /// Voltages.
    pub data: Vec<f64>,
}

impl From<&Waveform> for CaptureRecord {
    fn from(wave: &Waveform) -> Self {
        Self {
            time: wave.time().to_vec(),
            data: wave.data().to_vec(),
        }
    }
}

impl TryFrom<CaptureRecord> for Waveform {
    type Error = Error;

    fn try_from(record: CaptureRecord) -> Result<Self> {
        Ok(Waveform::new(record.time, record.data)?)
    }
}

impl From<&SweepAnalyzer> for SweepRecord {
    fn from(sweep: &SweepAnalyzer) -> Self {
        let points = sweep
            .frequencies()
            .iter()
            .zip(sweep.inputs().iter().zip(sweep.outputs()))
            .map(|(&frequency, (input, output))| PointRecord {
                frequency,
                input: input.into(),
                output: output.into(),
            })
            .collect();

        Self {
            format_version: FORMAT_VERSION,
            description: sweep.description().map(str::to_owned),
            amplitude: sweep.amplitude(),
            points,
        }
    }
}

impl TryFrom<SweepRecord> for SweepAnalyzer {
    type Error = Error;

    fn try_from(record: SweepRecord) -> Result<Self> {
        if record.format_version != FORMAT_VERSION {
            return Err(Error::UnsupportedFormat(format!(
                "sweep format version {} (expected {FORMAT_VERSION})",
                record.format_version
            )));
        }

        let mut frequencies = Vec::with_capacity(record.points.len());
        let mut inputs = Vec::with_capacity(record.points.len());
        let mut outputs = Vec::with_capacity(record.points.len());
        for point in record.points {
            frequencies.push(point.frequency);
            inputs.push(Waveform::try_from(point.input)?);
            outputs.push(Waveform::try_from(point.output)?);
        }

        let sweep = SweepAnalyzer::new(inputs, outputs, frequencies, record.amplitude)?;
        Ok(match record.description {
            Some(description) => sweep.with_description(description),
            None => sweep,
        })
    }
}

/// Save a sweep dataset as JSON.
pub fn save_sweep<P: AsRef<Path>>(path: P, sweep: &SweepAnalyzer) -> Result<()> {
    let path = path.as_ref();
    let mut file = BufWriter::new(std::fs::File::create(path)?);
    serde_json::to_writer(&mut file, &SweepRecord::from(sweep))?;
    file.flush()?;

    tracing::info!(path = %path.display(), points = sweep.len(), "saved sweep");
    Ok(())
}

/// Load and validate a sweep dataset saved by [`save_sweep`].
pub fn load_sweep<P: AsRef<Path>>(path: P) -> Result<SweepAnalyzer> {
    let path = path.as_ref();
    let reader = BufReader::new(std::fs::File::open(path)?);
    let record: SweepRecord = serde_json::from_reader(reader)?;
    let sweep = SweepAnalyzer::try_from(record)?;

    tracing::info!(path = %path.display(), points = sweep.len(), "loaded sweep");
    Ok(sweep)
}
