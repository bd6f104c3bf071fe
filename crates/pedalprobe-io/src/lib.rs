//! Capture import and sweep persistence for pedalprobe.
//!
//! This crate provides:
//!
//! - **Capture files**: [`read_capture`] for oscilloscope CSV and WAV exports
//! - **WAV I/O**: [`read_capture_wav`] and [`write_capture_wav`]
//! - **Sweep datasets**: [`save_sweep`] and [`load_sweep`] for whole sweeps as JSON
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pedalprobe_analysis::SweepAnalyzer;
//! use pedalprobe_io::{load_sweep, read_capture, save_sweep};
//!
//! // Pair up captures taken at 100 Hz and 1 kHz
//! let inputs = vec![read_capture("000_in.csv")?, read_capture("001_in.csv")?];
//! let outputs = vec![read_capture("000_out.csv")?, read_capture("001_out.csv")?];
//! let sweep = SweepAnalyzer::new(inputs, outputs, vec![100.0, 1000.0], 0.2)?;
//!
//! save_sweep("fuzz.json", &sweep)?;
//! let sweep = load_sweep("fuzz.json")?;
//! println!("{} points", sweep.len());
//! # Ok::<(), pedalprobe_io::Error>(())
//! ```

mod capture;
mod dataset;
mod wav;

pub use capture::{CaptureFormat, read_capture, read_capture_csv, write_capture_csv};
pub use dataset::{
    CaptureRecord, FORMAT_VERSION, PointRecord, SweepRecord, load_sweep, save_sweep,
};
pub use wav::{WavSpec, read_capture_wav, write_capture_wav};

use std::path::{Path, PathBuf};

/// Error types for capture and dataset I/O.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Sweep dataset (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A capture file line could not be parsed.
    #[error("{}:{line}: {reason}", path.display())]
    Parse {
        /// File being read.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// What was wrong with the line.
        reason: String,
    },

    /// File type or layout version not understood.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Captures were read but do not form a valid waveform or sweep.
    #[error("Invalid measurement: {0}")]
    Analysis(#[from] pedalprobe_analysis::AnalysisError),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a parse error for `line` of `path`.
    pub fn parse(path: &Path, line: usize, reason: impl Into<String>) -> Self {
        Error::Parse {
            path: path.to_path_buf(),
            line,
            reason: reason.into(),
        }
    }
}

/// Convenience result type for capture and dataset I/O.
pub type Result<T> = std::result::Result<T, Error>;
