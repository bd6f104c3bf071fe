//! pedalprobe Analysis - Frequency-sweep metrics for analog effect pedals
//!
//! This crate turns paired input/output oscilloscope captures into
//! frequency-domain measurements:
//!
//! - [`waveform`] - One capture and its Hann-windowed spectrum
//! - [`sweep`] - A frequency sweep dataset and the frequency-frequency map
//! - [`transfer_fn`] - Linear response (gain and phase at the stimulus)
//! - [`distortion`] - THD and normalized harmonic maps
//! - [`spectrum`] - Nearest-bin search, harmonic ranges, dB conversion
//! - [`fft`] - FFT wrapper with windowing functions
//! - [`export`] - FRD and CSV export
//!
//! ## Example Workflow
//!
//! ```rust
//! use pedalprobe_analysis::{SweepAnalyzer, Waveform, generate_test_tone};
//!
//! let dt = 1.0 / 48000.0;
//! let freqs = vec![100.0, 1000.0];
//! let mut inputs = Vec::new();
//! let mut outputs = Vec::new();
//! for &f in &freqs {
//!     let tone = generate_test_tone(f, 0.5, dt, 4096);
//!     let clipped = tone.iter().map(|x| (3.0 * x).tanh()).collect();
//!     inputs.push(Waveform::from_uniform(tone, dt, 0.0)?);
//!     outputs.push(Waveform::from_uniform(clipped, dt, 0.0)?);
//! }
//!
//! let sweep = SweepAnalyzer::new(inputs, outputs, freqs, 0.5)?;
//! let response = sweep.linear_response()?;
//! let thd = sweep.total_harmonic_distortion()?;
//! assert!(thd.thd_out[1].unwrap() > thd.thd_in[1].unwrap());
//! assert_eq!(sweep.harmonic_map()?.table[0][0], 1.0);
//! # let _ = response;
//! # Ok::<(), pedalprobe_analysis::AnalysisError>(())
//! ```

pub mod distortion;
pub mod error;
pub mod export;
pub mod fft;
pub mod spectrum;
pub mod sweep;
pub mod transfer_fn;
pub mod waveform;

// Re-export main types
pub use distortion::{HarmonicDistortion, HarmonicMap, ThdPoint, generate_test_tone};
pub use error::{AnalysisError, Channel, Result};
pub use fft::{Fft, Window};
pub use rustfft::num_complex::Complex64;
pub use spectrum::{amplitude_to_db, harmonic_orders, max_harmonic, nearest_bin};
pub use sweep::{DEGENERATE_AMPLITUDE, FreqFreqMap, SweepAnalyzer};
pub use transfer_fn::{LinearPoint, LinearResponse, unwrap_phase_deg};
pub use waveform::{PositiveSpectrum, Spectrum, Waveform};
