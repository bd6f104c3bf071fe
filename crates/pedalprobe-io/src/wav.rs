//! WAV capture reading and writing.
//!
//! Sound-card and some oscilloscope exports store captures as WAV. Samples
//! are returned in file units (full scale = 1.0); the sample interval is
//! `1 / sample_rate` and the first sample sits at `t = 0`.

use crate::{Error, Result};
use hound::{SampleFormat, WavReader, WavWriter};
use pedalprobe_analysis::Waveform;
use std::path::Path;

/// WAV file specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz (e.g., 44100, 48000).
    pub sample_rate: u32,
    /// Bit depth per sample (e.g., 16, 24, 32).
    pub bits_per_sample: u16,
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            channels: 1,
            sample_rate: 48000,
            bits_per_sample: 32,
        }
    }
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: if spec.bits_per_sample == 32 {
                SampleFormat::Float
            } else {
                SampleFormat::Int
            },
        }
    }
}

/// Read a WAV file as a capture.
///
/// Multi-channel files are mixed down to mono by averaging channels.
pub fn read_capture_wav<P: AsRef<Path>>(path: P) -> Result<(Waveform, WavSpec)> {
    let reader = WavReader::open(path)?;
    let spec = WavSpec::from(reader.spec());
    let channels = spec.channels as usize;

    let samples: Vec<f64> = match reader.spec().sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f64;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f64 / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    // Mix down to mono if multi-channel
    let mono = if channels > 1 {
        samples
            .chunks(channels)
            .map(|chunk| chunk.iter().sum::<f64>() / channels as f64)
            .collect()
    } else {
        samples
    };

    tracing::debug!(
        frames = mono.len(),
        sample_rate = spec.sample_rate,
        channels = spec.channels,
        "read WAV capture"
    );

    let waveform = Waveform::from_uniform(mono, 1.0 / spec.sample_rate as f64, 0.0)?;
    Ok((waveform, spec))
}

/// Write a capture to a mono WAV file.
///
/// The sample rate is `1 / sample_interval` rounded to the nearest hertz,
/// so captures with sub-hertz rates cannot be stored as WAV.
pub fn write_capture_wav<P: AsRef<Path>>(
    path: P,
    waveform: &Waveform,
    bits_per_sample: u16,
) -> Result<()> {
    let rate = waveform.sample_rate().round();
    if !(1.0..=u32::MAX as f64).contains(&rate) {
        return Err(Error::UnsupportedFormat(format!(
            "sample rate {:.3} Hz cannot be stored in a WAV header",
            waveform.sample_rate()
        )));
    }
    let spec = WavSpec {
        channels: 1,
        sample_rate: rate as u32,
        bits_per_sample,
    };
    let mut writer = WavWriter::create(path, hound::WavSpec::from(spec))?;

    if bits_per_sample == 32 {
        for &sample in waveform.data() {
            writer.write_sample(sample as f32)?;
        }
    } else {
        let max_val = (1i64 << (bits_per_sample - 1)) as f64;
        for &sample in waveform.data() {
            let int_sample = (sample * max_val).clamp(-max_val, max_val - 1.0) as i32;
            writer.write_sample(int_sample)?;
        }
    }

    writer.finalize()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pedalprobe_analysis::generate_test_tone;
    use tempfile::NamedTempFile;

    fn tone(sample_rate: f64) -> Waveform {
        let dt = 1.0 / sample_rate;
        Waveform::from_uniform(generate_test_tone(1000.0, 0.5, dt, 1000), dt, 0.0).unwrap()
    }

    #[test]
    fn test_roundtrip_f32() {
        let wave = tone(48000.0);
        let file = NamedTempFile::new().unwrap();
        write_capture_wav(file.path(), &wave, 32).unwrap();

        let (loaded, spec) = read_capture_wav(file.path()).unwrap();
        assert_eq!(spec.sample_rate, 48000);
        assert_eq!(loaded.len(), wave.len());
        assert!((loaded.sample_interval() - wave.sample_interval()).abs() < 1e-15);
        for (a, b) in wave.data().iter().zip(loaded.data()) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn test_roundtrip_i16() {
        let wave = tone(44100.0);
        let file = NamedTempFile::new().unwrap();
        write_capture_wav(file.path(), &wave, 16).unwrap();

        let (loaded, spec) = read_capture_wav(file.path()).unwrap();
        assert_eq!(spec.sample_rate, 44100);
        assert_eq!(spec.bits_per_sample, 16);
        for (a, b) in wave.data().iter().zip(loaded.data()) {
            assert!((a - b).abs() < 1e-4);
        }
    }

    #[test]
    fn test_stereo_is_mixed_to_mono() {
        let file = NamedTempFile::new().unwrap();
        let spec = WavSpec {
            channels: 2,
            ..WavSpec::default()
        };
        let mut writer = WavWriter::create(file.path(), hound::WavSpec::from(spec)).unwrap();
        for _ in 0..64 {
            writer.write_sample(0.5f32).unwrap();
            writer.write_sample(-0.25f32).unwrap();
        }
        writer.finalize().unwrap();

        let (loaded, spec) = read_capture_wav(file.path()).unwrap();
        assert_eq!(spec.channels, 2);
        assert_eq!(loaded.len(), 64);
        assert!(loaded.data().iter().all(|&v| (v - 0.125).abs() < 1e-9));
    }

    #[test]
    fn test_sub_hertz_rate_rejected() {
        let wave = Waveform::from_uniform(vec![0.0, 1.0, 0.0, -1.0], 10.0, 0.0).unwrap();
        let file = NamedTempFile::new().unwrap();
        assert!(matches!(
            write_capture_wav(file.path(), &wave, 16),
            Err(Error::UnsupportedFormat(_))
        ));
    }
}
