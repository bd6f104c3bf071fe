//! Oscilloscope capture files.
//!
//! Captures are two-column text files, `time_s,voltage_v`, one sample per
//! line. Blank lines, `#` comments and any line whose first field is not a
//! number (such as a column header) are skipped. Separators may be commas,
//! semicolons or whitespace.

use crate::{Error, Result, wav};
use pedalprobe_analysis::Waveform;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Capture file formats recognised by [`read_capture`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureFormat {
    /// `time_s,voltage_v` text.
    Csv,
    /// Mono or multi-channel WAV.
    Wav,
}

impl CaptureFormat {
    /// Detect the format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" | "txt" => Some(Self::Csv),
            "wav" => Some(Self::Wav),
            _ => None,
        }
    }

    /// Canonical file extension.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Wav => "wav",
        }
    }
}

/// Read a capture, choosing the reader from the file extension.
pub fn read_capture<P: AsRef<Path>>(path: P) -> Result<Waveform> {
    let path = path.as_ref();
    match CaptureFormat::from_path(path) {
        Some(CaptureFormat::Csv) => read_capture_csv(path),
        Some(CaptureFormat::Wav) => Ok(wav::read_capture_wav(path)?.0),
        None => Err(Error::UnsupportedFormat(path.display().to_string())),
    }
}

/// Read a `time_s,voltage_v` capture.
pub fn read_capture_csv<P: AsRef<Path>>(path: P) -> Result<Waveform> {
    let path = path.as_ref();
    let reader = BufReader::new(std::fs::File::open(path)?);

    let mut time = Vec::new();
    let mut data = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = line
            .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
            .filter(|f| !f.is_empty());
        let (Some(t), Some(v)) = (fields.next(), fields.next()) else {
            return Err(Error::parse(path, index + 1, "expected two columns"));
        };
        let Ok(t) = t.parse::<f64>() else {
            if time.is_empty() {
                // Column header
                continue;
            }
            return Err(Error::parse(path, index + 1, format!("invalid time '{t}'")));
        };
        let v = v
            .parse::<f64>()
            .map_err(|_| Error::parse(path, index + 1, format!("invalid voltage '{v}'")))?;

        time.push(t);
        data.push(v);
    }

    tracing::debug!(path = %path.display(), samples = data.len(), "read CSV capture");
    Ok(Waveform::new(time, data)?)
}

/// Write a capture as `time_s,voltage_v` text with a header row.
pub fn write_capture_csv<P: AsRef<Path>>(path: P, waveform: &Waveform) -> Result<()> {
    let mut file = BufWriter::new(std::fs::File::create(path)?);

    writeln!(file, "time_s,voltage_v")?;
    for (t, v) in waveform.time().iter().zip(waveform.data()) {
        writeln!(file, "{t:e},{v:e}")?;
    }

    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pedalprobe_analysis::{AnalysisError, generate_test_tone};
    use tempfile::TempDir;

    #[test]
    fn test_csv_roundtrip_is_exact() {
        let dt = 1.0 / 96000.0;
        let wave = Waveform::from_uniform(generate_test_tone(440.0, 0.2, dt, 512), dt, 1e-3).unwrap();

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("capture.csv");
        write_capture_csv(&path, &wave).unwrap();
        let loaded = read_capture_csv(&path).unwrap();

        // `{:e}` prints the shortest representation that parses back exactly.
        assert_eq!(loaded.time(), wave.time());
        assert_eq!(loaded.data(), wave.data());
    }

    #[test]
    fn test_csv_accepts_scope_export() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scope.txt");
        std::fs::write(
            &path,
            "# Model: bench scope\nTime (s);Voltage (V)\n0.000;0.10\n0.001;0.20\n\n0.002;0.15\n0.003;0.05\n",
        )
        .unwrap();

        let wave = read_capture(&path).unwrap();
        assert_eq!(wave.len(), 4);
        assert_eq!(wave.data(), &[0.10, 0.20, 0.15, 0.05]);
        assert!((wave.sample_interval() - 0.001).abs() < 1e-12);
    }

    #[test]
    fn test_csv_reports_bad_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "time_s,voltage_v\n0.0,1.0\n0.1,oops\n").unwrap();

        match read_capture_csv(&path) {
            Err(Error::Parse { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_csv_rejects_non_monotonic_time() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("jumbled.csv");
        std::fs::write(&path, "0.0,1.0\n0.2,1.0\n0.1,1.0\n").unwrap();

        assert!(matches!(
            read_capture_csv(&path),
            Err(Error::Analysis(AnalysisError::NonPositiveInterval { .. }))
        ));
    }

    #[test]
    fn test_unknown_extension() {
        assert!(matches!(
            read_capture("capture.bin"),
            Err(Error::UnsupportedFormat(_))
        ));
        assert_eq!(CaptureFormat::from_path(Path::new("a/B.WAV")), Some(CaptureFormat::Wav));
    }
}
