//! Export formats for sweep results.
//!
//! - FRD format (frequency response data, compatible with REW)
//! - CSV for THD and harmonic maps
//!
//! Cells that were not measured (unresolvable THD, harmonic-map padding)
//! are written as empty CSV fields, never as zero.

use crate::{HarmonicDistortion, HarmonicMap, LinearResponse};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Export a linear response to FRD format (REW compatible).
///
/// One line per sweep point: `frequency_hz magnitude_db phase_deg`.
pub fn export_frd(response: &LinearResponse, path: impl AsRef<Path>) -> std::io::Result<()> {
    let mut file = BufWriter::new(std::fs::File::create(path)?);

    writeln!(file, "* Frequency Response Data exported by pedalprobe")?;
    for i in 0..response.frequencies.len() {
        writeln!(
            file,
            "{:.6} {:.6} {:.6}",
            response.frequencies[i], response.magnitude_db[i], response.phase_deg[i]
        )?;
    }

    file.flush()
}

/// Import a linear response from FRD format.
///
/// Lines starting with `*` or `#` and lines that do not hold three numbers
/// are skipped.
pub fn import_frd(path: impl AsRef<Path>) -> std::io::Result<LinearResponse> {
    let reader = BufReader::new(std::fs::File::open(path)?);

    let mut response = LinearResponse {
        frequencies: Vec::new(),
        magnitude_db: Vec::new(),
        phase_deg: Vec::new(),
    };

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('*') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() >= 3
            && let (Ok(freq), Ok(mag), Ok(phase)) = (
                parts[0].parse::<f64>(),
                parts[1].parse::<f64>(),
                parts[2].parse::<f64>(),
            )
        {
            response.frequencies.push(freq);
            response.magnitude_db.push(mag);
            response.phase_deg.push(phase);
        }
    }

    Ok(response)
}

/// Export THD to CSV: `frequency_hz,thd_in_percent,thd_out_percent`.
pub fn export_thd_csv(thd: &HarmonicDistortion, path: impl AsRef<Path>) -> std::io::Result<()> {
    let mut file = BufWriter::new(std::fs::File::create(path)?);

    writeln!(file, "frequency_hz,thd_in_percent,thd_out_percent")?;
    for i in 0..thd.frequencies.len() {
        writeln!(
            file,
            "{:.6},{},{}",
            thd.frequencies[i],
            optional_cell(thd.thd_in[i]),
            optional_cell(thd.thd_out[i])
        )?;
    }

    file.flush()
}

/// Export a harmonic map to CSV.
///
/// Header is `frequency_hz,h1,h2,...`; each row is one sweep point.
pub fn export_harmonic_map_csv(map: &HarmonicMap, path: impl AsRef<Path>) -> std::io::Result<()> {
    let mut file = BufWriter::new(std::fs::File::create(path)?);

    write!(file, "frequency_hz")?;
    for order in &map.orders {
        write!(file, ",h{}", order)?;
    }
    writeln!(file)?;

    for (frequency, row) in map.frequencies.iter().zip(map.masked()) {
        write!(file, "{:.6}", frequency)?;
        for cell in row {
            write!(file, ",{}", optional_cell(cell))?;
        }
        writeln!(file)?;
    }

    file.flush()
}

fn optional_cell(value: Option<f64>) -> String {
    value.map(|v| format!("{:.6e}", v)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_frd_roundtrip() {
        let response = LinearResponse {
            frequencies: vec![100.0, 1000.0, 10000.0],
            magnitude_db: vec![0.0, -3.0, -6.0],
            phase_deg: vec![0.0, -45.0, -90.0],
        };

        let temp_file = NamedTempFile::new().unwrap();
        export_frd(&response, temp_file.path()).unwrap();
        let loaded = import_frd(temp_file.path()).unwrap();

        assert_eq!(loaded.len(), 3);
        for i in 0..3 {
            assert!((loaded.frequencies[i] - response.frequencies[i]).abs() < 1e-6);
            assert!((loaded.magnitude_db[i] - response.magnitude_db[i]).abs() < 1e-6);
            assert!((loaded.phase_deg[i] - response.phase_deg[i]).abs() < 1e-6);
        }
    }

    #[test]
    fn test_frd_import_skips_junk() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(
            temp_file.path(),
            "* header\n# comment\n\n100 -1 5\nnot a line\n200 -2\n",
        )
        .unwrap();

        let loaded = import_frd(temp_file.path()).unwrap();
        assert_eq!(loaded.frequencies, vec![100.0]);
        assert_eq!(loaded.phase_deg, vec![5.0]);
    }

    #[test]
    fn test_thd_csv_leaves_unresolved_empty() {
        let thd = HarmonicDistortion {
            frequencies: vec![1000.0, 10000.0],
            thd_in: vec![Some(0.01), None],
            thd_out: vec![Some(25.0), None],
        };

        let temp_file = NamedTempFile::new().unwrap();
        export_thd_csv(&thd, temp_file.path()).unwrap();
        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(lines[0], "frequency_hz,thd_in_percent,thd_out_percent");
        assert!(lines[1].starts_with("1000.000000,1.000000e-2,2.500000e1"), "got {}", lines[1]);
        assert_eq!(lines[2], "10000.000000,,");
    }

    #[test]
    fn test_harmonic_map_csv_masks_padding() {
        let map = HarmonicMap {
            frequencies: vec![1000.0, 10000.0],
            orders: vec![1, 2, 3],
            table: vec![vec![1.0, 0.0, 0.25], vec![1.0, 0.0, 0.0]],
            resolved: vec![3, 1],
        };

        let temp_file = NamedTempFile::new().unwrap();
        export_harmonic_map_csv(&map, temp_file.path()).unwrap();
        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(lines[0], "frequency_hz,h1,h2,h3");
        assert_eq!(lines[1], "1000.000000,1.000000e0,0.000000e0,2.500000e-1");
        assert_eq!(lines[2], "10000.000000,1.000000e0,,");
    }
}
