//! Distortion analysis tools (THD, harmonic maps)
//!
//! Harmonics are read from the bin nearest each multiple of the stimulus
//! frequency. Orders `2..max_harmonic` are used, where `max_harmonic` is the
//! highest multiple below the top positive bin; the top multiple itself is
//! excluded (see [`harmonic_orders`]).

use crate::error::{Channel, Result};
use crate::spectrum::harmonic_orders;
use crate::sweep::SweepAnalyzer;
use crate::waveform::PositiveSpectrum;
use std::f64::consts::PI;

/// THD of one sweep point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThdPoint {
    /// Stimulus frequency (Hz)
    pub frequency: f64,
    /// Input THD (%), `None` when no harmonic fits in the captured band
    pub thd_in: Option<f64>,
    /// Output THD (%), `None` when no harmonic fits in the captured band
    pub thd_out: Option<f64>,
}

/// Total harmonic distortion of input and output across a sweep
#[derive(Debug, Clone, PartialEq)]
pub struct HarmonicDistortion {
    /// Stimulus frequencies (Hz), in sweep order
    pub frequencies: Vec<f64>,
    /// Input THD (%) per point
    pub thd_in: Vec<Option<f64>>,
    /// Output THD (%) per point
    pub thd_out: Vec<Option<f64>>,
}

impl HarmonicDistortion {
    /// Number of sweep points.
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    /// True for an empty result.
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Number of points whose harmonics were out of band.
    pub fn unresolved(&self) -> usize {
        self.thd_out.iter().filter(|t| t.is_none()).count()
    }
}

impl FromIterator<ThdPoint> for HarmonicDistortion {
    fn from_iter<I: IntoIterator<Item = ThdPoint>>(iter: I) -> Self {
        let mut thd = HarmonicDistortion {
            frequencies: Vec::new(),
            thd_in: Vec::new(),
            thd_out: Vec::new(),
        };
        for point in iter {
            thd.frequencies.push(point.frequency);
            thd.thd_in.push(point.thd_in);
            thd.thd_out.push(point.thd_out);
        }
        thd
    }
}

/// Normalized output harmonic energy, harmonic order by sweep point.
///
/// Rows shorter than the longest one are zero-padded in [`table`](Self::table);
/// [`resolved`](Self::resolved) records how many leading cells of each row
/// were measured, so padding can be told apart from a measured zero.
#[derive(Debug, Clone, PartialEq)]
pub struct HarmonicMap {
    /// Stimulus frequency of each row (Hz)
    pub frequencies: Vec<f64>,
    /// Harmonic order of each column, `1..=columns`
    pub orders: Vec<usize>,
    /// `|H_n|^2 / |H_1|^2`, column 0 is exactly 1.0
    pub table: Vec<Vec<f64>>,
    /// Measured cells per row; the rest is padding
    pub resolved: Vec<usize>,
}

impl HarmonicMap {
    /// Measured energy of harmonic `order` in `row`, `None` for padding.
    pub fn get(&self, row: usize, order: usize) -> Option<f64> {
        if order == 0 || order > *self.resolved.get(row)? {
            return None;
        }
        self.table.get(row)?.get(order - 1).copied()
    }

    /// Table with padding cells as `None`.
    pub fn masked(&self) -> Vec<Vec<Option<f64>>> {
        self.table
            .iter()
            .zip(&self.resolved)
            .map(|(row, &count)| {
                row.iter()
                    .enumerate()
                    .map(|(i, &v)| (i < count).then_some(v))
                    .collect()
            })
            .collect()
    }
}

/// Rows of `(stimulus frequency, harmonics_at row)`, zero-padded to the
/// longest row.
impl FromIterator<(f64, Vec<f64>)> for HarmonicMap {
    fn from_iter<I: IntoIterator<Item = (f64, Vec<f64>)>>(iter: I) -> Self {
        let (frequencies, rows): (Vec<f64>, Vec<Vec<f64>>) = iter.into_iter().unzip();

        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        let resolved: Vec<usize> = rows.iter().map(Vec::len).collect();
        let table = rows
            .into_iter()
            .map(|mut row| {
                row.resize(columns, 0.0);
                row
            })
            .collect();

        HarmonicMap {
            frequencies,
            orders: (1..=columns).collect(),
            table,
            resolved,
        }
    }
}

impl SweepAnalyzer {
    /// THD (%) of input and output at sweep point `index`.
    ///
    /// `THD = sqrt(sum |H_n|^2) / |H_1| * 100` over orders
    /// `2..max_harmonic`. When that range is empty the point is returned
    /// with `None` rather than 0. A vanishing fundamental on either channel
    /// is a [`DegenerateMeasurement`](crate::AnalysisError::DegenerateMeasurement).
    /// A stimulus below one bin width is
    /// [`FundamentalBelowResolution`](crate::AnalysisError::FundamentalBelowResolution),
    /// which bounds the number of orders by `N / 2`.
    pub fn thd_at(&self, index: usize) -> Result<ThdPoint> {
        let point = self.point(index)?;
        point.ensure_resolved()?;
        let fund_in = point.fundamental_amplitude(Channel::Input)?.norm();
        let fund_out = point.fundamental_amplitude(Channel::Output)?.norm();

        let mut power_in = 0.0;
        let mut power_out = 0.0;
        let mut count = 0;
        for bin in harmonic_bins(point.input, point.frequency) {
            power_in += point.input.bins()[bin].norm_sqr();
            power_out += point.output.bins()[bin].norm_sqr();
            count += 1;
        }

        let (thd_in, thd_out) = if count == 0 {
            (None, None)
        } else {
            (
                Some(power_in.sqrt() / fund_in * 100.0),
                Some(power_out.sqrt() / fund_out * 100.0),
            )
        };
        tracing::debug!(
            index,
            frequency = point.frequency,
            harmonics = count,
            ?thd_in,
            ?thd_out,
            "thd point"
        );

        Ok(ThdPoint {
            frequency: point.frequency,
            thd_in,
            thd_out,
        })
    }

    /// THD of every sweep point, index-aligned with the sweep.
    pub fn total_harmonic_distortion(&self) -> Result<HarmonicDistortion> {
        (0..self.len()).map(|i| self.thd_at(i)).collect()
    }

    /// Output harmonic energies of sweep point `index`, normalized to the
    /// fundamental.
    ///
    /// Element 0 (order 1) is exactly 1.0; element `k` is order `k + 1`.
    /// A point with no in-band harmonic yields `[1.0]`.
    ///
    /// Only the output capture is read: the fundamental, the top frequency
    /// and every harmonic bin come from the output's own axis, so the input
    /// capture may differ in length or sample interval.
    pub fn harmonics_at(&self, index: usize) -> Result<Vec<f64>> {
        let point = self.output_point(index)?;
        point.ensure_resolved()?;
        let fund_power = point.fundamental_amplitude()?.norm_sqr();

        let bins = point.spectrum.bins();
        let mut harmonics = vec![1.0];
        harmonics.extend(
            harmonic_bins(point.spectrum, point.frequency)
                .map(|bin| bins[bin].norm_sqr() / fund_power),
        );
        Ok(harmonics)
    }

    /// Rectangular map of output harmonic energy for the whole sweep.
    ///
    /// Fails on the first bad point; collect
    /// [`harmonics_at`](Self::harmonics_at) rows into a [`HarmonicMap`] to
    /// skip them instead.
    pub fn harmonic_map(&self) -> Result<HarmonicMap> {
        self.frequencies()
            .iter()
            .enumerate()
            .map(|(i, &f)| self.harmonics_at(i).map(|row| (f, row)))
            .collect()
    }
}

/// Bins nearest each analysed harmonic of `frequency` on `spectrum`'s axis.
fn harmonic_bins(spectrum: PositiveSpectrum<'_>, frequency: f64) -> impl Iterator<Item = usize> {
    let max_frequency = spectrum.max_frequency().unwrap_or(0.0);
    harmonic_orders(max_frequency, frequency)
        .filter_map(move |n| spectrum.nearest_bin(n as f64 * frequency))
}

/// Generate a sine test tone
///
/// # Arguments
/// * `frequency` - Tone frequency in Hz
/// * `amplitude` - Peak amplitude in volts
/// * `sample_interval` - Seconds between samples
/// * `num_samples` - Number of samples
pub fn generate_test_tone(
    frequency: f64,
    amplitude: f64,
    sample_interval: f64,
    num_samples: usize,
) -> Vec<f64> {
    (0..num_samples)
        .map(|i| {
            let t = i as f64 * sample_interval;
            amplitude * (2.0 * PI * frequency * t).sin()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AnalysisError;
    use crate::waveform::Waveform;

    const DT: f64 = 1.0 / 48000.0;
    const N: usize = 4096;

    fn capture(samples: Vec<f64>) -> Waveform {
        Waveform::from_uniform(samples, DT, 0.0).unwrap()
    }

    fn clipped(frequency: f64) -> (Waveform, Waveform) {
        let input = generate_test_tone(frequency, 1.0, DT, N);
        let output = input.iter().map(|x| x.clamp(-0.5, 0.5)).collect();
        (capture(input), capture(output))
    }

    #[test]
    fn test_clipper_raises_output_thd() {
        let (input, output) = clipped(1000.0);
        let sweep = SweepAnalyzer::new(vec![input], vec![output], vec![1000.0], 1.0).unwrap();

        let thd = sweep.thd_at(0).unwrap();
        let thd_in = thd.thd_in.unwrap();
        let thd_out = thd.thd_out.unwrap();
        assert!(thd_in < 1.0, "pure sine THD should be < 1%, got {thd_in}%");
        assert!(thd_out > 10.0, "clipped THD should be > 10%, got {thd_out}%");
        assert!(thd_out > thd_in);
    }

    #[test]
    fn test_thd_unresolvable_near_bandwidth() {
        // Top positive bin is just under 24 kHz, so 10 kHz admits no order.
        let input = capture(generate_test_tone(10000.0, 1.0, DT, N));
        let sweep =
            SweepAnalyzer::new(vec![input.clone()], vec![input], vec![10000.0], 1.0).unwrap();

        let thd = sweep.total_harmonic_distortion().unwrap();
        assert_eq!(thd.thd_in, vec![None]);
        assert_eq!(thd.thd_out, vec![None]);
        assert_eq!(thd.unresolved(), 1);
    }

    #[test]
    fn test_thd_silent_output_is_degenerate() {
        let input = capture(generate_test_tone(1000.0, 1.0, DT, N));
        let sweep =
            SweepAnalyzer::new(vec![input], vec![capture(vec![0.0; N])], vec![1000.0], 1.0)
                .unwrap();

        let err = sweep.thd_at(0).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::DegenerateMeasurement {
                channel: Channel::Output,
                ..
            }
        ));
    }

    #[test]
    fn test_harmonics_of_odd_clipper() {
        let (input, output) = clipped(1000.0);
        let sweep = SweepAnalyzer::new(vec![input], vec![output], vec![1000.0], 1.0).unwrap();

        let harmonics = sweep.harmonics_at(0).unwrap();
        // max harmonic is floor(23988 / 1000) = 23; orders 2..23 plus the fundamental.
        assert_eq!(harmonics.len(), 22);
        assert_eq!(harmonics[0], 1.0);
        // Symmetric clipping: third harmonic dominates the second.
        assert!(harmonics[2] > 100.0 * harmonics[1]);
    }

    #[test]
    fn test_harmonic_map_padding_and_mask() {
        let (in_low, out_low) = clipped(1000.0);
        let (in_high, out_high) = clipped(10000.0);
        let sweep = SweepAnalyzer::new(
            vec![in_low, in_high],
            vec![out_low, out_high],
            vec![1000.0, 10000.0],
            1.0,
        )
        .unwrap();

        let map = sweep.harmonic_map().unwrap();
        assert_eq!(map.orders.len(), 22);
        assert_eq!(map.orders[0], 1);
        assert_eq!(map.resolved, vec![22, 1]);
        assert_eq!(map.table[0][0], 1.0);
        assert_eq!(map.table[1][0], 1.0);
        assert!(map.table[1][1..].iter().all(|&v| v == 0.0));

        assert_eq!(map.get(1, 1), Some(1.0));
        assert_eq!(map.get(1, 2), None);
        assert!(map.get(0, 3).is_some());
        assert_eq!(map.get(0, 0), None);

        let masked = map.masked();
        assert_eq!(masked[1][0], Some(1.0));
        assert!(masked[1][1..].iter().all(Option::is_none));
        assert!(masked[0].iter().all(Option::is_some));
    }

    #[test]
    fn test_harmonics_ignore_input_length() {
        let (_, output) = clipped(1000.0);
        let short_input = capture(generate_test_tone(1000.0, 1.0, DT, N / 2));
        let sweep =
            SweepAnalyzer::new(vec![short_input], vec![output.clone()], vec![1000.0], 1.0)
                .unwrap();
        let reference =
            SweepAnalyzer::new(vec![output.clone()], vec![output], vec![1000.0], 1.0).unwrap();

        let map = sweep.harmonic_map().unwrap();
        assert_eq!(map.resolved, vec![22]);
        assert_eq!(map, reference.harmonic_map().unwrap());
        // THD still compares the two spectra bin for bin.
        assert!(matches!(
            sweep.thd_at(0),
            Err(AnalysisError::ShapeMismatch { index: 0, .. })
        ));
    }

    #[test]
    fn test_harmonics_ignore_input_sample_interval() {
        let (_, output) = clipped(1000.0);
        let slow_input = Waveform::from_uniform(
            generate_test_tone(1000.0, 1.0, 2.0 * DT, N),
            2.0 * DT,
            0.0,
        )
        .unwrap();
        let sweep =
            SweepAnalyzer::new(vec![slow_input], vec![output.clone()], vec![1000.0], 1.0)
                .unwrap();
        let reference =
            SweepAnalyzer::new(vec![output.clone()], vec![output], vec![1000.0], 1.0).unwrap();

        let harmonics = sweep.harmonics_at(0).unwrap();
        assert_eq!(harmonics.len(), 22);
        assert_eq!(harmonics, reference.harmonics_at(0).unwrap());
    }

    #[test]
    fn test_stimulus_below_bin_width_is_rejected() {
        // 64 samples at 48 kHz: bins are 750 Hz apart.
        let wave = capture(generate_test_tone(1000.0, 1.0, DT, 64));
        let sweep = SweepAnalyzer::new(vec![wave.clone()], vec![wave], vec![1e-4], 1.0).unwrap();

        for err in [
            sweep.harmonics_at(0).unwrap_err(),
            sweep.thd_at(0).unwrap_err(),
        ] {
            match err {
                AnalysisError::FundamentalBelowResolution {
                    index,
                    frequency,
                    bin_width,
                } => {
                    assert_eq!(index, 0);
                    assert_eq!(frequency, 1e-4);
                    assert!((bin_width - 750.0).abs() < 1e-9);
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
        assert!(sweep.harmonic_map().is_err());
    }

    #[test]
    fn test_stimulus_at_bin_width_is_resolved() {
        let wave = capture(generate_test_tone(750.0, 1.0, DT, 64));
        let bin_width = wave.positive_spectrum().bin_width().unwrap();
        let sweep =
            SweepAnalyzer::new(vec![wave.clone()], vec![wave], vec![bin_width], 1.0).unwrap();

        let harmonics = sweep.harmonics_at(0).unwrap();
        assert!(harmonics.len() < 31);
        assert!(sweep.thd_at(0).is_ok());
    }

    #[test]
    fn test_index_past_end() {
        let (input, output) = clipped(1000.0);
        let sweep = SweepAnalyzer::new(vec![input], vec![output], vec![1000.0], 1.0).unwrap();
        let expected = AnalysisError::IndexOutOfRange { index: 1, len: 1 };

        assert_eq!(sweep.thd_at(1).unwrap_err(), expected);
        assert_eq!(sweep.harmonics_at(1).unwrap_err(), expected);
        assert_eq!(
            sweep.harmonics_at(usize::MAX).unwrap_err(),
            AnalysisError::IndexOutOfRange {
                index: usize::MAX,
                len: 1
            }
        );
    }

    #[test]
    fn test_harmonic_map_from_usable_rows() {
        let (in_low, out_low) = clipped(1000.0);
        let (in_high, _) = clipped(2000.0);
        let sweep = SweepAnalyzer::new(
            vec![in_low, in_high],
            vec![out_low, capture(vec![0.0; N])],
            vec![1000.0, 2000.0],
            1.0,
        )
        .unwrap();

        assert!(sweep.harmonic_map().is_err());
        let map: HarmonicMap = sweep
            .frequencies()
            .iter()
            .enumerate()
            .filter_map(|(i, &f)| sweep.harmonics_at(i).ok().map(|row| (f, row)))
            .collect();
        assert_eq!(map.frequencies, vec![1000.0]);
        assert_eq!(map.resolved, vec![22]);
        assert_eq!(map.orders.len(), 22);
    }

    #[test]
    fn test_harmonic_map_empty_sweep() {
        let sweep = SweepAnalyzer::new(vec![], vec![], vec![], 1.0).unwrap();
        let map = sweep.harmonic_map().unwrap();
        assert!(map.orders.is_empty());
        assert!(map.table.is_empty());
    }

    #[test]
    fn test_generate_test_tone() {
        let tone = generate_test_tone(1000.0, 0.5, DT, 48);
        assert_eq!(tone.len(), 48);
        assert!(tone[0].abs() < 1e-12);
        assert!((tone[12] - 0.5).abs() < 1e-9);
    }
}
