//! FFT wrapper with windowing functions

use rustfft::{FftPlanner, num_complex::Complex64};
use std::f64::consts::PI;
use std::sync::Arc;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    /// Rectangular (no windowing)
    Rectangular,
    /// Symmetric Hann window (raised cosine, zero at both ends)
    Hann,
}

impl Window {
    /// Apply window to a buffer
    pub fn apply(&self, buffer: &mut [f64]) {
        let n = buffer.len();
        match self {
            Window::Rectangular => {}
            Window::Hann => {
                if n < 2 {
                    return;
                }
                let span = (n - 1) as f64;
                for (i, sample) in buffer.iter_mut().enumerate() {
                    let w = 0.5 - 0.5 * (2.0 * PI * i as f64 / span).cos();
                    *sample *= w;
                }
            }
        }
    }

    /// Get window coefficients
    pub fn coefficients(&self, size: usize) -> Vec<f64> {
        let mut coeffs = vec![1.0; size];
        self.apply(&mut coeffs);
        coeffs
    }

    /// Mean window value, i.e. the amplitude loss of a bin-centred tone.
    ///
    /// Approaches 0.5 for a long Hann window.
    pub fn coherent_gain(&self, size: usize) -> f64 {
        if size == 0 {
            return 0.0;
        }
        self.coefficients(size).iter().sum::<f64>() / size as f64
    }
}

/// Forward FFT processor for a fixed size
pub struct Fft {
    fft: Arc<dyn rustfft::Fft<f64>>,
    size: usize,
}

impl Fft {
    /// Create a new FFT processor for the given size
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        Self { fft, size }
    }

    /// Get FFT size
    pub fn size(&self) -> usize {
        self.size
    }

    /// Perform forward FFT on real input
    ///
    /// Returns the full complex spectrum (`size` bins, negative frequencies
    /// in the upper half). Input is zero-padded or truncated to `size`.
    pub fn forward(&self, input: &[f64]) -> Vec<Complex64> {
        let mut buffer: Vec<Complex64> = input.iter().map(|&x| Complex64::new(x, 0.0)).collect();
        buffer.resize(self.size, Complex64::new(0.0, 0.0));
        self.fft.process(&mut buffer);
        buffer
    }
}

/// Frequency of every bin below the folding bin: `k / (n * dt)` for `k < n / 2`.
pub fn bin_frequencies(size: usize, sample_interval: f64) -> Vec<f64> {
    let resolution = 1.0 / (size as f64 * sample_interval);
    (0..size / 2).map(|k| k as f64 * resolution).collect()
}

/// Compute magnitude spectrum in dB
pub fn magnitude_db(spectrum: &[Complex64]) -> Vec<f64> {
    spectrum
        .iter()
        .map(|c| 20.0 * c.norm().max(1e-12).log10())
        .collect()
}

/// Compute phase spectrum in degrees
pub fn phase_deg(spectrum: &[Complex64]) -> Vec<f64> {
    spectrum.iter().map(|c| c.arg().to_degrees()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_hann_symmetric() {
        let mut buffer = vec![1.0; 101];
        Window::Hann.apply(&mut buffer);

        assert!(buffer[0].abs() < 1e-12);
        assert!(buffer[100].abs() < 1e-12);
        assert!((buffer[50] - 1.0).abs() < 1e-12);
        for i in 0..50 {
            assert!((buffer[i] - buffer[100 - i]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_hann_coherent_gain() {
        let gain = Window::Hann.coherent_gain(4096);
        assert!((gain - 0.5).abs() < 1e-3, "gain {gain}");
        assert_eq!(Window::Rectangular.coherent_gain(16), 1.0);
    }

    #[test]
    fn test_bin_centred_tone_rectangular() {
        let size = 256;
        let fft = Fft::new(size);
        let input: Vec<f64> = (0..size)
            .map(|i| (2.0 * PI * 8.0 * i as f64 / size as f64).sin())
            .collect();

        let spectrum = fft.forward(&input);
        assert_eq!(spectrum.len(), size);
        assert!((spectrum[8].norm() - size as f64 / 2.0).abs() < 1e-9);
        assert!((spectrum[size - 8].norm() - size as f64 / 2.0).abs() < 1e-9);
        assert!(spectrum[9].norm() < 1e-9);
    }

    #[test]
    fn test_bin_frequencies() {
        let freqs = bin_frequencies(8, 0.25);
        assert_eq!(freqs, vec![0.0, 0.5, 1.0, 1.5]);

        let odd = bin_frequencies(7, 1.0);
        assert_eq!(odd.len(), 3);
    }

    #[test]
    fn test_dc_detection() {
        let fft = Fft::new(256);
        let spectrum = fft.forward(&vec![1.0; 256]);

        let dc_mag = spectrum[0].norm();
        let other_mag: f64 = spectrum[1..].iter().map(|c| c.norm()).sum();
        assert!(dc_mag > other_mag * 10.0);
    }

    #[test]
    fn test_magnitude_and_phase() {
        let spectrum = [Complex64::new(1.0, 0.0), Complex64::new(0.0, 10.0), Complex64::new(0.0, 0.0)];
        let db = magnitude_db(&spectrum);
        assert!((db[0]).abs() < 1e-12);
        assert!((db[1] - 20.0).abs() < 1e-12);
        assert!(db[2].is_finite());

        let phase = phase_deg(&spectrum);
        assert!((phase[1] - 90.0).abs() < 1e-12);
    }
}
