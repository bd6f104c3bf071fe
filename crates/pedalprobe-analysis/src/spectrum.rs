//! Spectral search and unit helpers

/// Convert an amplitude ratio to decibels: `20 * log10(ratio)`.
///
/// No floor is applied; a zero ratio yields negative infinity.
pub fn amplitude_to_db(ratio: f64) -> f64 {
    20.0 * ratio.log10()
}

/// Index of the bin whose frequency is closest to `target`.
///
/// `axis` must be sorted ascending. Ties go to the lower index. Returns
/// `None` only for an empty axis.
pub fn nearest_bin(axis: &[f64], target: f64) -> Option<usize> {
    if axis.is_empty() {
        return None;
    }

    let upper = axis.partition_point(|&f| f < target);
    if upper == 0 {
        return Some(0);
    }
    if upper == axis.len() {
        return Some(axis.len() - 1);
    }

    let lower = upper - 1;
    if target - axis[lower] <= axis[upper] - target {
        Some(lower)
    } else {
        Some(upper)
    }
}

/// Highest harmonic number of `fundamental` that fits below `max_frequency`.
pub fn max_harmonic(max_frequency: f64, fundamental: f64) -> usize {
    (max_frequency / fundamental).floor() as usize
}

/// Harmonic orders analysed for a fundamental: `2..max_harmonic`.
///
/// The top order `max_harmonic` itself is excluded, so the edge harmonic
/// never contributes. Empty when the fundamental exceeds a third of
/// `max_frequency`. The range length grows as `max_frequency / fundamental`;
/// sweep metrics reject a fundamental below one bin width first, which keeps
/// it under the number of positive bins.
pub fn harmonic_orders(max_frequency: f64, fundamental: f64) -> std::ops::Range<usize> {
    2..max_harmonic(max_frequency, fundamental).max(2)
}
