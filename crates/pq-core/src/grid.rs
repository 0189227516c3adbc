//! Analysis grid and nearest-line lookup
//!
//! IEC 61000-4-7 evaluates harmonics on spectral lines spaced 5 Hz apart
//! (a 200 ms window). The raw FFT of an arbitrary-length record has its own bin
//! spacing, so each stage aligns to the standard grid by picking, for every
//! target frequency, the line whose frequency is closest.
//!
//! ```text
//!  spectrum bins:   0   1   2   3   4   5   6   7   8 ...  (Hz, 1 Hz bins)
//!  analysis grid:   0                   5                  10 ...
//!                   ^ nearest           ^ nearest
//! ```

/// Spacing of the analysis grid in Hz
pub const GRID_STEP_HZ: f64 = 5.0;

/// Exclusive upper bound of the analysis grid in Hz
pub const GRID_LIMIT_HZ: f64 = 3000.0;

/// Number of lines on the analysis grid (0, 5, ..., 2995 Hz)
pub const GRID_POINTS: usize = 600;

/// The standard analysis grid, 0 to 2995 Hz in 5 Hz steps.
pub fn analysis_grid() -> Vec<f64> {
    (0..GRID_POINTS).map(|k| k as f64 * GRID_STEP_HZ).collect()
}

/// Frequencies `start, start + step, ...` strictly below `limit`.
pub fn stepped_frequencies(start: f64, step: f64, limit: f64) -> Vec<f64> {
    if step <= 0.0 {
        return Vec::new();
    }
    (0..)
        .map(|k| start + k as f64 * step)
        .take_while(|&f| f < limit)
        .collect()
}

/// Index of the entry in `sorted` closest to `target`.
///
/// `sorted` must be in ascending order. When `target` sits exactly midway
/// between two entries the lower index wins. Targets outside the covered range
/// resolve to the first or last entry. Returns `None` only for an empty slice.
pub fn nearest_index(sorted: &[f64], target: f64) -> Option<usize> {
    if sorted.is_empty() {
        return None;
    }

    // First entry >= target
    let upper = sorted.partition_point(|&f| f < target);
    if upper == 0 {
        return Some(0);
    }
    if upper == sorted.len() {
        return Some(sorted.len() - 1);
    }

    let lower = upper - 1;
    if target - sorted[lower] <= sorted[upper] - target {
        Some(lower)
    } else {
        Some(upper)
    }
}
