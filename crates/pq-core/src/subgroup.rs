//! Harmonic and interharmonic subgroup aggregation (IEC 61000-4-7)
//!
//! Both groupings follow one procedure: walk a ladder of target frequencies,
//! locate the grid line nearest each target, and root-sum-square a window of
//! lines around it. Only the ladder offset and the window differ.
//!
//! ```text
//!  grid lines (5 Hz):  ... 50  55  60  65  70  75 ... 110 115 120 ...
//!
//!  harmonic, 60 Hz:            [55  60  65]              one line each side
//!  interharmonic, 60 Hz:           60 [65  70 ... 110]   next 10 lines
//! ```
//!
//! | Mode          | Targets (Hz)          | Window                       |
//! |---------------|-----------------------|------------------------------|
//! | Harmonic      | 1, 1+F, 1+2F, ...     | lines i-1, i, i+1            |
//! | Interharmonic | 0, F, 2F, ...         | lines i+1 ..= i+K (K = 10/6) |
//!
//! Targets stop below 3000 Hz for 60 Hz systems and below 2500 Hz for 50 Hz
//! systems. Row `k` of the resulting table is harmonic order `k`; row 0 holds
//! the DC group, row 1 the fundamental.
//!
//! At the bottom of the grid the harmonic window has no line below 0 Hz and
//! combines only the lines that exist. A window that runs past the top of the
//! grid is an error.

use serde::Serialize;
use std::ops::{Deref, Range};

use crate::grid::{nearest_index, stepped_frequencies};
use crate::supply::SupplyFrequency;
use crate::types::{FrequencyTable, HarmonicGrid, PqError, PqResult};

/// Which grouping to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubgroupMode {
    /// The line at each harmonic plus its two neighbours
    Harmonic,
    /// The lines following each harmonic, up to the next one
    Interharmonic,
}

/// Lines combined around the grid line nearest a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    /// `n` lines on each side plus the centre line
    Flank(usize),
    /// The `n` lines after the centre line, centre excluded
    Following(usize),
}

impl Window {
    /// Grid rows covered when centred on `centre` in a grid of `len` lines.
    fn span(self, centre: usize, len: usize) -> PqResult<Range<usize>> {
        let (start, end) = match self {
            Window::Flank(n) => (centre.saturating_sub(n), centre + n + 1),
            Window::Following(n) => (centre + 1, centre + n + 1),
        };
        if end > len {
            return Err(PqError::IndexOutOfRange {
                index: end - 1,
                len,
            });
        }
        Ok(start..end)
    }
}

impl SubgroupMode {
    /// Target frequencies for this mode, one per harmonic order.
    pub fn targets(self, supply: SupplyFrequency) -> Vec<f64> {
        let params = supply.params();
        let offset = match self {
            SubgroupMode::Harmonic => 1.0,
            SubgroupMode::Interharmonic => 0.0,
        };
        stepped_frequencies(offset, params.nominal_hz, params.order_limit_hz)
    }

    pub fn window(self, supply: SupplyFrequency) -> Window {
        match self {
            SubgroupMode::Harmonic => Window::Flank(1),
            SubgroupMode::Interharmonic => Window::Following(supply.params().interharmonic_lines),
        }
    }
}

/// RMS-grouped amplitudes indexed by harmonic order.
///
/// The frequency index holds the target frequency of each order (1, 61, 121,
/// ... for a 60 Hz harmonic table). Row position is the harmonic order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubgroupTable {
    mode: SubgroupMode,
    supply: SupplyFrequency,
    #[serde(flatten)]
    table: FrequencyTable,
}

impl SubgroupTable {
    /// Wrap grouped values computed elsewhere.
    pub fn from_table(table: FrequencyTable, mode: SubgroupMode, supply: SupplyFrequency) -> Self {
        Self {
            mode,
            supply,
            table,
        }
    }

    pub fn mode(&self) -> SubgroupMode {
        self.mode
    }

    pub fn supply(&self) -> SupplyFrequency {
        self.supply
    }

    pub fn table(&self) -> &FrequencyTable {
        &self.table
    }

    /// Number of harmonic orders in the table
    pub fn order_count(&self) -> usize {
        self.table.len()
    }

    /// Grouped value of every channel at harmonic order `order`.
    pub fn order(&self, order: usize) -> Option<Vec<f64>> {
        self.table.row(order)
    }
}

impl Deref for SubgroupTable {
    type Target = FrequencyTable;

    fn deref(&self) -> &FrequencyTable {
        &self.table
    }
}

/// Root of the sum of squares.
pub(crate) fn root_sum_square(values: &[f64]) -> f64 {
    values.iter().map(|v| v * v).sum::<f64>().sqrt()
}

/// Group a harmonic grid by harmonic order.
pub fn subgroups(
    grid: &HarmonicGrid,
    supply: SupplyFrequency,
    mode: SubgroupMode,
) -> PqResult<SubgroupTable> {
    let targets = mode.targets(supply);
    let window = mode.window(supply);
    let lines = grid.frequencies();

    let spans = targets
        .iter()
        .map(|&t| {
            let centre = nearest_index(lines, t)
                .ok_or_else(|| PqError::InvalidInput("harmonic grid has no rows".to_string()))?;
            window.span(centre, lines.len())
        })
        .collect::<PqResult<Vec<Range<usize>>>>()?;

    let columns = grid
        .columns()
        .iter()
        .map(|column| {
            spans
                .iter()
                .map(|span| root_sum_square(&column[span.clone()]))
                .collect()
        })
        .collect();

    let table = FrequencyTable::from_parts(targets, grid.channel_names().to_vec(), columns);
    Ok(SubgroupTable::from_table(table, mode, supply))
}

/// Harmonic subgroups: each harmonic line with its two neighbours.
pub fn harmonic_subgroups(grid: &HarmonicGrid, supply: SupplyFrequency) -> PqResult<SubgroupTable> {
    subgroups(grid, supply, SubgroupMode::Harmonic)
}

/// Interharmonic subgroups: the lines following each harmonic.
pub fn interharmonic_subgroups(
    grid: &HarmonicGrid,
    supply: SupplyFrequency,
) -> PqResult<SubgroupTable> {
    subgroups(grid, supply, SubgroupMode::Interharmonic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::analysis_grid;

    /// Grid where line `k` has amplitude `k` on channel "a" and `2k` on "b".
    fn ramp_grid() -> HarmonicGrid {
        let freqs = analysis_grid();
        let a: Vec<f64> = (0..freqs.len()).map(|k| k as f64).collect();
        let b: Vec<f64> = a.iter().map(|v| 2.0 * v).collect();
        let table =
            FrequencyTable::new(freqs, vec!["a".to_string(), "b".to_string()], vec![a, b]).unwrap();
        HarmonicGrid::from_table(table)
    }

    fn rss(indices: impl Iterator<Item = usize>) -> f64 {
        indices.map(|k| (k * k) as f64).sum::<f64>().sqrt()
    }

    #[test]
    fn test_harmonic_targets_60hz() {
        let table = harmonic_subgroups(&ramp_grid(), SupplyFrequency::Hz60).unwrap();
        let hz = table.frequencies();
        assert_eq!(hz.len(), 50);
        assert_eq!(&hz[..3], &[1.0, 61.0, 121.0]);
        assert!(hz.iter().all(|&f| f < 3000.0));
        assert_eq!(table.mode(), SubgroupMode::Harmonic);
    }

    #[test]
    fn test_harmonic_targets_50hz() {
        let table = harmonic_subgroups(&ramp_grid(), SupplyFrequency::Hz50).unwrap();
        let hz = table.frequencies();
        assert_eq!(hz.len(), 50);
        assert_eq!(&hz[..3], &[1.0, 51.0, 101.0]);
        assert_eq!(*hz.last().unwrap(), 2451.0);
    }

    #[test]
    fn test_harmonic_window_flanks_centre() {
        let table = harmonic_subgroups(&ramp_grid(), SupplyFrequency::Hz60).unwrap();
        // 61 Hz -> line 12 (60 Hz), combine lines 11, 12, 13
        let expected = rss(11..=13);
        let a = table.column("a").unwrap();
        assert!((a[1] - expected).abs() < 1e-9);
    }

    #[test]
    fn test_dc_group_is_clipped_at_grid_start() {
        let table = harmonic_subgroups(&ramp_grid(), SupplyFrequency::Hz60).unwrap();
        // 1 Hz -> line 0, no line below it
        let a = table.column("a").unwrap();
        assert!((a[0] - rss(0..=1)).abs() < 1e-9);
    }

    #[test]
    fn test_interharmonic_window_60hz() {
        let table = interharmonic_subgroups(&ramp_grid(), SupplyFrequency::Hz60).unwrap();
        assert_eq!(&table.frequencies()[..2], &[0.0, 60.0]);
        let a = table.column("a").unwrap();
        // 60 Hz -> line 12, lines 13..=22
        assert!((a[1] - rss(13..=22)).abs() < 1e-9);
        assert!((a[0] - rss(1..=10)).abs() < 1e-9);
    }

    #[test]
    fn test_interharmonic_window_50hz() {
        let table = interharmonic_subgroups(&ramp_grid(), SupplyFrequency::Hz50).unwrap();
        assert_eq!(table.order_count(), 50);
        let a = table.column("a").unwrap();
        // 50 Hz -> line 10, lines 11..=16
        assert!((a[1] - rss(11..=16)).abs() < 1e-9);
    }

    #[test]
    fn test_each_channel_uses_its_own_lines() {
        for mode in [SubgroupMode::Harmonic, SubgroupMode::Interharmonic] {
            let table = subgroups(&ramp_grid(), SupplyFrequency::Hz60, mode).unwrap();
            let a = table.column("a").unwrap();
            let b = table.column("b").unwrap();
            for (x, y) in a.iter().zip(b) {
                assert!((2.0 * x - y).abs() < 1e-9, "mode {:?}: {} vs {}", mode, x, y);
            }
        }
    }

    #[test]
    fn test_invalid_supply_is_an_error() {
        let grid = ramp_grid();
        for mode in [SubgroupMode::Harmonic, SubgroupMode::Interharmonic] {
            let result =
                SupplyFrequency::from_hz(45.0).and_then(|supply| subgroups(&grid, supply, mode));
            assert_eq!(result, Err(PqError::InvalidFrequency(45.0)));
        }
    }

    #[test]
    fn test_window_past_grid_end() {
        // Grid stops at 300 Hz: interharmonic windows near the top run off the end
        let freqs: Vec<f64> = (0..=60).map(|k| k as f64 * 5.0).collect();
        let values = vec![1.0; freqs.len()];
        let grid = HarmonicGrid::from_table(
            FrequencyTable::new(freqs, vec!["a".to_string()], vec![values]).unwrap(),
        );
        let err = interharmonic_subgroups(&grid, SupplyFrequency::Hz60).unwrap_err();
        assert!(matches!(err, PqError::IndexOutOfRange { len: 61, .. }), "{:?}", err);

        let err = harmonic_subgroups(&grid, SupplyFrequency::Hz60).unwrap_err();
        assert!(matches!(err, PqError::IndexOutOfRange { .. }));
    }

    #[test]
    fn test_order_accessor() {
        let table = harmonic_subgroups(&ramp_grid(), SupplyFrequency::Hz60).unwrap();
        let row = table.order(1).unwrap();
        assert_eq!(row.len(), 2);
        assert!(table.order(50).is_none());
    }

    #[test]
    fn test_window_span() {
        assert_eq!(Window::Flank(1).span(5, 10), Ok(4..7));
        assert_eq!(Window::Flank(1).span(0, 10), Ok(0..2));
        assert_eq!(Window::Following(3).span(5, 10), Ok(6..9));
        assert_eq!(
            Window::Following(3).span(8, 10),
            Err(PqError::IndexOutOfRange { index: 11, len: 10 })
        );
    }
}
