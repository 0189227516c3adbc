//! Harmonic resampler
//!
//! Reduces a raw spectrum to the fixed 5 Hz analysis grid by nearest-line
//! lookup. When the spectrum does not reach a grid frequency (short records,
//! low sample rates) the closest available bin is used as is.

use crate::grid::{analysis_grid, nearest_index};
use crate::types::{FrequencyTable, HarmonicGrid, PqError, PqResult, Spectrum};

/// Align a spectrum to the standard 0..2995 Hz, 5 Hz analysis grid.
pub fn harmonics(spectrum: &Spectrum) -> PqResult<HarmonicGrid> {
    let table = resample(spectrum.table(), &analysis_grid())?;
    Ok(HarmonicGrid::from_table(table))
}

/// Pick, for each target frequency, the row of `table` nearest to it.
///
/// The output is indexed by `targets`, which must be ascending. Ties go to the
/// lower-frequency row.
pub fn resample(table: &FrequencyTable, targets: &[f64]) -> PqResult<FrequencyTable> {
    if targets.is_empty() {
        return Err(PqError::InvalidInput("no target frequencies".to_string()));
    }
    if targets.iter().any(|t| !t.is_finite()) || targets.windows(2).any(|w| w[1] < w[0]) {
        return Err(PqError::InvalidInput(
            "target frequencies must be finite and ascending".to_string(),
        ));
    }

    let rows = targets
        .iter()
        .map(|&t| {
            nearest_index(table.frequencies(), t)
                .ok_or_else(|| PqError::InvalidInput("table has no rows".to_string()))
        })
        .collect::<PqResult<Vec<usize>>>()?;

    let columns = table
        .columns()
        .iter()
        .map(|column| rows.iter().map(|&r| column[r]).collect())
        .collect();

    Ok(FrequencyTable::from_parts(
        targets.to_vec(),
        table.channel_names().to_vec(),
        columns,
    ))
}
