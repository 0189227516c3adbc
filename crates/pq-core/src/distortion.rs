//! Distortion ratios (IEC 62600-30)
//!
//! All ratios read a harmonic [`SubgroupTable`] by row position, where row `k`
//! is harmonic order `k`:
//!
//! ```text
//!   THD = sqrt( sum_{h=2}^{49} G_h^2 ) / G_1 * 100
//!   TDD = sqrt( sum_{h=2}^{49} G_h^2 ) / G_rated * 100
//!   IHD_h = G_h / G_1 * 100
//! ```
//!
//! THD and IHD are self-normalised per channel, so any common scaling of the
//! input waveform cancels out.

use serde::Serialize;

use crate::subgroup::{root_sum_square, SubgroupMode, SubgroupTable};
use crate::types::{FrequencyTable, PqError, PqResult};

/// Row holding the fundamental
pub const FUNDAMENTAL_ORDER: usize = 1;

/// Lowest harmonic order included in the distortion sums
pub const FIRST_HARMONIC_ORDER: usize = 2;

/// Highest harmonic order included in the distortion sums
pub const LAST_HARMONIC_ORDER: usize = 49;

/// Minimum number of rows a table needs for any ratio
pub const REQUIRED_ORDERS: usize = LAST_HARMONIC_ORDER + 1;

/// One percentage per channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistortionRatio {
    channels: Vec<String>,
    percent: Vec<f64>,
}

impl DistortionRatio {
    pub fn channel_names(&self) -> &[String] {
        &self.channels
    }

    /// Percentages in channel order
    pub fn values(&self) -> &[f64] {
        &self.percent
    }

    /// Percentage for the named channel
    pub fn get(&self, channel: &str) -> Option<f64> {
        self.channels
            .iter()
            .position(|c| c == channel)
            .map(|idx| self.percent[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.channels
            .iter()
            .map(String::as_str)
            .zip(self.percent.iter().copied())
    }
}

fn check_harmonic_table(table: &SubgroupTable) -> PqResult<()> {
    if table.mode() != SubgroupMode::Harmonic {
        return Err(PqError::InvalidInput(
            "distortion ratios need a harmonic subgroup table".to_string(),
        ));
    }
    if table.order_count() < REQUIRED_ORDERS {
        return Err(PqError::InsufficientData {
            required: REQUIRED_ORDERS,
            available: table.order_count(),
        });
    }
    Ok(())
}

fn harmonic_content(column: &[f64]) -> f64 {
    root_sum_square(&column[FIRST_HARMONIC_ORDER..=LAST_HARMONIC_ORDER])
}

fn fundamental(channel: &str, column: &[f64]) -> PqResult<f64> {
    let value = column[FUNDAMENTAL_ORDER];
    if value == 0.0 {
        return Err(PqError::DivisionByZero {
            channel: channel.to_string(),
        });
    }
    Ok(value)
}

/// Total harmonic distortion of each channel, in percent.
pub fn total_harmonic_distortion(table: &SubgroupTable) -> PqResult<DistortionRatio> {
    check_harmonic_table(table)?;

    let percent = table
        .channel_names()
        .iter()
        .zip(table.columns())
        .map(|(name, column)| -> PqResult<f64> {
            Ok(harmonic_content(column) / fundamental(name, column)? * 100.0)
        })
        .collect::<PqResult<Vec<f64>>>()?;

    Ok(DistortionRatio {
        channels: table.channel_names().to_vec(),
        percent,
    })
}

/// Harmonic content of each channel relative to a rated value, in percent.
///
/// `rated` is the rated current (or voltage) of the device, expressed in the
/// same units as the subgroup values.
pub fn total_demand_distortion(table: &SubgroupTable, rated: f64) -> PqResult<DistortionRatio> {
    check_harmonic_table(table)?;
    if !(rated.is_finite() && rated > 0.0) {
        return Err(PqError::InvalidInput(format!(
            "rated value must be a positive number, got {}",
            rated
        )));
    }

    let percent = table
        .columns()
        .iter()
        .map(|column| harmonic_content(column) / rated * 100.0)
        .collect();

    Ok(DistortionRatio {
        channels: table.channel_names().to_vec(),
        percent,
    })
}

/// Each harmonic order 2..=49 as a percentage of the fundamental.
///
/// The result is indexed by the target frequency of each order.
pub fn individual_harmonic_distortion(table: &SubgroupTable) -> PqResult<FrequencyTable> {
    check_harmonic_table(table)?;

    let orders = FIRST_HARMONIC_ORDER..=LAST_HARMONIC_ORDER;
    let columns = table
        .channel_names()
        .iter()
        .zip(table.columns())
        .map(|(name, column)| -> PqResult<Vec<f64>> {
            let base = fundamental(name, column)?;
            Ok(column[orders.clone()].iter().map(|g| g / base * 100.0).collect())
        })
        .collect::<PqResult<Vec<Vec<f64>>>>()?;

    Ok(FrequencyTable::from_parts(
        table.frequencies()[orders].to_vec(),
        table.channel_names().to_vec(),
        columns,
    ))
}
