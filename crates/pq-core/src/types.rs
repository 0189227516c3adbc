//! Core types for power-quality analysis
//!
//! This module defines the data that flows through the analysis pipeline and the
//! error type shared by every stage.
//!
//! ## Data Flow
//!
//! ```text
//! Waveform ──► Spectrum ──► HarmonicGrid ──► SubgroupTable ──► DistortionRatio
//! (samples)    (FFT bins)   (0..2995 Hz,     (RMS-grouped      (one % per
//!                            5 Hz steps)      orders)           channel)
//! ```
//!
//! Every frequency-indexed stage shares one layout, [`FrequencyTable`]: a sorted
//! frequency index with one amplitude column per named channel. The stage types
//! wrap it so a stage can only be fed the output of the stage before it.

use serde::Serialize;
use std::ops::Deref;

/// Result type for power-quality operations
pub type PqResult<T> = Result<T, PqError>;

/// Errors that can occur while computing power-quality metrics
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PqError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid supply frequency: {0} Hz. Must be 50 or 60")]
    InvalidFrequency(f64),

    #[error("Index out of range: line {index} requested, grid has {len} lines")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Division by zero: fundamental of channel '{channel}' is zero")]
    DivisionByZero { channel: String },

    #[error("Insufficient data: need {required} harmonic orders, got {available}")]
    InsufficientData { required: usize, available: usize },
}

/// A uniformly sampled, real-valued signal with one or more named channels.
///
/// Samples are stored per channel (column-major); every channel has the same
/// length. The sample interval is not stored here, the caller passes the sample
/// rate to [`crate::spectrum::spectrum`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Waveform {
    channels: Vec<String>,
    samples: Vec<Vec<f64>>,
}

impl Waveform {
    /// Build a waveform from channel names and per-channel sample columns.
    pub fn new(channels: Vec<String>, samples: Vec<Vec<f64>>) -> PqResult<Self> {
        if channels.is_empty() {
            return Err(PqError::InvalidInput(
                "waveform must have at least one channel".to_string(),
            ));
        }
        if channels.len() != samples.len() {
            return Err(PqError::InvalidInput(format!(
                "{} channel names for {} sample columns",
                channels.len(),
                samples.len()
            )));
        }
        check_unique_names(&channels)?;

        let len = samples[0].len();
        if len == 0 {
            return Err(PqError::InvalidInput("waveform is empty".to_string()));
        }
        for (name, column) in channels.iter().zip(&samples) {
            if column.len() != len {
                return Err(PqError::InvalidInput(format!(
                    "channel '{}' has {} samples, expected {}",
                    name,
                    column.len(),
                    len
                )));
            }
            if let Some(pos) = column.iter().position(|x| !x.is_finite()) {
                return Err(PqError::InvalidInput(format!(
                    "channel '{}' has a non-finite sample at index {}",
                    name, pos
                )));
            }
        }

        Ok(Self { channels, samples })
    }

    /// Build a single-channel waveform.
    pub fn single(name: impl Into<String>, samples: Vec<f64>) -> PqResult<Self> {
        Self::new(vec![name.into()], vec![samples])
    }

    /// Number of samples per channel
    pub fn len(&self) -> usize {
        self.samples[0].len()
    }

    /// Always false for a constructed waveform; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn channel_names(&self) -> &[String] {
        &self.channels
    }

    /// All sample columns, in channel order
    pub fn columns(&self) -> &[Vec<f64>] {
        &self.samples
    }

    /// Samples of the named channel
    pub fn channel(&self, name: &str) -> Option<&[f64]> {
        self.channels
            .iter()
            .position(|c| c == name)
            .map(|idx| self.samples[idx].as_slice())
    }
}

/// Frequency-indexed amplitudes, one column per channel.
///
/// Invariants: at least one row and one channel, every column has one value per
/// row, the frequency index is finite and non-decreasing, amplitudes are finite
/// and non-negative.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyTable {
    frequencies: Vec<f64>,
    channels: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl FrequencyTable {
    /// Build a validated table from a frequency index and per-channel columns.
    pub fn new(
        frequencies: Vec<f64>,
        channels: Vec<String>,
        values: Vec<Vec<f64>>,
    ) -> PqResult<Self> {
        if frequencies.is_empty() {
            return Err(PqError::InvalidInput("table has no rows".to_string()));
        }
        if channels.is_empty() || channels.len() != values.len() {
            return Err(PqError::InvalidInput(format!(
                "{} channel names for {} value columns",
                channels.len(),
                values.len()
            )));
        }
        check_unique_names(&channels)?;

        if frequencies.iter().any(|f| !f.is_finite()) {
            return Err(PqError::InvalidInput(
                "frequency index must be finite".to_string(),
            ));
        }
        if frequencies.windows(2).any(|w| w[1] < w[0]) {
            return Err(PqError::InvalidInput(
                "frequency index must be sorted ascending".to_string(),
            ));
        }
        for (name, column) in channels.iter().zip(&values) {
            if column.len() != frequencies.len() {
                return Err(PqError::InvalidInput(format!(
                    "channel '{}' has {} rows, expected {}",
                    name,
                    column.len(),
                    frequencies.len()
                )));
            }
            if column.iter().any(|v| !v.is_finite() || *v < 0.0) {
                return Err(PqError::InvalidInput(format!(
                    "channel '{}' has a negative or non-finite amplitude",
                    name
                )));
            }
        }

        Ok(Self::from_parts(frequencies, channels, values))
    }

    /// Assemble a table whose invariants the caller already guarantees.
    pub(crate) fn from_parts(
        frequencies: Vec<f64>,
        channels: Vec<String>,
        values: Vec<Vec<f64>>,
    ) -> Self {
        debug_assert!(values.iter().all(|c| c.len() == frequencies.len()));
        Self {
            frequencies,
            channels,
            values,
        }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// The frequency index, one entry per row
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn channel_names(&self) -> &[String] {
        &self.channels
    }

    /// All amplitude columns, in channel order
    pub fn columns(&self) -> &[Vec<f64>] {
        &self.values
    }

    /// Amplitudes of the named channel
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.channels
            .iter()
            .position(|c| c == name)
            .map(|idx| self.values[idx].as_slice())
    }

    /// Amplitude of every channel at one row
    pub fn row(&self, row: usize) -> Option<Vec<f64>> {
        if row >= self.len() {
            return None;
        }
        Some(self.values.iter().map(|column| column[row]).collect())
    }
}

fn check_unique_names(channels: &[String]) -> PqResult<()> {
    for (i, name) in channels.iter().enumerate() {
        if channels[..i].contains(name) {
            return Err(PqError::InvalidInput(format!(
                "duplicate channel name '{}'",
                name
            )));
        }
    }
    Ok(())
}

/// Magnitude spectrum of a waveform, sorted by signed bin frequency.
///
/// Produced by [`crate::spectrum::spectrum`]; holds one row per FFT bin.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Spectrum(FrequencyTable);

impl Spectrum {
    pub(crate) fn from_table(table: FrequencyTable) -> Self {
        Self(table)
    }

    pub fn table(&self) -> &FrequencyTable {
        &self.0
    }

    pub fn into_table(self) -> FrequencyTable {
        self.0
    }
}

impl Deref for Spectrum {
    type Target = FrequencyTable;

    fn deref(&self) -> &FrequencyTable {
        &self.0
    }
}

impl AsRef<FrequencyTable> for Spectrum {
    fn as_ref(&self) -> &FrequencyTable {
        &self.0
    }
}

/// Amplitudes aligned to a fixed analysis grid.
///
/// [`crate::harmonics::harmonics`] produces the standard 600-line grid
/// (0, 5, ..., 2995 Hz). Grids from other sources can be wrapped with
/// [`HarmonicGrid::from_table`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct HarmonicGrid(FrequencyTable);

impl HarmonicGrid {
    /// Treat an already validated table as a harmonic grid.
    pub fn from_table(table: FrequencyTable) -> Self {
        Self(table)
    }

    pub fn table(&self) -> &FrequencyTable {
        &self.0
    }

    pub fn into_table(self) -> FrequencyTable {
        self.0
    }
}

impl Deref for HarmonicGrid {
    type Target = FrequencyTable;

    fn deref(&self) -> &FrequencyTable {
        &self.0
    }
}

impl AsRef<FrequencyTable> for HarmonicGrid {
    fn as_ref(&self) -> &FrequencyTable {
        &self.0
    }
}
