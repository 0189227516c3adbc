//! Power quality analyzer
//!
//! Runs the full pipeline on one waveform:
//!
//! ```text
//! Waveform ─► spectrum ─► harmonics ─┬─► harmonic subgroups ──► THD (, TDD)
//!                                    └─► interharmonic subgroups
//! ```
//!
//! # Example
//!
//! ```
//! use pq_core::analyzer::PowerQualityAnalyzer;
//! use pq_core::types::Waveform;
//!
//! // 60 Hz supply sampled at 10 kHz for one second
//! let fs = 10_000.0;
//! let samples: Vec<f64> = (0..10_000)
//!     .map(|i| {
//!         let t = i as f64 / fs;
//!         (2.0 * std::f64::consts::PI * 60.0 * t).sin()
//!             + 0.05 * (2.0 * std::f64::consts::PI * 180.0 * t).sin()
//!     })
//!     .collect();
//!
//! let analyzer = PowerQualityAnalyzer::new(fs, 60.0).unwrap();
//! let report = analyzer.analyze(&Waveform::single("ia", samples).unwrap()).unwrap();
//! let thd = report.thd.get("ia").unwrap();
//! assert!((thd - 5.0).abs() < 0.01, "THD = {}", thd);
//! ```

use serde::Serialize;
use tracing::{debug, debug_span, trace};

use crate::config::AnalyzerConfig;
use crate::distortion::{total_demand_distortion, total_harmonic_distortion, DistortionRatio};
use crate::harmonics::harmonics;
use crate::spectrum::spectrum;
use crate::subgroup::{harmonic_subgroups, interharmonic_subgroups, SubgroupTable};
use crate::supply::SupplyFrequency;
use crate::types::{HarmonicGrid, PqError, PqResult, Spectrum, Waveform};

/// Everything computed for one waveform.
#[derive(Debug, Clone, Serialize)]
pub struct PowerQualityReport {
    pub sample_rate: f64,
    pub supply: SupplyFrequency,
    pub sample_count: usize,
    /// Full magnitude spectrum, when requested
    pub spectrum: Option<Spectrum>,
    pub harmonics: HarmonicGrid,
    pub harmonic_subgroups: SubgroupTable,
    pub interharmonic_subgroups: SubgroupTable,
    /// Total harmonic distortion, percent of the fundamental
    pub thd: DistortionRatio,
    /// Harmonic content as percent of the rated value, when one is set
    pub tdd: Option<DistortionRatio>,
}

/// Power quality analyzer with configurable parameters.
#[derive(Debug, Clone)]
pub struct PowerQualityAnalyzer {
    sample_rate: f64,
    supply: SupplyFrequency,
    include_spectrum: bool,
    rated_value: Option<f64>,
}

impl PowerQualityAnalyzer {
    /// Create an analyzer.
    ///
    /// * `sample_rate` - Sampling rate of the waveform in Hz.
    /// * `supply_hz` - Nominal mains frequency, 50 or 60.
    pub fn new(sample_rate: f64, supply_hz: f64) -> PqResult<Self> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(PqError::InvalidInput(format!(
                "sample rate must be a positive number, got {}",
                sample_rate
            )));
        }
        Ok(Self {
            sample_rate,
            supply: SupplyFrequency::from_hz(supply_hz)?,
            include_spectrum: false,
            rated_value: None,
        })
    }

    /// Create an analyzer from a validated configuration.
    pub fn from_config(config: &AnalyzerConfig) -> PqResult<Self> {
        let analyzer = Self::new(config.sample_rate, config.supply_frequency.hz())?
            .with_spectrum(config.include_spectrum);
        match config.rated_value {
            Some(rated) => analyzer.with_rated_value(rated),
            None => Ok(analyzer),
        }
    }

    /// Keep the full spectrum in the report.
    pub fn with_spectrum(mut self, keep: bool) -> Self {
        self.include_spectrum = keep;
        self
    }

    /// Set the rated value used for the demand distortion.
    pub fn with_rated_value(mut self, rated: f64) -> PqResult<Self> {
        if !(rated.is_finite() && rated > 0.0) {
            return Err(PqError::InvalidInput(format!(
                "rated value must be a positive number, got {}",
                rated
            )));
        }
        self.rated_value = Some(rated);
        Ok(self)
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn supply(&self) -> SupplyFrequency {
        self.supply
    }

    /// Analyse a waveform.
    pub fn analyze(&self, waveform: &Waveform) -> PqResult<PowerQualityReport> {
        let span = debug_span!(
            "pq_analyze",
            samples = waveform.len(),
            channels = waveform.channel_count(),
            supply = %self.supply,
        );
        let _enter = span.enter();

        let spec = spectrum(waveform, self.sample_rate)?;
        trace!(bins = spec.len(), "spectrum computed");

        let grid = harmonics(&spec)?;
        let harmonic = harmonic_subgroups(&grid, self.supply)?;
        let interharmonic = interharmonic_subgroups(&grid, self.supply)?;
        trace!(
            harmonic_orders = harmonic.order_count(),
            interharmonic_orders = interharmonic.order_count(),
            "subgroups computed"
        );

        let thd = total_harmonic_distortion(&harmonic)?;
        for (channel, percent) in thd.iter() {
            debug!(channel, thd_percent = percent, "harmonic distortion");
        }

        let tdd = self
            .rated_value
            .map(|rated| total_demand_distortion(&harmonic, rated))
            .transpose()?;

        Ok(PowerQualityReport {
            sample_rate: self.sample_rate,
            supply: self.supply,
            sample_count: waveform.len(),
            spectrum: self.include_spectrum.then_some(spec),
            harmonics: grid,
            harmonic_subgroups: harmonic,
            interharmonic_subgroups: interharmonic,
            thd,
            tdd,
        })
    }
}
