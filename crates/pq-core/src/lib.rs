//! # Power Quality Core
//!
//! Harmonic and interharmonic grouping per IEC 61000-4-7 and total harmonic
//! distortion per IEC 62600-30, computed from sampled voltage or current
//! waveforms of marine and hydrokinetic energy converters.
//!
//! ## Signal Flow
//!
//! ```text
//! Waveform ─► Spectrum ─► HarmonicGrid ─► SubgroupTable ─► DistortionRatio
//!             (|FFT|,     (nearest line   (RMS groups per   (THD % per
//!              sorted)     on 5 Hz grid)   harmonic order)   channel)
//! ```
//!
//! Each stage is a pure function of its inputs and fails with a typed
//! [`PqError`] instead of producing partial results.
//!
//! ## Example
//!
//! ```rust
//! use pq_core::prelude::*;
//!
//! let fs = 10_000.0;
//! let samples: Vec<f64> = (0..10_000)
//!     .map(|i| (2.0 * std::f64::consts::PI * 60.0 * i as f64 / fs).sin())
//!     .collect();
//! let waveform = Waveform::single("va", samples).unwrap();
//!
//! let spec = spectrum(&waveform, fs).unwrap();
//! let grid = harmonics(&spec).unwrap();
//! let groups = harmonic_subgroups(&grid, SupplyFrequency::Hz60).unwrap();
//! let thd = total_harmonic_distortion(&groups).unwrap();
//! assert!(thd.get("va").unwrap() < 1e-6);
//! ```

pub mod analyzer;
pub mod config;
pub mod distortion;
pub mod grid;
pub mod harmonics;
pub mod observe;
pub mod spectrum;
pub mod subgroup;
pub mod supply;
pub mod types;

// Re-export main types
pub use analyzer::{PowerQualityAnalyzer, PowerQualityReport};
pub use config::{AnalyzerConfig, ConfigError};
pub use distortion::DistortionRatio;
pub use subgroup::{SubgroupMode, SubgroupTable};
pub use supply::SupplyFrequency;
pub use types::{FrequencyTable, HarmonicGrid, PqError, PqResult, Spectrum, Waveform};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::analyzer::{PowerQualityAnalyzer, PowerQualityReport};
    pub use crate::distortion::{
        individual_harmonic_distortion, total_demand_distortion, total_harmonic_distortion,
        DistortionRatio,
    };
    pub use crate::harmonics::{harmonics, resample};
    pub use crate::spectrum::spectrum;
    pub use crate::subgroup::{
        harmonic_subgroups, interharmonic_subgroups, subgroups, SubgroupMode, SubgroupTable,
    };
    pub use crate::supply::SupplyFrequency;
    pub use crate::types::{FrequencyTable, HarmonicGrid, PqError, PqResult, Spectrum, Waveform};
}
