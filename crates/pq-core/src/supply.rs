//! Supply-frequency selector and its IEC 61000-4-7 parameters
//!
//! The two supported mains frequencies share one grouping formula. What differs
//! is captured in a small parameter table:
//!
//! | Supply | Orders evaluated below | Lines between harmonics |
//! |--------|------------------------|-------------------------|
//! | 50 Hz  | 2500 Hz                | 6                       |
//! | 60 Hz  | 3000 Hz                | 10                      |

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{PqError, PqResult};

/// Parameters that depend on the nominal supply frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SupplyParams {
    /// Nominal fundamental frequency in Hz
    pub nominal_hz: f64,
    /// Exclusive upper bound for harmonic-order targets in Hz
    pub order_limit_hz: f64,
    /// Number of grid lines combined into one interharmonic subgroup
    pub interharmonic_lines: usize,
}

const PARAMS_50HZ: SupplyParams = SupplyParams {
    nominal_hz: 50.0,
    order_limit_hz: 2500.0,
    interharmonic_lines: 6,
};

const PARAMS_60HZ: SupplyParams = SupplyParams {
    nominal_hz: 60.0,
    order_limit_hz: 3000.0,
    interharmonic_lines: 10,
};

/// Nominal mains frequency of the system under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum SupplyFrequency {
    Hz50,
    Hz60,
}

impl SupplyFrequency {
    /// Validate a selector given in Hz. Only exactly 50 or 60 are accepted.
    pub fn from_hz(hz: f64) -> PqResult<Self> {
        if hz == 50.0 {
            Ok(SupplyFrequency::Hz50)
        } else if hz == 60.0 {
            Ok(SupplyFrequency::Hz60)
        } else {
            Err(PqError::InvalidFrequency(hz))
        }
    }

    pub fn params(self) -> &'static SupplyParams {
        match self {
            SupplyFrequency::Hz50 => &PARAMS_50HZ,
            SupplyFrequency::Hz60 => &PARAMS_60HZ,
        }
    }

    /// Nominal frequency in Hz
    pub fn hz(self) -> f64 {
        self.params().nominal_hz
    }
}

impl TryFrom<u32> for SupplyFrequency {
    type Error = PqError;

    fn try_from(hz: u32) -> Result<Self, Self::Error> {
        Self::from_hz(hz as f64)
    }
}

impl TryFrom<f64> for SupplyFrequency {
    type Error = PqError;

    fn try_from(hz: f64) -> Result<Self, Self::Error> {
        Self::from_hz(hz)
    }
}

impl From<SupplyFrequency> for u32 {
    fn from(supply: SupplyFrequency) -> u32 {
        match supply {
            SupplyFrequency::Hz50 => 50,
            SupplyFrequency::Hz60 => 60,
        }
    }
}

impl fmt::Display for SupplyFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Hz", u32::from(*self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_selectors() {
        assert_eq!(SupplyFrequency::try_from(50u32), Ok(SupplyFrequency::Hz50));
        assert_eq!(SupplyFrequency::try_from(60.0), Ok(SupplyFrequency::Hz60));
        assert_eq!(SupplyFrequency::Hz60.hz(), 60.0);
        assert_eq!(SupplyFrequency::Hz50.to_string(), "50 Hz");
    }

    #[test]
    fn test_invalid_selector() {
        assert_eq!(
            SupplyFrequency::try_from(45u32),
            Err(PqError::InvalidFrequency(45.0))
        );
        assert!(SupplyFrequency::from_hz(59.9).is_err());
        assert!(SupplyFrequency::from_hz(f64::NAN).is_err());
    }

    #[test]
    fn test_parameter_table() {
        let p50 = SupplyFrequency::Hz50.params();
        assert_eq!(p50.order_limit_hz, 2500.0);
        assert_eq!(p50.interharmonic_lines, 6);

        let p60 = SupplyFrequency::Hz60.params();
        assert_eq!(p60.order_limit_hz, 3000.0);
        assert_eq!(p60.interharmonic_lines, 10);
    }

    #[test]
    fn test_serde_as_number() {
        let yaml = serde_yaml::to_string(&SupplyFrequency::Hz60).unwrap();
        assert_eq!(yaml.trim(), "60");
        let parsed: SupplyFrequency = serde_yaml::from_str("50").unwrap();
        assert_eq!(parsed, SupplyFrequency::Hz50);
        assert!(serde_yaml::from_str::<SupplyFrequency>("45").is_err());
    }
}
