//! Tampering detection: compares a charged fare against the computed fair fare.

use serde::{Deserialize, Serialize};

use crate::error::TamperingError;

/// Tolerance presets offered to passengers, plus an arbitrary fraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TamperingThreshold {
    /// 5%
    Strict,
    /// 10%
    #[default]
    Standard,
    /// 15%
    Lenient,
    /// Fraction in (0, 1].
    Custom(f64),
}

impl TamperingThreshold {
    pub fn fraction(&self) -> f64 {
        match self {
            TamperingThreshold::Strict => 0.05,
            TamperingThreshold::Standard => 0.10,
            TamperingThreshold::Lenient => 0.15,
            TamperingThreshold::Custom(fraction) => *fraction,
        }
    }

    pub fn is_valid(&self) -> bool {
        let f = self.fraction();
        f.is_finite() && f > 0.0 && f <= 1.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TamperingVerdict {
    pub is_tampered: bool,
    pub absolute_difference: f64,
    /// `absolute_difference / computed_fare`
    pub difference_ratio: f64,
    /// `difference_ratio` expressed in percent.
    pub percentage_difference: f64,
    pub overcharged: bool,
    pub computed_fare: f64,
    pub charged_fare: f64,
    pub threshold: f64,
}

/// Compare `charged_fare` with `computed_fare`. Tampered when the relative difference
/// exceeds `threshold_fraction` (strictly).
///
/// A computed fare of zero or less has no meaningful relative difference and is
/// rejected rather than divided by.
pub fn detect_tampering(
    computed_fare: f64,
    charged_fare: f64,
    threshold_fraction: f64,
) -> Result<TamperingVerdict, TamperingError> {
    if !computed_fare.is_finite() || computed_fare <= 0.0 {
        return Err(TamperingError::InvalidComputedFare(computed_fare));
    }
    if !charged_fare.is_finite() || charged_fare < 0.0 {
        return Err(TamperingError::InvalidChargedFare(charged_fare));
    }
    let absolute_difference = (charged_fare - computed_fare).abs();
    let difference_ratio = absolute_difference / computed_fare;
    Ok(TamperingVerdict {
        is_tampered: difference_ratio > threshold_fraction,
        absolute_difference,
        difference_ratio,
        percentage_difference: difference_ratio * 100.0,
        overcharged: charged_fare > computed_fare,
        computed_fare,
        charged_fare,
        threshold: threshold_fraction,
    })
}
