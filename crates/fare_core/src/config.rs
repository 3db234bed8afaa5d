//! Engine configuration: tariff constants, motion and halt thresholds, tampering
//! tolerance and path retention. Every section has defaults matching the published
//! tariff card; JSON overrides only need to name the fields they change.

use std::path::Path;

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::halts::HaltConfig;
use crate::motion::MotionThresholds;
use crate::pricing::TariffConfig;
use crate::tampering::TamperingThreshold;

/// How many path points a trip keeps. `None` keeps the whole trip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Resource)]
#[serde(default)]
pub struct PathRetention {
    pub max_points: Option<usize>,
}

impl PathRetention {
    pub fn unbounded() -> Self {
        Self { max_points: None }
    }

    pub fn capped(max_points: usize) -> Self {
        Self {
            max_points: Some(max_points),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub tariff: TariffConfig,
    pub motion: MotionThresholds,
    pub halts: HaltConfig,
    pub tampering: TamperingThreshold,
    pub path: PathRetention,
}

impl EngineConfig {
    pub fn with_tariff(mut self, tariff: TariffConfig) -> Self {
        self.tariff = tariff;
        self
    }

    pub fn with_motion_thresholds(mut self, motion: MotionThresholds) -> Self {
        self.motion = motion;
        self
    }

    pub fn with_halt_config(mut self, halts: HaltConfig) -> Self {
        self.halts = halts;
        self
    }

    pub fn with_tampering_threshold(mut self, tampering: TamperingThreshold) -> Self {
        self.tampering = tampering;
        self
    }

    pub fn with_path_retention(mut self, path: PathRetention) -> Self {
        self.path = path;
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.tariff;
        let positive = [
            ("min_fare", t.min_fare),
            ("per_km_rate", t.per_km_rate),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidTariff(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        let non_negative = [
            ("night_surcharge", t.night_surcharge),
            ("waiting_charge_rate", t.waiting_charge_rate),
            ("luggage_charge", t.luggage_charge),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidTariff(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }
        if t.night_start_hour >= t.night_end_hour || t.night_end_hour > 24 {
            return Err(ConfigError::InvalidNightWindow {
                start: t.night_start_hour,
                end: t.night_end_hour,
            });
        }
        if !self.tampering.is_valid() {
            return Err(ConfigError::InvalidThreshold(format!(
                "tampering fraction {} is outside (0, 1]",
                self.tampering.fraction()
            )));
        }
        let m = &self.motion;
        if [m.stationary_accel, m.stationary_gyro]
            .iter()
            .any(|v| !v.is_finite() || *v <= 0.0)
        {
            return Err(ConfigError::InvalidThreshold(
                "stationary thresholds must be positive".to_string(),
            ));
        }
        if m.moderate_accel > m.high_accel || m.moderate_gyro > m.high_gyro {
            return Err(ConfigError::InvalidThreshold(
                "moderate movement bands must not exceed high movement bands".to_string(),
            ));
        }
        if [self.halts.min_halt_secs, self.halts.stationary_speed_kmh]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(ConfigError::InvalidThreshold(
                "halt thresholds must not be negative".to_string(),
            ));
        }
        if matches!(self.path.max_points, Some(n) if n < 2) {
            return Err(ConfigError::InvalidPathCapacity);
        }
        Ok(())
    }
}
