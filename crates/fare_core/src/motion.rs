//! Motion classification from raw inertial samples.
//!
//! The classifier keeps one bit of hysteresis: the stationary flag flips only on an
//! edge, and the timestamp of the moving→stationary edge is kept until the next
//! stationary→moving edge. That start time is what lets callers ask how long the
//! vehicle has been still.

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One raw three-axis reading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Axes {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Axes {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// Accelerometer and gyroscope readings taken together.
/// The accelerometer includes one unit of gravity on z when the device lies level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InertialSample {
    pub accelerometer: Axes,
    pub gyroscope: Axes,
    pub timestamp_ms: u64,
}

impl InertialSample {
    pub fn new(accelerometer: Axes, gyroscope: Axes, timestamp_ms: u64) -> Self {
        Self {
            accelerometer,
            gyroscope,
            timestamp_ms,
        }
    }

    /// Acceleration magnitude with one gravity unit removed from z.
    /// Device tilt is not compensated.
    pub fn accel_magnitude(&self) -> f64 {
        let a = self.accelerometer;
        (a.x * a.x + a.y * a.y + (a.z - 1.0) * (a.z - 1.0)).sqrt()
    }

    pub fn gyro_magnitude(&self) -> f64 {
        self.gyroscope.magnitude()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MotionState {
    #[default]
    Stationary,
    LowMovement,
    ModerateMovement,
    HighMovement,
}

/// Tunable classification bands. Checked in precedence order: stationary, high, moderate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionThresholds {
    /// Acceleration magnitude below which the device may be stationary.
    pub stationary_accel: f64,
    /// Angular velocity magnitude below which the device may be stationary.
    pub stationary_gyro: f64,
    pub high_accel: f64,
    pub high_gyro: f64,
    pub moderate_accel: f64,
    pub moderate_gyro: f64,
}

impl Default for MotionThresholds {
    fn default() -> Self {
        Self {
            stationary_accel: 0.3,
            stationary_gyro: 0.1,
            high_accel: 2.0,
            high_gyro: 0.5,
            moderate_accel: 0.8,
            moderate_gyro: 0.2,
        }
    }
}

/// Value snapshot produced for every classified sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MotionReading {
    pub state: MotionState,
    pub accel_magnitude: f64,
    pub gyro_magnitude: f64,
    pub is_stationary: bool,
    /// Set on the moving→stationary edge, cleared on the reverse edge.
    pub stationary_since_ms: Option<u64>,
    pub timestamp_ms: u64,
}

#[derive(Debug, Clone, Default, Resource)]
pub struct MotionClassifier {
    thresholds: MotionThresholds,
    is_stationary: bool,
    stationary_since_ms: Option<u64>,
    last_reading: Option<MotionReading>,
}

impl MotionClassifier {
    pub fn new(thresholds: MotionThresholds) -> Self {
        Self {
            thresholds,
            ..Default::default()
        }
    }

    pub fn thresholds(&self) -> &MotionThresholds {
        &self.thresholds
    }

    pub fn is_stationary(&self) -> bool {
        self.is_stationary
    }

    pub fn stationary_since_ms(&self) -> Option<u64> {
        self.stationary_since_ms
    }

    pub fn last_reading(&self) -> Option<MotionReading> {
        self.last_reading
    }

    /// Classify one sample and update the stationary edge state.
    pub fn classify(&mut self, sample: &InertialSample) -> MotionReading {
        let accel = sample.accel_magnitude();
        let gyro = sample.gyro_magnitude();
        let t = &self.thresholds;
        let stationary_now = accel < t.stationary_accel && gyro < t.stationary_gyro;

        if stationary_now && !self.is_stationary {
            self.is_stationary = true;
            self.stationary_since_ms = Some(sample.timestamp_ms);
            debug!(at_ms = sample.timestamp_ms, accel, gyro, "motion: became stationary");
        } else if !stationary_now && self.is_stationary {
            self.is_stationary = false;
            self.stationary_since_ms = None;
            debug!(at_ms = sample.timestamp_ms, accel, gyro, "motion: started moving");
        }

        let state = if stationary_now {
            MotionState::Stationary
        } else if accel > t.high_accel || gyro > t.high_gyro {
            MotionState::HighMovement
        } else if accel > t.moderate_accel || gyro > t.moderate_gyro {
            MotionState::ModerateMovement
        } else {
            MotionState::LowMovement
        };

        let reading = MotionReading {
            state,
            accel_magnitude: accel,
            gyro_magnitude: gyro,
            is_stationary: self.is_stationary,
            stationary_since_ms: self.stationary_since_ms,
            timestamp_ms: sample.timestamp_ms,
        };
        self.last_reading = Some(reading);
        reading
    }

    /// Seconds spent stationary as of `now_ms`; zero while moving.
    pub fn stationary_duration_secs(&self, now_ms: u64) -> f64 {
        match (self.is_stationary, self.stationary_since_ms) {
            (true, Some(since)) => now_ms.saturating_sub(since) as f64 / 1000.0,
            _ => 0.0,
        }
    }

    pub fn is_stationary_for(&self, now_ms: u64, min_secs: f64) -> bool {
        self.is_stationary
            && self.stationary_since_ms.is_some()
            && self.stationary_duration_secs(now_ms) >= min_secs
    }

    /// Forget the stationary baseline.
    pub fn calibrate(&mut self) {
        self.is_stationary = false;
        self.stationary_since_ms = None;
        debug!("motion: classifier calibrated");
    }
}
