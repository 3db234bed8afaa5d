//! Halt detection: turns (speed, stationary flag, timestamp) observations into
//! halt intervals eligible for waiting charges.
//!
//! Either source can assert "stopped": the motion classifier's stationary flag or a
//! GPS speed under [HaltConfig::stationary_speed_kmh]. The first stationary observation
//! opens a halt; the first moving observation closes it. Only halts strictly longer
//! than [HaltConfig::min_halt_secs] are materialized, so traffic-light stops are never
//! charged.

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::spatial::PositionFix;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HaltConfig {
    /// Halts must last strictly longer than this to count.
    pub min_halt_secs: f64,
    /// GPS speeds below this are treated as stopped.
    pub stationary_speed_kmh: f64,
}

impl Default for HaltConfig {
    fn default() -> Self {
        Self {
            min_halt_secs: 10.0,
            stationary_speed_kmh: 2.0,
        }
    }
}

/// A closed halt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HaltInterval {
    pub start_ms: u64,
    pub end_ms: u64,
    pub duration_secs: f64,
    /// Last known position while halted, if any fix had been seen.
    pub location: Option<PositionFix>,
}

impl HaltInterval {
    pub fn waiting_minutes(&self) -> f64 {
        self.duration_secs / 60.0
    }
}

/// One input to the halt state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HaltObservation {
    pub speed_kmh: f64,
    pub sensor_stationary: bool,
    pub timestamp_ms: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HaltPhase {
    #[default]
    Moving,
    Halting {
        since_ms: u64,
    },
}

#[derive(Debug, Clone, Default, Resource)]
pub struct HaltTracker {
    config: HaltConfig,
    phase: HaltPhase,
}

impl HaltTracker {
    pub fn new(config: HaltConfig) -> Self {
        Self {
            config,
            phase: HaltPhase::Moving,
        }
    }

    pub fn config(&self) -> &HaltConfig {
        &self.config
    }

    pub fn phase(&self) -> HaltPhase {
        self.phase
    }

    pub fn is_halting(&self) -> bool {
        matches!(self.phase, HaltPhase::Halting { .. })
    }

    pub fn is_stationary(&self, obs: &HaltObservation) -> bool {
        obs.sensor_stationary || obs.speed_kmh < self.config.stationary_speed_kmh
    }

    /// Advance the state machine. Returns a halt when one closes and qualifies.
    pub fn observe(
        &mut self,
        obs: HaltObservation,
        location: Option<&PositionFix>,
    ) -> Option<HaltInterval> {
        let stationary = self.is_stationary(&obs);
        match (self.phase, stationary) {
            (HaltPhase::Moving, true) => {
                debug!(at_ms = obs.timestamp_ms, speed_kmh = obs.speed_kmh, "halt opened");
                self.phase = HaltPhase::Halting {
                    since_ms: obs.timestamp_ms,
                };
                None
            }
            (HaltPhase::Halting { .. }, true) | (HaltPhase::Moving, false) => None,
            (HaltPhase::Halting { .. }, false) => self.close(obs.timestamp_ms, location),
        }
    }

    /// Close any open halt at `now_ms`. Called once on trip end.
    pub fn flush(&mut self, now_ms: u64, location: Option<&PositionFix>) -> Option<HaltInterval> {
        self.close(now_ms, location)
    }

    fn close(&mut self, now_ms: u64, location: Option<&PositionFix>) -> Option<HaltInterval> {
        let HaltPhase::Halting { since_ms } = std::mem::take(&mut self.phase) else {
            return None;
        };
        let duration_secs = now_ms.saturating_sub(since_ms) as f64 / 1000.0;
        if duration_secs > self.config.min_halt_secs {
            debug!(since_ms, now_ms, duration_secs, "halt closed");
            Some(HaltInterval {
                start_ms: since_ms,
                end_ms: now_ms,
                duration_secs,
                location: location.copied(),
            })
        } else {
            debug!(since_ms, now_ms, duration_secs, "halt too short, discarded");
            None
        }
    }
}
