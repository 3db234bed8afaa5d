//! Trip snapshots and update delivery to observers.

use std::sync::mpsc::{self, Receiver, Sender};

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ecs::{TripState, TripStatus};
use crate::error::TamperingError;
use crate::halts::HaltInterval;
use crate::motion::MotionReading;
use crate::pricing::TariffConfig;
use crate::spatial::PositionFix;
use crate::tampering::{detect_tampering, TamperingVerdict};

/// Read-only copy of the trip state at one point of the event timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripSnapshot {
    pub status: TripStatus,
    pub distance_km: f64,
    pub waiting_minutes: f64,
    pub halts: Vec<HaltInterval>,
    pub current_fare: f64,
    pub start_time_ms: u64,
    pub end_time_ms: Option<u64>,
    pub duration_secs: f64,
    pub is_night: bool,
    pub start_location: PositionFix,
    pub current_location: PositionFix,
    pub path: Vec<PositionFix>,
    pub dropped_path_points: u64,
    pub last_motion: Option<MotionReading>,
    pub fixes_processed: u64,
    pub low_accuracy_fixes: u64,
    pub invalid_fixes: u64,
    pub out_of_order_events: u64,
}

impl TripSnapshot {
    pub fn capture(state: &TripState, out_of_order_events: u64) -> Self {
        Self {
            status: state.status,
            distance_km: state.distance_km,
            waiting_minutes: state.waiting_minutes,
            halts: state.halts.clone(),
            current_fare: state.current_fare,
            start_time_ms: state.start_time_ms,
            end_time_ms: state.end_time_ms,
            duration_secs: state.duration_secs,
            is_night: state.is_night,
            start_location: state.start_location,
            current_location: state.last_fix,
            path: state.path.to_vec(),
            dropped_path_points: state.path.dropped_points(),
            last_motion: state.last_motion,
            fixes_processed: state.fixes_processed,
            low_accuracy_fixes: state.low_accuracy_fixes,
            invalid_fixes: state.invalid_fixes,
            out_of_order_events,
        }
    }

    pub fn is_ended(&self) -> bool {
        self.status == TripStatus::Ended
    }

    pub fn halt_count(&self) -> usize {
        self.halts.len()
    }

    /// Fare for this trip if the passenger carried `luggage_count` qualifying packages.
    pub fn fare_with_luggage(&self, tariff: &TariffConfig, luggage_count: u32) -> f64 {
        tariff.total_fare(
            self.distance_km,
            self.waiting_minutes,
            self.is_night,
            luggage_count,
        )
    }

    /// Compare a charged fare against this trip's fair fare.
    pub fn verify(
        &self,
        charged_fare: f64,
        luggage_count: u32,
        tariff: &TariffConfig,
        threshold_fraction: f64,
    ) -> Result<TamperingVerdict, TamperingError> {
        detect_tampering(
            self.fare_with_luggage(tariff, luggage_count),
            charged_fare,
            threshold_fraction,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TripUpdate {
    Progress(TripSnapshot),
    Motion(MotionReading),
    HaltClosed(HaltInterval),
    Ended(TripSnapshot),
}

/// Updates raised by systems during one schedule run; drained by the session.
#[derive(Debug, Default, Resource)]
pub struct TripOutbox(pub Vec<TripUpdate>);

/// Fan-out of trip updates. Each subscriber gets its own channel; a subscriber that
/// went away is pruned on the next publish and never holds up the others.
#[derive(Debug, Default)]
pub struct TripObservers {
    subscribers: Vec<Sender<TripUpdate>>,
}

impl TripObservers {
    pub fn subscribe(&mut self) -> Receiver<TripUpdate> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    pub fn publish(&mut self, update: &TripUpdate) {
        let before = self.subscribers.len();
        self.subscribers.retain(|tx| tx.send(update.clone()).is_ok());
        let dropped = before - self.subscribers.len();
        if dropped > 0 {
            debug!(dropped, "removed disconnected trip observers");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PathRetention;

    fn state() -> TripState {
        let mut state = TripState::new(
            PositionFix::new(19.076, 72.8777, 0.0, 0),
            false,
            PathRetention::unbounded(),
        );
        state.distance_km = 12.0;
        state
    }

    #[test]
    fn dropped_subscriber_does_not_block_others() {
        let mut observers = TripObservers::default();
        let first = observers.subscribe();
        let second = observers.subscribe();
        drop(first);

        let snapshot = TripSnapshot::capture(&state(), 0);
        observers.publish(&TripUpdate::Progress(snapshot.clone()));

        assert_eq!(observers.len(), 1);
        assert_eq!(second.try_recv().expect("update"), TripUpdate::Progress(snapshot));
    }

    #[test]
    fn verify_uses_luggage_inclusive_fare() {
        let tariff = TariffConfig::default();
        let snapshot = TripSnapshot::capture(&state(), 0);
        assert_eq!(snapshot.fare_with_luggage(&tariff, 0), 206.0);
        assert_eq!(snapshot.fare_with_luggage(&tariff, 1), 212.0);

        let verdict = snapshot.verify(212.0, 1, &tariff, 0.10).expect("verdict");
        assert!(!verdict.is_tampered);
        let verdict = snapshot.verify(250.0, 0, &tariff, 0.10).expect("verdict");
        assert!(verdict.is_tampered);
        assert!(verdict.overcharged);
    }
}
