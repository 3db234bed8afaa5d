use std::collections::VecDeque;

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::config::PathRetention;
use crate::halts::HaltInterval;
use crate::motion::MotionReading;
use crate::spatial::PositionFix;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TripStatus {
    Active,
    Ended,
}

/// Recorded trip path. Optionally capped; evicted points are counted, never re-read.
#[derive(Debug, Clone, Default)]
pub struct TripPath {
    points: VecDeque<PositionFix>,
    max_points: Option<usize>,
    dropped_points: u64,
}

impl TripPath {
    pub fn new(retention: PathRetention) -> Self {
        Self {
            points: VecDeque::new(),
            max_points: retention.max_points,
            dropped_points: 0,
        }
    }

    pub fn push(&mut self, fix: PositionFix) {
        if let Some(cap) = self.max_points {
            while self.points.len() >= cap.max(1) {
                self.points.pop_front();
                self.dropped_points += 1;
            }
        }
        self.points.push_back(fix);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn max_points(&self) -> Option<usize> {
        self.max_points
    }

    pub fn dropped_points(&self) -> u64 {
        self.dropped_points
    }

    pub fn iter(&self) -> impl Iterator<Item = &PositionFix> {
        self.points.iter()
    }

    pub fn to_vec(&self) -> Vec<PositionFix> {
        self.points.iter().copied().collect()
    }
}

/// Aggregate state of the active trip. Lives in the session's world as a resource;
/// systems are the only writers.
#[derive(Debug, Clone, Resource)]
pub struct TripState {
    pub status: TripStatus,
    /// Monotonically non-decreasing.
    pub distance_km: f64,
    /// Monotonically non-decreasing; credited only by closed halts.
    pub waiting_minutes: f64,
    pub halts: Vec<HaltInterval>,
    pub current_fare: f64,
    pub start_time_ms: u64,
    /// Set once, by the trip-ended system.
    pub end_time_ms: Option<u64>,
    pub duration_secs: f64,
    /// Decided from the local hour at trip start and kept for the whole trip.
    pub is_night: bool,
    pub start_location: PositionFix,
    /// Previous fix for distance accumulation; independent of path retention.
    pub last_fix: PositionFix,
    pub path: TripPath,
    pub last_motion: Option<MotionReading>,
    pub fixes_processed: u64,
    pub low_accuracy_fixes: u64,
    /// Fixes with a non-finite coordinate; they add no distance and are not stored.
    pub invalid_fixes: u64,
}

impl TripState {
    pub fn new(initial_fix: PositionFix, is_night: bool, retention: PathRetention) -> Self {
        let mut path = TripPath::new(retention);
        path.push(initial_fix);
        Self {
            status: TripStatus::Active,
            distance_km: 0.0,
            waiting_minutes: 0.0,
            halts: Vec::new(),
            current_fare: 0.0,
            start_time_ms: initial_fix.timestamp_ms,
            end_time_ms: None,
            duration_secs: 0.0,
            is_night,
            start_location: initial_fix,
            last_fix: initial_fix,
            path,
            last_motion: None,
            fixes_processed: 1,
            low_accuracy_fixes: 0,
            invalid_fixes: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == TripStatus::Active
    }

    /// Credit a closed halt: record it and add its duration to waiting time.
    pub fn credit_halt(&mut self, halt: HaltInterval) {
        self.waiting_minutes += halt.waiting_minutes();
        self.halts.push(halt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capped_path_evicts_oldest_points() {
        let mut path = TripPath::new(PathRetention::capped(3));
        for ts in 0..5 {
            path.push(PositionFix::new(19.0, 72.0, 10.0, ts));
        }
        assert_eq!(path.len(), 3);
        assert_eq!(path.dropped_points(), 2);
        let stamps: Vec<u64> = path.iter().map(|p| p.timestamp_ms).collect();
        assert_eq!(stamps, vec![2, 3, 4]);
    }

    #[test]
    fn new_trip_is_seeded_with_initial_fix() {
        let fix = PositionFix::new(19.076, 72.8777, 0.0, 1_000);
        let state = TripState::new(fix, false, PathRetention::unbounded());
        assert!(state.is_active());
        assert_eq!(state.path.len(), 1);
        assert_eq!(state.start_time_ms, 1_000);
        assert_eq!(state.distance_km, 0.0);
        assert_eq!(state.last_fix, fix);
    }
}
