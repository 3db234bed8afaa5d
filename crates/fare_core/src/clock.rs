//! Trip timeline: the events a session processes and the clock they advance.
//!
//! Events are applied in arrival order. The clock remembers the latest timestamp seen
//! so that a late event can be detected and logged; it is still applied at face value.

use bevy_ecs::prelude::Resource;

use crate::motion::InertialSample;
use crate::spatial::PositionFix;

pub const ONE_SEC_MS: u64 = 1000;
pub const ONE_MIN_MS: u64 = 60 * ONE_SEC_MS;

/// Declaration order is the tie-break when two feeds report the same timestamp:
/// sensor data goes first so it can influence the fix that follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventKind {
    TripStarted,
    InertialSample,
    PositionFix,
    TripEnded,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventPayload {
    Fix(PositionFix),
    Sample(InertialSample),
    None,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripEvent {
    pub timestamp_ms: u64,
    pub kind: EventKind,
    pub payload: EventPayload,
}

impl TripEvent {
    pub fn trip_started(fix: PositionFix) -> Self {
        Self {
            timestamp_ms: fix.timestamp_ms,
            kind: EventKind::TripStarted,
            payload: EventPayload::Fix(fix),
        }
    }

    pub fn position_fix(fix: PositionFix) -> Self {
        Self {
            timestamp_ms: fix.timestamp_ms,
            kind: EventKind::PositionFix,
            payload: EventPayload::Fix(fix),
        }
    }

    pub fn inertial_sample(sample: InertialSample) -> Self {
        Self {
            timestamp_ms: sample.timestamp_ms,
            kind: EventKind::InertialSample,
            payload: EventPayload::Sample(sample),
        }
    }

    pub fn trip_ended(timestamp_ms: u64) -> Self {
        Self {
            timestamp_ms,
            kind: EventKind::TripEnded,
            payload: EventPayload::None,
        }
    }

    pub fn fix(&self) -> Option<&PositionFix> {
        match &self.payload {
            EventPayload::Fix(fix) => Some(fix),
            _ => None,
        }
    }

    pub fn sample(&self) -> Option<&InertialSample> {
        match &self.payload {
            EventPayload::Sample(sample) => Some(sample),
            _ => None,
        }
    }

    /// Merge key for interleaving feeds: timestamp first, then [EventKind] order.
    pub fn sort_key(&self) -> (u64, EventKind) {
        (self.timestamp_ms, self.kind)
    }
}

/// The event currently being processed by the schedule.
#[derive(Debug, Clone, Copy, Resource)]
pub struct CurrentEvent(pub TripEvent);

#[derive(Debug, Default, Resource)]
pub struct TripClock {
    latest_ms: Option<u64>,
    out_of_order: u64,
}

impl TripClock {
    /// Latest timestamp observed so far.
    pub fn now(&self) -> Option<u64> {
        self.latest_ms
    }

    /// Record an event timestamp. Returns `false` when it is earlier than one already seen.
    pub fn observe(&mut self, timestamp_ms: u64) -> bool {
        match self.latest_ms {
            Some(latest) if timestamp_ms < latest => {
                self.out_of_order += 1;
                false
            }
            _ => {
                self.latest_ms = Some(timestamp_ms);
                true
            }
        }
    }

    pub fn out_of_order_events(&self) -> u64 {
        self.out_of_order
    }
}
