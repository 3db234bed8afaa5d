//! Collaborator interfaces for position and motion sources.
//!
//! The engine never talks to sensing hardware. Callers construct providers and hand
//! them to [drive_trip] (or call the session directly); a provider that cannot deliver
//! reports a [ProviderError] and the engine never substitutes data of its own.

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::clock::TripEvent;
use crate::error::ProviderError;
use crate::motion::InertialSample;
use crate::session::TripSession;
use crate::spatial::PositionFix;

/// Source of position fixes: a one-off read plus a pull-based continuous feed.
pub trait LocationProvider {
    /// Single on-demand read.
    fn current_position(&mut self) -> Result<PositionFix, ProviderError>;

    /// Begin continuous tracking. Must be called before [LocationProvider::next_fix].
    fn start_tracking(&mut self) -> Result<(), ProviderError>;

    /// Next fix of the feed, or `None` when the feed has ended.
    fn next_fix(&mut self) -> Option<PositionFix>;

    fn stop_tracking(&mut self);
}

/// Source of inertial samples delivered at a configurable interval.
pub trait MotionSensorProvider {
    fn start_monitoring(&mut self, interval_ms: u64) -> Result<(), ProviderError>;

    fn next_sample(&mut self) -> Option<InertialSample>;

    fn stop_monitoring(&mut self);
}

/// Replays a recorded list of fixes. The first fix doubles as the current position.
#[derive(Debug, Clone, Default)]
pub struct RecordedLocationFeed {
    fixes: VecDeque<PositionFix>,
    tracking: bool,
}

impl RecordedLocationFeed {
    pub fn new(fixes: impl IntoIterator<Item = PositionFix>) -> Self {
        Self {
            fixes: fixes.into_iter().collect(),
            tracking: false,
        }
    }

    pub fn remaining(&self) -> usize {
        self.fixes.len()
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking
    }
}

impl LocationProvider for RecordedLocationFeed {
    fn current_position(&mut self) -> Result<PositionFix, ProviderError> {
        self.fixes
            .pop_front()
            .ok_or_else(|| ProviderError::Unavailable("recording has no fixes".to_string()))
    }

    fn start_tracking(&mut self) -> Result<(), ProviderError> {
        self.tracking = true;
        Ok(())
    }

    fn next_fix(&mut self) -> Option<PositionFix> {
        if !self.tracking {
            return None;
        }
        self.fixes.pop_front()
    }

    fn stop_tracking(&mut self) {
        self.tracking = false;
    }
}

/// Replays recorded inertial samples. A recording made on a device without motion
/// sensors is represented with [RecordedMotionFeed::unavailable].
#[derive(Debug, Clone, Default)]
pub struct RecordedMotionFeed {
    samples: VecDeque<InertialSample>,
    available: bool,
    interval_ms: Option<u64>,
}

impl RecordedMotionFeed {
    pub fn new(samples: impl IntoIterator<Item = InertialSample>) -> Self {
        Self {
            samples: samples.into_iter().collect(),
            available: true,
            interval_ms: None,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            samples: VecDeque::new(),
            available: false,
            interval_ms: None,
        }
    }

    pub fn interval_ms(&self) -> Option<u64> {
        self.interval_ms
    }
}

impl MotionSensorProvider for RecordedMotionFeed {
    fn start_monitoring(&mut self, interval_ms: u64) -> Result<(), ProviderError> {
        if !self.available {
            return Err(ProviderError::Unavailable(
                "accelerometer or gyroscope missing".to_string(),
            ));
        }
        self.interval_ms = Some(interval_ms);
        Ok(())
    }

    fn next_sample(&mut self) -> Option<InertialSample> {
        self.interval_ms?;
        self.samples.pop_front()
    }

    fn stop_monitoring(&mut self) {
        self.interval_ms = None;
    }
}

/// Default sampling interval used when monitoring motion during a trip.
pub const DEFAULT_SENSOR_INTERVAL_MS: u64 = 500;

/// Pull both feeds into `session`, merging them by timestamp with inertial samples
/// first on ties, until the location feed ends. Returns the number of events applied.
///
/// A motion provider that fails to start is logged and the trip continues on GPS
/// speed alone.
pub fn drive_trip(
    session: &mut TripSession,
    location: &mut dyn LocationProvider,
    motion: Option<&mut dyn MotionSensorProvider>,
) -> Result<usize, ProviderError> {
    location.start_tracking()?;

    let mut motion = match motion {
        Some(provider) => match provider.start_monitoring(DEFAULT_SENSOR_INTERVAL_MS) {
            Ok(()) => Some(provider),
            Err(err) => {
                warn!(error = %err, "motion sensors unavailable; halts rely on GPS speed");
                None
            }
        },
        None => None,
    };

    let mut next_fix = location.next_fix().map(TripEvent::position_fix);
    let mut next_sample = motion
        .as_mut()
        .and_then(|m| m.next_sample())
        .map(TripEvent::inertial_sample);
    let mut applied = 0;

    while let Some(fix_event) = next_fix {
        let take_sample = matches!(&next_sample, Some(s) if s.sort_key() <= fix_event.sort_key());
        if take_sample {
            if let Some(sample) = next_sample.and_then(|e| e.sample().copied()) {
                session.on_inertial_sample(sample);
                applied += 1;
            }
            next_sample = motion
                .as_mut()
                .and_then(|m| m.next_sample())
                .map(TripEvent::inertial_sample);
        } else {
            if let Some(fix) = fix_event.fix().copied() {
                session.on_position_fix(fix);
                applied += 1;
            }
            next_fix = location.next_fix().map(TripEvent::position_fix);
        }
    }

    location.stop_tracking();
    if let Some(m) = motion.as_mut() {
        m.stop_monitoring();
    }
    debug!(applied, "recorded feeds drained");
    Ok(applied)
}
