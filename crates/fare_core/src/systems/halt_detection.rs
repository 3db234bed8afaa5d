use bevy_ecs::prelude::{Res, ResMut};

use crate::clock::CurrentEvent;
use crate::ecs::TripState;
use crate::halts::{HaltObservation, HaltTracker};
use crate::motion::MotionClassifier;
use crate::telemetry::{TripOutbox, TripUpdate};

/// Feeds the halt tracker with the fix speed and the classifier's latest stationary
/// flag. Runs before the fix is appended, so a closed halt is located at the last
/// position seen while halted.
pub fn halt_detection_system(
    event: Res<CurrentEvent>,
    classifier: Res<MotionClassifier>,
    mut tracker: ResMut<HaltTracker>,
    mut state: ResMut<TripState>,
    mut outbox: ResMut<TripOutbox>,
) {
    if !state.is_active() {
        return;
    }
    let Some(fix) = event.0.fix() else {
        return;
    };
    let observation = HaltObservation {
        speed_kmh: fix.speed_kmh,
        sensor_stationary: classifier.is_stationary(),
        timestamp_ms: fix.timestamp_ms,
    };
    let location = state.last_fix;
    if let Some(halt) = tracker.observe(observation, Some(&location)) {
        state.credit_halt(halt);
        outbox.0.push(TripUpdate::HaltClosed(halt));
    }
}
