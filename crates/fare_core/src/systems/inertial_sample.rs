use bevy_ecs::prelude::{Res, ResMut};

use crate::clock::CurrentEvent;
use crate::ecs::TripState;
use crate::motion::MotionClassifier;
use crate::telemetry::{TripOutbox, TripUpdate};

/// Classifies the sample. The resulting stationary flag is read by the halt detection
/// of the next position fix, not the current one.
pub fn inertial_sample_system(
    event: Res<CurrentEvent>,
    mut classifier: ResMut<MotionClassifier>,
    mut state: ResMut<TripState>,
    mut outbox: ResMut<TripOutbox>,
) {
    if !state.is_active() {
        return;
    }
    let Some(sample) = event.0.sample() else {
        return;
    };
    let reading = classifier.classify(sample);
    state.last_motion = Some(reading);
    outbox.0.push(TripUpdate::Motion(reading));
}
