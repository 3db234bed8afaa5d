use bevy_ecs::prelude::{Res, ResMut};
use tracing::info;

use crate::clock::CurrentEvent;
use crate::config::PathRetention;
use crate::ecs::TripState;

/// Anchors the trip on the initial fix: start time, start location, distance origin
/// and the first path point all come from the event. Night pricing was decided when
/// the state was created and is kept.
pub fn trip_started_system(event: Res<CurrentEvent>, mut state: ResMut<TripState>) {
    let Some(fix) = event.0.fix().copied() else {
        return;
    };
    let is_night = state.is_night;
    let retention = PathRetention {
        max_points: state.path.max_points(),
    };
    *state = TripState::new(fix, is_night, retention);
    info!(
        lat = fix.latitude,
        lon = fix.longitude,
        at_ms = fix.timestamp_ms,
        night = is_night,
        "trip started"
    );
}
