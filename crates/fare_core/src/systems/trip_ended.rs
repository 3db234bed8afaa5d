use bevy_ecs::prelude::{Res, ResMut};
use tracing::info;

use crate::clock::CurrentEvent;
use crate::ecs::{TripState, TripStatus};
use crate::halts::HaltTracker;
use crate::telemetry::{TripOutbox, TripUpdate};

/// Closes any open halt at the end time and freezes the trip. Runs at most once per
/// trip: after it the status is `Ended` and every other system becomes a no-op.
pub fn trip_ended_system(
    event: Res<CurrentEvent>,
    mut tracker: ResMut<HaltTracker>,
    mut state: ResMut<TripState>,
    mut outbox: ResMut<TripOutbox>,
) {
    if !state.is_active() {
        return;
    }
    let end_ms = event.0.timestamp_ms;
    let location = state.last_fix;
    if let Some(halt) = tracker.flush(end_ms, Some(&location)) {
        state.credit_halt(halt);
        outbox.0.push(TripUpdate::HaltClosed(halt));
    }
    state.end_time_ms = Some(end_ms);
    state.duration_secs = end_ms.saturating_sub(state.start_time_ms) as f64 / 1000.0;
    state.status = TripStatus::Ended;

    info!(
        distance_km = state.distance_km,
        waiting_minutes = state.waiting_minutes,
        halts = state.halts.len(),
        duration_secs = state.duration_secs,
        "trip ended"
    );
}
