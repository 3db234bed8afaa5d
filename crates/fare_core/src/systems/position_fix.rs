use bevy_ecs::prelude::{Res, ResMut};
use tracing::{trace, warn};

use crate::clock::CurrentEvent;
use crate::ecs::TripState;
use crate::spatial::DEFAULT_MAX_ACCURACY_M;

/// Appends the fix to the path and accumulates the haversine segment from the
/// previous fix. Every fix counts towards distance; imprecise ones are only tallied.
/// A fix without finite coordinates has no segment: it is counted and dropped.
pub fn position_fix_system(event: Res<CurrentEvent>, mut state: ResMut<TripState>) {
    if !state.is_active() {
        return;
    }
    let Some(fix) = event.0.fix().copied() else {
        return;
    };

    state.fixes_processed += 1;
    state.duration_secs = fix.timestamp_ms.saturating_sub(state.start_time_ms) as f64 / 1000.0;
    if !fix.has_finite_coordinates() {
        state.invalid_fixes += 1;
        warn!(
            at_ms = fix.timestamp_ms,
            lat = fix.latitude,
            lon = fix.longitude,
            "fix without finite coordinates dropped"
        );
        return;
    }

    let segment_km = if state.last_fix.has_finite_coordinates() {
        state.last_fix.distance_to(&fix)
    } else {
        0.0
    };
    state.distance_km += segment_km;
    state.last_fix = fix;
    state.path.push(fix);
    if matches!(fix.accuracy_m, Some(acc) if acc > DEFAULT_MAX_ACCURACY_M) {
        state.low_accuracy_fixes += 1;
    }

    trace!(
        at_ms = fix.timestamp_ms,
        segment_km,
        distance_km = state.distance_km,
        speed_kmh = fix.speed_kmh,
        "position fix applied"
    );
}
