use bevy_ecs::prelude::{Res, ResMut};

use crate::ecs::TripState;
use crate::pricing::TariffConfig;

/// Recomputes the running fare from distance and waiting time. Luggage is not known
/// while the trip is running, so it is left out here.
pub fn fare_update_system(tariff: Res<TariffConfig>, mut state: ResMut<TripState>) {
    let fare = tariff.total_fare(state.distance_km, state.waiting_minutes, state.is_night, 0);
    if fare != state.current_fare {
        state.current_fare = fare;
    }
}
