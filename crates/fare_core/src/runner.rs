//! Event runner: routes one trip event at a time into the ECS.
//!
//! Clock bookkeeping and event routing happen here, outside systems. Each step records
//! the event timestamp on [TripClock], inserts the event as [CurrentEvent], then runs
//! the schedule.

use bevy_ecs::prelude::{Res, Schedule, World};
use bevy_ecs::schedule::IntoSystemConfigs;
use tracing::warn;

use crate::clock::{CurrentEvent, EventKind, TripClock, TripEvent};
use crate::systems::{
    fare_update::fare_update_system, halt_detection::halt_detection_system,
    inertial_sample::inertial_sample_system, position_fix::position_fix_system,
    trip_ended::trip_ended_system, trip_started::trip_started_system,
};

fn is_trip_started(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::TripStarted)
        .unwrap_or(false)
}

fn is_inertial_sample(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::InertialSample)
        .unwrap_or(false)
}

fn is_position_fix(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::PositionFix)
        .unwrap_or(false)
}

fn is_trip_ended(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::TripEnded)
        .unwrap_or(false)
}

/// Condition: the event can change distance or waiting time.
fn changes_fare(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind != EventKind::InertialSample)
        .unwrap_or(false)
}

/// Builds the trip schedule. Systems run chained in this order so that, for a
/// position fix, the halt decision sees the previous location and the fare sees
/// the updated distance and waiting time.
pub fn trip_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            trip_started_system.run_if(is_trip_started),
            inertial_sample_system.run_if(is_inertial_sample),
            halt_detection_system.run_if(is_position_fix),
            position_fix_system.run_if(is_position_fix),
            trip_ended_system.run_if(is_trip_ended),
            fare_update_system.run_if(changes_fare),
        )
            .chain(),
    );
    schedule
}

/// Applies one event. Late events are applied at face value; they are only counted
/// and logged.
pub fn run_event(world: &mut World, schedule: &mut Schedule, event: TripEvent) {
    let in_order = world
        .get_resource_or_insert_with(TripClock::default)
        .observe(event.timestamp_ms);
    if !in_order {
        warn!(
            kind = ?event.kind,
            at_ms = event.timestamp_ms,
            "event earlier than the latest processed one; applied as is"
        );
    }
    world.insert_resource(CurrentEvent(event));
    schedule.run(world);
}
