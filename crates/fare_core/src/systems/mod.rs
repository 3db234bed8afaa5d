pub mod fare_update;
pub mod halt_detection;
pub mod inertial_sample;
pub mod position_fix;
pub mod trip_ended;
pub mod trip_started;

#[cfg(test)]
mod end_to_end_tests {
    use bevy_ecs::prelude::World;

    use crate::clock::{TripClock, TripEvent, ONE_SEC_MS};
    use crate::config::PathRetention;
    use crate::ecs::{TripState, TripStatus};
    use crate::halts::HaltTracker;
    use crate::motion::{Axes, InertialSample, MotionClassifier};
    use crate::pricing::TariffConfig;
    use crate::runner::{run_event, trip_schedule};
    use crate::spatial::PositionFix;
    use crate::telemetry::TripOutbox;

    fn trip_world(start: PositionFix) -> World {
        let mut world = World::new();
        world.insert_resource(TripState::new(start, false, PathRetention::unbounded()));
        world.insert_resource(TariffConfig::default());
        world.insert_resource(MotionClassifier::default());
        world.insert_resource(HaltTracker::default());
        world.insert_resource(TripOutbox::default());
        world.insert_resource(TripClock::default());
        world
    }

    #[test]
    fn sensor_halt_is_detected_even_when_gps_reports_speed() {
        let start = PositionFix::new(19.0760, 72.8777, 20.0, 0);
        let mut world = trip_world(start);
        let mut schedule = trip_schedule();

        run_event(&mut world, &mut schedule, TripEvent::trip_started(start));
        assert_eq!(world.resource::<TripState>().current_fare, 26.0);

        // Vehicle is still but GPS jitter reports 5 km/h
        let still = InertialSample::new(Axes::new(0.0, 0.0, 1.0), Axes::default(), ONE_SEC_MS);
        run_event(&mut world, &mut schedule, TripEvent::inertial_sample(still));
        run_event(
            &mut world,
            &mut schedule,
            TripEvent::position_fix(PositionFix::new(19.0760, 72.8777, 5.0, 2 * ONE_SEC_MS)),
        );

        let moving = InertialSample::new(
            Axes::new(1.0, 0.0, 1.0),
            Axes::new(0.3, 0.0, 0.0),
            31 * ONE_SEC_MS,
        );
        run_event(&mut world, &mut schedule, TripEvent::inertial_sample(moving));
        run_event(
            &mut world,
            &mut schedule,
            TripEvent::position_fix(PositionFix::new(19.0770, 72.8777, 20.0, 32 * ONE_SEC_MS)),
        );

        let state = world.resource::<TripState>();
        assert_eq!(state.halts.len(), 1);
        assert!((state.halts[0].duration_secs - 30.0).abs() < 1e-9);
        assert!((state.waiting_minutes - 0.5).abs() < 1e-9);
        assert_eq!(state.status, TripStatus::Active);
    }

    #[test]
    fn ended_trip_ignores_further_events() {
        let start = PositionFix::new(19.0760, 72.8777, 20.0, 0);
        let mut world = trip_world(start);
        let mut schedule = trip_schedule();

        run_event(&mut world, &mut schedule, TripEvent::trip_started(start));
        run_event(
            &mut world,
            &mut schedule,
            TripEvent::position_fix(PositionFix::new(19.0860, 72.8777, 30.0, 60 * ONE_SEC_MS)),
        );
        run_event(&mut world, &mut schedule, TripEvent::trip_ended(61 * ONE_SEC_MS));
        let frozen = world.resource::<TripState>().distance_km;

        run_event(
            &mut world,
            &mut schedule,
            TripEvent::position_fix(PositionFix::new(19.1860, 72.8777, 30.0, 90 * ONE_SEC_MS)),
        );

        let state = world.resource::<TripState>();
        assert_eq!(state.status, TripStatus::Ended);
        assert_eq!(state.distance_km, frozen);
        assert_eq!(state.end_time_ms, Some(61 * ONE_SEC_MS));
    }
}
