//! One trip, end to end.
//!
//! A [TripSession] owns a world holding the trip state and the stateful detectors,
//! plus the schedule that applies events to them. Every mutation takes `&mut self`
//! and returns a value snapshot; observers receive the same snapshots over channels.

use std::sync::mpsc::Receiver;

use bevy_ecs::prelude::{Schedule, World};
use tracing::{info, warn};

use crate::clock::{TripClock, TripEvent};
use crate::config::EngineConfig;
use crate::ecs::TripState;
use crate::error::{ProviderError, TripError};
use crate::halts::HaltTracker;
use crate::motion::{InertialSample, MotionClassifier, MotionReading};
use crate::pricing::{current_local_hour, TariffConfig};
use crate::providers::LocationProvider;
use crate::runner::{run_event, trip_schedule};
use crate::spatial::PositionFix;
use crate::tampering::TamperingVerdict;
use crate::telemetry::{TripObservers, TripOutbox, TripSnapshot, TripUpdate};

pub struct TripSession {
    world: World,
    schedule: Schedule,
    observers: TripObservers,
    config: EngineConfig,
}

impl TripSession {
    /// Start a trip on `initial_fix`. `local_hour` decides the night surcharge for the
    /// whole trip. A failed acquisition is not retried.
    pub fn start(
        config: EngineConfig,
        initial_fix: Result<PositionFix, ProviderError>,
        local_hour: u32,
    ) -> Result<Self, TripError> {
        config.validate()?;
        let fix = initial_fix.map_err(|err| {
            warn!(error = %err, "could not acquire a starting position");
            TripError::NoFix(err)
        })?;

        let is_night = config.tariff.is_night_hour(local_hour);
        let mut world = World::new();
        world.insert_resource(TripState::new(fix, is_night, config.path));
        world.insert_resource(config.tariff.clone());
        world.insert_resource(MotionClassifier::new(config.motion));
        world.insert_resource(HaltTracker::new(config.halts));
        world.insert_resource(TripOutbox::default());
        world.insert_resource(TripClock::default());

        let mut session = Self {
            world,
            schedule: trip_schedule(),
            observers: TripObservers::default(),
            config,
        };
        session.apply(TripEvent::trip_started(fix));
        Ok(session)
    }

    /// Start a trip on the provider's current position and the local wall-clock hour.
    pub fn start_with_provider(
        config: EngineConfig,
        provider: &mut dyn LocationProvider,
    ) -> Result<Self, TripError> {
        let fix = provider.current_position();
        Self::start(config, fix, current_local_hour())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn subscribe(&mut self) -> Receiver<TripUpdate> {
        self.observers.subscribe()
    }

    pub fn snapshot(&self) -> TripSnapshot {
        let out_of_order = self
            .world
            .get_resource::<TripClock>()
            .map(TripClock::out_of_order_events)
            .unwrap_or(0);
        TripSnapshot::capture(self.world.resource::<TripState>(), out_of_order)
    }

    pub fn on_position_fix(&mut self, fix: PositionFix) -> TripSnapshot {
        self.apply(TripEvent::position_fix(fix));
        let snapshot = self.snapshot();
        self.observers
            .publish(&TripUpdate::Progress(snapshot.clone()));
        snapshot
    }

    /// Classify one sample. The stationary flag it yields is used by the next fix.
    pub fn on_inertial_sample(&mut self, sample: InertialSample) -> MotionReading {
        self.apply(TripEvent::inertial_sample(sample));
        self.world
            .resource::<MotionClassifier>()
            .last_reading()
            .unwrap_or_default()
    }

    /// Verify a charged fare against the fair fare including luggage, using the
    /// configured tampering tolerance.
    pub fn verify_charged_fare(
        &self,
        charged_fare: f64,
        luggage_count: u32,
    ) -> Result<TamperingVerdict, TripError> {
        let verdict = self.snapshot().verify(
            charged_fare,
            luggage_count,
            self.world.resource::<TariffConfig>(),
            self.config.tampering.fraction(),
        )?;
        if verdict.is_tampered {
            warn!(
                computed = verdict.computed_fare,
                charged = verdict.charged_fare,
                percent = verdict.percentage_difference,
                "charged fare outside tolerance"
            );
        }
        Ok(verdict)
    }

    /// End the trip at the latest event time seen.
    pub fn end(self) -> TripSnapshot {
        let end_ms = self
            .world
            .get_resource::<TripClock>()
            .and_then(TripClock::now)
            .unwrap_or_else(|| self.world.resource::<TripState>().start_time_ms);
        self.end_at(end_ms)
    }

    /// End the trip at `timestamp_ms`, closing any halt still open at that time.
    pub fn end_at(mut self, timestamp_ms: u64) -> TripSnapshot {
        self.apply(TripEvent::trip_ended(timestamp_ms));
        let snapshot = self.snapshot();
        info!(fare = snapshot.current_fare, "final fare");
        self.observers.publish(&TripUpdate::Ended(snapshot.clone()));
        snapshot
    }

    fn apply(&mut self, event: TripEvent) {
        run_event(&mut self.world, &mut self.schedule, event);
        let updates = std::mem::take(&mut self.world.resource_mut::<TripOutbox>().0);
        for update in &updates {
            self.observers.publish(update);
        }
    }
}
