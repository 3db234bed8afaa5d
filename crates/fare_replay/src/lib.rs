//! Replays recorded trips through the fare engine.

pub mod load;
pub mod report;

use std::path::PathBuf;

use fare_core::pricing::current_local_hour;
use fare_core::providers::{drive_trip, LocationProvider, MotionSensorProvider};
use fare_core::providers::{RecordedLocationFeed, RecordedMotionFeed};
use fare_core::{EngineConfig, TamperingThreshold, TripSession};
use tracing::info;

pub use report::ReplayReport;

#[derive(Debug, Clone, Default)]
pub struct ReplayOptions {
    pub fixes: PathBuf,
    pub samples: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub charged_fare: Option<f64>,
    pub luggage_count: u32,
    pub threshold: Option<TamperingThreshold>,
    /// Forces day or night pricing; the local clock decides when unset.
    pub night: Option<bool>,
}

pub fn replay(options: &ReplayOptions) -> Result<ReplayReport, Box<dyn std::error::Error>> {
    let mut config = match &options.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };
    if let Some(threshold) = options.threshold {
        config = config.with_tampering_threshold(threshold);
    }

    let fixes = load::load_fixes(&options.fixes)?;
    let mut location = RecordedLocationFeed::new(fixes);
    let mut motion = match &options.samples {
        Some(path) => Some(RecordedMotionFeed::new(load::load_samples(path)?)),
        None => None,
    };

    let tariff = config.tariff.clone();
    let hour = match options.night {
        Some(true) => tariff.night_start_hour,
        Some(false) => (0..24).find(|h| !tariff.is_night_hour(*h)).unwrap_or(12),
        None => current_local_hour(),
    };
    let threshold = config.tampering.fraction();
    let mut session = TripSession::start(config, location.current_position(), hour)?;
    let applied = drive_trip(
        &mut session,
        &mut location,
        motion.as_mut().map(|m| m as &mut dyn MotionSensorProvider),
    )?;
    info!(events = applied, "recording replayed");

    let trip = session.end();
    let verdict = match options.charged_fare {
        Some(charged) => Some(trip.verify(charged, options.luggage_count, &tariff, threshold)?),
        None => None,
    };
    Ok(ReplayReport::new(&trip, &tariff, options.luggage_count, verdict))
}
