//! Fixtures shared by unit tests, integration tests and benches.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::clock::ONE_SEC_MS;
use crate::motion::{Axes, InertialSample};
use crate::spatial::{PositionFix, EARTH_RADIUS_KM};

/// Start coordinate used across tests (Mumbai).
pub const MUMBAI_START: (f64, f64) = (19.0760, 72.8777);

/// Kilometres per degree of latitude on the haversine sphere.
pub fn km_per_degree_latitude() -> f64 {
    EARTH_RADIUS_KM.to_radians()
}

pub fn start_fix(timestamp_ms: u64) -> PositionFix {
    PositionFix::new(MUMBAI_START.0, MUMBAI_START.1, 0.0, timestamp_ms)
}

/// `steps` fixes heading due north from `from`, each `step_km` apart and
/// `step_ms` after the previous one. The first returned fix is one step away.
pub fn straight_north(
    from: &PositionFix,
    steps: usize,
    step_km: f64,
    step_ms: u64,
    speed_kmh: f64,
) -> Vec<PositionFix> {
    let step_deg = step_km / km_per_degree_latitude();
    (1..=steps)
        .map(|i| {
            PositionFix::new(
                from.latitude + step_deg * i as f64,
                from.longitude,
                speed_kmh,
                from.timestamp_ms + step_ms * i as u64,
            )
        })
        .collect()
}

/// `count` fixes at `at`'s coordinate reporting `speed_kmh`, one per `step_ms`.
pub fn parked(at: &PositionFix, count: usize, step_ms: u64, speed_kmh: f64) -> Vec<PositionFix> {
    (1..=count)
        .map(|i| {
            PositionFix::new(
                at.latitude,
                at.longitude,
                speed_kmh,
                at.timestamp_ms + step_ms * i as u64,
            )
        })
        .collect()
}

/// Flat, motionless device: gravity only on z.
pub fn still_sample(timestamp_ms: u64) -> InertialSample {
    InertialSample::new(Axes::new(0.0, 0.0, 1.0), Axes::default(), timestamp_ms)
}

/// Device in a moving vehicle with the given extra acceleration (g) and rotation (rad/s).
pub fn moving_sample(timestamp_ms: u64, accel_g: f64, gyro: f64) -> InertialSample {
    InertialSample::new(
        Axes::new(accel_g, 0.0, 1.0),
        Axes::new(gyro, 0.0, 0.0),
        timestamp_ms,
    )
}

/// Seeded random fix within roughly 50 km of [MUMBAI_START].
pub fn random_fix(rng: &mut StdRng, timestamp_ms: u64) -> PositionFix {
    PositionFix::new(
        MUMBAI_START.0 + rng.gen_range(-0.45..0.45),
        MUMBAI_START.1 + rng.gen_range(-0.45..0.45),
        rng.gen_range(0.0..80.0),
        timestamp_ms,
    )
}

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Timestamp `secs` seconds after `base_ms`.
pub fn after_secs(base_ms: u64, secs: u64) -> u64 {
    base_ms + secs * ONE_SEC_MS
}
