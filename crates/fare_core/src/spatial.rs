//! Spatial operations: great-circle distance between position fixes.
//!
//! This module provides:
//!
//! - **Haversine distance**: the single distance primitive used for trip accumulation
//! - **PositionFix**: one location sample reported by a location provider
//! - **Speed conversion**: metres per second to km/h for providers reporting SI units
//!
//! Every distance in the workspace goes through [haversine_km] so that accumulation
//! never mixes radii or formulas.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Fixes with a reported accuracy above this are considered imprecise.
pub const DEFAULT_MAX_ACCURACY_M: f64 = 20.0;

/// Great-circle distance in kilometres between two coordinates in decimal degrees.
///
/// Total function: identical points yield `0.0`, and the result is symmetric in its
/// arguments. No rounding is applied.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (lat1, lon1) = (lat1.to_radians(), lon1.to_radians());
    let (lat2, lon2) = (lat2.to_radians(), lon2.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let sin_dlat = (dlat * 0.5).sin();
    let sin_dlon = (dlon * 0.5).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Convert metres per second to kilometres per hour.
pub fn mps_to_kmh(mps: f64) -> f64 {
    mps * 3.6
}

/// One location sample. Speed is in km/h, timestamps are monotonic milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionFix {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub speed_kmh: f64,
    /// Horizontal accuracy radius in metres, when the provider reports one.
    #[serde(default)]
    pub accuracy_m: Option<f64>,
    pub timestamp_ms: u64,
}

impl PositionFix {
    pub fn new(latitude: f64, longitude: f64, speed_kmh: f64, timestamp_ms: u64) -> Self {
        Self {
            latitude,
            longitude,
            speed_kmh: speed_kmh.max(0.0),
            accuracy_m: None,
            timestamp_ms,
        }
    }

    pub fn with_accuracy(mut self, accuracy_m: f64) -> Self {
        self.accuracy_m = Some(accuracy_m);
        self
    }

    /// Distance to another fix in kilometres.
    pub fn distance_to(&self, other: &PositionFix) -> f64 {
        haversine_km(self.latitude, self.longitude, other.latitude, other.longitude)
    }

    pub fn has_finite_coordinates(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    /// True when the provider reported an accuracy no worse than `max_accuracy_m`.
    /// Fixes without an accuracy figure are never considered accurate.
    pub fn is_accurate(&self, max_accuracy_m: f64) -> bool {
        matches!(self.accuracy_m, Some(acc) if acc <= max_accuracy_m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_points_are_zero_distance() {
        assert_eq!(haversine_km(19.0760, 72.8777, 19.0760, 72.8777), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let ab = haversine_km(19.0760, 72.8777, 18.5204, 73.8567);
        let ba = haversine_km(18.5204, 73.8567, 19.0760, 72.8777);
        assert!((ab - ba).abs() < 1e-9);
        // Mumbai to Pune is roughly 120 km as the crow flies
        assert!(ab > 110.0 && ab < 130.0, "unexpected distance {ab}");
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let d = haversine_km(0.0, 0.0, 1.0, 0.0);
        assert!((d - 111.19).abs() < 0.01, "got {d}");
    }

    #[test]
    fn accuracy_check_requires_a_reported_value() {
        let fix = PositionFix::new(19.0, 72.0, 10.0, 0);
        assert!(!fix.is_accurate(DEFAULT_MAX_ACCURACY_M));
        assert!(fix.with_accuracy(12.0).is_accurate(DEFAULT_MAX_ACCURACY_M));
        assert!(!fix.with_accuracy(35.0).is_accurate(DEFAULT_MAX_ACCURACY_M));
    }

    #[test]
    fn negative_speed_is_clamped() {
        let fix = PositionFix::new(19.0, 72.0, -3.0, 0);
        assert_eq!(fix.speed_kmh, 0.0);
    }

    #[test]
    fn converts_metres_per_second() {
        assert!((mps_to_kmh(10.0) - 36.0).abs() < 1e-12);
    }
}
