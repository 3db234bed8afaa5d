//! Official fare computation from the published auto-rickshaw tariff card.
//!
//! Formula for [TariffConfig::total_fare]:
//!
//! 1. `fare = base_fare(distance)` (minimum fare floor, rounded half-up)
//! 2. `+ per_km_rate × waiting_charge_rate × waiting_minutes`
//! 3. `+ luggage_count × luggage_charge`
//! 4. `+ fare × night_surcharge` during the night window
//! 5. rounded half-up to a whole currency unit
//!
//! Everything here is pure except [current_local_hour] and [TariffConfig::is_night_now],
//! which read the wall clock.

use std::collections::BTreeMap;

use bevy_ecs::prelude::Resource;
use chrono::{Local, Timelike};
use serde::{Deserialize, Serialize};

/// Minimum fare in rupees.
pub const MIN_FARE: f64 = 26.00;

/// Per-kilometre rate in rupees.
pub const PER_KM_RATE: f64 = 17.14;

/// Night surcharge as a fraction of the fare.
pub const NIGHT_SURCHARGE: f64 = 0.25;

/// Waiting is charged per minute at this fraction of the per-km rate.
pub const WAITING_CHARGE_RATE: f64 = 0.10;

/// Charge per qualifying package (larger than 60x40 cm).
pub const LUGGAGE_CHARGE: f64 = 6.00;

pub const NIGHT_START_HOUR: u32 = 0;
pub const NIGHT_END_HOUR: u32 = 5;

/// Round to the nearest whole unit; a fractional part of 0.5 or more rounds up.
pub fn round_half_up(amount: f64) -> f64 {
    (amount + 0.5).floor()
}

/// Current hour on the local clock (0–23).
pub fn current_local_hour() -> u32 {
    Local::now().hour()
}

/// Tariff constants. Versioned externally by effective date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Resource)]
#[serde(default)]
pub struct TariffConfig {
    /// Label of the tariff card revision these constants come from.
    pub effective_from: String,
    pub min_fare: f64,
    pub per_km_rate: f64,
    pub night_surcharge: f64,
    /// First hour of the night window, inclusive.
    pub night_start_hour: u32,
    /// End of the night window, exclusive.
    pub night_end_hour: u32,
    pub waiting_charge_rate: f64,
    pub luggage_charge: f64,
}

impl Default for TariffConfig {
    fn default() -> Self {
        Self {
            effective_from: "maharashtra-auto-2022".to_string(),
            min_fare: MIN_FARE,
            per_km_rate: PER_KM_RATE,
            night_surcharge: NIGHT_SURCHARGE,
            night_start_hour: NIGHT_START_HOUR,
            night_end_hour: NIGHT_END_HOUR,
            waiting_charge_rate: WAITING_CHARGE_RATE,
            luggage_charge: LUGGAGE_CHARGE,
        }
    }
}

impl TariffConfig {
    /// Distance fare with the minimum-fare floor, rounded half-up.
    /// Zero, negative, and non-finite distances are charged the minimum fare.
    pub fn base_fare(&self, distance_km: f64) -> f64 {
        if !(distance_km > 0.0) || !distance_km.is_finite() {
            return self.min_fare;
        }
        let fare = (distance_km * self.per_km_rate).max(self.min_fare);
        round_half_up(fare)
    }

    /// Waiting charge for the given minutes, unrounded.
    pub fn waiting_charge(&self, waiting_minutes: f64) -> f64 {
        if waiting_minutes > 0.0 {
            self.per_km_rate * self.waiting_charge_rate * waiting_minutes
        } else {
            0.0
        }
    }

    /// Full fare including waiting, luggage and night surcharge.
    pub fn total_fare(
        &self,
        distance_km: f64,
        waiting_minutes: f64,
        is_night: bool,
        luggage_count: u32,
    ) -> f64 {
        let mut fare = self.base_fare(distance_km);
        fare += self.waiting_charge(waiting_minutes);
        if luggage_count > 0 {
            fare += f64::from(luggage_count) * self.luggage_charge;
        }
        if is_night {
            fare += fare * self.night_surcharge;
        }
        round_half_up(fare)
    }

    /// True when `hour` falls inside `[night_start_hour, night_end_hour)`.
    pub fn is_night_hour(&self, hour: u32) -> bool {
        hour >= self.night_start_hour && hour < self.night_end_hour
    }

    /// Night check against the local wall clock. Not deterministic.
    pub fn is_night_now(&self) -> bool {
        self.is_night_hour(current_local_hour())
    }
}

/// One row of the printed tariff card.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartEntry {
    pub normal: f64,
    pub midnight: f64,
}

/// Lookup table mirroring the printed tariff card: 1.5 km to 30.0 km in 0.1 km steps.
#[derive(Debug, Clone)]
pub struct FareChart {
    tariff: TariffConfig,
    /// Keyed by distance in tenths of a kilometre.
    entries: BTreeMap<u32, ChartEntry>,
}

impl FareChart {
    pub const FIRST_TENTHS: u32 = 15;
    pub const LAST_TENTHS: u32 = 300;

    pub fn new(tariff: TariffConfig) -> Self {
        let entries = (Self::FIRST_TENTHS..=Self::LAST_TENTHS)
            .map(|tenths| (tenths, Self::compute(&tariff, f64::from(tenths) / 10.0)))
            .collect();
        Self { tariff, entries }
    }

    fn compute(tariff: &TariffConfig, distance_km: f64) -> ChartEntry {
        let normal = tariff.base_fare(distance_km);
        ChartEntry {
            normal,
            midnight: round_half_up(normal * (1.0 + tariff.night_surcharge)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, distance_km: f64) -> Option<&ChartEntry> {
        if !distance_km.is_finite() || distance_km < 0.0 {
            return None;
        }
        let tenths = (distance_km * 10.0).round() as u32;
        self.entries.get(&tenths)
    }

    /// Card fare for the distance rounded to 0.1 km. Distances outside the card are
    /// computed with the same rule the card was printed from.
    pub fn fare_for(&self, distance_km: f64, is_night: bool) -> f64 {
        let entry = self
            .entry(distance_km)
            .copied()
            .unwrap_or_else(|| Self::compute(&self.tariff, distance_km));
        if is_night {
            entry.midnight
        } else {
            entry.normal
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, &ChartEntry)> {
        self.entries
            .iter()
            .map(|(tenths, entry)| (f64::from(*tenths) / 10.0, entry))
    }
}

impl Default for FareChart {
    fn default() -> Self {
        Self::new(TariffConfig::default())
    }
}

/// `₹206`
pub fn format_fare(amount: f64) -> String {
    format!("₹{:.0}", round_half_up(amount))
}

/// `850m` below one kilometre, `5.00km` otherwise.
pub fn format_distance(distance_km: f64) -> String {
    if distance_km < 1.0 {
        format!("{:.0}m", round_half_up(distance_km * 1000.0))
    } else {
        format!("{distance_km:.2}km")
    }
}

/// `1h 2m 3s`, `2m 3s` or `45s`.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0).floor() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m {secs}s")
    } else if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}

/// `45s` below one minute, `1.5min` otherwise.
pub fn format_waiting(minutes: f64) -> String {
    if minutes < 1.0 {
        format!("{:.0}s", round_half_up(minutes * 60.0))
    } else {
        format!("{minutes:.1}min")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fare_includes_minimum_and_distance() {
        let tariff = TariffConfig::default();
        assert_eq!(tariff.base_fare(0.0), 26.0);
        assert_eq!(tariff.base_fare(-2.0), 26.0);
        assert_eq!(tariff.base_fare(f64::NAN), 26.0);
        // 1 km is below the minimum fare
        assert_eq!(tariff.base_fare(1.0), 26.0);
        // 12 km × 17.14 = 205.68
        assert_eq!(tariff.base_fare(12.0), 206.0);
        assert_eq!(tariff.total_fare(12.0, 0.0, false, 0), 206.0);
        assert_eq!(tariff.total_fare(0.0, 0.0, false, 0), 26.0);
    }

    #[test]
    fn rounding_neglects_up_to_49_paise() {
        assert_eq!(round_half_up(85.49), 85.0);
        assert_eq!(round_half_up(85.5), 86.0);
        assert_eq!(round_half_up(85.7), 86.0);
    }

    #[test]
    fn night_surcharge_compounds_on_waiting() {
        let tariff = TariffConfig::default();
        // base 171, waiting 8.57 -> 179.57
        assert_eq!(tariff.total_fare(10.0, 5.0, false, 0), 180.0);
        // 179.57 × 1.25 = 224.4625
        assert_eq!(tariff.total_fare(10.0, 5.0, true, 0), 224.0);
        // Applying the surcharge to base alone would give round(171 × 1.25 + 8.57) = 222
        assert_ne!(tariff.total_fare(10.0, 5.0, true, 0), 222.0);
    }

    #[test]
    fn luggage_is_added_before_surcharge() {
        let tariff = TariffConfig::default();
        assert_eq!(tariff.total_fare(12.0, 0.0, false, 2), 218.0);
        // (206 + 12) × 1.25 = 272.5
        assert_eq!(tariff.total_fare(12.0, 0.0, true, 2), 273.0);
    }

    #[test]
    fn negative_waiting_is_ignored() {
        let tariff = TariffConfig::default();
        assert_eq!(tariff.waiting_charge(-3.0), 0.0);
        assert_eq!(tariff.total_fare(12.0, -3.0, false, 0), 206.0);
    }

    #[test]
    fn night_window_is_half_open() {
        let tariff = TariffConfig::default();
        assert!(tariff.is_night_hour(0));
        assert!(tariff.is_night_hour(4));
        assert!(!tariff.is_night_hour(5));
        assert!(!tariff.is_night_hour(23));
    }

    #[test]
    fn chart_matches_the_printed_card() {
        let chart = FareChart::default();
        assert_eq!(chart.len(), 286);
        assert_eq!(chart.fare_for(1.5, false), 26.0);
        // 1.6 × 17.14 = 27.42
        assert_eq!(chart.fare_for(1.6, false), 27.0);
        // 30 × 17.14 = 514.2, midnight 642.75
        assert_eq!(chart.fare_for(30.0, false), 514.0);
        assert_eq!(chart.fare_for(30.0, true), 643.0);
        // 12.04 rounds to the 12.0 row
        assert_eq!(chart.fare_for(12.04, false), 206.0);
    }

    #[test]
    fn chart_falls_back_outside_the_card() {
        let chart = FareChart::default();
        assert!(chart.entry(45.0).is_none());
        // 45 × 17.14 = 771.3
        assert_eq!(chart.fare_for(45.0, false), 771.0);
        assert_eq!(chart.fare_for(45.0, true), 964.0);
        assert_eq!(chart.fare_for(0.5, false), 26.0);
    }

    #[test]
    fn formats_for_display() {
        assert_eq!(format_fare(205.68), "₹206");
        assert_eq!(format_distance(0.85), "850m");
        assert_eq!(format_distance(5.0), "5.00km");
        assert_eq!(format_duration(45.9), "45s");
        assert_eq!(format_duration(123.0), "2m 3s");
        assert_eq!(format_duration(3723.0), "1h 2m 3s");
        assert_eq!(format_waiting(0.75), "45s");
        assert_eq!(format_waiting(1.5), "1.5min");
    }
}
