use fare_core::pricing::{format_distance, format_duration, format_fare, format_waiting};
use fare_core::tampering::TamperingVerdict;
use fare_core::telemetry::TripSnapshot;
use fare_core::TariffConfig;
use serde::Serialize;

/// Summary of a replayed trip, printed as text or JSON.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub distance_km: f64,
    pub duration_secs: f64,
    pub waiting_minutes: f64,
    pub halts: usize,
    pub is_night: bool,
    pub fare: f64,
    pub luggage_count: u32,
    pub fare_with_luggage: f64,
    pub fixes_processed: u64,
    pub low_accuracy_fixes: u64,
    pub invalid_fixes: u64,
    pub out_of_order_events: u64,
    pub verdict: Option<TamperingVerdict>,
}

impl ReplayReport {
    pub fn new(
        trip: &TripSnapshot,
        tariff: &TariffConfig,
        luggage_count: u32,
        verdict: Option<TamperingVerdict>,
    ) -> Self {
        Self {
            distance_km: trip.distance_km,
            duration_secs: trip.duration_secs,
            waiting_minutes: trip.waiting_minutes,
            halts: trip.halt_count(),
            is_night: trip.is_night,
            fare: trip.current_fare,
            luggage_count,
            fare_with_luggage: trip.fare_with_luggage(tariff, luggage_count),
            fixes_processed: trip.fixes_processed,
            low_accuracy_fixes: trip.low_accuracy_fixes,
            invalid_fixes: trip.invalid_fixes,
            out_of_order_events: trip.out_of_order_events,
            verdict,
        }
    }

    pub fn is_tampered(&self) -> bool {
        self.verdict.map(|v| v.is_tampered).unwrap_or(false)
    }

    pub fn to_text(&self) -> String {
        let mut lines = vec![
            format!("Distance:  {}", format_distance(self.distance_km)),
            format!("Duration:  {}", format_duration(self.duration_secs)),
            format!(
                "Waiting:   {} over {} halt(s)",
                format_waiting(self.waiting_minutes),
                self.halts
            ),
            format!(
                "Fare:      {}{}",
                format_fare(self.fare),
                if self.is_night { " (night)" } else { "" }
            ),
        ];
        if self.luggage_count > 0 {
            lines.push(format!(
                "Luggage:   {} package(s), fare {}",
                self.luggage_count,
                format_fare(self.fare_with_luggage)
            ));
        }
        if self.low_accuracy_fixes > 0 || self.invalid_fixes > 0 || self.out_of_order_events > 0 {
            lines.push(format!(
                "Fixes:     {} ({} low accuracy, {} invalid, {} out of order)",
                self.fixes_processed,
                self.low_accuracy_fixes,
                self.invalid_fixes,
                self.out_of_order_events
            ));
        }
        if let Some(v) = &self.verdict {
            let status = if !v.is_tampered {
                "within tolerance"
            } else if v.overcharged {
                "METER TAMPERING SUSPECTED (overcharged)"
            } else {
                "METER TAMPERING SUSPECTED (undercharged)"
            };
            lines.push(format!(
                "Charged:   {} vs {} ({:.1}% difference, limit {:.0}%): {}",
                format_fare(v.charged_fare),
                format_fare(v.computed_fare),
                v.percentage_difference,
                v.threshold * 100.0,
                status
            ));
        }
        lines.join("\n")
    }
}
