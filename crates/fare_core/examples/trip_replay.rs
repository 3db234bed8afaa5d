//! Replay a synthetic 5 km trip with one stop and print the fare breakdown.
//!
//! Run with: cargo run -p fare_core --example trip_replay

use fare_core::clock::ONE_SEC_MS;
use fare_core::pricing::{format_distance, format_duration, format_fare, format_waiting};
use fare_core::session::TripSession;
use fare_core::telemetry::TripUpdate;
use fare_core::test_helpers::{parked, start_fix, straight_north};
use fare_core::EngineConfig;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let start = start_fix(0);
    let mut session = TripSession::start(EngineConfig::default(), Ok(start), 22)?;
    let updates = session.subscribe();

    let first_leg = straight_north(&start, 25, 0.1, 12 * ONE_SEC_MS, 30.0);
    let stop = parked(&first_leg[24], 6, 10 * ONE_SEC_MS, 0.0);
    let second_leg = straight_north(&stop[5], 25, 0.1, 12 * ONE_SEC_MS, 30.0);
    for fix in first_leg.iter().chain(&stop).chain(&second_leg) {
        session.on_position_fix(*fix);
    }
    let trip = session.end();

    for update in updates.try_iter() {
        if let TripUpdate::HaltClosed(halt) = update {
            println!("halt: {:.0}s", halt.duration_secs);
        }
    }

    println!("--- Trip replay ---");
    println!("Distance: {}", format_distance(trip.distance_km));
    println!("Duration: {}", format_duration(trip.duration_secs));
    println!("Waiting:  {}", format_waiting(trip.waiting_minutes));
    println!("Halts:    {}", trip.halt_count());
    println!("Fare:     {}", format_fare(trip.current_fare));
    Ok(())
}
