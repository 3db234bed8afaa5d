mod support;

use fare_core::clock::ONE_SEC_MS;
use fare_core::config::{EngineConfig, PathRetention};
use fare_core::error::{ProviderError, TripError};
use fare_core::pricing::TariffConfig;
use fare_core::providers::RecordedLocationFeed;
use fare_core::session::TripSession;
use fare_core::spatial::{haversine_km, PositionFix};
use fare_core::telemetry::TripUpdate;
use fare_core::test_helpers::{parked, random_fix, seeded_rng, start_fix, straight_north};
use support::trips::{feed, TripBuilder};

/// 2.5 km north, a 45 s stop, then 2.5 km more.
fn five_km_with_one_stop(start: &PositionFix) -> Vec<PositionFix> {
    let mut fixes = straight_north(start, 5, 0.5, 60 * ONE_SEC_MS, 30.0);
    let stop_at = *fixes.last().expect("first leg");
    let stop = parked(&stop_at, 3, 15 * ONE_SEC_MS, 0.0);
    let resume_from = *stop.last().expect("stop");
    fixes.extend(stop);
    fixes.extend(straight_north(&resume_from, 5, 0.5, 15 * ONE_SEC_MS, 30.0));
    fixes
}

#[test]
fn five_km_trip_with_one_halt() {
    let builder = TripBuilder::new();
    let start = builder.start_fix();
    let mut session = builder.build();

    let snapshots = feed(&mut session, &five_km_with_one_stop(&start));
    let last = snapshots.last().expect("snapshot");

    assert!((last.distance_km - 5.0).abs() < 1e-6);
    assert_eq!(last.halt_count(), 1);
    assert!((last.halts[0].duration_secs - 45.0).abs() < 1e-9);
    assert!((last.waiting_minutes - 0.75).abs() < 1e-9);

    let tariff = TariffConfig::default();
    assert_eq!(
        last.current_fare,
        tariff.total_fare(last.distance_km, 0.75, false, 0)
    );
    assert_eq!(last.current_fare, 87.0);

    let ended = session.end();
    assert!(ended.is_ended());
    assert_eq!(ended.end_time_ms, Some(420 * ONE_SEC_MS));
    assert_eq!(ended.duration_secs, 420.0);
    assert_eq!(ended.current_fare, 87.0);
}

#[test]
fn night_trip_compounds_surcharge_on_waiting() {
    let builder = TripBuilder::new().at_night();
    let start = builder.start_fix();
    let mut session = builder.build();

    feed(&mut session, &five_km_with_one_stop(&start));
    let ended = session.end();

    assert!(ended.is_night);
    // (86 + 1.2855) * 1.25 = 109.107
    assert_eq!(ended.current_fare, 109.0);
}

#[test]
fn night_window_closes_at_five() {
    for (hour, night) in [(0, true), (4, true), (5, false), (23, false)] {
        let session = TripBuilder::new().local_hour(hour).build();
        assert_eq!(session.snapshot().is_night, night, "hour {hour}");
    }
}

#[test]
fn distance_is_sum_of_segments_and_never_decreases() {
    let mut rng = seeded_rng(42);
    let start = start_fix(0);
    let fixes: Vec<PositionFix> = (1..=200)
        .map(|i| random_fix(&mut rng, i * ONE_SEC_MS))
        .collect();
    let mut session = TripBuilder::new().start(start).build();

    let mut expected = 0.0;
    let mut previous = start;
    let mut last_distance = 0.0;
    for fix in &fixes {
        expected += haversine_km(previous.latitude, previous.longitude, fix.latitude, fix.longitude);
        previous = *fix;

        let snapshot = session.on_position_fix(*fix);
        assert!(snapshot.distance_km >= last_distance);
        last_distance = snapshot.distance_km;
    }
    assert!((last_distance - expected).abs() < 1e-6 * expected.max(1.0));
}

#[test]
fn capped_path_does_not_change_distance() {
    let start = start_fix(0);
    let fixes = straight_north(&start, 50, 0.1, ONE_SEC_MS, 36.0);

    let mut full = TripBuilder::new().build();
    let mut capped = TripBuilder::new()
        .config(EngineConfig::default().with_path_retention(PathRetention::capped(10)))
        .build();
    let a = feed(&mut full, &fixes).pop().expect("snapshot");
    let b = feed(&mut capped, &fixes).pop().expect("snapshot");

    assert_eq!(a.distance_km, b.distance_km);
    assert_eq!(a.current_fare, b.current_fare);
    assert_eq!(a.path.len(), 51);
    assert_eq!(b.path.len(), 10);
    assert_eq!(b.dropped_path_points, 41);
}

#[test]
fn late_fix_is_counted_and_applied() {
    let start = start_fix(0);
    let mut session = TripBuilder::new().start(start).build();
    let ahead = straight_north(&start, 2, 1.0, 10 * ONE_SEC_MS, 30.0);

    session.on_position_fix(ahead[1]);
    let late = session.on_position_fix(ahead[0]);

    assert_eq!(late.out_of_order_events, 1);
    // Applied at face value: 2 km out, 1 km back
    assert!((late.distance_km - 3.0).abs() < 1e-6);
}

#[test]
fn start_without_a_fix_fails() {
    let mut provider = RecordedLocationFeed::new(Vec::new());
    let result = TripSession::start_with_provider(EngineConfig::default(), &mut provider);
    assert!(matches!(
        result,
        Err(TripError::NoFix(ProviderError::Unavailable(_)))
    ));
}

#[test]
fn invalid_config_is_rejected_before_start() {
    let config = EngineConfig::default().with_path_retention(PathRetention::capped(0));
    let result = TripSession::start(config, Ok(start_fix(0)), 12);
    assert!(matches!(result, Err(TripError::Config(_))));
}

#[test]
fn observer_receives_halt_and_final_snapshot() {
    let builder = TripBuilder::new();
    let start = builder.start_fix();
    let mut session = builder.build();
    let rx = session.subscribe();

    feed(&mut session, &five_km_with_one_stop(&start));
    let ended = session.end();

    let updates: Vec<TripUpdate> = rx.try_iter().collect();
    let halts = updates
        .iter()
        .filter(|u| matches!(u, TripUpdate::HaltClosed(_)))
        .count();
    let progress = updates
        .iter()
        .filter(|u| matches!(u, TripUpdate::Progress(_)))
        .count();
    assert_eq!(halts, 1);
    assert_eq!(progress, 13);
    assert_eq!(updates.last(), Some(&TripUpdate::Ended(ended)));
}

#[test]
fn charged_fare_is_checked_with_luggage() {
    let builder = TripBuilder::new();
    let start = builder.start_fix();
    let mut session = builder.build();
    feed(&mut session, &five_km_with_one_stop(&start));

    // 87 + 6 for one bag
    let fair = session.verify_charged_fare(93.0, 1).expect("verdict");
    assert!(!fair.is_tampered);
    assert_eq!(fair.computed_fare, 93.0);

    let padded = session.verify_charged_fare(120.0, 1).expect("verdict");
    assert!(padded.is_tampered);
    assert!(padded.overcharged);
}
