//! Per-event throughput benchmarks for fare_core using Criterion.rs.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fare_core::config::{EngineConfig, PathRetention};
use fare_core::pricing::{FareChart, TariffConfig};
use fare_core::session::TripSession;
use fare_core::spatial::haversine_km;
use fare_core::test_helpers::{moving_sample, random_fix, seeded_rng, start_fix, straight_north};

fn bench_trip_replay(c: &mut Criterion) {
    let sizes = vec![("short", 100), ("city", 1_000), ("long", 10_000)];

    let mut group = c.benchmark_group("trip_replay");
    for (name, fixes) in sizes {
        let path = straight_north(&start_fix(0), fixes, 0.01, 1_000, 36.0);
        group.bench_with_input(BenchmarkId::from_parameter(name), &path, |b, path| {
            b.iter(|| {
                let config =
                    EngineConfig::default().with_path_retention(PathRetention::capped(512));
                let mut session =
                    TripSession::start(config, Ok(start_fix(0)), 12).expect("session");
                for fix in path {
                    session.on_inertial_sample(moving_sample(fix.timestamp_ms, 0.4, 0.1));
                    black_box(session.on_position_fix(*fix));
                }
                black_box(session.end())
            });
        });
    }
    group.finish();
}

fn bench_pricing(c: &mut Criterion) {
    let tariff = TariffConfig::default();
    let mut group = c.benchmark_group("pricing");
    group.bench_function("total_fare", |b| {
        b.iter(|| tariff.total_fare(black_box(12.3), black_box(4.5), black_box(true), 1))
    });
    group.bench_function("fare_chart_build", |b| {
        b.iter(|| FareChart::new(black_box(tariff.clone())))
    });
    group.finish();
}

fn bench_haversine(c: &mut Criterion) {
    let mut rng = seeded_rng(42);
    let pairs: Vec<_> = (0..1_000)
        .map(|i| (random_fix(&mut rng, i), random_fix(&mut rng, i)))
        .collect();
    c.bench_function("haversine_1000_pairs", |b| {
        b.iter(|| {
            pairs
                .iter()
                .map(|(a, b)| haversine_km(a.latitude, a.longitude, b.latitude, b.longitude))
                .sum::<f64>()
        })
    });
}

criterion_group!(benches, bench_trip_replay, bench_pricing, bench_haversine);
criterion_main!(benches);
