//! Engine benchmarks
//!
//! Measures store load and each analyzer on synthetic rule populations.
//! Overlap cost grows with the number of alarms per subject, so the populations
//! vary both subject count and rule density.
//!
//! Run with: cargo bench --bench engine_benchmarks

use alarm_eval::{overlap, performance, unique};
use alarm_eval::{Engine, EngineConfig, RecordStore, TriggerEvent};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SMALL_SIZE: usize = 1_000; // 1K subjects
const MEDIUM_SIZE: usize = 100_000; // 100K subjects
const ALARM_TYPES: usize = 40;

/// Each subject fires every alarm independently with probability `density`.
fn generate_events(subjects: usize, density: f64, seed: u64) -> Vec<TriggerEvent> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut events = Vec::new();
    for subject in 0..subjects {
        let positive = rng.gen_bool(0.3);
        for alarm in 0..ALARM_TYPES {
            if rng.gen_bool(density) {
                events.push(TriggerEvent::new(
                    subject.to_string(),
                    format!("rule_{alarm:02}"),
                    positive,
                ));
            }
        }
    }
    events
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_store_load");

    for size in [SMALL_SIZE, MEDIUM_SIZE] {
        let events = generate_events(size, 0.05, 42);
        group.bench_with_input(BenchmarkId::new("from_events", size), &events, |b, events| {
            b.iter(|| RecordStore::from_events(black_box(events.clone())));
        });
    }

    group.finish();
}

fn bench_analyzers(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyzers");
    let config = EngineConfig::default();

    for density in [0.02, 0.2] {
        let store = RecordStore::from_events(generate_events(MEDIUM_SIZE, density, 7))
            .expect("synthetic events are valid");

        group.bench_with_input(
            BenchmarkId::new("performance", density),
            &store,
            |b, store| b.iter(|| performance::estimate(black_box(store), &config)),
        );
        group.bench_with_input(BenchmarkId::new("overlap", density), &store, |b, store| {
            b.iter(|| overlap::analyze(black_box(store)));
        });
        group.bench_with_input(BenchmarkId::new("unique", density), &store, |b, store| {
            b.iter(|| unique::analyze(black_box(store)));
        });
    }

    group.finish();
}

/// Parallel vs sequential end-to-end analysis
fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_analyze");
    let store = RecordStore::from_events(generate_events(MEDIUM_SIZE, 0.1, 11))
        .expect("synthetic events are valid");

    for parallel in [false, true] {
        let engine = Engine::builder()
            .parallel(parallel)
            .build()
            .expect("default thresholds are valid");
        let label = if parallel { "parallel" } else { "sequential" };
        group.bench_function(label, |b| b.iter(|| engine.analyze(black_box(&store))));
    }

    group.finish();
}

criterion_group!(benches, bench_load, bench_analyzers, bench_engine);
criterion_main!(benches);
