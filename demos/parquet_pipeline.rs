//! Parquet Pipeline: events file in, report tables out
//!
//! 1. Write a synthetic trigger-event table to Parquet
//! 2. Load it into a RecordStore
//! 3. Analyze and write performance/overlaps/unique_value Parquet files
//!
//! Run with: cargo run --example parquet_pipeline

use alarm_eval::report::write_parquet;
use alarm_eval::storage::event_schema;
use alarm_eval::{Engine, RecordStore};
use arrow::array::{BooleanArray, StringArray};
use arrow::record_batch::RecordBatch;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

const ALARMS: [&str; 6] = [
    "amount_spike",
    "card_testing",
    "geo_mismatch",
    "new_device",
    "night_activity",
    "velocity",
];

fn synthetic_batch(subjects: usize, seed: u64) -> anyhow::Result<RecordBatch> {
    let mut rng = StdRng::seed_from_u64(seed);
    let (mut ids, mut alarms, mut labels) = (Vec::new(), Vec::new(), Vec::new());

    for subject in 0..subjects {
        let positive = rng.gen_bool(0.1);
        for alarm in ALARMS {
            if rng.gen_bool(if positive { 0.4 } else { 0.05 }) {
                ids.push(format!("tx-{subject:07}"));
                alarms.push(alarm);
                labels.push(positive);
            }
        }
    }

    Ok(RecordBatch::try_new(
        Arc::new(event_schema()),
        vec![
            Arc::new(StringArray::from(ids)),
            Arc::new(StringArray::from(alarms)),
            Arc::new(BooleanArray::from(labels)),
        ],
    )?)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Parquet Pipeline ===\n");

    let workdir = std::env::temp_dir().join("alarm_eval_pipeline");
    std::fs::create_dir_all(&workdir)?;
    let events_path = workdir.join("events.parquet");

    let batch = synthetic_batch(200_000, 99)?;
    write_parquet(&batch, &events_path)?;
    println!("Wrote {} events to {}", batch.num_rows(), events_path.display());

    let start = Instant::now();
    let store = RecordStore::load_parquet(&events_path)?;
    println!(
        "Loaded {} events, {} subjects, {} alarm types in {:.2?}",
        store.len(),
        store.subject_count(),
        store.alarm_count(),
        start.elapsed()
    );

    let start = Instant::now();
    let report = Engine::new().analyze(&store);
    println!("Analyzed in {:.2?}", start.elapsed());

    let out_dir = workdir.join("report");
    report.write_parquet_dir(&out_dir)?;
    println!("Report tables written to {}\n", out_dir.display());

    println!("{}", report.to_json_pretty()?);

    Ok(())
}
