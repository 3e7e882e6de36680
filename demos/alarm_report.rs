//! Alarm Report: evaluate a synthetic fraud-rule set
//!
//! Generates a population where some rules are precise, some are noisy, and one
//! is a near-copy of another, then prints the three analyses.
//!
//! Run with: cargo run --example alarm_report
//! Set RUST_LOG=alarm_eval=debug to see the engine's events.

use alarm_eval::{Engine, TriggerEvent};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

/// (name, hit rate on positives, hit rate on negatives)
const RULES: [(&str, f64, f64); 5] = [
    ("amount_spike", 0.55, 0.04),
    ("geo_mismatch", 0.35, 0.02),
    ("new_device", 0.60, 0.20),
    ("velocity", 0.40, 0.01),
    ("rare_merchant", 0.02, 0.001),
];

fn generate(subjects: usize, rng: &mut StdRng) -> Vec<TriggerEvent> {
    let mut events = Vec::new();
    for subject in 0..subjects {
        let positive = rng.gen_bool(0.08);
        let mut velocity_fired = false;
        for (name, on_positive, on_negative) in RULES {
            let p = if positive { on_positive } else { on_negative };
            if rng.gen_bool(p) {
                velocity_fired |= name == "velocity";
                events.push(TriggerEvent::new(subject.to_string(), name, positive));
            }
        }
        // burst_velocity shadows velocity almost exactly
        if velocity_fired && rng.gen_bool(0.9) {
            events.push(TriggerEvent::new(subject.to_string(), "burst_velocity", positive));
        }
    }
    events
}

fn fmt_metric(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.3}"))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Alarm Evaluation Report ===\n");

    let mut rng = StdRng::seed_from_u64(2024);
    let events = generate(20_000, &mut rng);
    println!("Generated {} trigger events over 20,000 subjects\n", events.len());

    let report = Engine::new().evaluate(events)?;

    println!("--- Performance (ranked by TP rate) ---");
    println!(
        "  {:<16} {:>6} {:>6} {:>8} {:>17}  reliability",
        "alarm", "n", "tp", "rate", "95% CI"
    );
    for row in report.performance.ranked_by_tp_rate() {
        println!(
            "  {:<16} {:>6} {:>6} {:>8} [{:>6}, {:>6}]  {}",
            row.alarm_type,
            row.trigger_count,
            row.true_positives,
            fmt_metric(row.tp_rate),
            fmt_metric(row.ci_lower),
            fmt_metric(row.ci_upper),
            row.reliability,
        );
    }

    println!("\n--- Top overlapping pairs ---");
    for pair in report.overlaps.top_overlaps(3) {
        println!(
            "  {} & {}: {} shared, overlap {:.1}%, jaccard {:.3}",
            pair.alarm_a,
            pair.alarm_b,
            pair.co_occurrence,
            pair.overlap_pct * 100.0,
            pair.jaccard,
        );
    }

    println!("\n--- Unique value ---");
    for row in report.unique_value.top_unique_value(report.unique_value.len()) {
        println!(
            "  {:<16} unique TP {:>4} / {:>4}  redundancy {}",
            row.alarm_type,
            row.unique_tp,
            row.total_tp,
            fmt_metric(row.redundancy_rate),
        );
    }

    let summary = report.summary();
    println!("\n--- Summary ---");
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
