//! End-to-end check of the reference two-alarm scenario
//!
//! Events: (1,A,+) (2,A,−) (3,A,−) (1,B,+) (4,B,+)

use alarm_eval::performance::Reliability;
use alarm_eval::{Engine, RecordStore, TriggerEvent};

fn scenario_events() -> Vec<TriggerEvent> {
    vec![
        TriggerEvent::new("1", "A", true),
        TriggerEvent::new("2", "A", false),
        TriggerEvent::new("3", "A", false),
        TriggerEvent::new("1", "B", true),
        TriggerEvent::new("4", "B", true),
    ]
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-12,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn test_scenario_performance() {
    let report = Engine::new().evaluate(scenario_events()).unwrap();

    let a = report.performance.get("A").unwrap();
    assert_eq!(a.trigger_count, 3);
    assert_eq!(a.true_positives, 1);
    assert_close(a.tp_rate.unwrap(), 1.0 / 3.0);

    let b = report.performance.get("B").unwrap();
    assert_eq!(b.trigger_count, 2);
    assert_eq!(b.true_positives, 2);
    assert_close(b.tp_rate.unwrap(), 1.0);

    // Both samples are under 5 cases
    assert_eq!(a.reliability, Reliability::CriticalSample);
    assert_eq!(b.reliability, Reliability::CriticalSample);
}

#[test]
fn test_scenario_overlap() {
    let report = Engine::new().evaluate(scenario_events()).unwrap();

    assert_eq!(report.overlaps.len(), 1);
    let pair = report.overlaps.get("A", "B").unwrap();
    assert_eq!(pair.co_occurrence, 1);
    assert_close(pair.overlap_pct, 0.5);
    assert_close(pair.jaccard, 0.25);
}

#[test]
fn test_scenario_unique_value() {
    let report = Engine::new().evaluate(scenario_events()).unwrap();

    let a = report.unique_value.get("A").unwrap();
    assert_eq!(a.unique_tp, 0);
    assert_eq!(a.redundant_tp, 1);
    assert_eq!(a.redundancy_rate, Some(1.0));

    let b = report.unique_value.get("B").unwrap();
    assert_eq!(b.unique_tp, 1);
    assert_eq!(b.redundant_tp, 1);
    assert_eq!(b.redundancy_rate, Some(0.5));
}

#[test]
fn test_rerun_is_bit_identical() {
    let store = RecordStore::from_events(scenario_events()).unwrap();
    let engine = Engine::new();

    let first = engine.analyze(&store);
    let second = engine.analyze(&store);
    assert_eq!(first, second);
    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
}

#[test]
fn test_load_order_does_not_change_results() {
    let mut reversed = scenario_events();
    reversed.reverse();

    let forward = Engine::new().evaluate(scenario_events()).unwrap();
    let backward = Engine::new().evaluate(reversed).unwrap();
    assert_eq!(forward, backward);
}

#[test]
fn test_single_alarm_table() {
    let report = Engine::new()
        .evaluate(vec![
            TriggerEvent::new("1", "only", true),
            TriggerEvent::new("2", "only", false),
            TriggerEvent::new("3", "only", true),
        ])
        .unwrap();

    assert!(report.overlaps.is_empty());
    let row = report.unique_value.get("only").unwrap();
    assert_eq!(row.unique_tp, row.total_tp);
    assert_eq!(row.redundant_tp, 0);
}

#[test]
fn test_concurrent_reports_on_separate_stores() {
    let handles: Vec<_> = (0..4)
        .map(|shift| {
            std::thread::spawn(move || {
                let events: Vec<TriggerEvent> = scenario_events()
                    .into_iter()
                    .map(|e| {
                        TriggerEvent::new(
                            format!("{}-{shift}", e.subject_id()),
                            e.alarm_type(),
                            e.is_positive(),
                        )
                    })
                    .collect();
                Engine::new().evaluate(events).unwrap()
            })
        })
        .collect();

    let reports: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for report in &reports[1..] {
        assert_eq!(report, &reports[0]);
    }
}
