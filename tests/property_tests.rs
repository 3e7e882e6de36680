//! Property-based tests for the evaluation engine
//!
//! Following the ruchy/trueno/aprender pattern:
//! - Test mathematical invariants of every output table
//! - Run with ProptestConfig::with_cases(100)
//! - Must complete in <30 seconds for pre-commit hook

use alarm_eval::performance::{classify, Reliability, SampleEvidence, WilsonInterval};
use alarm_eval::{Engine, RecordStore, ReliabilityThresholds, TriggerEvent};
use proptest::prelude::*;

// ============================================================================
// Property Test Generators (Strategies)
// ============================================================================

/// Population of up to 120 subjects over 6 alarms. Each subject has one label and
/// a non-empty bitmask of alarms, so the load invariants hold by construction.
fn arb_events() -> impl Strategy<Value = Vec<TriggerEvent>> {
    prop::collection::vec((1u8..64, any::<bool>()), 0..120).prop_map(|subjects| {
        subjects
            .into_iter()
            .enumerate()
            .flat_map(|(s, (mask, positive))| {
                (0..6u8)
                    .filter(move |bit| mask & (1 << bit) != 0)
                    .map(move |bit| TriggerEvent::new(format!("s{s}"), format!("rule_{bit}"), positive))
            })
            .collect()
    })
}

fn arb_store() -> impl Strategy<Value = RecordStore> {
    arb_events().prop_map(|events| RecordStore::from_events(events).unwrap())
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // ========================================================================
    // Performance Estimator Properties
    // ========================================================================

    /// Property: 0 <= ci_lower <= tp_rate <= ci_upper <= 1 and width = upper - lower
    #[test]
    fn prop_interval_brackets_rate(store in arb_store()) {
        let report = Engine::new().analyze(&store);
        for row in report.performance.iter() {
            let rate = row.tp_rate.unwrap();
            let (lower, upper, width) = (row.ci_lower.unwrap(), row.ci_upper.unwrap(), row.ci_width.unwrap());
            prop_assert!(0.0 <= lower && lower <= rate && rate <= upper && upper <= 1.0);
            prop_assert_eq!(width.to_bits(), (upper - lower).to_bits());
            prop_assert_eq!(row.true_positives + row.false_positives, row.trigger_count);
        }
    }

    /// Property: reliability depends only on (n, k)
    #[test]
    fn prop_reliability_is_function_of_counts(n in 1usize..200, k in 0usize..200) {
        let k = k.min(n);
        let thresholds = ReliabilityThresholds::default();
        let width = WilsonInterval::new(k, n, 1.96).map(|ci| ci.width());
        let first = classify(&SampleEvidence { n, k, ci_width: width }, &thresholds);
        let width_again = WilsonInterval::new(k, n, 1.96).map(|ci| ci.width());
        let second = classify(&SampleEvidence { n, k, ci_width: width_again }, &thresholds);
        prop_assert_eq!(first, second);
    }

    /// Property: large, well-populated, narrow samples are RELIABLE
    #[test]
    fn prop_reliable_when_no_rule_fires(n in 15usize..400, k in 3usize..400) {
        let k = k.min(n);
        let width = WilsonInterval::new(k, n, 1.96).unwrap().width();
        prop_assume!(!(k <= 1 && n < 20));
        prop_assume!(width <= 0.4);
        let class = classify(&SampleEvidence { n, k, ci_width: Some(width) }, &ReliabilityThresholds::default());
        prop_assert_eq!(class, Reliability::Reliable);
    }

    // ========================================================================
    // Overlap Analyzer Properties
    // ========================================================================

    /// Property: each unordered pair appears once, metrics are bounded, pct >= jaccard
    #[test]
    fn prop_overlap_symmetric_and_bounded(store in arb_store()) {
        let report = Engine::new().analyze(&store);
        for row in report.overlaps.iter() {
            prop_assert!(row.alarm_a < row.alarm_b);
            prop_assert!(report.overlaps.get(&row.alarm_b, &row.alarm_a) == Some(row));
            prop_assert!(0.0 <= row.jaccard && row.jaccard <= 1.0);
            prop_assert!(row.overlap_pct >= row.jaccard);
        }
    }

    // ========================================================================
    // Unique Value Analyzer Properties
    // ========================================================================

    /// Property: unique_tp <= total_tp and unique_tp <= |focal subjects|
    #[test]
    fn prop_unique_bounded(store in arb_store()) {
        let report = Engine::new().analyze(&store);
        for row in report.unique_value.iter() {
            prop_assert!(row.unique_tp <= row.total_tp);
            prop_assert!(row.unique_tp <= row.total_triggers);
            prop_assert_eq!(row.unique_tp + row.redundant_tp, row.total_tp);
            prop_assert_eq!(row.redundancy_rate.is_none(), row.total_tp == 0);
        }
    }

    /// Property: with one alarm type, every true positive is unique
    #[test]
    fn prop_single_alarm_no_redundancy(labels in prop::collection::vec(any::<bool>(), 1..100)) {
        let events = labels
            .iter()
            .enumerate()
            .map(|(i, &positive)| TriggerEvent::new(i.to_string(), "solo", positive));
        let report = Engine::new().evaluate(events).unwrap();
        let row = report.unique_value.get("solo").unwrap();
        prop_assert_eq!(row.unique_tp, row.total_tp);
        prop_assert_eq!(row.redundant_tp, 0);
        prop_assert!(report.overlaps.is_empty());
    }

    // ========================================================================
    // Engine Properties
    // ========================================================================

    /// Property: reruns are bit-identical, in parallel or sequential mode
    #[test]
    fn prop_idempotent(store in arb_store()) {
        let parallel = Engine::builder().parallel(true).build().unwrap();
        let sequential = Engine::builder().parallel(false).build().unwrap();

        let first = parallel.analyze(&store);
        prop_assert_eq!(&first, &parallel.analyze(&store));
        prop_assert_eq!(&first, &sequential.analyze(&store));
        prop_assert_eq!(first.to_json().unwrap(), sequential.analyze(&store).to_json().unwrap());
    }

    /// Property: one row per alarm type in both per-alarm tables
    #[test]
    fn prop_one_row_per_alarm(store in arb_store()) {
        let report = Engine::new().analyze(&store);
        prop_assert_eq!(report.performance.len(), store.alarm_count());
        prop_assert_eq!(report.unique_value.len(), store.alarm_count());
        for alarm in store.alarm_types() {
            prop_assert!(report.performance.get(alarm).is_some());
            prop_assert!(report.unique_value.get(alarm).is_some());
        }
    }
}
