//! Performance Estimator: per-alarm accuracy with small-sample-safe bounds
//!
//! For each alarm type with `n` triggers and `k` true positives:
//! - `tp_rate = k / n` (absent when `n == 0`)
//! - a Wilson score interval at the configured z (95% by default)
//! - a [`Reliability`] class from the ordered rules in [`reliability`]
//!
//! The output is keyed by alarm type; ranking is left to the caller
//! (see [`PerformanceTable::ranked_by_tp_rate`]).

pub mod reliability;
mod wilson;

pub use reliability::{classify, Reliability, SampleEvidence};
pub use wilson::WilsonInterval;

use crate::config::{EngineConfig, ReliabilityThresholds};
use crate::metric::{ratio, Metric};
use crate::rank::{top_k_by, SortOrder};
use crate::storage::{AlarmId, RecordStore};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Accuracy of one alarm type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlarmPerformance {
    /// Alarm type
    pub alarm_type: String,
    /// Number of triggers (`n`)
    pub trigger_count: usize,
    /// Triggers on positive subjects (`k`)
    pub true_positives: usize,
    /// Triggers on negative subjects (`n - k`)
    pub false_positives: usize,
    /// `k / n`
    pub tp_rate: Metric,
    /// Wilson lower bound
    pub ci_lower: Metric,
    /// Wilson upper bound
    pub ci_upper: Metric,
    /// `ci_upper - ci_lower`
    pub ci_width: Metric,
    /// Trustworthiness of the estimate
    pub reliability: Reliability,
}

impl AlarmPerformance {
    /// Build the row from raw counts.
    #[must_use]
    pub fn from_counts(
        alarm_type: impl Into<String>,
        trigger_count: usize,
        true_positives: usize,
        z: f64,
        thresholds: &ReliabilityThresholds,
    ) -> Self {
        let interval = WilsonInterval::new(true_positives, trigger_count, z);
        let ci_width = interval.as_ref().map(WilsonInterval::width);
        let reliability = classify(
            &SampleEvidence {
                n: trigger_count,
                k: true_positives,
                ci_width,
            },
            thresholds,
        );

        Self {
            alarm_type: alarm_type.into(),
            trigger_count,
            true_positives,
            false_positives: trigger_count.saturating_sub(true_positives),
            tp_rate: ratio(true_positives, trigger_count),
            ci_lower: interval.map(|ci| ci.lower),
            ci_upper: interval.map(|ci| ci.upper),
            ci_width,
            reliability,
        }
    }
}

/// One [`AlarmPerformance`] per alarm type, keyed by alarm type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerformanceTable {
    rows: BTreeMap<String, AlarmPerformance>,
}

impl PerformanceTable {
    /// Row for an alarm type.
    #[must_use]
    pub fn get(&self, alarm_type: &str) -> Option<&AlarmPerformance> {
        self.rows.get(alarm_type)
    }

    /// Rows in alarm-type order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &AlarmPerformance> + '_ {
        self.rows.values()
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows by descending TP rate; undefined rates last.
    #[must_use]
    pub fn ranked_by_tp_rate(&self) -> Vec<&AlarmPerformance> {
        top_k_by(self.rows.values(), self.rows.len(), SortOrder::Descending, |row| row.tp_rate)
    }

    /// Number of alarms in each reliability class, in rule order.
    #[must_use]
    pub fn reliability_summary(&self) -> BTreeMap<Reliability, usize> {
        let mut summary: BTreeMap<Reliability, usize> =
            Reliability::ALL.iter().map(|class| (*class, 0)).collect();
        for row in self.rows.values() {
            *summary.entry(row.reliability).or_default() += 1;
        }
        summary
    }
}

impl FromIterator<AlarmPerformance> for PerformanceTable {
    fn from_iter<I: IntoIterator<Item = AlarmPerformance>>(iter: I) -> Self {
        Self {
            rows: iter
                .into_iter()
                .map(|row| (row.alarm_type.clone(), row))
                .collect(),
        }
    }
}

impl Serialize for PerformanceTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows.values())
    }
}

/// Compute one [`AlarmPerformance`] row per alarm type in the store.
#[must_use]
pub fn estimate(store: &RecordStore, config: &EngineConfig) -> PerformanceTable {
    let table: PerformanceTable = store
        .alarm_ids()
        .map(|alarm| alarm_performance(store, alarm, config))
        .collect();

    tracing::debug!(rows = table.len(), "estimated alarm performance");
    table
}

fn alarm_performance(store: &RecordStore, alarm: AlarmId, config: &EngineConfig) -> AlarmPerformance {
    let n = store.trigger_count(alarm);
    let k = store
        .subjects_for_alarm(alarm)
        .filter(|subject| subject.is_positive())
        .count();

    AlarmPerformance::from_counts(
        store.alarm_name(alarm),
        n,
        k,
        config.confidence_z,
        &config.thresholds,
    )
}
