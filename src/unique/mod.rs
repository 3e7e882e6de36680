//! Unique Value Analyzer: how much detection each alarm adds on its own
//!
//! A subject is *unique to* alarm `A` when `A` is the only alarm in its triggered
//! set, i.e. it is in `focal(A) \ ⋃ other(A)`. Since the store already holds each
//! subject's sorted alarm set, one pass over subjects attributes every exclusive
//! catch, O(total events), instead of rebuilding "subjects of other alarms" per
//! alarm.
//!
//! Per alarm `A`:
//! - `total_tp`: positives among all of `A`'s triggers
//! - `unique_tp`: positives caught by `A` alone
//! - `redundant_tp = total_tp − unique_tp`
//! - `redundancy_rate = redundant_tp / total_tp` (absent when `total_tp == 0`)
//! - `unique_value_score = unique_tp / total_triggers`

use crate::metric::{ratio, Metric};
use crate::rank::{top_k_by, SortOrder};
use crate::storage::RecordStore;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Unique contribution of one alarm type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UniqueValue {
    /// Alarm type
    pub alarm_type: String,
    /// Number of triggers
    pub total_triggers: usize,
    /// True positives among all triggers
    pub total_tp: usize,
    /// Subjects flagged by this alarm and no other, regardless of label
    pub unique_subjects: usize,
    /// True positives flagged by this alarm and no other
    pub unique_tp: usize,
    /// True positives also flagged by some other alarm
    pub redundant_tp: usize,
    /// `redundant_tp / total_tp`
    pub redundancy_rate: Metric,
    /// `unique_tp / total_triggers`
    pub unique_value_score: Metric,
}

impl UniqueValue {
    /// Build the row from counts.
    #[must_use]
    pub fn from_counts(
        alarm_type: impl Into<String>,
        total_triggers: usize,
        total_tp: usize,
        unique_subjects: usize,
        unique_tp: usize,
    ) -> Self {
        let redundant_tp = total_tp.saturating_sub(unique_tp);
        Self {
            alarm_type: alarm_type.into(),
            total_triggers,
            total_tp,
            unique_subjects,
            unique_tp,
            redundant_tp,
            redundancy_rate: ratio(redundant_tp, total_tp),
            unique_value_score: ratio(unique_tp, total_triggers),
        }
    }
}

/// One [`UniqueValue`] per alarm type, keyed by alarm type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UniqueValueTable {
    rows: BTreeMap<String, UniqueValue>,
}

impl UniqueValueTable {
    /// Row for an alarm type.
    #[must_use]
    pub fn get(&self, alarm_type: &str) -> Option<&UniqueValue> {
        self.rows.get(alarm_type)
    }

    /// Rows in alarm-type order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &UniqueValue> + '_ {
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

    /// The `k` alarms with the highest unique-value score.
    #[must_use]
    pub fn top_unique_value(&self, k: usize) -> Vec<&UniqueValue> {
        top_k_by(self.rows.values(), k, SortOrder::Descending, |row| row.unique_value_score)
    }

    /// The `k` most redundant alarms; alarms with no true positives come last.
    #[must_use]
    pub fn most_redundant(&self, k: usize) -> Vec<&UniqueValue> {
        top_k_by(self.rows.values(), k, SortOrder::Descending, |row| row.redundancy_rate)
    }
}

impl FromIterator<UniqueValue> for UniqueValueTable {
    fn from_iter<I: IntoIterator<Item = UniqueValue>>(iter: I) -> Self {
        Self {
            rows: iter
                .into_iter()
                .map(|row| (row.alarm_type.clone(), row))
                .collect(),
        }
    }
}

impl Serialize for UniqueValueTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows.values())
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    triggers: usize,
    tp: usize,
    unique_subjects: usize,
    unique_tp: usize,
}

/// Compute one [`UniqueValue`] row per alarm type in the store.
#[must_use]
pub fn analyze(store: &RecordStore) -> UniqueValueTable {
    let mut tallies = vec![Tally::default(); store.alarm_count()];

    for subject in store.subjects() {
        let positive = usize::from(subject.is_positive());
        for alarm in subject.alarms() {
            let tally = &mut tallies[alarm.index()];
            tally.triggers += 1;
            tally.tp += positive;
        }
        if let Some(only) = subject.sole_alarm() {
            let tally = &mut tallies[only.index()];
            tally.unique_subjects += 1;
            tally.unique_tp += positive;
        }
    }

    let table: UniqueValueTable = store
        .alarm_ids()
        .zip(tallies)
        .map(|(alarm, tally)| {
            UniqueValue::from_counts(
                store.alarm_name(alarm),
                tally.triggers,
                tally.tp,
                tally.unique_subjects,
                tally.unique_tp,
            )
        })
        .collect();

    tracing::debug!(rows = table.len(), "attributed unique alarm value");
    table
}
