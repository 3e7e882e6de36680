//! Overlap Analyzer: pairwise co-occurrence between alarm types
//!
//! Counts are aggregated directly from each subject's sorted alarm set: a subject
//! that triggered `d` alarms contributes to the `d(d−1)/2` unordered pairs it
//! contains. Cost is O(Σ d²) over subjects, with no subject×subject join.
//!
//! For a pair with co-occurrence `c` and volumes `|A|`, `|B|`:
//! - `overlap_pct = c / min(|A|, |B|)`
//! - `jaccard = c / (|A| + |B| − c)`
//!
//! Pairs that never co-occur are omitted.

use crate::rank::{top_k_by, SortOrder};
use crate::storage::{AlarmId, RecordStore};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Unordered pair of distinct alarm types, stored with `first < second`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct AlarmPair {
    first: String,
    second: String,
}

impl AlarmPair {
    /// Normalise two alarm types into a pair; `None` for a self-pair.
    #[must_use]
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Option<Self> {
        let (a, b) = (a.into(), b.into());
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { first: a, second: b }),
            std::cmp::Ordering::Greater => Some(Self { first: b, second: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Lexically smaller alarm type.
    #[must_use]
    pub fn first(&self) -> &str {
        &self.first
    }

    /// Lexically larger alarm type.
    #[must_use]
    pub fn second(&self) -> &str {
        &self.second
    }
}

/// Co-occurrence statistics for one pair of alarm types.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlapPair {
    /// Lexically smaller alarm type
    pub alarm_a: String,
    /// Lexically larger alarm type
    pub alarm_b: String,
    /// Subjects flagged by both
    pub co_occurrence: usize,
    /// Trigger count of `alarm_a`
    pub volume_a: usize,
    /// Trigger count of `alarm_b`
    pub volume_b: usize,
    /// Share of the smaller alarm's population also caught by the other
    pub overlap_pct: f64,
    /// Intersection over union
    pub jaccard: f64,
}

impl OverlapPair {
    /// Build the row from counts.
    ///
    /// Returns `None` unless `1 <= co_occurrence <= min(volume_a, volume_b)`: pairs
    /// that never co-occur have no row, and larger counts cannot come from one table.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_counts(
        alarm_a: impl Into<String>,
        alarm_b: impl Into<String>,
        co_occurrence: usize,
        volume_a: usize,
        volume_b: usize,
    ) -> Option<Self> {
        if co_occurrence == 0 || co_occurrence > volume_a.min(volume_b) {
            return None;
        }

        let c = co_occurrence as f64;
        Some(Self {
            alarm_a: alarm_a.into(),
            alarm_b: alarm_b.into(),
            co_occurrence,
            volume_a,
            volume_b,
            overlap_pct: c / volume_a.min(volume_b) as f64,
            jaccard: c / (volume_a + volume_b - co_occurrence) as f64,
        })
    }

    /// The pair key of this row.
    #[must_use]
    pub fn pair(&self) -> AlarmPair {
        AlarmPair {
            first: self.alarm_a.clone(),
            second: self.alarm_b.clone(),
        }
    }
}

/// One [`OverlapPair`] per co-occurring pair, keyed by [`AlarmPair`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlapTable {
    rows: BTreeMap<AlarmPair, OverlapPair>,
}

impl OverlapTable {
    /// Row for a pair, in either order.
    #[must_use]
    pub fn get(&self, a: &str, b: &str) -> Option<&OverlapPair> {
        AlarmPair::new(a, b).and_then(|pair| self.rows.get(&pair))
    }

    /// Rows in pair order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &OverlapPair> + '_ {
        self.rows.values()
    }

    /// Number of co-occurring pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no pair co-occurs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The `k` pairs with the highest overlap percentage.
    #[must_use]
    pub fn top_overlaps(&self, k: usize) -> Vec<&OverlapPair> {
        top_k_by(self.rows.values(), k, SortOrder::Descending, |row| Some(row.overlap_pct))
    }

    /// The `k` most similar pairs by Jaccard index.
    #[must_use]
    pub fn top_jaccard(&self, k: usize) -> Vec<&OverlapPair> {
        top_k_by(self.rows.values(), k, SortOrder::Descending, |row| Some(row.jaccard))
    }
}

impl FromIterator<OverlapPair> for OverlapTable {
    fn from_iter<I: IntoIterator<Item = OverlapPair>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().map(|row| (row.pair(), row)).collect(),
        }
    }
}

impl Serialize for OverlapTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows.values())
    }
}

/// Compute an [`OverlapPair`] for every pair of alarm types sharing a subject.
#[must_use]
pub fn analyze(store: &RecordStore) -> OverlapTable {
    let mut counts: BTreeMap<(AlarmId, AlarmId), usize> = BTreeMap::new();

    for subject in store.subjects() {
        let alarms = subject.alarms();
        for (i, &a) in alarms.iter().enumerate() {
            for &b in &alarms[i + 1..] {
                *counts.entry((a, b)).or_default() += 1;
            }
        }
    }

    // Ids are in name order and alarm sets are sorted, so (a, b) already has a < b
    let table: OverlapTable = counts
        .into_iter()
        .filter_map(|((a, b), co_occurrence)| {
            OverlapPair::from_counts(
                store.alarm_name(a),
                store.alarm_name(b),
                co_occurrence,
                store.trigger_count(a),
                store.trigger_count(b),
            )
        })
        .collect();

    tracing::debug!(pairs = table.len(), "computed alarm overlaps");
    table
}
