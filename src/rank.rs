//! Top-K selection over output rows
//!
//! **Problem**: reports want "top 10 overlaps" or "best alarms by TP rate"; a full
//! sort is O(N log N) while only K rows are shown.
//!
//! **Solution**: min-heap based Top-K selection, O(N log K).
//!
//! Rows whose key is undefined (a [`Metric`] of `None`) are never compared
//! numerically: they rank after every defined row, in input order. Ties between
//! defined keys also keep input order, so rankings are deterministic.

use crate::metric::Metric;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Sort order for Top-K selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Ascending order (smallest K values)
    Ascending,
    /// Descending order (largest K values)
    Descending,
}

// Heap item; the heap top is the worst row kept so far.
#[derive(Debug)]
struct HeapItem {
    key: f64,
    seq: usize,
}

impl PartialEq for HeapItem {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapItem {}

impl Ord for HeapItem {
    fn cmp(&self, other: &Self) -> Ordering {
        // Smaller key is worse; among equal keys the later row is worse
        other
            .key
            .total_cmp(&self.key)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for HeapItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Select the best `k` rows by `key`, best first.
///
/// Time complexity: O(N log K); space: O(K).
///
/// # Examples
///
/// ```rust
/// use alarm_eval::rank::{top_k_by, SortOrder};
///
/// let rows = [("a", Some(0.2)), ("b", None), ("c", Some(0.9)), ("d", Some(0.5))];
/// let top = top_k_by(&rows, 3, SortOrder::Descending, |row| row.1);
/// let names: Vec<&str> = top.iter().map(|row| row.0).collect();
/// assert_eq!(names, vec!["c", "d", "a"]);
/// ```
pub fn top_k_by<'a, T, I, F>(rows: I, k: usize, order: SortOrder, key: F) -> Vec<&'a T>
where
    I: IntoIterator<Item = &'a T>,
    F: Fn(&T) -> Metric,
{
    if k == 0 {
        return Vec::new();
    }

    let rows: Vec<&'a T> = rows.into_iter().collect();
    let mut heap: BinaryHeap<HeapItem> = BinaryHeap::with_capacity(k.min(rows.len()));
    let mut undefined = Vec::new();

    for (seq, &row) in rows.iter().enumerate() {
        let Some(value) = key(row) else {
            if undefined.len() < k {
                undefined.push(seq);
            }
            continue;
        };
        let item = HeapItem {
            key: match order {
                SortOrder::Descending => value,
                SortOrder::Ascending => -value,
            },
            seq,
        };

        if heap.len() < k {
            heap.push(item);
        } else if let Some(worst) = heap.peek() {
            if item < *worst {
                heap.pop();
                heap.push(item);
            }
        }
    }

    let mut selected: Vec<usize> = heap.into_sorted_vec().into_iter().map(|item| item.seq).collect();
    selected.extend(undefined);
    selected.truncate(k);
    selected.into_iter().map(|seq| rows[seq]).collect()
}
