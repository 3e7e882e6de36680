//! Record Store: the immutable trigger-event table
//!
//! **Bulk-load Design** (Load Once, Read Many):
//! - The whole table is validated and indexed in one pass at load time
//! - No mutation API after load; analyzers only borrow the store
//! - A failed load returns no store at all (no partial loads)
//!
//! The load builds two indexes shared by every analyzer:
//! - group-by-alarm: alarm types are interned into dense [`AlarmId`]s (ordered by
//!   name) with the subjects each alarm flagged
//! - group-by-subject: each [`SubjectRecord`] carries its label and the sorted set of
//!   alarms it triggered

mod columns;
mod event;

pub use columns::{event_schema, ALARM_TYPE, IS_POSITIVE, SUBJECT_ID};
pub use event::TriggerEvent;

use crate::error::SchemaError;
use crate::{Error, Result};
use arrow::record_batch::RecordBatch;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::hash_map::Entry;
use std::collections::BTreeSet;
use std::path::Path;

/// Dense index of an alarm type within one [`RecordStore`].
///
/// Ids follow the lexical order of alarm names, so comparing ids compares names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AlarmId(usize);

impl AlarmId {
    /// Position of the alarm in [`RecordStore::alarm_types`].
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// One subject and everything the store knows about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectRecord {
    subject_id: String,
    is_positive: bool,
    alarms: Vec<AlarmId>,
}

impl SubjectRecord {
    /// Get the subject ID.
    #[must_use]
    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    /// Get the ground-truth label.
    #[must_use]
    pub const fn is_positive(&self) -> bool {
        self.is_positive
    }

    /// Alarms that fired for this subject, sorted and without duplicates.
    #[must_use]
    pub fn alarms(&self) -> &[AlarmId] {
        &self.alarms
    }

    /// Whether `alarm` fired for this subject.
    #[must_use]
    pub fn triggered(&self, alarm: AlarmId) -> bool {
        self.alarms.binary_search(&alarm).is_ok()
    }

    /// The alarm, if exactly one alarm fired for this subject.
    #[must_use]
    pub fn sole_alarm(&self) -> Option<AlarmId> {
        match self.alarms.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }
}

/// Validated, indexed, read-only table of trigger events.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    events: Vec<TriggerEvent>,
    alarm_names: Vec<String>,
    alarm_subjects: Vec<Vec<usize>>,
    subjects: Vec<SubjectRecord>,
    subject_lookup: FxHashMap<String, usize>,
}

impl RecordStore {
    /// Bulk-load and validate a set of trigger events.
    ///
    /// # Example
    ///
    /// ```rust
    /// use alarm_eval::storage::{RecordStore, TriggerEvent};
    ///
    /// # fn main() -> alarm_eval::Result<()> {
    /// let store = RecordStore::from_events(vec![
    ///     TriggerEvent::new("1", "A", true),
    ///     TriggerEvent::new("1", "B", true),
    ///     TriggerEvent::new("2", "A", false),
    /// ])?;
    /// assert_eq!(store.alarm_count(), 2);
    /// assert_eq!(store.subject_count(), 2);
    /// assert!(store.has_trigger("1", "B"));
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `Error::Schema` for the first row that:
    /// - has an empty `subject_id` or `alarm_type`
    /// - contradicts an earlier label for the same subject
    /// - repeats an earlier (`subject_id`, `alarm_type`) pair
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn from_events<I>(events: I) -> Result<Self>
    where
        I: IntoIterator<Item = TriggerEvent>,
    {
        let events: Vec<TriggerEvent> = events.into_iter().collect();
        if let Err(err) = validate(&events) {
            tracing::warn!(error = %err, "rejecting trigger-event table");
            return Err(err.into());
        }

        let (alarm_names, alarm_subjects, subjects, subject_lookup) = build_indexes(&events);

        tracing::debug!(
            events = events.len(),
            alarms = alarm_names.len(),
            subjects = subjects.len(),
            "loaded trigger events"
        );

        Ok(Self {
            events,
            alarm_names,
            alarm_subjects,
            subjects,
            subject_lookup,
        })
    }

    /// Load the input table from Arrow record batches.
    ///
    /// Columns are located by name (see [`event_schema`]); extra columns are ignored.
    ///
    /// # Errors
    ///
    /// Returns `Error::Schema` if a required column is missing, has an unsupported
    /// type, holds a null, or the rows violate the load invariants.
    pub fn from_record_batches(batches: &[RecordBatch]) -> Result<Self> {
        let mut events = Vec::with_capacity(batches.iter().map(RecordBatch::num_rows).sum());
        let mut row_offset = 0;
        for batch in batches {
            columns::read_batch(batch, row_offset, &mut events)?;
            row_offset += batch.num_rows();
        }
        Self::from_events(events)
    }

    /// Load the input table from a Parquet file.
    ///
    /// # Errors
    ///
    /// Returns `Error::StorageError` if the file cannot be read or parsed, and the
    /// errors of [`from_record_batches`](Self::from_record_batches) otherwise.
    pub fn load_parquet<P: AsRef<Path>>(path: P) -> Result<Self> {
        use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
        use std::fs::File;

        let file = File::open(path.as_ref()).map_err(|e| {
            Error::StorageError(format!("Failed to open Parquet file: {e}"))
        })?;

        let builder = ParquetRecordBatchReaderBuilder::try_new(file).map_err(|e| {
            Error::StorageError(format!("Failed to parse Parquet file: {e}"))
        })?;

        let reader = builder.build().map_err(|e| {
            Error::StorageError(format!("Failed to create Parquet reader: {e}"))
        })?;

        let mut batches = Vec::new();
        for batch in reader {
            let batch = batch.map_err(|e| {
                Error::StorageError(format!("Failed to read record batch: {e}"))
            })?;
            batches.push(batch);
        }

        Self::from_record_batches(&batches)
    }

    /// All events in load order.
    #[must_use]
    pub fn events(&self) -> &[TriggerEvent] {
        &self.events
    }

    /// Number of events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the table has no events.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of distinct alarm types.
    #[must_use]
    pub fn alarm_count(&self) -> usize {
        self.alarm_names.len()
    }

    /// Number of distinct subjects.
    #[must_use]
    pub fn subject_count(&self) -> usize {
        self.subjects.len()
    }

    /// Alarm type names in lexical order.
    pub fn alarm_types(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.alarm_names.iter().map(String::as_str)
    }

    /// All alarm ids in lexical order of their names.
    pub fn alarm_ids(&self) -> impl ExactSizeIterator<Item = AlarmId> {
        (0..self.alarm_names.len()).map(AlarmId)
    }

    /// Look up the id of an alarm type.
    #[must_use]
    pub fn alarm_id(&self, alarm_type: &str) -> Option<AlarmId> {
        self.alarm_names
            .binary_search_by(|name| name.as_str().cmp(alarm_type))
            .ok()
            .map(AlarmId)
    }

    /// Name of an alarm id.
    ///
    /// # Panics
    ///
    /// Panics if `alarm` was not issued by this store.
    #[must_use]
    pub fn alarm_name(&self, alarm: AlarmId) -> &str {
        &self.alarm_names[alarm.index()]
    }

    /// Number of triggers (equivalently, flagged subjects) of an alarm.
    #[must_use]
    pub fn trigger_count(&self, alarm: AlarmId) -> usize {
        self.alarm_subjects.get(alarm.index()).map_or(0, Vec::len)
    }

    /// All subjects in first-appearance order.
    #[must_use]
    pub fn subjects(&self) -> &[SubjectRecord] {
        &self.subjects
    }

    /// Subjects flagged by `alarm`, in load order.
    pub fn subjects_for_alarm(&self, alarm: AlarmId) -> impl Iterator<Item = &SubjectRecord> + '_ {
        self.alarm_subjects
            .get(alarm.index())
            .into_iter()
            .flatten()
            .map(|&index| &self.subjects[index])
    }

    /// Look up a subject.
    #[must_use]
    pub fn subject(&self, subject_id: &str) -> Option<&SubjectRecord> {
        self.subject_lookup
            .get(subject_id)
            .map(|&index| &self.subjects[index])
    }

    /// Ground-truth label of a subject, `None` if it never triggered anything.
    #[must_use]
    pub fn label(&self, subject_id: &str) -> Option<bool> {
        self.subject(subject_id).map(SubjectRecord::is_positive)
    }

    /// Whether `alarm_type` fired for `subject_id`.
    #[must_use]
    pub fn has_trigger(&self, subject_id: &str, alarm_type: &str) -> bool {
        match (self.subject(subject_id), self.alarm_id(alarm_type)) {
            (Some(subject), Some(alarm)) => subject.triggered(alarm),
            _ => false,
        }
    }
}

type Indexes = (
    Vec<String>,
    Vec<Vec<usize>>,
    Vec<SubjectRecord>,
    FxHashMap<String, usize>,
);

/// Intern alarm names and build the group-by-alarm and group-by-subject indexes.
fn build_indexes(events: &[TriggerEvent]) -> Indexes {
    let names: BTreeSet<&str> = events.iter().map(TriggerEvent::alarm_type).collect();
    let alarm_ids: FxHashMap<&str, AlarmId> = names
        .iter()
        .enumerate()
        .map(|(i, name)| (*name, AlarmId(i)))
        .collect();
    let alarm_names: Vec<String> = names.iter().map(|name| (*name).to_string()).collect();

    let mut alarm_subjects: Vec<Vec<usize>> = vec![Vec::new(); alarm_names.len()];
    let mut subjects: Vec<SubjectRecord> = Vec::new();
    let mut subject_lookup: FxHashMap<String, usize> = FxHashMap::default();

    for event in events {
        let alarm = alarm_ids[event.alarm_type()];
        let index = match subject_lookup.entry(event.subject_id().to_string()) {
            Entry::Occupied(slot) => *slot.get(),
            Entry::Vacant(slot) => {
                subjects.push(SubjectRecord {
                    subject_id: event.subject_id().to_string(),
                    is_positive: event.is_positive(),
                    alarms: Vec::new(),
                });
                *slot.insert(subjects.len() - 1)
            }
        };
        subjects[index].alarms.push(alarm);
        alarm_subjects[alarm.index()].push(index);
    }

    for subject in &mut subjects {
        subject.alarms.sort_unstable();
    }

    (alarm_names, alarm_subjects, subjects, subject_lookup)
}

/// Check the load invariants in row order, stopping at the first violation.
fn validate(events: &[TriggerEvent]) -> std::result::Result<(), SchemaError> {
    let mut labels: FxHashMap<&str, bool> = FxHashMap::default();
    let mut seen: FxHashSet<(&str, &str)> = FxHashSet::default();

    for (row, event) in events.iter().enumerate() {
        if event.subject_id().is_empty() {
            return Err(SchemaError::MissingField { row, field: SUBJECT_ID });
        }
        if event.alarm_type().is_empty() {
            return Err(SchemaError::MissingField { row, field: ALARM_TYPE });
        }

        match labels.entry(event.subject_id()) {
            Entry::Occupied(slot) if *slot.get() != event.is_positive() => {
                return Err(SchemaError::InconsistentLabel {
                    subject_id: event.subject_id().to_string(),
                    first: *slot.get(),
                    conflicting: event.is_positive(),
                });
            }
            Entry::Occupied(_) => {}
            Entry::Vacant(slot) => {
                slot.insert(event.is_positive());
            }
        }

        if !seen.insert((event.subject_id(), event.alarm_type())) {
            return Err(SchemaError::DuplicateTrigger {
                subject_id: event.subject_id().to_string(),
                alarm_type: event.alarm_type().to_string(),
            });
        }
    }

    Ok(())
}
