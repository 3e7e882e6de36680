//! Arrow column readers for the trigger-event table
//!
//! Accepted layouts:
//! - `subject_id`: any string layout (`Utf8`, `LargeUtf8`, `Utf8View`, dictionary) or
//!   any integer type; integers are stringified
//! - `alarm_type`: any string layout, including dictionary-encoded categories
//! - `is_positive`: `Boolean`
//!
//! Any other column is ignored.

use super::TriggerEvent;
use crate::error::SchemaError;
use crate::Result;
use arrow::array::{Array, ArrayRef, BooleanArray, StringArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;

/// Subject identifier column
pub const SUBJECT_ID: &str = "subject_id";
/// Alarm type column
pub const ALARM_TYPE: &str = "alarm_type";
/// Ground-truth label column
pub const IS_POSITIVE: &str = "is_positive";

/// Canonical schema of the input table.
#[must_use]
pub fn event_schema() -> Schema {
    Schema::new(vec![
        Field::new(SUBJECT_ID, DataType::Utf8, false),
        Field::new(ALARM_TYPE, DataType::Utf8, false),
        Field::new(IS_POSITIVE, DataType::Boolean, false),
    ])
}

/// Decode one batch, appending to `out`. `row_offset` is the number of rows in
/// earlier batches, so error rows are reported against the whole table.
pub(super) fn read_batch(
    batch: &RecordBatch,
    row_offset: usize,
    out: &mut Vec<TriggerEvent>,
) -> Result<()> {
    let subject_ids = identifier_values(column(batch, SUBJECT_ID)?, SUBJECT_ID, true)?;
    let alarm_types = identifier_values(column(batch, ALARM_TYPE)?, ALARM_TYPE, false)?;
    let labels = label_values(column(batch, IS_POSITIVE)?)?;

    out.reserve(batch.num_rows());
    for (i, ((subject_id, alarm_type), label)) in subject_ids
        .into_iter()
        .zip(alarm_types)
        .zip(labels)
        .enumerate()
    {
        let row = row_offset + i;
        let subject_id = subject_id.ok_or(SchemaError::MissingField { row, field: SUBJECT_ID })?;
        let alarm_type = alarm_type.ok_or(SchemaError::MissingField { row, field: ALARM_TYPE })?;
        let is_positive = label.ok_or(SchemaError::MissingField { row, field: IS_POSITIVE })?;
        out.push(TriggerEvent::new(subject_id, alarm_type, is_positive));
    }

    Ok(())
}

fn column<'a>(batch: &'a RecordBatch, name: &'static str) -> Result<&'a ArrayRef> {
    let schema = batch.schema();
    let (index, _) = schema
        .column_with_name(name)
        .ok_or(SchemaError::MissingColumn { column: name })?;
    Ok(batch.column(index))
}

fn unsupported(column: &ArrayRef, name: &'static str) -> SchemaError {
    SchemaError::UnsupportedColumnType {
        column: name,
        data_type: format!("{:?}", column.data_type()),
    }
}

/// Whether an identifier column's type is accepted: strings in any layout
/// (plain, large, view or dictionary-encoded) and, for subject ids, integers.
fn is_identifier_type(data_type: &DataType, allow_integers: bool) -> bool {
    match data_type {
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => true,
        DataType::Dictionary(_, values) => is_identifier_type(values, allow_integers),
        other => allow_integers && other.is_integer(),
    }
}

/// Read an identifier column as owned strings, `None` for nulls.
fn identifier_values(
    column: &ArrayRef,
    name: &'static str,
    allow_integers: bool,
) -> Result<Vec<Option<String>>> {
    if !is_identifier_type(column.data_type(), allow_integers) {
        return Err(unsupported(column, name).into());
    }

    let strings = cast(column, &DataType::Utf8)?;
    let array = strings
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| unsupported(column, name))?;
    Ok(array.iter().map(|v| v.map(str::to_string)).collect())
}

fn label_values(column: &ArrayRef) -> Result<Vec<Option<bool>>> {
    let array = column
        .as_any()
        .downcast_ref::<BooleanArray>()
        .ok_or_else(|| unsupported(column, IS_POSITIVE))?;
    Ok(array.iter().collect())
}
