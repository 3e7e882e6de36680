//! Arrow export of the output tables
//!
//! Undefined metrics become nulls in nullable `Float64` columns. Counts are `UInt64`.

use crate::overlap::OverlapTable;
use crate::performance::PerformanceTable;
use crate::unique::UniqueValueTable;
use crate::{Error, Result};
use arrow::array::{ArrayRef, Float64Array, StringArray, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

/// Conversion of an output table into a single Arrow record batch.
pub trait ToRecordBatch {
    /// Schema of the produced batch.
    fn schema() -> Schema;

    /// Convert the table, one row per entry, in key order.
    ///
    /// # Errors
    ///
    /// Returns `Error::Arrow` if the batch cannot be assembled.
    fn to_record_batch(&self) -> Result<RecordBatch>;
}

fn count_column<T>(rows: &[&T], count: impl Fn(&T) -> usize) -> ArrayRef {
    Arc::new(UInt64Array::from_iter_values(rows.iter().map(|&row| count(row) as u64)))
}

fn metric_column<T>(rows: &[&T], metric: impl Fn(&T) -> Option<f64>) -> ArrayRef {
    Arc::new(Float64Array::from(
        rows.iter().map(|&row| metric(row)).collect::<Vec<_>>(),
    ))
}

fn text_column<'a, T>(rows: &[&'a T], text: impl Fn(&'a T) -> &'a str) -> ArrayRef {
    Arc::new(StringArray::from_iter_values(rows.iter().map(|&row| text(row))))
}

impl ToRecordBatch for PerformanceTable {
    fn schema() -> Schema {
        Schema::new(vec![
            Field::new("alarm_type", DataType::Utf8, false),
            Field::new("trigger_count", DataType::UInt64, false),
            Field::new("true_positives", DataType::UInt64, false),
            Field::new("false_positives", DataType::UInt64, false),
            Field::new("tp_rate", DataType::Float64, true),
            Field::new("ci_lower", DataType::Float64, true),
            Field::new("ci_upper", DataType::Float64, true),
            Field::new("ci_width", DataType::Float64, true),
            Field::new("reliability", DataType::Utf8, false),
        ])
    }

    fn to_record_batch(&self) -> Result<RecordBatch> {
        let rows: Vec<_> = self.iter().collect();
        let columns = vec![
            text_column(&rows, |r| r.alarm_type.as_str()),
            count_column(&rows, |r| r.trigger_count),
            count_column(&rows, |r| r.true_positives),
            count_column(&rows, |r| r.false_positives),
            metric_column(&rows, |r| r.tp_rate),
            metric_column(&rows, |r| r.ci_lower),
            metric_column(&rows, |r| r.ci_upper),
            metric_column(&rows, |r| r.ci_width),
            text_column(&rows, |r| r.reliability.as_str()),
        ];
        Ok(RecordBatch::try_new(Arc::new(Self::schema()), columns)?)
    }
}

impl ToRecordBatch for OverlapTable {
    fn schema() -> Schema {
        Schema::new(vec![
            Field::new("alarm_a", DataType::Utf8, false),
            Field::new("alarm_b", DataType::Utf8, false),
            Field::new("co_occurrence", DataType::UInt64, false),
            Field::new("volume_a", DataType::UInt64, false),
            Field::new("volume_b", DataType::UInt64, false),
            Field::new("overlap_pct", DataType::Float64, false),
            Field::new("jaccard", DataType::Float64, false),
        ])
    }

    fn to_record_batch(&self) -> Result<RecordBatch> {
        let rows: Vec<_> = self.iter().collect();
        let columns = vec![
            text_column(&rows, |r| r.alarm_a.as_str()),
            text_column(&rows, |r| r.alarm_b.as_str()),
            count_column(&rows, |r| r.co_occurrence),
            count_column(&rows, |r| r.volume_a),
            count_column(&rows, |r| r.volume_b),
            metric_column(&rows, |r| Some(r.overlap_pct)),
            metric_column(&rows, |r| Some(r.jaccard)),
        ];
        Ok(RecordBatch::try_new(Arc::new(Self::schema()), columns)?)
    }
}

impl ToRecordBatch for UniqueValueTable {
    fn schema() -> Schema {
        Schema::new(vec![
            Field::new("alarm_type", DataType::Utf8, false),
            Field::new("total_triggers", DataType::UInt64, false),
            Field::new("total_tp", DataType::UInt64, false),
            Field::new("unique_subjects", DataType::UInt64, false),
            Field::new("unique_tp", DataType::UInt64, false),
            Field::new("redundant_tp", DataType::UInt64, false),
            Field::new("redundancy_rate", DataType::Float64, true),
            Field::new("unique_value_score", DataType::Float64, true),
        ])
    }

    fn to_record_batch(&self) -> Result<RecordBatch> {
        let rows: Vec<_> = self.iter().collect();
        let columns = vec![
            text_column(&rows, |r| r.alarm_type.as_str()),
            count_column(&rows, |r| r.total_triggers),
            count_column(&rows, |r| r.total_tp),
            count_column(&rows, |r| r.unique_subjects),
            count_column(&rows, |r| r.unique_tp),
            count_column(&rows, |r| r.redundant_tp),
            metric_column(&rows, |r| r.redundancy_rate),
            metric_column(&rows, |r| r.unique_value_score),
        ];
        Ok(RecordBatch::try_new(Arc::new(Self::schema()), columns)?)
    }
}

/// Write one record batch to a Parquet file.
///
/// # Errors
///
/// Returns `Error::StorageError` if the file cannot be created or written.
pub fn write_parquet<P: AsRef<Path>>(batch: &RecordBatch, path: P) -> Result<()> {
    let file = File::create(path.as_ref())
        .map_err(|e| Error::StorageError(format!("Failed to create Parquet file: {e}")))?;

    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)
        .map_err(|e| Error::StorageError(format!("Failed to create Parquet writer: {e}")))?;
    writer
        .write(batch)
        .map_err(|e| Error::StorageError(format!("Failed to write record batch: {e}")))?;
    writer
        .close()
        .map_err(|e| Error::StorageError(format!("Failed to finalize Parquet file: {e}")))?;

    Ok(())
}
