//! Analysis report: the three output tables together
//!
//! The engine imposes no order on its rows; the tables iterate in key order and
//! expose top-K helpers for presentation. Export formats:
//! - JSON (each table as a list of rows, undefined metrics as `null`)
//! - Arrow record batches via [`ToRecordBatch`]
//! - Parquet files, one per table

mod columnar;

pub use columnar::{write_parquet, ToRecordBatch};

use crate::overlap::OverlapTable;
use crate::performance::{PerformanceTable, Reliability};
use crate::unique::UniqueValueTable;
use crate::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Performance table file name
pub const PERFORMANCE_FILE: &str = "performance.parquet";
/// Overlap table file name
pub const OVERLAPS_FILE: &str = "overlaps.parquet";
/// Unique-value table file name
pub const UNIQUE_VALUE_FILE: &str = "unique_value.parquet";

/// Output of one engine run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// Per-alarm accuracy
    pub performance: PerformanceTable,
    /// Pairwise overlap
    pub overlaps: OverlapTable,
    /// Per-alarm unique contribution
    pub unique_value: UniqueValueTable,
}

/// Headline numbers for a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    /// Number of alarm types
    pub alarm_count: usize,
    /// Number of co-occurring pairs
    pub overlapping_pairs: usize,
    /// Alarms per reliability class
    pub reliability: BTreeMap<Reliability, usize>,
    /// Alarms whose every true positive is also caught elsewhere
    pub fully_redundant_alarms: Vec<String>,
}

impl AnalysisReport {
    /// Summarise the report.
    #[must_use]
    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            alarm_count: self.performance.len(),
            overlapping_pairs: self.overlaps.len(),
            reliability: self.performance.reliability_summary(),
            fully_redundant_alarms: self
                .unique_value
                .iter()
                .filter(|row| row.total_tp > 0 && row.unique_tp == 0)
                .map(|row| row.alarm_type.clone())
                .collect(),
        }
    }

    /// Serialise the report as compact JSON.
    ///
    /// # Errors
    ///
    /// Returns `Error::Json` if serialisation fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialise the report as indented JSON.
    ///
    /// # Errors
    ///
    /// Returns `Error::Json` if serialisation fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the three tables as Parquet files into `dir`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if `dir` cannot be created, and the errors of
    /// [`write_parquet`] otherwise.
    pub fn write_parquet_dir<P: AsRef<Path>>(&self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        write_parquet(&self.performance.to_record_batch()?, dir.join(PERFORMANCE_FILE))?;
        write_parquet(&self.overlaps.to_record_batch()?, dir.join(OVERLAPS_FILE))?;
        write_parquet(&self.unique_value.to_record_batch()?, dir.join(UNIQUE_VALUE_FILE))?;

        tracing::info!(dir = %dir.display(), "wrote report tables");
        Ok(())
    }
}
