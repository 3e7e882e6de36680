//! # alarm-eval: Operational Quality of Detection Rules
//!
//! **Version**: 0.1.0
//!
//! Given a flat table of trigger events (`subject_id`, `alarm_type`, `is_positive`),
//! alarm-eval answers three questions about a rule set:
//!
//! - **Performance**: how accurate is each alarm, with Wilson score intervals and a
//!   reliability class that flags samples too small to trust
//! - **Overlap**: how often do pairs of alarms flag the same subjects
//!   (overlap percentage and Jaccard similarity)
//! - **Unique value**: how many true positives each alarm catches that no other
//!   alarm does
//!
//! ## Design Principles
//!
//! - **Load once, read many**: the [`RecordStore`] is validated and indexed at load,
//!   then only borrowed; a schema violation fails the whole load
//! - **Explicit undefined metrics**: a ratio with a zero denominator is `None`,
//!   never `NaN` and never `0.0`
//! - **Independent analyzers**: the three analyses share nothing but the store and
//!   run in parallel under the `rayon` feature
//! - **Deterministic output**: tables are keyed maps; reruns are bit-identical
//!
//! ## Example Usage
//!
//! ```rust
//! use alarm_eval::storage::TriggerEvent;
//! use alarm_eval::Engine;
//!
//! # fn main() -> alarm_eval::Result<()> {
//! let report = Engine::new().evaluate(vec![
//!     TriggerEvent::new("1", "A", true),
//!     TriggerEvent::new("2", "A", false),
//!     TriggerEvent::new("3", "A", false),
//!     TriggerEvent::new("1", "B", true),
//!     TriggerEvent::new("4", "B", true),
//! ])?;
//!
//! let overlap = report.overlaps.get("A", "B").expect("A and B share subject 1");
//! assert!((overlap.jaccard - 0.25).abs() < 1e-12);
//!
//! let b = report.unique_value.get("B").expect("B fired");
//! assert_eq!(b.unique_tp, 1);
//! assert_eq!(b.redundancy_rate, Some(0.5));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod config;
pub mod engine;
pub mod error;
pub mod metric;
pub mod overlap;
pub mod performance;
pub mod rank;
pub mod report;
pub mod storage;
pub mod unique;

pub use config::{EngineConfig, ReliabilityThresholds};
pub use engine::{Engine, EngineBuilder};
pub use error::{Error, Result, SchemaError};
pub use report::AnalysisReport;
pub use storage::{RecordStore, TriggerEvent};
