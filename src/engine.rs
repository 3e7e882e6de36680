//! Engine: runs the three analyzers over one record store
//!
//! The analyzers only borrow the store and share no mutable state, so with the
//! `rayon` feature they run as independent tasks joined on completion. The store
//! must be fully loaded first; `RecordStore` has no mutation API after load, so
//! this holds by construction.

use crate::config::{EngineConfig, ReliabilityThresholds};
use crate::overlap::{self, OverlapTable};
use crate::performance::{self, PerformanceTable};
use crate::report::AnalysisReport;
use crate::storage::{RecordStore, TriggerEvent};
use crate::unique::{self, UniqueValueTable};
use crate::Result;

/// Alarm evaluation engine
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Engine with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new engine builder
    #[must_use]
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Engine with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if the configuration fails validation.
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run all three analyses.
    ///
    /// # Example
    ///
    /// ```rust
    /// use alarm_eval::storage::{RecordStore, TriggerEvent};
    /// use alarm_eval::Engine;
    ///
    /// # fn main() -> alarm_eval::Result<()> {
    /// let store = RecordStore::from_events(vec![
    ///     TriggerEvent::new("1", "A", true),
    ///     TriggerEvent::new("1", "B", true),
    ///     TriggerEvent::new("2", "B", false),
    /// ])?;
    /// let report = Engine::new().analyze(&store);
    ///
    /// assert_eq!(report.performance.len(), 2);
    /// assert_eq!(report.overlaps.len(), 1);
    /// assert_eq!(report.unique_value.get("A").map(|row| row.unique_tp), Some(0));
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn analyze(&self, store: &RecordStore) -> AnalysisReport {
        let (performance, overlaps, unique_value) = if self.config.parallel {
            self.run_parallel(store)
        } else {
            self.run_sequential(store)
        };

        tracing::info!(
            alarms = store.alarm_count(),
            subjects = store.subject_count(),
            events = store.len(),
            pairs = overlaps.len(),
            "alarm evaluation complete"
        );

        AnalysisReport {
            performance,
            overlaps,
            unique_value,
        }
    }

    /// Load `events` and analyze them.
    ///
    /// # Errors
    ///
    /// Returns `Error::Schema` if the events fail load validation; no analysis runs.
    pub fn evaluate<I>(&self, events: I) -> Result<AnalysisReport>
    where
        I: IntoIterator<Item = TriggerEvent>,
    {
        let store = RecordStore::from_events(events)?;
        Ok(self.analyze(&store))
    }

    fn run_sequential(
        &self,
        store: &RecordStore,
    ) -> (PerformanceTable, OverlapTable, UniqueValueTable) {
        (
            performance::estimate(store, &self.config),
            overlap::analyze(store),
            unique::analyze(store),
        )
    }

    #[cfg(feature = "rayon")]
    fn run_parallel(
        &self,
        store: &RecordStore,
    ) -> (PerformanceTable, OverlapTable, UniqueValueTable) {
        let (performance, (overlaps, unique_value)) = rayon::join(
            || performance::estimate(store, &self.config),
            || rayon::join(|| overlap::analyze(store), || unique::analyze(store)),
        );
        (performance, overlaps, unique_value)
    }

    #[cfg(not(feature = "rayon"))]
    fn run_parallel(
        &self,
        store: &RecordStore,
    ) -> (PerformanceTable, OverlapTable, UniqueValueTable) {
        self.run_sequential(store)
    }
}

/// Engine builder
#[derive(Debug, Default)]
pub struct EngineBuilder {
    config: EngineConfig,
}

impl EngineBuilder {
    /// Set the Wilson interval z-score (1.96 for 95%)
    #[must_use]
    pub const fn confidence_z(mut self, z: f64) -> Self {
        self.config.confidence_z = z;
        self
    }

    /// Set the reliability thresholds
    #[must_use]
    pub const fn thresholds(mut self, thresholds: ReliabilityThresholds) -> Self {
        self.config.thresholds = thresholds;
        self
    }

    /// Run analyzers concurrently (default) or one after another
    #[must_use]
    pub const fn parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    /// Build the engine
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if the configuration fails validation.
    pub fn build(self) -> Result<Engine> {
        Engine::with_config(self.config)
    }
}
