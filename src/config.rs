//! Engine configuration
//!
//! Defaults reproduce the standard evaluation: 95% Wilson intervals and the
//! reliability thresholds 5 / 15 / 3 / (1, 20) / 0.4. Configs can be built in code
//! through [`crate::Engine::builder`] or loaded from JSON:
//!
//! ```rust
//! use alarm_eval::EngineConfig;
//!
//! # fn main() -> alarm_eval::Result<()> {
//! let config = EngineConfig::from_json_str(r#"{ "confidence_z": 2.576 }"#)?;
//! assert!((config.confidence_z - 2.576).abs() < f64::EPSILON);
//! assert_eq!(config.thresholds.critical_sample, 5);
//! # Ok(())
//! # }
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// z-score for a two-sided 95% interval
pub const DEFAULT_CONFIDENCE_Z: f64 = 1.96;

/// Cut-offs used by the reliability rules.
///
/// Only the numbers are configurable; the order in which rules are checked is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReliabilityThresholds {
    /// Below this many triggers the sample is critical
    pub critical_sample: usize,
    /// Below this many triggers the sample is very poor
    pub very_poor_sample: usize,
    /// Below this many true positives there are too few positives
    pub min_true_positives: usize,
    /// At most this many true positives counts as an extreme proportion...
    pub extreme_proportion_max_tp: usize,
    /// ...when there are also fewer than this many triggers
    pub extreme_proportion_max_n: usize,
    /// Intervals wider than this are too wide to trust
    pub max_ci_width: f64,
}

impl Default for ReliabilityThresholds {
    fn default() -> Self {
        Self {
            critical_sample: 5,
            very_poor_sample: 15,
            min_true_positives: 3,
            extreme_proportion_max_tp: 1,
            extreme_proportion_max_n: 20,
            max_ci_width: 0.4,
        }
    }
}

/// Full engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// z-score of the Wilson interval
    pub confidence_z: f64,
    /// Reliability rule cut-offs
    pub thresholds: ReliabilityThresholds,
    /// Run the three analyzers concurrently (needs the `rayon` feature)
    pub parallel: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            confidence_z: DEFAULT_CONFIDENCE_Z,
            thresholds: ReliabilityThresholds::default(),
            parallel: true,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::Json` on malformed JSON and `Error::InvalidConfig` if
    /// validation fails.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the config for values that would make the analysis meaningless.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` describing the first bad value.
    pub fn validate(&self) -> Result<()> {
        if !self.confidence_z.is_finite() || self.confidence_z <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "confidence_z must be a positive finite number, got {}",
                self.confidence_z
            )));
        }

        let t = &self.thresholds;
        if !(t.max_ci_width > 0.0 && t.max_ci_width <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "max_ci_width must be in (0, 1], got {}",
                t.max_ci_width
            )));
        }
        if t.critical_sample > t.very_poor_sample {
            return Err(Error::InvalidConfig(format!(
                "critical_sample ({}) must not exceed very_poor_sample ({})",
                t.critical_sample, t.very_poor_sample
            )));
        }

        Ok(())
    }
}
