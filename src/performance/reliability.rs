//! Reliability classification of an alarm's sample
//!
//! An ordered list of (predicate, class) rules evaluated top to bottom; the first
//! rule that matches decides. Small-sample rules come first so they dominate the
//! wide-interval rule.

use crate::config::ReliabilityThresholds;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How far an alarm's estimated TP rate can be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Reliability {
    /// Fewer than 5 cases
    CriticalSample,
    /// 5 to 15 cases
    VeryPoorSample,
    /// Fewer than 3 true positives
    TooFewPositives,
    /// At most one true positive in fewer than 20 cases
    ExtremeProportion,
    /// Confidence interval wider than 0.4
    CiTooWide,
    /// None of the above
    Reliable,
}

impl Reliability {
    /// Every class, in rule order.
    pub const ALL: [Self; 6] = [
        Self::CriticalSample,
        Self::VeryPoorSample,
        Self::TooFewPositives,
        Self::ExtremeProportion,
        Self::CiTooWide,
        Self::Reliable,
    ];

    /// Stable machine-readable label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CriticalSample => "CRITICAL_SAMPLE",
            Self::VeryPoorSample => "VERY_POOR_SAMPLE",
            Self::TooFewPositives => "TOO_FEW_POSITIVES",
            Self::ExtremeProportion => "EXTREME_PROPORTION",
            Self::CiTooWide => "CI_TOO_WIDE",
            Self::Reliable => "RELIABLE",
        }
    }

    /// Human-readable reason, worded for the default thresholds.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::CriticalSample => "fewer than 5 cases",
            Self::VeryPoorSample => "5-15 cases",
            Self::TooFewPositives => "fewer than 3 true positives",
            Self::ExtremeProportion => "extreme proportion with few cases",
            Self::CiTooWide => "confidence interval too wide",
            Self::Reliable => "reliable estimate",
        }
    }

    /// Whether the estimate can be acted on.
    #[must_use]
    pub const fn is_reliable(self) -> bool {
        matches!(self, Self::Reliable)
    }
}

impl fmt::Display for Reliability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the rules look at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleEvidence {
    /// Trigger count
    pub n: usize,
    /// True-positive count
    pub k: usize,
    /// Confidence interval width; `None` when `n == 0`
    pub ci_width: Option<f64>,
}

type Predicate = fn(&SampleEvidence, &ReliabilityThresholds) -> bool;

const RULES: [(Predicate, Reliability); 5] = [
    (|e, t| e.n < t.critical_sample, Reliability::CriticalSample),
    (|e, t| e.n < t.very_poor_sample, Reliability::VeryPoorSample),
    (|e, t| e.k < t.min_true_positives, Reliability::TooFewPositives),
    (
        |e, t| e.k <= t.extreme_proportion_max_tp && e.n < t.extreme_proportion_max_n,
        Reliability::ExtremeProportion,
    ),
    (
        |e, t| e.ci_width.map_or(true, |w| w > t.max_ci_width),
        Reliability::CiTooWide,
    ),
];

/// Classify a sample: first matching rule wins, [`Reliability::Reliable`] otherwise.
#[must_use]
pub fn classify(evidence: &SampleEvidence, thresholds: &ReliabilityThresholds) -> Reliability {
    RULES
        .iter()
        .find(|(predicate, _)| predicate(evidence, thresholds))
        .map_or(Reliability::Reliable, |(_, class)| *class)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_default(n: usize, k: usize, ci_width: f64) -> Reliability {
        classify(
            &SampleEvidence { n, k, ci_width: Some(ci_width) },
            &ReliabilityThresholds::default(),
        )
    }

    #[test]
    fn test_rule_boundaries() {
        assert_eq!(classify_default(4, 4, 0.1), Reliability::CriticalSample);
        assert_eq!(classify_default(5, 5, 0.1), Reliability::VeryPoorSample);
        assert_eq!(classify_default(14, 10, 0.1), Reliability::VeryPoorSample);
        assert_eq!(classify_default(15, 2, 0.1), Reliability::TooFewPositives);
        assert_eq!(classify_default(15, 3, 0.41), Reliability::CiTooWide);
        assert_eq!(classify_default(15, 3, 0.4), Reliability::Reliable);
    }

    #[test]
    fn test_small_sample_dominates_wide_interval() {
        // Wide interval, but the sample-size rule comes first
        assert_eq!(classify_default(2, 1, 0.9), Reliability::CriticalSample);
        assert_eq!(classify_default(10, 0, 0.9), Reliability::VeryPoorSample);
    }

    #[test]
    fn test_extreme_proportion_reachable_with_custom_thresholds() {
        let thresholds = ReliabilityThresholds {
            min_true_positives: 0,
            ..ReliabilityThresholds::default()
        };
        let evidence = SampleEvidence { n: 16, k: 1, ci_width: Some(0.1) };
        assert_eq!(classify(&evidence, &thresholds), Reliability::ExtremeProportion);
    }

    #[test]
    fn test_missing_interval_is_never_reliable() {
        let thresholds = ReliabilityThresholds {
            critical_sample: 0,
            very_poor_sample: 0,
            min_true_positives: 0,
            extreme_proportion_max_n: 0,
            ..ReliabilityThresholds::default()
        };
        let evidence = SampleEvidence { n: 0, k: 0, ci_width: None };
        assert_eq!(classify(&evidence, &thresholds), Reliability::CiTooWide);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Reliability::CiTooWide.to_string(), "CI_TOO_WIDE");
        assert_eq!(
            serde_json::to_string(&Reliability::TooFewPositives).unwrap(),
            r#""TOO_FEW_POSITIVES""#
        );
        for class in Reliability::ALL {
            assert_eq!(serde_json::to_string(&class).unwrap(), format!("\"{class}\""));
        }
        assert_eq!(Reliability::CriticalSample.description(), "fewer than 5 cases");
        assert!(Reliability::Reliable.is_reliable());
        assert!(!Reliability::CiTooWide.is_reliable());
    }
}
