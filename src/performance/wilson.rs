//! Wilson score interval for a binomial proportion
//!
//! Stays inside [0, 1] and keeps a usable width for small `n` and for
//! proportions near 0 or 1, where the Wald interval collapses.
//!
//! ```text
//! center    = (p + z²/(2n)) / (1 + z²/n)
//! halfwidth = z · sqrt(p(1−p)/n + z²/(4n²)) / (1 + z²/n)
//! ```

use serde::{Deserialize, Serialize};

/// Confidence interval around an observed proportion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WilsonInterval {
    /// Lower bound, clamped to `[0, p]`
    pub lower: f64,
    /// Upper bound, clamped to `[p, 1]`
    pub upper: f64,
}

impl WilsonInterval {
    /// Interval for `successes` out of `trials` at z-score `z`.
    ///
    /// Returns `None` when `trials == 0`: there is no proportion to bound.
    ///
    /// # Example
    ///
    /// ```rust
    /// use alarm_eval::performance::WilsonInterval;
    ///
    /// let ci = WilsonInterval::new(8, 10, 1.96).unwrap();
    /// assert!(ci.lower < 0.8 && 0.8 < ci.upper);
    /// assert!(WilsonInterval::new(0, 0, 1.96).is_none());
    /// ```
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(successes: usize, trials: usize, z: f64) -> Option<Self> {
        if trials == 0 {
            return None;
        }

        let n = trials as f64;
        let p = successes.min(trials) as f64 / n;
        let z2 = z * z;

        let denom = 1.0 + z2 / n;
        let center = (p + z2 / (2.0 * n)) / denom;
        let half_width = z * (p * (1.0 - p) / n + z2 / (4.0 * n * n)).sqrt() / denom;

        // The exact interval always contains p; clamp away rounding at p = 0 and p = 1
        let lower = (center - half_width).max(0.0).min(p);
        let upper = (center + half_width).min(1.0).max(p);

        Some(Self { lower, upper })
    }

    /// `upper - lower`
    #[must_use]
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}
