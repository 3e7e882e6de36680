//! Ratio metrics with an explicit "not applicable" state
//!
//! A zero denominator yields `None`. Coercing it to `0.0` would read as "no
//! redundancy" and `NaN` would poison downstream sorts, so neither is used.

/// A ratio that is absent when its denominator is zero.
pub type Metric = Option<f64>;

/// `numerator / denominator`, or `None` when `denominator == 0`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn ratio(numerator: usize, denominator: usize) -> Metric {
    if denominator == 0 {
        return None;
    }
    Some(numerator as f64 / denominator as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_defined() {
        assert_eq!(ratio(1, 4), Some(0.25));
        assert_eq!(ratio(0, 3), Some(0.0));
    }

    #[test]
    fn test_ratio_zero_denominator_is_absent() {
        assert_eq!(ratio(0, 0), None);
        assert_eq!(ratio(5, 0), None);
    }
}
