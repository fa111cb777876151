//! Error-magnitude histogram.
//!
//! The `below_*` buckets are cumulative: an error of 0.00005 is counted in all
//! four of them. Consumers read the buckets as points of a cumulative
//! distribution, so they must not be turned into a partition. `above_0.1`
//! counts errors of at least 0.1.

use serde::{Deserialize, Serialize};

/// Upper bounds of the cumulative `below_*` buckets.
pub const DISTRIBUTION_THRESHOLDS: [f64; 4] = [0.0001, 0.001, 0.01, 0.1];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDistribution {
    #[serde(rename = "below_0.0001")]
    pub below_0_0001: usize,
    #[serde(rename = "below_0.001")]
    pub below_0_001: usize,
    #[serde(rename = "below_0.01")]
    pub below_0_01: usize,
    #[serde(rename = "below_0.1")]
    pub below_0_1: usize,
    #[serde(rename = "above_0.1")]
    pub above_0_1: usize,
}

impl ErrorDistribution {
    /// Counts one absolute error.
    pub fn record(&mut self, absolute_error: f64) {
        let [t0, t1, t2, t3] = DISTRIBUTION_THRESHOLDS;
        if absolute_error < t0 {
            self.below_0_0001 += 1;
        }
        if absolute_error < t1 {
            self.below_0_001 += 1;
        }
        if absolute_error < t2 {
            self.below_0_01 += 1;
        }
        if absolute_error < t3 {
            self.below_0_1 += 1;
        }
        if absolute_error >= t3 {
            self.above_0_1 += 1;
        }
    }

    pub fn from_errors(absolute_errors: &[f64]) -> Self {
        let mut distribution = Self::default();
        for &error in absolute_errors {
            distribution.record(error);
        }
        distribution
    }

    /// Number of errors counted. NaN errors fall in no bucket.
    pub fn total(&self) -> usize {
        self.below_0_1 + self.above_0_1
    }

    /// The cumulative `below_*` counts paired with their thresholds.
    pub fn cumulative_points(&self) -> [(f64, usize); 4] {
        [
            (DISTRIBUTION_THRESHOLDS[0], self.below_0_0001),
            (DISTRIBUTION_THRESHOLDS[1], self.below_0_001),
            (DISTRIBUTION_THRESHOLDS[2], self.below_0_01),
            (DISTRIBUTION_THRESHOLDS[3], self.below_0_1),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buckets_are_cumulative() {
        let distribution = ErrorDistribution::from_errors(&[0.00005, 0.0005, 0.005, 0.05, 0.5]);
        assert_eq!(distribution.below_0_0001, 1);
        assert_eq!(distribution.below_0_001, 2);
        assert_eq!(distribution.below_0_01, 3);
        assert_eq!(distribution.below_0_1, 4);
        assert_eq!(distribution.above_0_1, 1);
        assert_eq!(distribution.total(), 5);
    }

    #[test]
    fn threshold_value_is_not_below_itself() {
        let distribution = ErrorDistribution::from_errors(&[0.1, 0.01]);
        assert_eq!(distribution.below_0_1, 1);
        assert_eq!(distribution.above_0_1, 1);
        assert_eq!(distribution.below_0_01, 0);
    }

    #[test]
    fn serializes_with_threshold_keys() {
        let json = serde_json::to_value(ErrorDistribution::from_errors(&[0.0])).unwrap();
        assert_eq!(json["below_0.0001"], 1);
        assert_eq!(json["above_0.1"], 0);
    }
}
