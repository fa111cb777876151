//! Accuracy engine comparing predictions against ground truth.
//!
//! The comparison is positional: prediction `i` is compared with ground truth
//! `i`, over the first `min(len(predictions), len(ground_truth))` samples.
//! Nothing is reordered or matched by value. Errors are computed in f64 from
//! the f32 inputs.

pub mod accuracy_config;
pub mod accuracy_report;
pub mod distribution;
pub mod percentile;

use serde::{Deserialize, Serialize};

use crate::errors::{AccuracyError, AccuracyResult};

use accuracy_config::REGRESSION_THRESHOLD;

pub use accuracy_config::{AccuracyConfig, ConfigLoader};
pub use accuracy_report::{
    AccuracyReport, AccuracySummary, DEFAULT_REFERENCE_MODEL, check_accuracy,
};
pub use distribution::{DISTRIBUTION_THRESHOLDS, ErrorDistribution};
pub use percentile::{percentile, sort_errors};

/// Absolute error percentiles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorPercentiles {
    pub p50: f64,
    pub p90: f64,
    pub p95: f64,
    pub p99: f64,
    #[serde(rename = "p99.9")]
    pub p99_9: f64,
}

/// Relative error percentiles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelativeErrorPercentiles {
    pub p50: f64,
    pub p90: f64,
    pub p95: f64,
    pub p99: f64,
}

/// Result of comparing predictions against ground truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracyMetrics {
    pub n_samples_compared: usize,
    pub exact_matches_ratio: f64,
    pub max_absolute_error: f64,
    pub mean_absolute_error: f64,
    pub rmse: f64,
    pub mean_relative_error: f64,
    pub error_percentiles: ErrorPercentiles,
    pub relative_error_percentiles: RelativeErrorPercentiles,
    pub regression_detected: bool,
    /// Absent from reports written before the threshold was recorded.
    #[serde(default = "default_regression_threshold")]
    pub regression_threshold: f64,
    pub error_distribution: ErrorDistribution,
}

/// Compares two float sequences and produces the accuracy metrics.
///
/// Fails with [`AccuracyError::EmptyComparison`] when the sequences share no
/// samples and with [`AccuracyError::NonFiniteValue`] when a compared value is
/// NaN or infinite, so every metric in the result is finite.
pub fn compare_predictions(
    predictions: &[f32],
    ground_truth: &[f32],
    config: &AccuracyConfig,
) -> AccuracyResult<AccuracyMetrics> {
    let n = predictions.len().min(ground_truth.len());
    let empty = || AccuracyError::EmptyComparison {
        predictions: predictions.len(),
        ground_truth: ground_truth.len(),
    };
    if n == 0 {
        return Err(empty());
    }

    check_finite("predictions", &predictions[..n])?;
    check_finite("ground_truth", &ground_truth[..n])?;

    let mut absolute_errors = Vec::with_capacity(n);
    let mut relative_errors = Vec::with_capacity(n);
    let mut error_distribution = ErrorDistribution::default();
    let mut exact_matches = 0usize;
    let mut max_absolute_error = 0.0f64;
    let mut sum_absolute = 0.0f64;
    let mut sum_squared = 0.0f64;
    let mut sum_relative = 0.0f64;

    for (&prediction, &truth) in predictions[..n].iter().zip(&ground_truth[..n]) {
        let truth = truth as f64;
        let absolute_error = (prediction as f64 - truth).abs();
        let relative_error = absolute_error / (truth.abs() + config.relative_error_epsilon);

        if absolute_error < config.exact_match_tolerance {
            exact_matches += 1;
        }
        if absolute_error.is_nan() || absolute_error > max_absolute_error {
            max_absolute_error = absolute_error;
        }
        sum_absolute += absolute_error;
        sum_squared += absolute_error * absolute_error;
        sum_relative += relative_error;
        error_distribution.record(absolute_error);

        absolute_errors.push(absolute_error);
        relative_errors.push(relative_error);
    }

    sort_errors(&mut absolute_errors);
    sort_errors(&mut relative_errors);

    let at = |sorted: &[f64], q: f64| percentile(sorted, q).ok_or_else(&empty);
    let error_percentiles = ErrorPercentiles {
        p50: at(&absolute_errors, 50.0)?,
        p90: at(&absolute_errors, 90.0)?,
        p95: at(&absolute_errors, 95.0)?,
        p99: at(&absolute_errors, 99.0)?,
        p99_9: at(&absolute_errors, 99.9)?,
    };
    let relative_error_percentiles = RelativeErrorPercentiles {
        p50: at(&relative_errors, 50.0)?,
        p90: at(&relative_errors, 90.0)?,
        p95: at(&relative_errors, 95.0)?,
        p99: at(&relative_errors, 99.0)?,
    };

    let count = n as f64;
    let mean_relative_error = sum_relative / count;

    Ok(AccuracyMetrics {
        n_samples_compared: n,
        exact_matches_ratio: exact_matches as f64 / count,
        max_absolute_error,
        mean_absolute_error: sum_absolute / count,
        rmse: (sum_squared / count).sqrt(),
        mean_relative_error,
        error_percentiles,
        relative_error_percentiles,
        regression_detected: mean_relative_error > config.regression_threshold,
        regression_threshold: config.regression_threshold,
        error_distribution,
    })
}

fn default_regression_threshold() -> f64 {
    REGRESSION_THRESHOLD
}

fn check_finite(section: &'static str, values: &[f32]) -> AccuracyResult<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(AccuracyError::NonFiniteValue {
            section,
            index,
            value: values[index],
        }),
        None => Ok(()),
    }
}

impl AccuracyMetrics {
    /// Number of exact matches, recovered from the ratio.
    pub fn exact_matches(&self) -> usize {
        (self.exact_matches_ratio * self.n_samples_compared as f64).round() as usize
    }

    /// Prints the verdict lines shown after an accuracy check.
    pub fn print_summary(&self) {
        println!("      ✓ Max error: {:.6}", self.max_absolute_error);
        println!(
            "      ✓ {:.1}% of predictions exact match",
            self.exact_matches_ratio * 100.0
        );

        if self.regression_detected {
            println!(
                "      ⚠️  Regression detected: mean relative error {:.4}",
                self.mean_relative_error
            );
        } else {
            println!("      ✓ No regression detected");
        }
    }
}
