//! Accuracy report documents.

use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use super::{AccuracyConfig, AccuracyMetrics, compare_predictions};
use crate::dataset::DatasetReader;
use crate::errors::{ReportError, ReportResult};
use crate::prediction_results::PredictionResults;

/// Reference model the ground truth was produced with, unless told otherwise.
pub const DEFAULT_REFERENCE_MODEL: &str = "baseline.cbm";

/// Accuracy metrics plus the identity of the compared inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracyReport {
    pub comparison_against: String,
    pub predictions_file: String,
    pub total_samples: u64,
    pub samples_compared: usize,
    pub metrics: AccuracyMetrics,
}

impl AccuracyReport {
    pub fn from_path(path: impl AsRef<Path>) -> ReportResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ReportError::io(path, e))?;
        serde_json::from_str(&content).map_err(|e| ReportError::json(path, e))
    }
}

/// Compact accuracy block used by single-run reports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccuracySummary {
    pub max_error: f64,
    pub mean_error: f64,
    pub rmse: f64,
    pub exact_matches: usize,
}

impl From<&AccuracyMetrics> for AccuracySummary {
    fn from(metrics: &AccuracyMetrics) -> Self {
        Self {
            max_error: metrics.max_absolute_error,
            mean_error: metrics.mean_absolute_error,
            rmse: metrics.rmse,
            exact_matches: metrics.exact_matches(),
        }
    }
}

/// Compares a prediction result document against the labels of a dataset file.
///
/// Both inputs are fully validated before any metric is computed, so a
/// malformed file never yields a partial report.
pub fn check_accuracy(
    predictions_path: &Path,
    ground_truth_path: &Path,
    config: &AccuracyConfig,
    comparison_against: &str,
) -> ReportResult<AccuracyReport> {
    let results = PredictionResults::from_path(predictions_path)?;
    let ground_truth = DatasetReader::open(ground_truth_path)?.read_labels()?;
    info!(
        "Comparing {} predictions against {} ground truth labels",
        results.predictions.len(),
        ground_truth.len()
    );

    let metrics = compare_predictions(&results.predictions, &ground_truth, config)?;

    Ok(AccuracyReport {
        comparison_against: comparison_against.to_string(),
        predictions_file: predictions_path.display().to_string(),
        total_samples: results.total_samples,
        samples_compared: metrics.n_samples_compared,
        metrics,
    })
}
