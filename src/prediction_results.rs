//! Prediction result documents produced by an execution harness.
//!
//! The document is JSON with camelCase keys:
//!
//! ```json
//! {
//!   "totalSamples": 1000000,
//!   "bestPerformance": {
//!     "batchSize": 10000,
//!     "totalTimeMs": 812.4,
//!     "predictionsPerSecond": 1230921.5,
//!     "meanPredictionTimeUs": 0.81,
//!     "predictions": [412.7, 1803.2]
//!   },
//!   "batchResults": [{ "batchSize": 1000, "totalTimeMs": 901.0 }]
//! }
//! ```
//!
//! Only `totalSamples` and `bestPerformance.predictions` are required to read a
//! document. The remaining performance fields are checked when a report needs
//! them. No numeric validation happens here.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{PredictionResultError, PredictionResultsResult};

/// Performance record of one batch-size configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchPerformance {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_time_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predictions_per_second: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_prediction_time_us: Option<f64>,
}

/// A parsed prediction result document.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResults {
    /// Number of samples the executed model was run against.
    pub total_samples: u64,
    /// Predictions of the best configuration, in dataset sample order.
    pub predictions: Vec<f32>,
    pub best_performance: BatchPerformance,
    pub batch_results: Vec<BatchPerformance>,
    source_name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPredictionResults {
    total_samples: Option<u64>,
    best_performance: Option<RawBestPerformance>,
    #[serde(default)]
    batch_results: Vec<BatchPerformance>,
}

#[derive(Deserialize)]
struct RawBestPerformance {
    predictions: Option<Vec<f32>>,
    #[serde(flatten)]
    performance: BatchPerformance,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WirePredictionResults<'a> {
    total_samples: u64,
    best_performance: WireBestPerformance<'a>,
    batch_results: &'a [BatchPerformance],
}

#[derive(Serialize)]
struct WireBestPerformance<'a> {
    #[serde(flatten)]
    performance: &'a BatchPerformance,
    predictions: &'a [f32],
}

impl PredictionResults {
    pub fn new(
        total_samples: u64,
        predictions: Vec<f32>,
        best_performance: BatchPerformance,
        batch_results: Vec<BatchPerformance>,
    ) -> Self {
        Self {
            total_samples,
            predictions,
            best_performance,
            batch_results,
            source_name: "<memory>".to_string(),
        }
    }

    /// Reads a prediction result document from disk.
    pub fn from_path(path: impl AsRef<Path>) -> PredictionResultsResult<Self> {
        let path = path.as_ref();
        let source_name = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|e| PredictionResultError::Io {
            source_name: source_name.clone(),
            source: e,
        })?;
        Self::from_json_str(&content, &source_name)
    }

    /// Parses a prediction result document; `source_name` labels any error.
    pub fn from_json_str(json: &str, source_name: &str) -> PredictionResultsResult<Self> {
        let raw: RawPredictionResults =
            serde_json::from_str(json).map_err(|e| PredictionResultError::Parse {
                source_name: source_name.to_string(),
                source: e,
            })?;

        let best = raw
            .best_performance
            .ok_or_else(|| PredictionResultError::missing(source_name, "bestPerformance"))?;
        let predictions = best.predictions.ok_or_else(|| {
            PredictionResultError::missing(source_name, "bestPerformance.predictions")
        })?;
        let total_samples = raw
            .total_samples
            .ok_or_else(|| PredictionResultError::missing(source_name, "totalSamples"))?;

        Ok(Self {
            total_samples,
            predictions,
            best_performance: best.performance,
            batch_results: raw.batch_results,
            source_name: source_name.to_string(),
        })
    }

    /// Serializes back into the camelCase wire format.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let wire = WirePredictionResults {
            total_samples: self.total_samples,
            best_performance: WireBestPerformance {
                performance: &self.best_performance,
                predictions: &self.predictions,
            },
            batch_results: &self.batch_results,
        };
        serde_json::to_string_pretty(&wire)
    }

    /// Path or label of the document this was read from.
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn require_batch_size(&self) -> PredictionResultsResult<u64> {
        self.require(self.best_performance.batch_size, "bestPerformance.batchSize")
    }

    pub fn require_total_time_ms(&self) -> PredictionResultsResult<f64> {
        self.require(
            self.best_performance.total_time_ms,
            "bestPerformance.totalTimeMs",
        )
    }

    pub fn require_predictions_per_second(&self) -> PredictionResultsResult<f64> {
        self.require(
            self.best_performance.predictions_per_second,
            "bestPerformance.predictionsPerSecond",
        )
    }

    pub fn require_mean_prediction_time_us(&self) -> PredictionResultsResult<f64> {
        self.require(
            self.best_performance.mean_prediction_time_us,
            "bestPerformance.meanPredictionTimeUs",
        )
    }

    fn require<T>(&self, value: Option<T>, field: &str) -> PredictionResultsResult<T> {
        value.ok_or_else(|| PredictionResultError::missing(&self.source_name, field))
    }
}

/// Single-run document that carries the ground truth inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleRunResults {
    #[serde(default)]
    pub timestamp: Option<String>,
    pub total_samples: u64,
    pub total_time_ms: f64,
    #[serde(default)]
    pub worker_time_ms: Option<f64>,
    pub predictions_per_second: f64,
    pub predictions: Vec<f32>,
    pub ground_truth: Vec<f32>,
}

impl SimpleRunResults {
    pub fn from_path(path: impl AsRef<Path>) -> PredictionResultsResult<Self> {
        let path = path.as_ref();
        let source_name = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|e| PredictionResultError::Io {
            source_name: source_name.clone(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(|e| PredictionResultError::Parse {
            source_name,
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_document() {
        let json = r#"{"totalSamples": 3, "bestPerformance": {"predictions": [1.0, 2.5]}}"#;
        let results = PredictionResults::from_json_str(json, "min.json").unwrap();
        assert_eq!(results.total_samples, 3);
        assert_eq!(results.predictions, vec![1.0, 2.5]);
        assert!(results.batch_results.is_empty());
        assert_eq!(results.best_performance, BatchPerformance::default());
    }

    #[test]
    fn missing_metric_is_reported_with_path() {
        let json = r#"{"totalSamples": 1, "bestPerformance": {"predictions": [1.0]}}"#;
        let results = PredictionResults::from_json_str(json, "m.json").unwrap();
        match results.require_predictions_per_second() {
            Err(PredictionResultError::MissingField { source_name, field }) => {
                assert_eq!(source_name, "m.json");
                assert_eq!(field, "bestPerformance.predictionsPerSecond");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn wire_format_round_trips() {
        let results = PredictionResults::new(
            2,
            vec![0.5, 1.5],
            BatchPerformance {
                batch_size: Some(100),
                total_time_ms: Some(2.0),
                predictions_per_second: Some(1000.0),
                mean_prediction_time_us: Some(1.0),
            },
            vec![BatchPerformance {
                batch_size: Some(100),
                ..Default::default()
            }],
        );
        let json = results.to_json().unwrap();
        assert!(json.contains("\"bestPerformance\""));
        assert!(json.contains("\"predictionsPerSecond\""));

        let parsed = PredictionResults::from_json_str(&json, "<memory>").unwrap();
        assert_eq!(parsed, results);
    }
}
