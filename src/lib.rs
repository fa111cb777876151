//! Prediction benchmarking library for compiled model experiments.
//!
//! This library reads binary test-vector datasets, parses the prediction
//! documents an execution harness writes, compares predictions against ground
//! truth, and assembles experiment reports that track speedup against a
//! stored baseline. It also ships a native batch harness for running
//! predictors over decoded records.

pub mod accuracy;
pub mod dataset;
pub mod errors;
pub mod harness;
pub mod prediction_results;
pub mod report;

pub use accuracy::{AccuracyConfig, AccuracyMetrics, AccuracyReport, compare_predictions};
pub use dataset::{
    Dataset, DatasetHeader, DatasetLayout, DatasetReader, DatasetWriter, FeatureRecord,
};
pub use harness::{BatchHarness, Predictor};
pub use prediction_results::{BatchPerformance, PredictionResults, SimpleRunResults};
pub use report::{BuildMetadata, ExperimentReport, ReportAssembler, SimpleReport};
