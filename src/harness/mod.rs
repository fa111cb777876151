//! Native batch harness.
//!
//! Runs a predictor over in-memory feature records once per configured batch
//! size and reports the fastest configuration in the same document shape an
//! external execution harness produces, so the result can be fed straight
//! into the accuracy engine and the report assembler.

pub mod performance_metrics;

use std::time::Instant;

use log::{debug, info};

use crate::dataset::FeatureRecord;
use crate::errors::{HarnessError, HarnessResult};
use crate::prediction_results::{BatchPerformance, PredictionResults};

pub use performance_metrics::{PerformanceResults, benchmark_method, print_performance_analysis};

/// Batch sizes used when none are configured.
pub const DEFAULT_BATCH_SIZES: &[usize] = &[1, 100, 1_000, 10_000];

/// A model that maps one feature record to one prediction.
pub trait Predictor {
    fn predict(&self, record: &FeatureRecord) -> f32;
}

impl<F> Predictor for F
where
    F: Fn(&FeatureRecord) -> f32,
{
    fn predict(&self, record: &FeatureRecord) -> f32 {
        self(record)
    }
}

/// Measures a predictor over several batch sizes.
#[derive(Debug, Clone)]
pub struct BatchHarness {
    batch_sizes: Vec<usize>,
}

impl BatchHarness {
    pub fn new(batch_sizes: Vec<usize>) -> HarnessResult<Self> {
        if batch_sizes.is_empty() {
            return Err(HarnessError::NoBatchSizes);
        }
        if let Some(&size) = batch_sizes.iter().find(|&&size| size == 0) {
            return Err(HarnessError::InvalidBatchSize { size });
        }
        Ok(Self { batch_sizes })
    }

    pub fn batch_sizes(&self) -> &[usize] {
        &self.batch_sizes
    }

    /// Predicts every record once per batch size.
    ///
    /// The predictions of the configuration with the highest throughput become
    /// the document's predictions; on equal throughput the earlier batch size wins.
    pub fn run(
        &self,
        records: &[FeatureRecord],
        predictor: &dyn Predictor,
    ) -> HarnessResult<PredictionResults> {
        if records.is_empty() {
            return Err(HarnessError::NoRecords);
        }

        let mut batch_results = Vec::with_capacity(self.batch_sizes.len());
        let mut best: Option<(BatchPerformance, Vec<f32>)> = None;

        for &batch_size in &self.batch_sizes {
            let (performance, predictions) = run_pass(records, predictor, batch_size);
            debug!(
                "Batch size {}: {:.0} predictions/s",
                batch_size,
                performance.predictions_per_second.unwrap_or_default()
            );

            let is_faster = match &best {
                Some((current, _)) => {
                    performance.predictions_per_second > current.predictions_per_second
                }
                None => true,
            };
            batch_results.push(performance.clone());
            if is_faster {
                best = Some((performance, predictions));
            }
        }

        let (best_performance, predictions) = best.ok_or(HarnessError::NoBatchSizes)?;
        info!(
            "Best batch size {} over {} records",
            best_performance.batch_size.unwrap_or_default(),
            records.len()
        );

        Ok(PredictionResults::new(
            records.len() as u64,
            predictions,
            best_performance,
            batch_results,
        ))
    }
}

impl Default for BatchHarness {
    fn default() -> Self {
        Self {
            batch_sizes: DEFAULT_BATCH_SIZES.to_vec(),
        }
    }
}

fn run_pass(
    records: &[FeatureRecord],
    predictor: &dyn Predictor,
    batch_size: usize,
) -> (BatchPerformance, Vec<f32>) {
    let mut predictions = Vec::with_capacity(records.len());
    let start = Instant::now();
    for batch in records.chunks(batch_size) {
        predictions.extend(batch.iter().map(|record| predictor.predict(record)));
    }
    let elapsed = start.elapsed();

    let count = records.len() as f64;
    // Clock resolution can report zero for tiny inputs.
    let seconds = elapsed.as_secs_f64().max(1e-9);
    let total_time_ms = seconds * 1_000.0;

    let performance = BatchPerformance {
        batch_size: Some(batch_size as u64),
        total_time_ms: Some(total_time_ms),
        predictions_per_second: Some(count / seconds),
        mean_prediction_time_us: Some(total_time_ms * 1_000.0 / count),
    };
    (performance, predictions)
}
