//! Integration tests for the native batch harness.

use predbench::accuracy::{AccuracyConfig, compare_predictions};
use predbench::dataset::{
    DatasetHeader, DatasetLayout, DatasetReader, FeatureRecord, write_dataset,
};
use predbench::harness::{BatchHarness, Predictor};
use predbench::prediction_results::PredictionResults;
use std::cell::Cell;
use std::time::Duration;
use tempfile::tempdir;

struct WeightedSum {
    weights: Vec<f32>,
}

impl Predictor for WeightedSum {
    fn predict(&self, record: &FeatureRecord) -> f32 {
        record
            .to_f32_vec()
            .iter()
            .zip(&self.weights)
            .map(|(x, w)| x * w)
            .sum()
    }
}

/// Sleeps on every prediction of the first pass over the records.
struct SlowFirstPass {
    calls: Cell<usize>,
    records: usize,
}

impl Predictor for SlowFirstPass {
    fn predict(&self, record: &FeatureRecord) -> f32 {
        let call = self.calls.get();
        self.calls.set(call + 1);
        if call < self.records {
            std::thread::sleep(Duration::from_millis(2));
        }
        record.numeric[0]
    }
}

fn records(n: usize) -> Vec<FeatureRecord> {
    (0..n)
        .map(|i| FeatureRecord::mixed(vec![i as f32 * 0.5, 1.0], vec![(i % 3) as u8]))
        .collect()
}

#[test]
fn test_harness_document_round_trips_through_reader() {
    let harness = BatchHarness::new(vec![2, 5, 50]).unwrap();
    let model = WeightedSum {
        weights: vec![2.0, 0.5, 1.0],
    };
    let results = harness.run(&records(20), &model).unwrap();

    assert_eq!(results.total_samples, 20);
    assert_eq!(results.predictions.len(), 20);
    assert_eq!(results.batch_results.len(), 3);
    assert!(results.require_predictions_per_second().unwrap() > 0.0);

    let json = results.to_json().unwrap();
    let parsed = PredictionResults::from_json_str(&json, "harness").unwrap();
    assert_eq!(parsed.predictions, results.predictions);
    assert_eq!(parsed.total_samples, results.total_samples);
    assert_eq!(
        parsed.require_batch_size().unwrap(),
        results.require_batch_size().unwrap()
    );
    assert_eq!(parsed.batch_results.len(), 3);
}

#[test]
fn test_harness_picks_fastest_batch_size() {
    let records = records(10);
    let harness = BatchHarness::new(vec![1, 10, 5]).unwrap();
    let predictor = SlowFirstPass {
        calls: Cell::new(0),
        records: records.len(),
    };
    let results = harness.run(&records, &predictor).unwrap();

    assert_ne!(results.require_batch_size().unwrap(), 1);
    let best = results.require_predictions_per_second().unwrap();
    for batch in &results.batch_results {
        assert!(batch.predictions_per_second.unwrap() <= best);
    }
}

#[test]
fn test_harness_predictions_feed_accuracy_engine() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test_data_v2.bin");
    let records = records(30);
    let model = WeightedSum {
        weights: vec![2.0, 0.5, 1.0],
    };
    let labels: Vec<f32> = records.iter().map(|r| model.predict(r)).collect();
    let header = DatasetHeader::for_samples(
        records.len(),
        DatasetLayout::Mixed {
            numeric_feature_count: 2,
            categorical_feature_count: 1,
        },
    )
    .unwrap();
    write_dataset(&path, header, &records, &labels).unwrap();

    let dataset = DatasetReader::open(&path).unwrap().read_dataset().unwrap();
    let results = BatchHarness::default().run(&dataset.records, &model).unwrap();
    let metrics =
        compare_predictions(&results.predictions, &dataset.labels, &AccuracyConfig::default())
            .unwrap();

    assert_eq!(metrics.n_samples_compared, 30);
    assert_eq!(metrics.exact_matches_ratio, 1.0);
    assert!(!metrics.regression_detected);
}
