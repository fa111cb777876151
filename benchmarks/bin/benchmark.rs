//! End-to-end benchmark of the dataset codec, the native batch harness and the
//! accuracy engine on a synthetic mixed-feature dataset.

use clap::Parser;
use log::{error, info};
use predbench::accuracy::{AccuracyConfig, compare_predictions};
use predbench::dataset::{DatasetHeader, DatasetLayout, DatasetReader, FeatureRecord, write_dataset};
use predbench::harness::{
    BatchHarness, PerformanceResults, benchmark_method, print_performance_analysis,
};

const NUMERIC_FEATURES: usize = 6;
const CATEGORICAL_FEATURES: usize = 3;
const CATEGORY_COUNT: usize = 5;

#[derive(Parser, Debug)]
#[command(name = "benchmark")]
#[command(about = "Benchmark the dataset codec, batch harness and accuracy engine")]
struct Args {
    /// Number of synthetic samples
    #[arg(short, long, default_value = "100000")]
    samples: usize,

    /// Timed executions per measured method
    #[arg(short, long, default_value = "20")]
    executions: u32,

    /// Batch sizes for the harness run
    #[arg(short, long, value_delimiter = ',', default_value = "1,100,1000,10000")]
    batch_sizes: Vec<usize>,
}

fn main() {
    env_logger::init();

    let args = Args::parse();
    if let Err(e) = run_benchmarks(&args) {
        error!("Benchmark execution failed: {}", e);
        std::process::exit(1);
    }
}

/// Small linear model used both to label the data and as the predictor.
struct LinearModel {
    weights: [f32; NUMERIC_FEATURES],
    category_offsets: [[f32; CATEGORY_COUNT]; CATEGORICAL_FEATURES],
    bias: f32,
}

impl LinearModel {
    fn new() -> Self {
        let mut weights = [0.0; NUMERIC_FEATURES];
        for (i, w) in weights.iter_mut().enumerate() {
            *w = 0.5 + i as f32 * 0.25;
        }
        let mut category_offsets = [[0.0; CATEGORY_COUNT]; CATEGORICAL_FEATURES];
        for (i, row) in category_offsets.iter_mut().enumerate() {
            for (c, offset) in row.iter_mut().enumerate() {
                *offset = (i as f32 + 1.0) * c as f32 * 0.1;
            }
        }
        Self {
            weights,
            category_offsets,
            bias: 1.5,
        }
    }

    fn predict(&self, record: &FeatureRecord) -> f32 {
        let numeric: f32 = record
            .numeric
            .iter()
            .zip(&self.weights)
            .map(|(x, w)| x * w)
            .sum();
        let categorical: f32 = record
            .categorical
            .iter()
            .zip(&self.category_offsets)
            .map(|(&c, offsets)| offsets[c as usize % CATEGORY_COUNT])
            .sum();
        self.bias + numeric + categorical
    }
}

fn synthetic_records(samples: usize) -> Vec<FeatureRecord> {
    (0..samples)
        .map(|i| {
            let numeric = (0..NUMERIC_FEATURES)
                .map(|j| ((i * (j + 3)) as f32 * 0.001) % 2.0 - 1.0)
                .collect();
            let categorical = (0..CATEGORICAL_FEATURES)
                .map(|j| ((i + j) % CATEGORY_COUNT) as u8)
                .collect();
            FeatureRecord::mixed(numeric, categorical)
        })
        .collect()
}

fn run_benchmarks(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting benchmark suite with {} samples", args.samples);

    let model = LinearModel::new();
    let records = synthetic_records(args.samples);
    let labels: Vec<f32> = records.iter().map(|r| model.predict(r)).collect();

    let layout = DatasetLayout::Mixed {
        numeric_feature_count: NUMERIC_FEATURES as u32,
        categorical_feature_count: CATEGORICAL_FEATURES as u32,
    };
    let header = DatasetHeader::for_samples(records.len(), layout)?;

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("test_data_v2.bin");
    write_dataset(&path, header, &records, &labels)?;
    info!("Wrote {} bytes to {}", header.expected_file_size(), path.display());

    let mut results: Vec<PerformanceResults> = Vec::new();
    let mut failure: Option<Box<dyn std::error::Error>> = None;

    results.push(benchmark_method("Read labels", args.executions, || {
        if let Err(e) = DatasetReader::open(&path).and_then(|mut r| r.read_labels()) {
            failure.get_or_insert(Box::new(e));
        }
    }));
    results.push(benchmark_method("Read full dataset", args.executions, || {
        if let Err(e) = DatasetReader::open(&path).and_then(|r| r.read_dataset()) {
            failure.get_or_insert(Box::new(e));
        }
    }));
    let config = AccuracyConfig::default();
    results.push(benchmark_method("Accuracy metrics", args.executions, || {
        if let Err(e) = compare_predictions(&labels, &labels, &config) {
            failure.get_or_insert(Box::new(e));
        }
    }));
    if let Some(e) = failure {
        return Err(e);
    }

    let dataset = DatasetReader::open(&path)?.read_dataset()?;
    let harness = BatchHarness::new(args.batch_sizes.clone())?;
    let predictor = |record: &FeatureRecord| model.predict(record);
    let prediction_results = harness.run(&dataset.records, &predictor)?;

    let metrics = compare_predictions(&prediction_results.predictions, &dataset.labels, &config)?;

    print_performance_analysis(&results);

    println!("\n🔁 Batch Harness:");
    for batch in &prediction_results.batch_results {
        println!(
            "   batch {:>6}: {:>14.0} predictions/s",
            batch.batch_size.unwrap_or_default(),
            batch.predictions_per_second.unwrap_or_default()
        );
    }
    println!(
        "   Best batch size: {}",
        prediction_results.best_performance.batch_size.unwrap_or_default()
    );

    println!("\n🎯 Accuracy vs written labels:");
    metrics.print_summary();

    Ok(())
}
