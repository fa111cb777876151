//! Prints the header, label statistics and leading records of a dataset file.

use std::path::PathBuf;

use clap::Parser;
use log::error;
use predbench::dataset::{DatasetLayout, DatasetReader};
use predbench::errors::DatasetResult;

#[derive(Parser, Debug)]
#[command(name = "inspect_dataset")]
#[command(about = "Inspect a binary test-vector dataset")]
#[command(version)]
struct Args {
    /// Binary dataset file
    #[arg(short, long)]
    input: PathBuf,

    /// Number of records to print
    #[arg(short, long, default_value = "5")]
    records: usize,
}

fn main() {
    env_logger::init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        error!("Failed to inspect dataset: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> DatasetResult<()> {
    let mut reader = DatasetReader::open(&args.input)?;
    let header = *reader.header();

    println!("📦 {}", args.input.display());
    println!("   Version: {}", header.version());
    println!("   Samples: {}", header.sample_count);
    match header.layout {
        DatasetLayout::Dense { feature_count } => {
            println!("   Features: {} numeric", feature_count);
        }
        DatasetLayout::Mixed {
            numeric_feature_count,
            categorical_feature_count,
        } => {
            println!(
                "   Features: {} numeric, {} categorical",
                numeric_feature_count, categorical_feature_count
            );
        }
    }
    println!("   Record size: {} bytes", header.record_size());
    println!("   File size: {} bytes", header.expected_file_size());

    let labels = reader.read_labels()?;
    if let Some(stats) = LabelStats::from_labels(&labels) {
        println!(
            "   Labels: min {:.4}, max {:.4}, mean {:.4}",
            stats.min, stats.max, stats.mean
        );
    }

    for (index, record) in reader.records()?.take(args.records).enumerate() {
        let record = record?;
        println!(
            "   [{}] numeric={:?} categorical={:?} label={}",
            index,
            record.numeric,
            record.categorical,
            labels.get(index).copied().unwrap_or(f32::NAN)
        );
    }

    Ok(())
}

struct LabelStats {
    min: f32,
    max: f32,
    mean: f64,
}

impl LabelStats {
    fn from_labels(labels: &[f32]) -> Option<Self> {
        if labels.is_empty() {
            return None;
        }
        let min = labels.iter().copied().fold(f32::INFINITY, f32::min);
        let max = labels.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let mean = labels.iter().map(|&l| l as f64).sum::<f64>() / labels.len() as f64;
        Some(Self { min, max, mean })
    }
}
