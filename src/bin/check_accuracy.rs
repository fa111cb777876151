//! Compares a prediction result document against the labels of a dataset file
//! and writes the accuracy report.

use std::path::PathBuf;

use clap::Parser;
use log::error;
use predbench::accuracy::{ConfigLoader, DEFAULT_REFERENCE_MODEL, check_accuracy};
use predbench::errors::ReportResult;
use predbench::report::write_json_pretty;

#[derive(Parser, Debug)]
#[command(name = "check_accuracy")]
#[command(about = "Compare predictions against dataset ground truth")]
#[command(version)]
struct Args {
    /// Prediction result document (JSON)
    #[arg(long)]
    predictions: PathBuf,

    /// Binary dataset file holding the ground truth labels
    #[arg(long)]
    ground_truth: PathBuf,

    /// Where to write the accuracy report
    #[arg(long)]
    output: PathBuf,

    /// Optional accuracy policy overrides (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Name of the reference model the ground truth came from
    #[arg(long, default_value = DEFAULT_REFERENCE_MODEL)]
    comparison_against: String,
}

fn main() {
    env_logger::init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        error!("Accuracy check failed: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> ReportResult<()> {
    println!("🎯 Checking accuracy...");

    let config = ConfigLoader::load_accuracy_config(args.config.as_deref())?;
    let report = check_accuracy(
        &args.predictions,
        &args.ground_truth,
        &config,
        &args.comparison_against,
    )?;
    write_json_pretty(&args.output, &report)?;

    report.metrics.print_summary();
    println!("   ✓ Accuracy report saved: {}", args.output.display());
    Ok(())
}
