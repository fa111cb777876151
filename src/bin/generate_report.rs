//! Assembles the experiment report from the prediction and accuracy documents.
//!
//! The baseline record lives next to the output file. Experiments whose name
//! contains "baseline" replace it; all others are compared against it.

use std::path::{Path, PathBuf};

use clap::Parser;
use log::error;
use predbench::accuracy::AccuracyReport;
use predbench::errors::ReportResult;
use predbench::prediction_results::PredictionResults;
use predbench::report::{
    BuildMetadata, EnvironmentInfo, ExperimentReport, FileBaselineStore, ReportAssembler,
    now_iso8601, write_json_pretty,
};

#[derive(Parser, Debug)]
#[command(name = "generate_report")]
#[command(about = "Generate an experiment report and track the baseline")]
#[command(version)]
struct Args {
    #[arg(long)]
    experiment_name: String,

    /// Model source file the artifact was compiled from
    #[arg(long)]
    cpp_file: String,

    /// Compiled artifact size in bytes
    #[arg(long)]
    wasm_size: u64,

    /// Prediction result document (JSON)
    #[arg(long)]
    predictions: PathBuf,

    /// Accuracy report written by check_accuracy
    #[arg(long)]
    accuracy: PathBuf,

    /// Compilation flags used for the artifact
    #[arg(long, allow_hyphen_values = true)]
    em_flags: String,

    #[arg(long)]
    output: PathBuf,
}

fn main() {
    env_logger::init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        error!("Report generation failed: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> ReportResult<()> {
    println!("📝 Generating report...");

    let results = PredictionResults::from_path(&args.predictions)?;
    let accuracy = AccuracyReport::from_path(&args.accuracy)?;

    let build = BuildMetadata {
        experiment_name: args.experiment_name.clone(),
        source_path: args.cpp_file.clone(),
        artifact_size_bytes: args.wasm_size,
        compilation_flags: args.em_flags.clone(),
        timestamp: now_iso8601(),
    };

    let results_dir = match args.output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let store = FileBaselineStore::<ExperimentReport>::in_dir(results_dir);
    let assembler = ReportAssembler::new(store);

    let report = assembler.assemble(
        &build,
        &results,
        &accuracy.metrics,
        EnvironmentInfo::detect(),
    )?;
    write_json_pretty(&args.output, &report)?;

    println!("   ✓ Report saved: {}", args.output.display());
    println!(
        "   ✓ Speedup vs baseline: {:.2}x",
        report.performance.speedup_vs_baseline
    );
    Ok(())
}
