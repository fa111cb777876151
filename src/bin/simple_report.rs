//! Builds a single-run report from a results document that carries its own
//! ground truth.
//!
//! Tracks its own baseline, `baseline_simple_report.json`, next to the output.

use std::path::{Path, PathBuf};

use clap::Parser;
use log::error;
use predbench::accuracy::ConfigLoader;
use predbench::errors::ReportResult;
use predbench::prediction_results::SimpleRunResults;
use predbench::report::{
    BuildMetadata, FileBaselineStore, ReportAssembler, SimpleReport, now_iso8601,
    write_json_pretty,
};

#[derive(Parser, Debug)]
#[command(name = "simple_report")]
#[command(about = "Generate a single-run report with inline ground truth")]
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

    /// Run document with predictions and ground truth (JSON)
    #[arg(long)]
    results: PathBuf,

    #[arg(long, allow_hyphen_values = true)]
    em_flags: String,

    #[arg(long)]
    output: PathBuf,

    /// Optional accuracy policy overrides (JSON)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        error!("Simple report failed: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> ReportResult<()> {
    let config = ConfigLoader::load_accuracy_config(args.config.as_deref())?;
    let results = SimpleRunResults::from_path(&args.results)?;

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
    let store = FileBaselineStore::<SimpleReport>::in_dir(results_dir);
    let report = ReportAssembler::new(store).assemble_simple(&build, &results, &config)?;
    write_json_pretty(&args.output, &report)?;

    println!("✓ Report saved: {}", args.output.display());
    println!(
        "  {:.0} predictions/sec, {:.2}x vs baseline, max error {:.6}",
        report.predictions_per_second, report.speedup_vs_baseline, report.accuracy.max_error
    );
    Ok(())
}
