//! Wall-clock measurement of repeated operations.

use log::info;
use std::time::Instant;

/// Number of untimed runs before measuring.
pub const WARM_UP_RUNS: u32 = 3;

/// Timing of one measured method.
#[derive(Debug, Clone)]
pub struct PerformanceResults {
    pub method: String,
    pub total_time_ns: u128,
    pub average_time_ns: u128,
    pub average_time_ms: f64,
    pub num_executions: u32,
}

impl PerformanceResults {
    pub fn new(method: String, total_time_ns: u128, num_executions: u32) -> Self {
        let average_time_ns = total_time_ns / num_executions.max(1) as u128;
        let average_time_ms = average_time_ns as f64 / 1_000_000.0;

        Self {
            method,
            total_time_ns,
            average_time_ns,
            average_time_ms,
            num_executions,
        }
    }

    /// How many times slower than `baseline` this method is.
    pub fn overhead_ratio(&self, baseline: &PerformanceResults) -> f64 {
        self.average_time_ns as f64 / baseline.average_time_ns.max(1) as f64
    }

    pub fn overhead_percentage(&self, baseline: &PerformanceResults) -> f64 {
        (self.overhead_ratio(baseline) - 1.0) * 100.0
    }
}

/// Runs `benchmark_fn` `num_executions` times after a short warm-up and times the loop.
pub fn benchmark_method<F>(
    name: &str,
    num_executions: u32,
    mut benchmark_fn: F,
) -> PerformanceResults
where
    F: FnMut(),
{
    info!("Benchmarking {} ({} executions)...", name, num_executions);

    for _ in 0..WARM_UP_RUNS {
        benchmark_fn();
    }

    let progress_step = (num_executions / 10).max(1);
    let start = Instant::now();
    for i in 0..num_executions {
        benchmark_fn();
        if (i + 1) % progress_step == 0 {
            info!("  Progress: {}/{}", i + 1, num_executions);
        }
    }
    let duration = start.elapsed();

    PerformanceResults::new(name.to_string(), duration.as_nanos(), num_executions)
}

/// Prints each result against the first one, then a ranking from fastest to slowest.
pub fn print_performance_analysis(results: &[PerformanceResults]) {
    let Some(baseline) = results.first() else {
        return;
    };

    println!("\n{}", "=".repeat(80));
    println!("Detailed Results");
    println!("{}", "=".repeat(80));

    for result in results {
        println!("\n📊 {}", result.method);
        println!(
            "   Average time: {:.3} ms ({} ns)",
            result.average_time_ms, result.average_time_ns
        );
        println!(
            "   Total time: {:.3} ms",
            result.total_time_ns as f64 / 1_000_000.0
        );
        println!("   Executions: {}", result.num_executions);

        if result.method != baseline.method {
            println!(
                "   Relative to {}: {:.2}x ({:+.1}%)",
                baseline.method,
                result.overhead_ratio(baseline),
                result.overhead_percentage(baseline)
            );
        }
    }

    println!("\n🚀 Speed Rankings (fastest to slowest):");
    let mut sorted_results = results.to_vec();
    sorted_results.sort_by_key(|r| r.average_time_ns);

    for (i, result) in sorted_results.iter().enumerate() {
        let rank_emoji = match i {
            0 => "🥇",
            1 => "🥈",
            2 => "🥉",
            _ => "  ",
        };
        println!(
            "   {} {}: {:.3} ms",
            rank_emoji, result.method, result.average_time_ms
        );
    }
}
