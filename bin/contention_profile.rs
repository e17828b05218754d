//! Contention Profiling Binary
//!
//! Runs every false-sharing variant repeatedly outside the benchmark
//! harness, verifies the counter invariants on each run, and reports
//! median/fastest/slowest wall times to identify outlier runs. When tracing
//! is enabled, per-run events are written to a JSON log.
//!
//! Run with:
//! ```bash
//! # Without tracing (fast, just stats)
//! cargo run --release --bin contention_profile
//!
//! # With tracing (writes to logs/contention_profile.json)
//! RUST_LOG=contend=debug cargo run --release --features tracing --bin contention_profile
//! ```

#![allow(clippy::unwrap_used)]
#![allow(clippy::cast_precision_loss)]

use contend::contention::{
    self, NUM_WORKERS, OPS_PER_WORKER,
};
use contend::filter::{scan_local_merge, scan_padded, scan_sequential, scan_shared};
use contend::table::{COLUMN_LEN, FILTER_MODULI, NUM_COLUMNS, Table, expected_matches};
use std::time::{Duration, Instant};

#[cfg(feature = "tracing")]
type TracingGuard = tracing_appender::non_blocking::WorkerGuard;

#[cfg(not(feature = "tracing"))]
type TracingGuard = ();

/// Runs per variant.
const RUNS: usize = 10;

// =============================================================================
// Custom Tracing Initialization (JSON to file)
// =============================================================================

#[cfg(feature = "tracing")]
fn init_json_tracing() -> TracingGuard {
    use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = "logs";
    let filter_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "contend=debug".to_string());

    let _ = std::fs::create_dir_all(log_dir);

    let file_appender = tracing_appender::rolling::never(log_dir, "contention_profile.json");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_thread_ids(true)
        .with_target(true)
        .with_ansi(false)
        .json()
        .with_filter(EnvFilter::try_new(&filter_str).unwrap_or_else(|_| EnvFilter::new("debug")));

    let _ = tracing_subscriber::registry().with(file_layer).try_init();

    println!("Tracing enabled: logs/contention_profile.json (filter: {filter_str})");

    guard
}

#[cfg(not(feature = "tracing"))]
fn init_json_tracing() -> TracingGuard {
    println!("Tracing disabled (compile with --features tracing)");
}

// =============================================================================
// Run Statistics
// =============================================================================

/// Wall times for one variant across all runs.
struct VariantTimes {
    name: &'static str,
    elapsed: Vec<Duration>,
}

impl VariantTimes {
    fn median(&self) -> Duration {
        let mut sorted = self.elapsed.clone();
        sorted.sort_by_key(Duration::as_nanos);
        let mid = sorted.len() / 2;
        if sorted.len() % 2 == 1 {
            sorted[mid]
        } else {
            let lo = sorted[mid - 1].as_secs_f64();
            let hi = sorted[mid].as_secs_f64();
            Duration::from_secs_f64(f64::midpoint(lo, hi))
        }
    }

    fn fastest(&self) -> Duration {
        self.elapsed.iter().copied().min().unwrap()
    }

    fn slowest(&self) -> Duration {
        self.elapsed.iter().copied().max().unwrap()
    }

    fn report(&self, total_ops: usize) {
        let median = self.median();
        let slowest = self.slowest();
        let fastest = self.fastest();
        let ops_per_sec = total_ops as f64 / median.as_secs_f64();

        println!(
            "  {:<22} median {:>10.3?}  fastest {:>10.3?}  slowest {:>10.3?}  ({ops_per_sec:.0} ops/sec)",
            self.name, median, fastest, slowest
        );

        // Flag runs well outside the median; on an otherwise idle machine
        // these are scheduler or frequency-scaling artifacts worth knowing
        // about before trusting the harness numbers.
        let median_s = median.as_secs_f64();
        if median_s > 0.0 && slowest.as_secs_f64() > median_s * 3.0 {
            let ratio = slowest.as_secs_f64() / median_s;
            println!("    !!! OUTLIER: slowest run was ~{ratio:.1}x the median");
        }
    }
}

fn time_runs<F>(name: &'static str, mut run: F) -> VariantTimes
where
    F: FnMut() -> Duration,
{
    print!("  {name:<22}");
    let mut elapsed = Vec::with_capacity(RUNS);
    for _ in 0..RUNS {
        elapsed.push(run());
        print!(".");
        std::io::Write::flush(&mut std::io::stdout()).unwrap();
    }
    println!();
    VariantTimes { name, elapsed }
}

// =============================================================================
// Main
// =============================================================================

fn assert_totals(name: &str, got: [u64; 4], want: [u64; 4]) {
    assert!(
        got == want,
        "{name}: counters diverged: got {got:?}, want {want:?}"
    );
}

fn main() {
    let _guard = init_json_tracing();

    println!("Contention Profiling");
    println!("====================\n");

    println!(
        "Building table ({NUM_COLUMNS} columns x {COLUMN_LEN} values)...\n"
    );
    let table = Table::new();
    let expected_filter: [u64; NUM_COLUMNS] =
        std::array::from_fn(|i| expected_matches(COLUMN_LEN, FILTER_MODULI[i]));

    println!("Filter and count ({RUNS} runs each):");
    let filter_variants: [(&'static str, fn(&Table) -> [u64; NUM_COLUMNS]); 4] = [
        ("single_thread", scan_sequential),
        ("naive_threads", scan_shared),
        ("local_then_merge", scan_local_merge),
        ("padded_counters", scan_padded),
    ];

    let mut filter_times = Vec::new();
    for (name, run) in filter_variants {
        filter_times.push(time_runs(name, || {
            let start = Instant::now();
            let totals = run(&table);
            let elapsed = start.elapsed();
            assert_totals(name, totals, expected_filter);
            elapsed
        }));
    }

    println!("\nPure contention ({RUNS} runs each):");
    let contention_variants: [(&'static str, fn(usize) -> [u64; NUM_WORKERS]); 5] = [
        ("adjacent_atomics", contention::adjacent_atomics),
        ("adjacent_plain", contention::adjacent_plain),
        ("adjacent_plain_local", contention::adjacent_plain_local),
        ("local_atomics", contention::local_atomics),
        ("padded_atomics", contention::padded_atomics),
    ];

    let mut contention_times = Vec::new();
    for (name, run) in contention_variants {
        contention_times.push(time_runs(name, || {
            let start = Instant::now();
            let totals = run(OPS_PER_WORKER);
            let elapsed = start.elapsed();
            assert_totals(name, totals, [OPS_PER_WORKER as u64; NUM_WORKERS]);
            elapsed
        }));
    }

    println!("\n{}", "=".repeat(80));
    println!("RESULTS");
    println!("{}", "=".repeat(80));

    println!("\n--- Filter and count ({COLUMN_LEN} values/column, 4 columns) ---");
    for times in &filter_times {
        times.report(NUM_COLUMNS * COLUMN_LEN);
    }

    println!("\n--- Pure contention ({OPS_PER_WORKER} increments/worker, 4 workers) ---");
    for times in &contention_times {
        times.report(NUM_WORKERS * OPS_PER_WORKER);
    }

    println!("\nAll counter invariants held across {RUNS} runs per variant.");
}
