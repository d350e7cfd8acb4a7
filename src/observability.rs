//! Structured logging setup and dedup metrics emission.

use std::time::Duration;

use tracing_subscriber::EnvFilter;

/// Initialize structured logging with `RUST_LOG` support.
///
/// Defaults to `collabgraph=info` when `RUST_LOG` is not set. Call once at
/// program startup — subsequent calls are silently ignored.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("collabgraph=info"));

    // try_init so double-init in tests doesn't panic
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}

/// Emit one dedup invocation's metrics as a structured event.
///
/// The predecessor of this was an append-only CSV file with the same
/// columns; a log subscriber can reconstruct that view from these fields.
pub fn record_dedupe_metrics(input_count: usize, output_count: usize, threshold: f64, elapsed: Duration) {
    let reduction_pct = if input_count == 0 {
        0.0
    } else {
        (input_count - output_count) as f64 / input_count as f64 * 100.0
    };

    tracing::debug!(
        ts = chrono::Utc::now().timestamp(),
        input_count,
        output_count,
        reduction_pct = format_args!("{reduction_pct:.2}"),
        threshold = format_args!("{threshold:.3}"),
        elapsed_ms = elapsed.as_millis() as u64,
        "dedupe"
    );
}
