/*!
 * Structured Tracing
 * Subscriber setup and per-operation spans using the tracing crate
 */

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, field, info, span, Level};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Environment variable switching output to JSON
pub const TRACE_JSON_ENV_VAR: &str = "PARTITION_SIM_TRACE_JSON";

static NEXT_TRACE_ID: AtomicU64 = AtomicU64::new(1);

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - PARTITION_SIM_TRACE_JSON: Enable JSON output (default: false)
///
/// Records emitted through the `log` facade are forwarded to the same
/// subscriber. Logs go to stderr so stdout stays free for snapshots.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var(TRACE_JSON_ENV_VAR)
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()
    };

    match result {
        Ok(()) => info!(json = use_json, "Structured tracing initialized"),
        Err(e) => debug!(error = %e, "Tracing subscriber already installed"),
    }
}

/// Monotonic id correlating the log lines of one operation
pub fn next_trace_id() -> u64 {
    NEXT_TRACE_ID.fetch_add(1, Ordering::Relaxed)
}

/// Span covering one simulator operation
pub struct OperationSpan {
    span: tracing::Span,
    start: Instant,
    trace_id: u64,
}

impl OperationSpan {
    pub fn new(operation: &'static str, mode: &str, policy: &str) -> Self {
        let trace_id = next_trace_id();

        let span = span!(
            Level::DEBUG,
            "operation",
            trace_id = trace_id,
            operation = operation,
            mode = mode,
            policy = policy,
            result = field::Empty,
            error = field::Empty,
            duration_us = field::Empty,
        );

        Self {
            span,
            start: Instant::now(),
            trace_id,
        }
    }

    /// Record the operation result
    pub fn record_result(&self, success: bool) {
        self.span
            .record("result", if success { "success" } else { "error" });
    }

    /// Record an error
    pub fn record_error(&self, error: &dyn std::fmt::Display) {
        self.span.record("error", field::display(error));
        self.span.record("result", "error");
    }

    /// Record the outcome of a fallible operation
    pub fn record_outcome<T, E: std::fmt::Display>(&self, outcome: &Result<T, E>) {
        match outcome {
            Ok(_) => self.record_result(true),
            Err(e) => self.record_error(e),
        }
    }

    /// Enter the span context
    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }
}

impl Drop for OperationSpan {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        self.span.record("duration_us", duration.as_micros() as u64);
        let _entered = self.span.enter();
        debug!(
            trace_id = self.trace_id,
            duration_us = duration.as_micros() as u64,
            "operation completed"
        );
    }
}
