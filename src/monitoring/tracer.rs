/*!
 * Structured Tracing
 * Spans for capability-table calls and manager operations using the tracing crate
 *
 * Features:
 * - Trace IDs for correlating a table call with the engine work it caused
 * - JSON-formatted logs for structured parsing
 * - Slow call detection on span drop
 */

use std::time::Instant;
use tracing::{debug, span, warn, Level};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};
use uuid::Uuid;

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - STIK_TRACE_JSON: Enable JSON output (default: false)
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var("STIK_TRACE_JSON")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    let initialized = if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_line_number(true)
                    .with_file(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_line_number(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()
    };

    if initialized.is_ok() {
        debug!(json = use_json, "structured tracing initialized");
    }
}

fn generate_trace_id() -> String {
    Uuid::new_v4().to_string()
}

/// Span around one capability-table invocation
pub struct CallSpan {
    span: tracing::Span,
    start: Instant,
    entry: &'static str,
    trace_id: String,
}

impl CallSpan {
    pub fn new(entry: &'static str, ordinal: usize) -> Self {
        let trace_id = generate_trace_id();

        let span = span!(
            Level::DEBUG,
            "stik_call",
            trace_id = %trace_id,
            entry = entry,
            ordinal = ordinal,
            duration_us = tracing::field::Empty,
            duration_ms = tracing::field::Empty,
            status = tracing::field::Empty,
        );

        Self {
            span,
            start: Instant::now(),
            entry,
            trace_id,
        }
    }

    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    /// Record the legacy status returned to the caller
    pub fn record_status(&self, status: i16) {
        self.span.record("status", status);
    }

    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }
}

impl Drop for CallSpan {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        let _entered = self.span.enter();

        // wait_state may legitimately block; anything else this slow is worth a look
        if duration.as_millis() > 10 {
            self.span.record("duration_ms", duration.as_millis() as u64);
            warn!(
                trace_id = %self.trace_id,
                entry = self.entry,
                duration_ms = duration.as_millis() as u64,
                slow = true,
                "slow table call"
            );
        } else {
            self.span.record("duration_us", duration.as_micros() as u64);
        }
    }
}

/// Span for manager-level operations with structured fields
pub struct OperationSpan {
    span: tracing::Span,
    start: Instant,
    trace_id: String,
}

impl OperationSpan {
    pub fn new(operation: &str) -> Self {
        let trace_id = generate_trace_id();

        let span = span!(
            Level::DEBUG,
            "operation",
            trace_id = %trace_id,
            operation = operation,
            handle = tracing::field::Empty,
            shape = tracing::field::Empty,
            duration_us = tracing::field::Empty,
            result = tracing::field::Empty,
            error = tracing::field::Empty,
        );

        Self {
            span,
            start: Instant::now(),
            trace_id,
        }
    }

    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    pub fn record(&self, key: &str, value: &str) {
        self.span.record(key, value);
    }

    pub fn record_debug<V: std::fmt::Debug>(&self, key: &str, value: V) {
        self.span.record(key, format!("{:?}", value).as_str());
    }

    pub fn record_result(&self, success: bool) {
        self.span
            .record("result", if success { "success" } else { "error" });
    }

    pub fn record_error(&self, error: &str) {
        self.span.record("error", error);
        self.span.record("result", "error");
    }

    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }
}

impl Drop for OperationSpan {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        self.span.record("duration_us", duration.as_micros() as u64);
        if duration.as_millis() > 100 {
            let _entered = self.span.enter();
            warn!(
                trace_id = %self.trace_id,
                duration_ms = duration.as_millis() as u64,
                slow = true,
                "slow operation detected"
            );
        }
    }
}

/// Helper to create a table call span
#[inline]
pub fn span_call(entry: &'static str, ordinal: usize) -> CallSpan {
    CallSpan::new(entry, ordinal)
}

/// Helper to create an operation span
#[inline]
pub fn span_operation(name: &str) -> OperationSpan {
    OperationSpan::new(name)
}
