/*!
 * Structured Tracing
 * Subscriber setup and stage spans for simulation runs
 *
 * Features:
 * - Run IDs for correlating every event of one simulation
 * - JSON-formatted logs for structured parsing
 * - Timed stage spans with recorded outcomes
 */

use std::time::Instant;
use tracing::{debug, span, Level, Span};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};
use uuid::Uuid;

/// Initialize structured tracing
///
/// `RUST_LOG` sets the filter (default: info). Returns false when a global
/// subscriber was already installed.
pub fn init_tracing(json: bool) -> bool {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_names(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
            .is_ok()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_names(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()
            .is_ok()
    };

    if installed {
        debug!(json, "Structured tracing initialized");
    }
    installed
}

/// Generate a unique run ID for event correlation
pub fn generate_run_id() -> String {
    Uuid::new_v4().to_string()
}

/// Timed span covering one stage of a simulation run
pub struct StageSpan {
    span: Span,
    start: Instant,
}

impl StageSpan {
    pub fn new(stage: &'static str, run_id: &str) -> Self {
        let span = span!(
            Level::INFO,
            "stage",
            stage,
            run_id = %run_id,
            duration_us = tracing::field::Empty,
            items = tracing::field::Empty,
            result = tracing::field::Empty,
        );
        Self {
            span,
            start: Instant::now(),
        }
    }

    pub fn record_items(&self, count: usize) {
        self.span.record("items", count);
    }

    pub fn record_result(&self, success: bool) {
        self.span
            .record("result", if success { "success" } else { "error" });
    }

    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }
}

impl Drop for StageSpan {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        self.span.record("duration_us", elapsed.as_micros() as u64);
    }
}

/// Create a stage span
#[inline]
pub fn span_stage(stage: &'static str, run_id: &str) -> StageSpan {
    StageSpan::new(stage, run_id)
}
