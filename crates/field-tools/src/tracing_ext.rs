//! Tracing extensions for deduplication runs.
//!
//! The library only emits events; install a subscriber in your application to
//! see them:
//!
//! ```rust,ignore
//! use tracing_subscriber::{fmt, prelude::*, EnvFilter};
//!
//! tracing_subscriber::registry()
//!     .with(fmt::layer())
//!     .with(EnvFilter::from_default_env())
//!     .init();
//!
//! // RUST_LOG=field_tools=debug for per-pass output
//! ```
//!
//! # Log Levels
//!
//! - **INFO**: Operation summaries, timing
//! - **DEBUG**: Per-pass progress (one event per index rebuild)
//! - **TRACE**: Per-point removals

use std::time::Instant;
use tracing::{Span, debug, info, trace};

/// A performance timer that logs duration on drop.
///
/// ```rust,ignore
/// use field_tools::tracing_ext::OperationTimer;
///
/// fn dedup() {
///     let _timer = OperationTimer::with_points("dedup", 1200);
///     // ... do work ...
/// } // logs elapsed_ms here
/// ```
pub struct OperationTimer {
    name: &'static str,
    start: Instant,
    span: Span,
}

impl OperationTimer {
    /// Create a new operation timer.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!("field_operation", operation = name);
        debug!(target: "field_tools::timing", operation = name, "Starting operation");
        Self {
            name,
            start: Instant::now(),
            span,
        }
    }

    /// Create a timer that records the input point count.
    pub fn with_points(name: &'static str, point_count: usize) -> Self {
        let span = tracing::info_span!("field_operation", operation = name, points = point_count);
        debug!(
            target: "field_tools::timing",
            operation = name,
            points = point_count,
            "Starting operation"
        );
        Self {
            name,
            start: Instant::now(),
            span,
        }
    }

    /// Get the elapsed time.
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    /// Get the span for this timer.
    pub fn span(&self) -> &Span {
        &self.span
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        let elapsed_ms = self.elapsed_ms();
        info!(
            target: "field_tools::timing",
            operation = self.name,
            elapsed_ms = format!("{:.2}", elapsed_ms),
            "Operation completed"
        );
    }
}

/// Log the outcome of a deduplication run.
pub fn log_dedup_result(operation: &str, input_points: usize, removed: usize, passes: usize) {
    info!(
        target: "field_tools::dedup",
        operation = operation,
        input_points = input_points,
        removed = removed,
        kept = input_points - removed,
        passes = passes,
        "Deduplication completed"
    );
}

/// Log one index rebuild and query pass.
pub fn log_pass(operation: &str, pass: usize, live_points: usize) {
    debug!(
        target: "field_tools::dedup",
        operation = operation,
        pass = pass,
        live_points = live_points,
        "Rebuilt nearest-neighbour index"
    );
}

/// Log a single removed point.
pub fn log_removed_point(operation: &str, index: usize, nearest_distance: f64) {
    trace!(
        target: "field_tools::dedup",
        operation = operation,
        index = index,
        nearest_distance = nearest_distance,
        "Removed point"
    );
}
