//! Dispatch logging stage.
//!
//! A pure observability wrapper: records a start event, invokes the rest of
//! the chain, then records exactly one terminal event with the duration and,
//! on failure, the error's classification. The outcome itself is forwarded
//! unchanged; this stage never swallows or reclassifies a failure.
//!
//! # Pipeline Position
//!
//! Logging is the outermost stage so it observes every short-circuit:
//!
//! ```text
//! Request → [Logging] → Validation → (custom stages…) → Handler
//! ```
//!
//! # Metrics Emitted
//!
//! - `keryx_dispatch_total` - Counter of dispatches by request and outcome
//! - `keryx_dispatch_duration_seconds` - Histogram of dispatch latency

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use keryx_core::{DispatchError, ErrorCategory, Request, RequestContext};
use metrics::{counter, histogram};

use crate::behavior::{Behavior, BoxFuture, Next};
use crate::stages::Stage;

/// Logging stage emitting one start and one terminal event per dispatch.
///
/// The stage keeps its own atomic invocation counters so tests and health
/// surfaces can observe the one-start/one-terminal guarantee without parsing
/// log output.
#[derive(Debug, Default)]
pub struct LoggingStage {
    /// Number of start events emitted.
    starts: AtomicU64,
    /// Number of terminal events emitted.
    completions: AtomicU64,
}

/// Terminal record of one dispatch, deposited in the context extensions.
#[derive(Debug, Clone)]
pub struct DispatchRecord {
    /// The request type tag.
    pub request: &'static str,
    /// The failure classification, or `None` on success.
    pub category: Option<ErrorCategory>,
    /// Wall-clock duration of the dispatch below this stage.
    pub duration: Duration,
}

impl LoggingStage {
    /// Creates a new logging stage with zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of start events emitted so far.
    #[must_use]
    pub fn starts(&self) -> u64 {
        self.starts.load(Ordering::SeqCst)
    }

    /// Returns the number of terminal events emitted so far.
    #[must_use]
    pub fn completions(&self) -> u64 {
        self.completions.load(Ordering::SeqCst)
    }
}

impl<R: Request> Behavior<R> for LoggingStage {
    fn name(&self) -> &'static str {
        Stage::Logging.name()
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        request: &'a R,
        next: Next<'a, R>,
    ) -> BoxFuture<'a, Result<R::Output, DispatchError>> {
        Box::pin(async move {
            let started = Instant::now();
            self.starts.fetch_add(1, Ordering::SeqCst);
            tracing::info!(
                request = R::NAME,
                kind = %R::KIND,
                request_id = %ctx.request_id(),
                "dispatch started"
            );

            let outcome = next.run(ctx, request).await;

            let duration = started.elapsed();
            let outcome_label = match &outcome {
                Ok(_) => {
                    tracing::info!(
                        request = R::NAME,
                        request_id = %ctx.request_id(),
                        duration_ms = duration.as_secs_f64() * 1000.0,
                        "dispatch succeeded"
                    );
                    "success"
                }
                Err(error) => {
                    let category = error.category();
                    tracing::warn!(
                        request = R::NAME,
                        request_id = %ctx.request_id(),
                        duration_ms = duration.as_secs_f64() * 1000.0,
                        category = %category,
                        "dispatch failed"
                    );
                    category.as_str()
                }
            };
            self.completions.fetch_add(1, Ordering::SeqCst);

            counter!(
                "keryx_dispatch_total",
                "request" => R::NAME,
                "outcome" => outcome_label
            )
            .increment(1);
            histogram!(
                "keryx_dispatch_duration_seconds",
                "request" => R::NAME
            )
            .record(duration.as_secs_f64());

            ctx.set_extension(DispatchRecord {
                request: R::NAME,
                category: outcome.as_ref().err().map(DispatchError::category),
                duration,
            });

            outcome
        })
    }
}
