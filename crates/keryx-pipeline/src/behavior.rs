//! Core behavior trait and chain types.
//!
//! This module defines the [`Behavior`] trait that all pipeline stages
//! implement, and the [`Next`] continuation that invokes the remainder of
//! the chain.
//!
//! # Design
//!
//! Behaviors are an explicit ordered list of trait objects, each receiving
//! the rest of the chain as an argument. This keeps ordering and
//! short-circuit semantics visible and independently testable: a stage that
//! returns without calling `next.run()` skips the handler and every stage
//! still ahead of it, while stages already entered observe the outcome on
//! their way back out.
//!
//! # Example
//!
//! ```ignore
//! use keryx_pipeline::{Behavior, BoxFuture, Next};
//! use keryx_core::{DispatchError, Request, RequestContext};
//!
//! struct TimingStage;
//!
//! impl<R: Request> Behavior<R> for TimingStage {
//!     fn name(&self) -> &'static str {
//!         "timing"
//!     }
//!
//!     fn process<'a>(
//!         &'a self,
//!         ctx: &'a mut RequestContext,
//!         request: &'a R,
//!         next: Next<'a, R>,
//!     ) -> BoxFuture<'a, Result<R::Output, DispatchError>> {
//!         Box::pin(async move {
//!             let started = std::time::Instant::now();
//!             let outcome = next.run(ctx, request).await;
//!             tracing::debug!(elapsed = ?started.elapsed(), "stage timing");
//!             outcome
//!         })
//!     }
//! }
//! ```

use keryx_core::{DispatchError, ErasedHandler, Request, RequestContext};

pub use keryx_core::BoxFuture;

/// A pipeline stage wrapping the remainder of the chain.
///
/// # Invariants
///
/// - A behavior MUST call `next.run()` at most once (`Next` consumes itself)
/// - A behavior MUST NOT mutate the request; it only receives `&R`
/// - A behavior MUST NOT swallow or reclassify errors from downstream stages
pub trait Behavior<R: Request>: Send + Sync + 'static {
    /// Returns the unique name of this stage.
    ///
    /// Used for logging and debugging.
    fn name(&self) -> &'static str;

    /// Processes the request through this stage.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The mutable dispatch context
    /// * `request` - The immutable request being dispatched
    /// * `next` - Continuation invoking the rest of the chain
    fn process<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        request: &'a R,
        next: Next<'a, R>,
    ) -> BoxFuture<'a, Result<R::Output, DispatchError>>;
}

/// Continuation invoking the next stage (or the handler) in the chain.
///
/// Consumed by [`Next::run`], so a stage can continue the chain at most
/// once. Not calling it short-circuits the dispatch with whatever the stage
/// returns.
pub struct Next<'a, R: Request> {
    inner: NextInner<'a, R>,
}

enum NextInner<'a, R: Request> {
    /// More stages to process.
    Chain {
        behavior: &'a dyn Behavior<R>,
        next: Box<Next<'a, R>>,
    },
    /// End of chain: invoke the handler, guarded by the cancellation signal.
    Handler(&'a dyn ErasedHandler<R>),
}

impl<'a, R: Request> Next<'a, R> {
    /// Creates a `Next` that will invoke the given stage.
    pub(crate) fn stage(behavior: &'a dyn Behavior<R>, next: Next<'a, R>) -> Self {
        Self {
            inner: NextInner::Chain {
                behavior,
                next: Box::new(next),
            },
        }
    }

    /// Creates the terminal `Next` that invokes the handler.
    pub(crate) fn terminal(handler: &'a dyn ErasedHandler<R>) -> Self {
        Self {
            inner: NextInner::Handler(handler),
        }
    }

    /// Invokes the next stage or the handler.
    ///
    /// At the terminal step the cancellation signal is checked before the
    /// handler starts and raced against it while it runs, so cancellation
    /// surfaces as [`DispatchError::Cancelled`] even from a handler that
    /// never polls the signal.
    pub async fn run(
        self,
        ctx: &mut RequestContext,
        request: &'a R,
    ) -> Result<R::Output, DispatchError> {
        match self.inner {
            NextInner::Chain { behavior, next } => behavior.process(ctx, request, *next).await,
            NextInner::Handler(handler) => {
                if ctx.cancellation().is_cancelled() {
                    return Err(DispatchError::Cancelled);
                }
                let signal = ctx.cancellation().clone();
                tokio::select! {
                    outcome = handler.call(ctx, request) => outcome,
                    () = signal.cancelled() => Err(DispatchError::Cancelled),
                }
            }
        }
    }
}

/// A behavior created from a closure returning a boxed future.
///
/// Lets simple stages be defined without implementing the trait directly.
/// The closure must box its future so it can borrow the context and the
/// request for the duration of the stage.
///
/// # Example
///
/// ```ignore
/// let stage = FnBehavior::new("audit", |ctx, req, next| {
///     Box::pin(async move {
///         tracing::info!(request_id = %ctx.request_id(), "entering handler region");
///         next.run(ctx, req).await
///     })
/// });
/// ```
pub struct FnBehavior<F> {
    name: &'static str,
    func: F,
}

impl<F> FnBehavior<F> {
    /// Creates a new function-based behavior.
    pub const fn new(name: &'static str, func: F) -> Self {
        Self { name, func }
    }
}

impl<R, F> Behavior<R> for FnBehavior<F>
where
    R: Request,
    F: for<'a> Fn(
            &'a mut RequestContext,
            &'a R,
            Next<'a, R>,
        ) -> BoxFuture<'a, Result<R::Output, DispatchError>>
        + Send
        + Sync
        + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        request: &'a R,
        next: Next<'a, R>,
    ) -> BoxFuture<'a, Result<R::Output, DispatchError>> {
        (self.func)(ctx, request, next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keryx_core::{CancelSignal, Handler, RequestKind};

    struct Echo {
        text: String,
    }

    impl Request for Echo {
        type Output = String;
        const NAME: &'static str = "Echo";
        const KIND: RequestKind = RequestKind::Query;
    }

    struct EchoHandler;

    impl Handler<Echo> for EchoHandler {
        async fn handle(
            &self,
            _ctx: &RequestContext,
            request: &Echo,
        ) -> Result<String, DispatchError> {
            Ok(request.text.clone())
        }
    }

    struct TagStage {
        name: &'static str,
    }

    impl Behavior<Echo> for TagStage {
        fn name(&self) -> &'static str {
            self.name
        }

        fn process<'a>(
            &'a self,
            ctx: &'a mut RequestContext,
            request: &'a Echo,
            next: Next<'a, Echo>,
        ) -> BoxFuture<'a, Result<String, DispatchError>> {
            Box::pin(async move {
                let outcome = next.run(ctx, request).await;
                outcome.map(|text| format!("{}({text})", self.name))
            })
        }
    }

    fn test_ctx() -> RequestContext {
        RequestContext::new(Echo::NAME, Echo::KIND, CancelSignal::new())
    }

    #[tokio::test]
    async fn test_terminal_next_invokes_handler() {
        let handler = EchoHandler;
        let mut ctx = test_ctx();
        let request = Echo {
            text: "hi".to_string(),
        };

        let next = Next::terminal(&handler);
        let outcome = next.run(&mut ctx, &request).await;
        assert_eq!(outcome.unwrap(), "hi");
    }

    #[tokio::test]
    async fn test_chain_wraps_outermost_first() {
        let handler = EchoHandler;
        let outer = TagStage { name: "outer" };
        let inner = TagStage { name: "inner" };

        let mut ctx = test_ctx();
        let request = Echo {
            text: "x".to_string(),
        };

        // Build chain: outer -> inner -> handler
        let next = Next::terminal(&handler);
        let next = Next::stage(&inner, next);
        let next = Next::stage(&outer, next);

        let outcome = next.run(&mut ctx, &request).await;
        assert_eq!(outcome.unwrap(), "outer(inner(x))");
    }

    #[tokio::test]
    async fn test_short_circuit_skips_handler_but_not_entered_stages() {
        struct RejectStage;

        impl Behavior<Echo> for RejectStage {
            fn name(&self) -> &'static str {
                "reject"
            }

            fn process<'a>(
                &'a self,
                _ctx: &'a mut RequestContext,
                _request: &'a Echo,
                _next: Next<'a, Echo>,
            ) -> BoxFuture<'a, Result<String, DispatchError>> {
                Box::pin(async { Err(DispatchError::bad_request("nope")) })
            }
        }

        let handler = EchoHandler;
        let outer = TagStage { name: "outer" };
        let reject = RejectStage;

        let mut ctx = test_ctx();
        let request = Echo {
            text: "x".to_string(),
        };

        let next = Next::terminal(&handler);
        let next = Next::stage(&reject, next);
        let next = Next::stage(&outer, next);

        // Outer stage runs and observes the short-circuited outcome; the
        // handler is never reached, so no "outer(...)" mapping happens.
        let outcome = next.run(&mut ctx, &request).await;
        assert!(matches!(outcome, Err(DispatchError::BadRequest { .. })));
    }

    #[tokio::test]
    async fn test_terminal_step_pre_checks_cancellation() {
        let handler = EchoHandler;
        let cancel = CancelSignal::new();
        cancel.trigger();

        let mut ctx = RequestContext::new(Echo::NAME, Echo::KIND, cancel);
        let request = Echo {
            text: "never".to_string(),
        };

        let next = Next::terminal(&handler);
        let outcome = next.run(&mut ctx, &request).await;
        assert!(matches!(outcome, Err(DispatchError::Cancelled)));
    }

    #[tokio::test]
    async fn test_cancellation_races_blocked_handler() {
        struct StuckHandler;

        impl Handler<Echo> for StuckHandler {
            async fn handle(
                &self,
                _ctx: &RequestContext,
                _request: &Echo,
            ) -> Result<String, DispatchError> {
                // Never completes on its own.
                std::future::pending::<()>().await;
                unreachable!()
            }
        }

        let handler = StuckHandler;
        let cancel = CancelSignal::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
            trigger.trigger();
        });

        let mut ctx = RequestContext::new(Echo::NAME, Echo::KIND, cancel);
        let request = Echo {
            text: "stuck".to_string(),
        };

        let next = Next::terminal(&handler);
        let outcome = next.run(&mut ctx, &request).await;
        assert!(matches!(outcome, Err(DispatchError::Cancelled)));
    }

    #[tokio::test]
    async fn test_fn_behavior() {
        fn wrap<'a>(
            ctx: &'a mut RequestContext,
            req: &'a Echo,
            next: Next<'a, Echo>,
        ) -> BoxFuture<'a, Result<String, DispatchError>> {
            Box::pin(async move { next.run(ctx, req).await.map(|text| format!("[{text}]")) })
        }

        let handler = EchoHandler;
        let stage = FnBehavior::new("wrap", wrap);

        let mut ctx = test_ctx();
        let request = Echo {
            text: "y".to_string(),
        };

        let next = Next::terminal(&handler);
        let next = Next::stage(&stage, next);
        let outcome = next.run(&mut ctx, &request).await;
        assert_eq!(outcome.unwrap(), "[y]");
        assert_eq!(Behavior::<Echo>::name(&stage), "wrap");
    }
}
