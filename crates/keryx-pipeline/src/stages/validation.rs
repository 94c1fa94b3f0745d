//! Request validation stage.
//!
//! Runs every validator registered for the request type before the handler
//! executes. All failures across all validators are collected (no fail-fast
//! within validation) so the caller receives a complete report in one round
//! trip.
//!
//! # Pipeline Position
//!
//! ```text
//! Request → Logging → [Validation] → (custom stages…) → Handler
//! ```
//!
//! # Ordering
//!
//! Failures appear in validator-registration order, then in each validator's
//! internal rule order.

use std::sync::Arc;

use keryx_core::{DispatchError, Request, RequestContext, Validator};

use crate::behavior::{Behavior, BoxFuture, Next};
use crate::stages::Stage;

/// Validation stage holding the ordered validators for one request type.
///
/// With zero validators the stage is a pure pass-through: the outcome equals
/// the inner chain's outcome.
pub struct ValidationStage<R: Request> {
    /// Validators in registration order.
    validators: Vec<Arc<dyn Validator<R>>>,
}

impl<R: Request> ValidationStage<R> {
    /// Creates a validation stage from the ordered validator set.
    #[must_use]
    pub fn new(validators: Vec<Arc<dyn Validator<R>>>) -> Self {
        Self { validators }
    }

    /// Returns the number of registered validators.
    #[must_use]
    pub fn validator_count(&self) -> usize {
        self.validators.len()
    }
}

impl<R: Request> Behavior<R> for ValidationStage<R> {
    fn name(&self) -> &'static str {
        Stage::Validation.name()
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        request: &'a R,
        next: Next<'a, R>,
    ) -> BoxFuture<'a, Result<R::Output, DispatchError>> {
        Box::pin(async move {
            let mut failures = Vec::new();
            for validator in &self.validators {
                failures.extend(validator.validate(request));
            }

            if failures.is_empty() {
                return next.run(ctx, request).await;
            }

            tracing::debug!(
                request = R::NAME,
                request_id = %ctx.request_id(),
                failures = failures.len(),
                "request rejected by validation"
            );
            Err(DispatchError::validation(failures))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keryx_core::{CancelSignal, FieldFailure, Handler, RequestKind};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CreateProduct {
        name: String,
        price: i64,
    }

    impl Request for CreateProduct {
        type Output = u64;
        const NAME: &'static str = "CreateProduct";
        const KIND: RequestKind = RequestKind::Command;
    }

    struct CountingHandler {
        calls: Arc<AtomicUsize>,
    }

    impl Handler<CreateProduct> for CountingHandler {
        async fn handle(
            &self,
            _ctx: &RequestContext,
            _request: &CreateProduct,
        ) -> Result<u64, DispatchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(7)
        }
    }

    fn test_ctx() -> RequestContext {
        RequestContext::new(
            CreateProduct::NAME,
            CreateProduct::KIND,
            CancelSignal::new(),
        )
    }

    fn name_validator(req: &CreateProduct) -> Vec<FieldFailure> {
        if req.name.is_empty() {
            vec![FieldFailure::required("Name")]
        } else {
            vec![]
        }
    }

    fn price_validator(req: &CreateProduct) -> Vec<FieldFailure> {
        let mut failures = Vec::new();
        if req.price < 0 {
            failures.push(FieldFailure::new("Price", "must not be negative"));
        }
        if req.price > 1_000_000 {
            failures.push(FieldFailure::new("Price", "exceeds maximum"));
        }
        failures
    }

    #[tokio::test]
    async fn test_zero_validators_is_pass_through() {
        let calls = Arc::new(AtomicUsize::new(0));
        let handler = CountingHandler {
            calls: calls.clone(),
        };
        let stage = ValidationStage::<CreateProduct>::new(Vec::new());
        assert_eq!(stage.validator_count(), 0);

        let mut ctx = test_ctx();
        let request = CreateProduct {
            name: String::new(),
            price: -5,
        };

        let next = Next::terminal(&handler);
        let outcome = stage.process(&mut ctx, &request, next).await;
        assert_eq!(outcome.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_passing_request_forwards_unchanged() {
        let calls = Arc::new(AtomicUsize::new(0));
        let handler = CountingHandler {
            calls: calls.clone(),
        };
        let stage = ValidationStage::new(vec![
            Arc::new(name_validator) as Arc<dyn Validator<CreateProduct>>,
            Arc::new(price_validator),
        ]);

        let mut ctx = test_ctx();
        let request = CreateProduct {
            name: "anvil".to_string(),
            price: 100,
        };

        let next = Next::terminal(&handler);
        let outcome = stage.process(&mut ctx, &request, next).await;
        assert_eq!(outcome.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_collects_all_failures_across_validators() {
        let calls = Arc::new(AtomicUsize::new(0));
        let handler = CountingHandler {
            calls: calls.clone(),
        };
        let stage = ValidationStage::new(vec![
            Arc::new(name_validator) as Arc<dyn Validator<CreateProduct>>,
            Arc::new(price_validator),
        ]);

        let mut ctx = test_ctx();
        let request = CreateProduct {
            name: String::new(),
            price: 2_000_000,
        };

        let next = Next::terminal(&handler);
        let outcome = stage.process(&mut ctx, &request, next).await;

        let error = outcome.unwrap_err();
        let failures = error.field_failures().expect("validation failures");
        // Registration order first, then each validator's rule order.
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0], FieldFailure::required("Name"));
        assert_eq!(failures[1], FieldFailure::new("Price", "exceeds maximum"));

        // The handler is never invoked on a validation short-circuit.
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_no_fail_fast_within_one_validator() {
        let calls = Arc::new(AtomicUsize::new(0));
        let handler = CountingHandler { calls };
        let stage = ValidationStage::new(vec![
            Arc::new(price_validator) as Arc<dyn Validator<CreateProduct>>,
        ]);

        let mut ctx = test_ctx();
        // Both rules of the price validator cannot fire at once, so combine
        // with a request that trips the negative rule only.
        let request = CreateProduct {
            name: "anvil".to_string(),
            price: -1,
        };

        let next = Next::terminal(&handler);
        let error = stage.process(&mut ctx, &request, next).await.unwrap_err();
        let failures = error.field_failures().expect("validation failures");
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].message, "must not be negative");
    }
}
