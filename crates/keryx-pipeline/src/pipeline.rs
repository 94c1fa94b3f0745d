//! Chain composition for one request type.
//!
//! A [`Pipeline`] is the ordered sequence of behaviors terminated by exactly
//! one handler, built once when the request type is registered and reused
//! unchanged for every dispatch of that type.

use std::sync::Arc;

use keryx_core::{DispatchError, ErasedHandler, Request, RequestContext};

use crate::behavior::{Behavior, Next};

/// A type-erased behavior that can be stored in a vector.
pub type BoxedBehavior<R> = Arc<dyn Behavior<R>>;

/// The fixed behavior chain for one request type.
///
/// The order of stages is determined at registration time and cannot be
/// changed afterwards. Executing the pipeline builds the [`Next`] chain from
/// back to front and runs it, so the first registered behavior is the
/// outermost layer of the onion.
///
/// # Example
///
/// ```ignore
/// let pipeline = Pipeline::new(behaviors, Arc::new(handler));
/// let outcome = pipeline.execute(&mut ctx, &request).await;
/// ```
pub struct Pipeline<R: Request> {
    /// Ordered stages, outermost first.
    behaviors: Vec<BoxedBehavior<R>>,

    /// The terminal handler.
    handler: Arc<dyn ErasedHandler<R>>,
}

impl<R: Request> Pipeline<R> {
    /// Creates a pipeline from ordered stages and a terminal handler.
    #[must_use]
    pub fn new(behaviors: Vec<BoxedBehavior<R>>, handler: Arc<dyn ErasedHandler<R>>) -> Self {
        Self { behaviors, handler }
    }

    /// Executes one dispatch through the full chain.
    ///
    /// Returns whatever the chain returns, unchanged.
    pub async fn execute(
        &self,
        ctx: &mut RequestContext,
        request: &R,
    ) -> Result<R::Output, DispatchError> {
        let next = self.build_chain();
        next.run(ctx, request).await
    }

    /// Builds the stage chain from back to front.
    fn build_chain(&self) -> Next<'_, R> {
        let mut next = Next::terminal(self.handler.as_ref());
        for behavior in self.behaviors.iter().rev() {
            next = Next::stage(behavior.as_ref(), next);
        }
        next
    }

    /// Returns the names of all stages in execution order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.behaviors.iter().map(|b| b.name()).collect()
    }

    /// Returns the number of stages ahead of the handler.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.behaviors.len()
    }
}
