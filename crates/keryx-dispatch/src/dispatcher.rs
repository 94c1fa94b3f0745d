//! The dispatch entry point.
//!
//! `dispatch(request, cancellation) -> Result | DispatchError` is the entire
//! surface the pipeline exposes to a transport layer. The dispatcher is
//! stateless: it resolves the prebuilt pipeline for the request type,
//! creates a fresh context, and returns whatever the chain returns,
//! unchanged.

use std::sync::Arc;

use keryx_core::{CancelSignal, DispatchError, Request, RequestContext};

use crate::registry::Registry;

/// Resolves and executes the behavior chain for each incoming request.
///
/// Cloning is cheap; clones share the same immutable [`Registry`], so the
/// dispatcher is safe to call from any number of concurrent tasks.
///
/// Missing registrations should be caught at startup with
/// [`Registry::ensure_registered`]; if one is reached at runtime anyway,
/// `dispatch` degrades to an `Internal` error rather than panicking.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
}

impl Dispatcher {
    /// Creates a dispatcher over a finalized registry.
    #[must_use]
    pub fn new(registry: Registry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// Returns the shared registry.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Dispatches one request through its behavior chain.
    ///
    /// # Errors
    ///
    /// Returns the chain's classified failure unchanged, or `Internal` if
    /// the request type has no registration.
    pub async fn dispatch<R: Request>(
        &self,
        request: R,
        cancellation: CancelSignal,
    ) -> Result<R::Output, DispatchError> {
        let Some(pipeline) = self.registry.pipeline::<R>() else {
            tracing::error!(request = R::NAME, "dispatch reached unregistered request type");
            return Err(DispatchError::internal(format!(
                "no handler registered for request type {}",
                R::NAME
            )));
        };

        let mut ctx = RequestContext::new(R::NAME, R::KIND, cancellation);
        pipeline.execute(&mut ctx, &request).await
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .finish()
    }
}
