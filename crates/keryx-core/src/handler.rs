//! Handler traits for request processing.
//!
//! The [`Handler`] trait is the terminal, request-type-specific business
//! logic unit of the pipeline. Handlers receive a request that has already
//! passed validation and a [`RequestContext`] carrying the cancellation
//! signal, and report failures using the [`DispatchError`] taxonomy.

use std::future::Future;
use std::pin::Pin;

use crate::context::RequestContext;
use crate::error::DispatchError;
use crate::request::Request;

/// A boxed future, used wherever the chain needs type erasure.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The terminal business-logic unit for one request type.
///
/// Handlers may perform arbitrary side effects against external storage.
/// The pipeline places only two obligations on them: honor the cancellation
/// signal promptly, and leave field-level validation to the validation
/// stage (business rules beyond that are their legitimate domain).
///
/// # Example
///
/// ```
/// use keryx_core::{DispatchError, Handler, Request, RequestContext, RequestKind};
///
/// struct GetProduct {
///     id: u64,
/// }
///
/// struct Product {
///     id: u64,
///     name: String,
/// }
///
/// impl Request for GetProduct {
///     type Output = Product;
///     const NAME: &'static str = "GetProduct";
///     const KIND: RequestKind = RequestKind::Query;
/// }
///
/// struct GetProductHandler;
///
/// impl Handler<GetProduct> for GetProductHandler {
///     async fn handle(
///         &self,
///         _ctx: &RequestContext,
///         request: &GetProduct,
///     ) -> Result<Product, DispatchError> {
///         Ok(Product {
///             id: request.id,
///             name: "anvil".to_string(),
///         })
///     }
/// }
/// ```
pub trait Handler<R: Request>: Send + Sync + 'static {
    /// Handles a validated request and produces its result.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] if:
    /// - A required resource is missing (`NotFound`)
    /// - The request is semantically unacceptable (`BadRequest`)
    /// - The cancellation signal fired (`Cancelled`)
    /// - Anything else went wrong (`Internal`)
    fn handle(
        &self,
        ctx: &RequestContext,
        request: &R,
    ) -> impl Future<Output = Result<R::Output, DispatchError>> + Send;
}

/// An object-safe mirror of [`Handler`] for storage in the registry.
///
/// The blanket impl means any `Handler<R>` can be stored as
/// `Arc<dyn ErasedHandler<R>>` without a manual adapter.
pub trait ErasedHandler<R: Request>: Send + Sync + 'static {
    /// Invokes the handler, boxing its future.
    fn call<'a>(
        &'a self,
        ctx: &'a RequestContext,
        request: &'a R,
    ) -> BoxFuture<'a, Result<R::Output, DispatchError>>;
}

impl<R: Request, H: Handler<R>> ErasedHandler<R> for H {
    fn call<'a>(
        &'a self,
        ctx: &'a RequestContext,
        request: &'a R,
    ) -> BoxFuture<'a, Result<R::Output, DispatchError>> {
        Box::pin(self.handle(ctx, request))
    }
}

/// A function-based handler wrapper.
///
/// Lets plain async functions act as handlers without a named type.
///
/// # Example
///
/// ```rust,ignore
/// use keryx_core::FnHandler;
///
/// let handler = FnHandler::new(|_ctx, req: &GetProduct| {
///     let id = req.id;
///     async move { Ok(Product { id, name: "anvil".to_string() }) }
/// });
/// ```
pub struct FnHandler<F, R, Fut>
where
    F: Fn(&RequestContext, &R) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R::Output, DispatchError>> + Send + 'static,
    R: Request,
{
    func: F,
    _phantom: std::marker::PhantomData<fn(R) -> Fut>,
}

impl<F, R, Fut> FnHandler<F, R, Fut>
where
    F: Fn(&RequestContext, &R) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R::Output, DispatchError>> + Send + 'static,
    R: Request,
{
    /// Creates a new function-based handler.
    #[must_use]
    pub const fn new(func: F) -> Self {
        Self {
            func,
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<F, R, Fut> Handler<R> for FnHandler<F, R, Fut>
where
    F: Fn(&RequestContext, &R) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R::Output, DispatchError>> + Send + 'static,
    R: Request,
{
    async fn handle(&self, ctx: &RequestContext, request: &R) -> Result<R::Output, DispatchError> {
        (self.func)(ctx, request).await
    }
}
