//! The startup-built dispatch registry.
//!
//! The registry is the process-wide, read-only-after-init mapping from
//! request type to its handler, ordered validators, and ordered behaviors.
//! It is keyed by `TypeId`, so resolution on the dispatch path is a single
//! immutable map lookup: no reflection, no locking.
//!
//! Absent or duplicate registration is a startup-time configuration fault,
//! surfaced as [`RegistryError`] from the builder (duplicates) or from
//! [`Registry::ensure_registered`] (gaps found during startup validation).

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use keryx_core::{ErasedHandler, Handler, Request, Validator};
use keryx_pipeline::{Behavior, LoggingStage, Pipeline, ValidationStage};
use thiserror::Error;

/// Startup-time registry configuration faults.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A request type was registered more than once.
    #[error("duplicate registration for request type {request}")]
    Duplicate {
        /// The request type tag.
        request: &'static str,
    },

    /// A request type the process serves has no registration.
    #[error("no registration for request type {request}")]
    Missing {
        /// The request type tag.
        request: &'static str,
    },
}

/// Pairs one handler with its ordered validators and extra behaviors.
///
/// The finalized chain for the request type is always
/// `[Logging, Validation, …extras, Handler]`; registration order of
/// validators and extra behaviors is preserved.
///
/// # Example
///
/// ```ignore
/// let registration = Registration::new(CreateProductHandler)
///     .validator(|req: &CreateProduct| { /* … */ vec![] })
///     .behavior(AuditStage::new());
/// ```
pub struct Registration<R: Request> {
    handler: Arc<dyn ErasedHandler<R>>,
    validators: Vec<Arc<dyn Validator<R>>>,
    behaviors: Vec<Arc<dyn Behavior<R>>>,
    logging: Arc<LoggingStage>,
}

impl<R: Request> Registration<R> {
    /// Creates a registration for the given handler.
    #[must_use]
    pub fn new<H: Handler<R>>(handler: H) -> Self {
        Self {
            handler: Arc::new(handler),
            validators: Vec::new(),
            behaviors: Vec::new(),
            logging: Arc::new(LoggingStage::new()),
        }
    }

    /// Appends a validator. Validators run in registration order.
    #[must_use]
    pub fn validator<V: Validator<R>>(mut self, validator: V) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    /// Appends a custom behavior, placed after the built-in stages.
    #[must_use]
    pub fn behavior<B: Behavior<R>>(mut self, behavior: B) -> Self {
        self.behaviors.push(Arc::new(behavior));
        self
    }

    /// Replaces the logging stage with a shared instance.
    ///
    /// Useful when the caller wants to observe the stage's invocation
    /// counters, e.g. in tests or a health surface.
    #[must_use]
    pub fn logging(mut self, stage: Arc<LoggingStage>) -> Self {
        self.logging = stage;
        self
    }

    /// Builds the fixed pipeline for this request type.
    fn into_pipeline(self) -> Pipeline<R> {
        let mut chain: Vec<Arc<dyn Behavior<R>>> =
            Vec::with_capacity(self.behaviors.len() + 2);
        chain.push(self.logging);
        chain.push(Arc::new(ValidationStage::new(self.validators)));
        chain.extend(self.behaviors);
        Pipeline::new(chain, self.handler)
    }
}

/// One registry slot: the type-erased pipeline plus its diagnostics tag.
struct RegistryEntry {
    name: &'static str,
    pipeline: Box<dyn Any + Send + Sync>,
}

/// The immutable mapping from request type to its pipeline.
///
/// Built once during process initialization and never mutated afterwards,
/// which is what makes concurrent dispatch lock-free.
pub struct Registry {
    entries: HashMap<TypeId, RegistryEntry>,
}

impl Registry {
    /// Creates a new registry builder.
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Resolves the pipeline for a request type.
    pub(crate) fn pipeline<R: Request>(&self) -> Option<&Pipeline<R>> {
        self.entries
            .get(&TypeId::of::<R>())
            .and_then(|entry| entry.pipeline.downcast_ref::<Pipeline<R>>())
    }

    /// Returns `true` if the request type has a registration.
    #[must_use]
    pub fn contains<R: Request>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<R>())
    }

    /// Fails fast if the request type has no registration.
    ///
    /// Call this for every request type the process serves, during startup,
    /// so configuration gaps surface before the first dispatch.
    pub fn ensure_registered<R: Request>(&self) -> Result<(), RegistryError> {
        if self.contains::<R>() {
            Ok(())
        } else {
            Err(RegistryError::Missing { request: R::NAME })
        }
    }

    /// Returns the number of registered request types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no request types are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the tags of all registered request types, sorted.
    #[must_use]
    pub fn request_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.entries.values().map(|e| e.name).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("requests", &self.request_names())
            .finish()
    }
}

/// Builder populating the registry during process initialization.
pub struct RegistryBuilder {
    entries: HashMap<TypeId, RegistryEntry>,
}

impl RegistryBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Registers a request type.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Duplicate`] if the type is already
    /// registered; exactly one handler per request type is an invariant.
    pub fn register<R: Request>(
        mut self,
        registration: Registration<R>,
    ) -> Result<Self, RegistryError> {
        let key = TypeId::of::<R>();
        if self.entries.contains_key(&key) {
            return Err(RegistryError::Duplicate { request: R::NAME });
        }

        tracing::debug!(request = R::NAME, kind = %R::KIND, "registered request type");
        self.entries.insert(
            key,
            RegistryEntry {
                name: R::NAME,
                pipeline: Box::new(registration.into_pipeline()),
            },
        );
        Ok(self)
    }

    /// Finalizes the registry. No further mutation is possible.
    #[must_use]
    pub fn build(self) -> Registry {
        Registry {
            entries: self.entries,
        }
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RegistryBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.entries.values().map(|e| e.name).collect();
        names.sort_unstable();
        f.debug_struct("RegistryBuilder")
            .field("requests", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keryx_core::{DispatchError, RequestContext, RequestKind};

    struct Ping;

    impl Request for Ping {
        type Output = ();
        const NAME: &'static str = "Ping";
        const KIND: RequestKind = RequestKind::Query;
    }

    struct Pong;

    impl Request for Pong {
        type Output = ();
        const NAME: &'static str = "Pong";
        const KIND: RequestKind = RequestKind::Query;
    }

    struct NoopHandler;

    impl Handler<Ping> for NoopHandler {
        async fn handle(
            &self,
            _ctx: &RequestContext,
            _request: &Ping,
        ) -> Result<(), DispatchError> {
            Ok(())
        }
    }

    #[test]
    fn test_register_and_resolve() {
        let registry = Registry::builder()
            .register(Registration::new(NoopHandler))
            .expect("first registration")
            .build();

        assert!(registry.contains::<Ping>());
        assert!(registry.pipeline::<Ping>().is_some());
        assert!(!registry.contains::<Pong>());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.request_names(), vec!["Ping"]);
    }

    #[test]
    fn test_duplicate_registration_is_a_startup_fault() {
        let builder = Registry::builder()
            .register(Registration::new(NoopHandler))
            .expect("first registration");

        let error = builder
            .register(Registration::new(NoopHandler))
            .expect_err("second registration must fail");
        assert_eq!(error, RegistryError::Duplicate { request: "Ping" });
    }

    #[test]
    fn test_ensure_registered_reports_gaps() {
        let registry = Registry::builder()
            .register(Registration::new(NoopHandler))
            .expect("registration")
            .build();

        assert!(registry.ensure_registered::<Ping>().is_ok());
        assert_eq!(
            registry.ensure_registered::<Pong>(),
            Err(RegistryError::Missing { request: "Pong" })
        );
    }

    #[test]
    fn test_registration_builds_fixed_chain() {
        let registry = Registry::builder()
            .register(
                Registration::new(NoopHandler)
                    .validator(|_req: &Ping| -> Vec<keryx_core::FieldFailure> { Vec::new() }),
            )
            .expect("registration")
            .build();

        let pipeline = registry.pipeline::<Ping>().expect("pipeline");
        // Built-ins always lead the chain, in Stage order.
        assert_eq!(
            pipeline.stage_names(),
            keryx_pipeline::Stage::all().map(keryx_pipeline::Stage::name)
        );
    }

    #[test]
    fn test_empty_registry() {
        let registry = Registry::builder().build();
        assert!(registry.is_empty());
        assert!(registry.request_names().is_empty());
    }
}
