//! Per-dispatch context.
//!
//! The [`RequestContext`] carries everything a dispatch needs besides the
//! request itself: a unique id, the request's tag and kind, timing, the
//! cancellation signal, and a typed extensions map that stages use to
//! deposit inspection data.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cancel::CancelSignal;
use crate::request::RequestKind;

/// A unique identifier for each dispatch, using UUID v7.
///
/// UUID v7 is time-ordered, which makes it ideal for request tracking
/// and log correlation.
///
/// # Example
///
/// ```
/// use keryx_core::RequestId;
///
/// let id = RequestId::new();
/// println!("Request ID: {}", id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new unique request ID using UUID v7.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `RequestId` from an existing UUID.
    ///
    /// Useful when the id was assigned by an upstream transport layer.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RequestId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<RequestId> for Uuid {
    fn from(id: RequestId) -> Self {
        id.0
    }
}

/// Context that flows through the behavior chain and into the handler.
///
/// Created fresh by the dispatcher for every call and discarded once the
/// outcome is produced. Stages may enrich it through the extensions map;
/// the request itself is never carried here and never mutated.
#[derive(Debug)]
pub struct RequestContext {
    /// Unique identifier for this dispatch.
    request_id: RequestId,

    /// Stable tag of the request type being dispatched.
    request: &'static str,

    /// Whether the request is a command or a query.
    kind: RequestKind,

    /// The cancellation signal for this dispatch.
    cancellation: CancelSignal,

    /// When the dispatch started.
    started_at: Instant,

    /// Type-erased extension data.
    ///
    /// Stages can store arbitrary data here using type-safe keys.
    extensions: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl RequestContext {
    /// Creates a new context for one dispatch of the named request type.
    #[must_use]
    pub fn new(request: &'static str, kind: RequestKind, cancellation: CancelSignal) -> Self {
        Self {
            request_id: RequestId::new(),
            request,
            kind,
            cancellation,
            started_at: Instant::now(),
            extensions: HashMap::new(),
        }
    }

    /// Creates a context with a specific request ID.
    ///
    /// Useful when the id was provided by a client or upstream service.
    #[must_use]
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = request_id;
        self
    }

    /// Creates a throwaway context for tests and examples.
    #[must_use]
    pub fn mock() -> Self {
        Self::new("mock", RequestKind::Query, CancelSignal::new())
    }

    /// Returns the request ID.
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns the tag of the request type being dispatched.
    #[must_use]
    pub fn request(&self) -> &'static str {
        self.request
    }

    /// Returns whether the request is a command or a query.
    #[must_use]
    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    /// Returns the cancellation signal for this dispatch.
    #[must_use]
    pub fn cancellation(&self) -> &CancelSignal {
        &self.cancellation
    }

    /// Returns when the dispatch started.
    #[must_use]
    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Returns the elapsed time since the dispatch started.
    #[must_use]
    pub fn elapsed(&self) -> std::time::Duration {
        self.started_at.elapsed()
    }

    /// Stores a typed extension value.
    ///
    /// Extensions let stages record data that later stages or the caller's
    /// test harness can retrieve.
    ///
    /// # Example
    ///
    /// ```
    /// use keryx_core::RequestContext;
    ///
    /// #[derive(Clone)]
    /// struct Attempt {
    ///     number: u32,
    /// }
    ///
    /// let mut ctx = RequestContext::mock();
    /// ctx.set_extension(Attempt { number: 1 });
    ///
    /// let attempt = ctx.get_extension::<Attempt>().unwrap();
    /// assert_eq!(attempt.number, 1);
    /// ```
    pub fn set_extension<T: Send + Sync + 'static>(&mut self, value: T) {
        self.extensions.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Retrieves a typed extension value.
    ///
    /// Returns `None` if no extension of the given type was stored.
    #[must_use]
    pub fn get_extension<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.extensions
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref())
    }

    /// Removes and returns a typed extension value.
    pub fn remove_extension<T: Send + Sync + 'static>(&mut self) -> Option<T> {
        self.extensions
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast().ok())
            .map(|b| *b)
    }

    /// Checks if an extension of the given type exists.
    #[must_use]
    pub fn has_extension<T: Send + Sync + 'static>(&self) -> bool {
        self.extensions.contains_key(&TypeId::of::<T>())
    }
}
