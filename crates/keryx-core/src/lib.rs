//! # Keryx Core
//!
//! Core contracts for the Keryx request dispatch pipeline.
//!
//! This crate provides the foundational types used throughout Keryx:
//!
//! - [`Request`] - Immutable intent object contract (commands and queries)
//! - [`DispatchError`] - The closed failure taxonomy carried through the pipeline
//! - [`Validator`] - Field-level validation contract
//! - [`Handler`] - Terminal business-logic contract
//! - [`RequestContext`] - Per-dispatch context carrying id, timing, and cancellation
//! - [`CancelSignal`] - Explicit cancellation signal threaded through every stage

#![doc(html_root_url = "https://docs.rs/keryx-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod cancel;
mod context;
mod error;
mod handler;
mod request;
mod validate;

pub use cancel::CancelSignal;
pub use context::{RequestContext, RequestId};
pub use error::{DispatchError, DispatchResult, ErrorCategory, FieldFailure};
pub use handler::{BoxFuture, ErasedHandler, FnHandler, Handler};
pub use request::{Request, RequestKind};
pub use validate::Validator;
