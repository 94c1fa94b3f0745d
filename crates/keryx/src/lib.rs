//! # Keryx
//!
//! **In-process request dispatch pipeline for command/query applications**
//!
//! Keryx routes typed requests through a fixed chain of behaviors to a
//! registered handler:
//!
//! - **Typed dispatch** - one handler per request type, resolved at startup
//! - **Fixed stage order** - logging wraps validation wraps the handler
//! - **Exhaustive validation** - every validator runs, every failure is reported
//! - **Cooperative cancellation** - a triggered signal resolves to `Cancelled`
//! - **Boundary translation** - failures map to structured caller-facing responses
//!
//! ## Quick Start
//!
//! ```
//! use keryx::prelude::*;
//!
//! struct Ping;
//!
//! impl Request for Ping {
//!     type Output = String;
//!     const NAME: &'static str = "Ping";
//!     const KIND: RequestKind = RequestKind::Query;
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = Registry::builder()
//!     .register(Registration::new(FnHandler::new(
//!         |_ctx: &RequestContext, _req: &Ping| async { Ok("pong".to_string()) },
//!     )))?
//!     .build();
//!
//! let dispatcher = Dispatcher::new(registry);
//! let reply = dispatcher.dispatch(Ping, CancelSignal::new()).await?;
//! assert_eq!(reply, "pong");
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! Every dispatch runs the same chain, built once at registration:
//!
//! ```text
//! Request → Logging → Validation → [custom behaviors] → Handler
//!                                                          ↓
//! Result  ←──────────────────────────────────────────────┘
//! ```

#![doc(html_root_url = "https://docs.rs/keryx/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use keryx_core as core;

// Re-export pipeline types
pub use keryx_pipeline as pipeline;

// Re-export dispatch types
pub use keryx_dispatch as dispatch;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```
/// use keryx::prelude::*;
/// ```
pub mod prelude {
    pub use keryx_core::{
        CancelSignal, DispatchError, DispatchResult, ErrorCategory, FieldFailure, FnHandler,
        Handler, Request, RequestContext, RequestId, RequestKind, Validator,
    };

    // Re-export pipeline types
    pub use keryx_pipeline::{Behavior, DispatchRecord, LoggingStage, Next, ValidationStage};

    // Re-export dispatch types
    pub use keryx_dispatch::{
        Dispatcher, ErrorClass, ErrorResponse, ErrorTranslator, Registration, Registry,
        RegistryBuilder, RegistryError, TranslatorConfig,
    };
}
