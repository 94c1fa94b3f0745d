//! # Keryx Dispatch
//!
//! The dispatch surface of Keryx: the startup-built [`Registry`] mapping
//! each request type to its handler and behavior chain, the [`Dispatcher`]
//! executing that chain, and the boundary [`ErrorTranslator`] converting
//! failures into caller-facing structured responses.
//!
//! ## Control Flow
//!
//! ```text
//! caller builds request
//!     → Dispatcher resolves the registry entry
//!     → chain [Logging, Validation, …, Handler] runs front-to-back
//!     → Result or classified DispatchError returned unchanged
//!     → ErrorTranslator (boundary only) maps the error to a response
//! ```
//!
//! ## Example
//!
//! ```
//! use keryx_core::{CancelSignal, DispatchError, Handler, Request, RequestContext, RequestKind};
//! use keryx_dispatch::{Dispatcher, Registration, Registry};
//!
//! struct DeleteAllProducts;
//!
//! #[derive(Debug, PartialEq)]
//! struct Deleted {
//!     success: bool,
//! }
//!
//! impl Request for DeleteAllProducts {
//!     type Output = Deleted;
//!     const NAME: &'static str = "DeleteAllProducts";
//!     const KIND: RequestKind = RequestKind::Command;
//! }
//!
//! struct DeleteAllProductsHandler;
//!
//! impl Handler<DeleteAllProducts> for DeleteAllProductsHandler {
//!     async fn handle(
//!         &self,
//!         _ctx: &RequestContext,
//!         _request: &DeleteAllProducts,
//!     ) -> Result<Deleted, DispatchError> {
//!         Ok(Deleted { success: true })
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let registry = Registry::builder()
//!     .register(Registration::new(DeleteAllProductsHandler))
//!     .expect("first registration")
//!     .build();
//!
//! let dispatcher = Dispatcher::new(registry);
//! let outcome = dispatcher
//!     .dispatch(DeleteAllProducts, CancelSignal::new())
//!     .await;
//! assert_eq!(outcome.unwrap(), Deleted { success: true });
//! # }
//! ```

#![doc(html_root_url = "https://docs.rs/keryx-dispatch/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod dispatcher;
mod registry;
mod translate;

pub use dispatcher::Dispatcher;
pub use registry::{Registration, Registry, RegistryBuilder, RegistryError};
pub use translate::{ErrorClass, ErrorResponse, ErrorTranslator, TranslatorConfig};
