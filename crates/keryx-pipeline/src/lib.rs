//! # Keryx Pipeline
//!
//! The behavior chain of the Keryx dispatch pipeline.
//!
//! Every dispatch flows through an ordered chain of [`Behavior`] stages
//! wrapping the terminal handler:
//!
//! ```text
//! Request → Logging → Validation → (custom stages…) → Handler
//!                                                        ↓
//! Outcome ←──────────── observed on the way back out ───┘
//! ```
//!
//! The chain for a request type is fixed when its registration is built and
//! is identical for every dispatch of that type. A stage may short-circuit
//! by returning without invoking [`Next`]; stages already entered still
//! observe the short-circuited outcome on their way back out.
//!
//! ## Built-in Stages
//!
//! | Stage      | Purpose                                                  |
//! |------------|----------------------------------------------------------|
//! | Logging    | One start and one terminal event per dispatch, metrics   |
//! | Validation | Runs all validators, short-circuits on any failure       |
//!
//! ## Example
//!
//! ```
//! use keryx_pipeline::stages::Stage;
//!
//! // Built-in stages run in a fixed order ahead of custom ones.
//! assert_eq!(Stage::all().map(Stage::name), ["logging", "validation"]);
//! ```

#![doc(html_root_url = "https://docs.rs/keryx-pipeline/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod behavior;
pub mod pipeline;
pub mod stages;

pub use behavior::{Behavior, BoxFuture, FnBehavior, Next};
pub use pipeline::Pipeline;
pub use stages::{DispatchRecord, LoggingStage, Stage, ValidationStage};
