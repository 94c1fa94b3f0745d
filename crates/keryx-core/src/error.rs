//! The failure taxonomy carried through the dispatch pipeline.
//!
//! Every failure a caller of `dispatch` can observe is one of the closed set
//! of [`DispatchError`] variants. Validation failures are raised by the
//! validation stage before the handler runs; the remaining variants are
//! produced by handlers (or by the dispatcher itself when it degrades an
//! unexpected condition to `Internal`).
//!
//! The enum is `#[non_exhaustive]` so the boundary translator is forced to
//! carry a wildcard arm: any variant added later is normalized to a server
//! error rather than escaping unclassified.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using [`DispatchError`].
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Classification of a dispatch failure.
///
/// The category is stable across the pipeline: the logging stage records it
/// and the boundary translator maps it to a caller-facing response class
/// without inspecting variant internals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Field-level validation failed before the handler ran.
    Validation,
    /// A resource the handler needed does not exist.
    NotFound,
    /// The request was well-formed but semantically unacceptable.
    BadRequest,
    /// An unexpected failure inside the handler or the pipeline.
    Internal,
    /// The dispatch was aborted by the cancellation signal.
    Cancelled,
}

impl ErrorCategory {
    /// Returns the lowercase tag used in logs and metrics labels.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::BadRequest => "bad_request",
            Self::Internal => "internal",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldFailure {
    /// The field that failed validation.
    pub field: String,
    /// Why the field was rejected.
    pub message: String,
}

impl FieldFailure {
    /// Creates a new field failure.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates the conventional failure for a missing required field.
    #[must_use]
    pub fn required(field: impl Into<String>) -> Self {
        Self::new(field, "required")
    }
}

impl std::fmt::Display for FieldFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Standard failure type for the dispatch pipeline.
///
/// # Example
///
/// ```
/// use keryx_core::DispatchError;
///
/// fn load_product(id: &str) -> Result<(), DispatchError> {
///     Err(DispatchError::not_found(format!("product {id}")))
/// }
/// ```
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DispatchError {
    /// One or more validators rejected the request.
    ///
    /// Failures are ordered by validator registration order, then by each
    /// validator's internal rule order.
    #[error("validation failed with {} field failure(s)", failures.len())]
    Validation {
        /// The complete, ordered failure report.
        failures: Vec<FieldFailure>,
    },

    /// A resource the request referred to does not exist.
    #[error("not found: {resource}")]
    NotFound {
        /// The missing resource, e.g. `"product 42"`.
        resource: String,
    },

    /// The request was unacceptable for reasons beyond field validation.
    #[error("bad request: {reason}")]
    BadRequest {
        /// Why the request was rejected.
        reason: String,
    },

    /// An unexpected failure.
    #[error("internal error: {message}")]
    Internal {
        /// Human-readable error message.
        message: String,
        /// The underlying cause (not exposed to callers by default).
        #[source]
        source: Option<anyhow::Error>,
    },

    /// The dispatch was aborted by the cancellation signal.
    #[error("dispatch cancelled")]
    Cancelled,
}

impl DispatchError {
    /// Creates a validation error from an ordered failure list.
    #[must_use]
    pub fn validation(failures: Vec<FieldFailure>) -> Self {
        Self::Validation { failures }
    }

    /// Creates a not-found error.
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Creates a bad-request error.
    #[must_use]
    pub fn bad_request(reason: impl Into<String>) -> Self {
        Self::BadRequest {
            reason: reason.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an internal error with an underlying cause.
    pub fn internal_with_source(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Returns the stable classification of this failure.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation { .. } => ErrorCategory::Validation,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::BadRequest { .. } => ErrorCategory::BadRequest,
            Self::Internal { .. } => ErrorCategory::Internal,
            Self::Cancelled => ErrorCategory::Cancelled,
        }
    }

    /// Returns `true` if this failure was caused by cancellation.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Returns the validation failures, if this is a validation error.
    #[must_use]
    pub fn field_failures(&self) -> Option<&[FieldFailure]> {
        match self {
            Self::Validation { failures } => Some(failures),
            _ => None,
        }
    }
}
