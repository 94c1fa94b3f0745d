//! Boundary error translation.
//!
//! The translator is a total function from [`DispatchError`] to a
//! caller-facing [`ErrorResponse`]: every variant, including any added in
//! the future (the error enum is `#[non_exhaustive]`), maps to a response
//! class, so no unclassified failure ever reaches the caller.
//!
//! This is a boundary-only concern. Nothing inside the pipeline consults
//! the translator; a transport layer applies it to whatever `dispatch`
//! returned.

use http::StatusCode;
use serde::{Deserialize, Serialize};

use keryx_core::{DispatchError, FieldFailure};

/// Caller-facing classification of a failed dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    /// The caller sent something unacceptable.
    ClientError,
    /// The referenced resource does not exist.
    ResourceMissing,
    /// The server failed.
    ServerError,
    /// The dispatch was aborted before completing.
    Aborted,
}

impl ErrorClass {
    /// Returns the HTTP status code a transport layer would use.
    #[must_use]
    pub fn status_code(self) -> StatusCode {
        match self {
            Self::ClientError => StatusCode::BAD_REQUEST,
            Self::ResourceMissing => StatusCode::NOT_FOUND,
            Self::ServerError => StatusCode::INTERNAL_SERVER_ERROR,
            // 499 Client Closed Request, the de facto code for aborted work.
            Self::Aborted => StatusCode::from_u16(499).expect("499 is a valid status code"),
        }
    }
}

/// Serializable caller-facing response for a failed dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// The response class.
    pub class: ErrorClass,
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Field-level failures, present for validation errors only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failures: Option<Vec<FieldFailure>>,
    /// The request ID for correlation, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ErrorResponse {
    /// Returns the HTTP status code for this response.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.class.status_code()
    }
}

/// Configuration for the boundary translator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TranslatorConfig {
    /// Whether internal error detail is exposed to callers.
    ///
    /// **Warning**: only enable this in development environments.
    #[serde(default)]
    pub expose_internal_detail: bool,

    /// Message used for internal errors when detail is suppressed.
    #[serde(default = "TranslatorConfig::default_internal_message")]
    pub internal_message: String,
}

impl TranslatorConfig {
    fn default_internal_message() -> String {
        "An internal error occurred".to_string()
    }
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            expose_internal_detail: false,
            internal_message: Self::default_internal_message(),
        }
    }
}

/// Maps dispatch failures to caller-facing structured responses.
///
/// # Example
///
/// ```
/// use keryx_core::DispatchError;
/// use keryx_dispatch::{ErrorClass, ErrorTranslator};
///
/// let translator = ErrorTranslator::new();
/// let response = translator.translate(&DispatchError::not_found("product 42"), None);
/// assert_eq!(response.class, ErrorClass::ResourceMissing);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ErrorTranslator {
    config: TranslatorConfig,
}

impl ErrorTranslator {
    /// Creates a translator with detail suppression on.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a translator from configuration.
    #[must_use]
    pub fn from_config(config: TranslatorConfig) -> Self {
        Self { config }
    }

    /// Sets whether internal error detail is exposed.
    #[must_use]
    pub fn expose_internal_detail(mut self, expose: bool) -> Self {
        self.config.expose_internal_detail = expose;
        self
    }

    /// Translates a dispatch failure into a caller-facing response.
    ///
    /// Total over the error taxonomy: unknown variants normalize to a
    /// server error.
    #[must_use]
    pub fn translate(&self, error: &DispatchError, request_id: Option<&str>) -> ErrorResponse {
        let (class, code, message, failures) = match error {
            DispatchError::Validation { failures } => (
                ErrorClass::ClientError,
                "VALIDATION_FAILED",
                "One or more validation errors occurred".to_string(),
                Some(failures.clone()),
            ),
            DispatchError::BadRequest { reason } => (
                ErrorClass::ClientError,
                "BAD_REQUEST",
                reason.clone(),
                None,
            ),
            DispatchError::NotFound { resource } => (
                ErrorClass::ResourceMissing,
                "NOT_FOUND",
                format!("{resource} not found"),
                None,
            ),
            DispatchError::Cancelled => (
                ErrorClass::Aborted,
                "CANCELLED",
                "The request was cancelled".to_string(),
                None,
            ),
            DispatchError::Internal { message, .. } => (
                ErrorClass::ServerError,
                "INTERNAL_ERROR",
                if self.config.expose_internal_detail {
                    message.clone()
                } else {
                    self.config.internal_message.clone()
                },
                None,
            ),
            // DispatchError is non_exhaustive; nothing unclassified escapes.
            _ => (
                ErrorClass::ServerError,
                "INTERNAL_ERROR",
                self.config.internal_message.clone(),
                None,
            ),
        };

        ErrorResponse {
            class,
            code: code.to_string(),
            message,
            failures,
            request_id: request_id.map(ToString::to_string),
        }
    }
}
