//! Field-level validation contract.
//!
//! Validators are registered per request type and run by the validation
//! stage before the handler. Each validator inspects the request and returns
//! its failures in rule order; the stage concatenates the reports across
//! validators so the caller receives every failure in one round trip.

use crate::error::FieldFailure;
use crate::request::Request;

/// A field-level rule set for one request type.
///
/// A validator must be pure with respect to the request: it reads the value
/// and reports failures, nothing more. Returning an empty vec means the
/// request passed this validator.
///
/// Closures of the shape `Fn(&R) -> Vec<FieldFailure>` implement this trait
/// directly.
///
/// # Example
///
/// ```
/// use keryx_core::{FieldFailure, Request, RequestKind, Validator};
///
/// struct CreateProduct {
///     name: String,
/// }
///
/// impl Request for CreateProduct {
///     type Output = u64;
///     const NAME: &'static str = "CreateProduct";
///     const KIND: RequestKind = RequestKind::Command;
/// }
///
/// let name_required = |req: &CreateProduct| {
///     if req.name.is_empty() {
///         vec![FieldFailure::required("Name")]
///     } else {
///         vec![]
///     }
/// };
///
/// assert_eq!(
///     Validator::validate(&name_required, &CreateProduct { name: String::new() }),
///     vec![FieldFailure::required("Name")]
/// );
/// ```
pub trait Validator<R: Request>: Send + Sync + 'static {
    /// Checks the request and returns all failures in rule order.
    fn validate(&self, request: &R) -> Vec<FieldFailure>;
}

impl<R, F> Validator<R> for F
where
    R: Request,
    F: Fn(&R) -> Vec<FieldFailure> + Send + Sync + 'static,
{
    fn validate(&self, request: &R) -> Vec<FieldFailure> {
        self(request)
    }
}
