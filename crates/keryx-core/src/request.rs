//! Request contract types.
//!
//! A request is an immutable intent object. It is either a [`Command`] that
//! mutates state or a [`Query`] that reads it, and it statically declares the
//! result type its handler produces.
//!
//! [`Command`]: RequestKind::Command
//! [`Query`]: RequestKind::Query

use serde::{Deserialize, Serialize};

/// Whether a request expresses intent to mutate state or to read it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    /// Intent to mutate state.
    Command,
    /// Intent to read state without mutation.
    Query,
}

impl RequestKind {
    /// Returns the lowercase tag used in logs and metrics labels.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Command => "command",
            Self::Query => "query",
        }
    }
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable, dispatchable intent object.
///
/// Each request type is statically associated with exactly one result type
/// (`Output`) and carries a stable name used for registry diagnostics,
/// structured logging, and metrics labels. The pipeline only ever hands out
/// shared references to a request, so behaviors cannot mutate it.
///
/// # Example
///
/// ```
/// use keryx_core::{Request, RequestKind};
///
/// struct DeleteAllProducts;
///
/// struct DeleteAllProductsResult {
///     success: bool,
/// }
///
/// impl Request for DeleteAllProducts {
///     type Output = DeleteAllProductsResult;
///     const NAME: &'static str = "DeleteAllProducts";
///     const KIND: RequestKind = RequestKind::Command;
/// }
/// ```
pub trait Request: Send + Sync + 'static {
    /// The result type produced by this request's handler on success.
    type Output: Send + 'static;

    /// Stable identifying tag for this request type.
    const NAME: &'static str;

    /// Whether this request is a command or a query.
    const KIND: RequestKind;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ping;

    impl Request for Ping {
        type Output = u64;
        const NAME: &'static str = "Ping";
        const KIND: RequestKind = RequestKind::Query;
    }

    #[test]
    fn test_kind_tags() {
        assert_eq!(RequestKind::Command.as_str(), "command");
        assert_eq!(RequestKind::Query.as_str(), "query");
        assert_eq!(RequestKind::Query.to_string(), "query");
    }

    #[test]
    fn test_kind_serialization() {
        let json = serde_json::to_string(&RequestKind::Command).expect("serialization should work");
        assert_eq!(json, "\"command\"");
    }

    #[test]
    fn test_request_associations() {
        assert_eq!(Ping::NAME, "Ping");
        assert_eq!(Ping::KIND, RequestKind::Query);
    }
}
