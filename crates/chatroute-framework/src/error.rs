//! Error types for route building.

use thiserror::Error;

/// Errors recorded while configuring a route.
///
/// Route configuration defers errors: the first one is stored on the route,
/// later configuration calls become no-ops, and the error is reported by
/// [`Route::finish`](crate::Route::finish) or
/// [`Router::validate`](crate::Router::validate).
#[derive(Debug, Clone, Error)]
pub enum RouteError {
    /// A `hear` pattern failed to compile.
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The pattern as supplied.
        pattern: String,
        /// The compile error.
        #[source]
        source: regex::Error,
    },

    /// `of_types` was called with no message types.
    #[error("types matcher requires at least one message type")]
    EmptyTypeSet,

    /// A route has neither a handler nor a subrouter.
    #[error("route '{route}' has no handler and no subrouter")]
    MissingHandler {
        /// Name of the offending route, or `unnamed`.
        route: String,
    },
}

/// Result type for route building.
pub type RouteResult<T> = Result<T, RouteError>;
