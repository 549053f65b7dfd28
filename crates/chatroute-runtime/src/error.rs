//! Runtime error types.

use thiserror::Error;

use crate::config::ConfigError;
use chatroute_framework::RouteError;

/// Errors that can occur while assembling a runtime.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Configuration could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The router tree holds a build error.
    #[error("Router rejected: {0}")]
    Route(#[from] RouteError),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
