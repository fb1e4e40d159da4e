//! Error types for routing.

use thiserror::Error;

/// Router-specific errors.
///
/// Only configuration and handler-resolution problems are errors. A request
/// that matches no registration is a routing outcome and ends in the
/// not-found fallback instead.
#[derive(Debug, Error)]
pub enum RouterError {
    /// The request context is missing its URI or method.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Invalid path pattern.
    #[error("invalid path pattern: {0}")]
    InvalidPattern(String),

    /// A controller does not expose the requested action.
    #[error("invalid handler: {controller} has no callable action `{action}`")]
    InvalidHandler {
        /// Controller type name.
        controller: &'static str,
        /// Requested action name.
        action: String,
    },
}

/// Result type alias for router operations.
pub type Result<T> = std::result::Result<T, RouterError>;
