//! Structured error types for the phipsi workspace.

use thiserror::Error;

/// Unified error type for parsing, fetching, and rendering.
#[derive(Debug, Error)]
pub enum PhipsiError {
    /// Parse error (malformed structure text or upstream payload)
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid input (bad identifiers, out-of-range values)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Remote resource exists but could not be retrieved
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Remote resource does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),
}

impl PhipsiError {
    /// Whether this error means the requested resource is missing or could
    /// not be retrieved from upstream.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            PhipsiError::Fetch(_) | PhipsiError::NotFound(_) | PhipsiError::InvalidInput(_)
        )
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, PhipsiError>;
