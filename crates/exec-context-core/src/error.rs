//! Error types for scope operations

use thiserror::Error;

pub use crate::assert::AssertionError;

/// Errors raised by scope operations
#[derive(Error, Debug)]
pub enum ScopeError {
    /// A lifecycle precondition was violated
    #[error("Assertion failed: {0}")]
    Assertion(#[from] AssertionError),

    /// A stored value could not be decoded into the requested type
    #[error("Failed to decode value for key '{key}': {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ScopeError {
    /// Check if this error reports a lifecycle violation
    pub fn is_assertion(&self) -> bool {
        matches!(self, ScopeError::Assertion(_))
    }
}

/// Result type alias for scope operations
pub type Result<T> = std::result::Result<T, ScopeError>;
