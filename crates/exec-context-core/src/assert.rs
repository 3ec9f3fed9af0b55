//! Runtime assertions for lifecycle invariants.
//!
//! These are for runtime checks, not tests: a failed assertion is returned as
//! an [`AssertionError`] value so callers can propagate it with `?`.

use std::fmt::Debug;
use thiserror::Error;

/// Raised when a runtime invariant does not hold.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct AssertionError {
    message: String,
}

impl AssertionError {
    /// Create an assertion error with the given message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The failure message
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Fail unless `actual == expected`.
pub fn equal<T>(actual: &T, expected: &T, message: Option<&str>) -> Result<(), AssertionError>
where
    T: PartialEq + Debug + ?Sized,
{
    if actual != expected {
        return Err(AssertionError::new(message.map(str::to_string).unwrap_or_else(
            || format!("{:?} is not equal to {:?}", actual, expected),
        )));
    }
    Ok(())
}

/// Fail if `actual == expected`.
pub fn not_equal<T>(actual: &T, expected: &T, message: Option<&str>) -> Result<(), AssertionError>
where
    T: PartialEq + Debug + ?Sized,
{
    if actual == expected {
        return Err(AssertionError::new(message.map(str::to_string).unwrap_or_else(
            || format!("{:?} is equal to {:?}", actual, expected),
        )));
    }
    Ok(())
}
