//! Typed errors for input validation.

use thiserror::Error;

/// Errors raised while validating a sprint file at the input boundary.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("issue {key}: {field} must be a finite, non-negative number (got {value})")]
    InvalidPoints {
        key: String,
        field: &'static str,
        value: f64,
    },

    #[error("issue at position {index} has an empty key")]
    EmptyKey { index: usize },
}
