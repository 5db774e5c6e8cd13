//! # Error Hierarchy
//!
//! Structured error types for the domain layer, built with `thiserror`.

use thiserror::Error;

/// Business input failed a validation rule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A text field is shorter or longer than permitted.
    #[error("{field} must be between {min} and {max} characters (got {actual})")]
    Length {
        field: &'static str,
        min: usize,
        max: usize,
        actual: usize,
    },

    /// A field contains characters or sequences that are not allowed.
    #[error("invalid characters in {0}")]
    ForbiddenContent(&'static str),

    /// A field does not match its required format.
    #[error("{field} has an invalid format: {reason}")]
    Format { field: &'static str, reason: String },

    /// An email address is not well formed.
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
}

/// Errors during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// JSON serialization failed during canonicalization.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
