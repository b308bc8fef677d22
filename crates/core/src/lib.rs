//! Shared primitives for all Rust crates in Formcraft.

#![forbid(unsafe_code)]

/// Store-assigned identifiers.
pub mod ids;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use ids::{FormId, SubmissionId};

/// Result type used across Formcraft crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Field kind name is not one of the supported kinds.
    #[error("invalid field type: {0}")]
    InvalidFieldType(String),

    /// Requested field order is not a permutation of the current fields.
    #[error("reorder error: {0}")]
    Reorder(String),

    /// Encoded document could not be decoded.
    #[error("format error: {0}")]
    Format(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Write operation conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Remote store could not be reached or answered unexpectedly.
    #[error("transport error: {0}")]
    Transport(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}
