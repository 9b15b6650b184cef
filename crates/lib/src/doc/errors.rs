//! Error types for document operations.

use thiserror::Error;

/// Structured error types for document navigation and mutation.
#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocError {
    /// A path with no components was used where a target field is required.
    #[error("Empty path is not a valid field address")]
    EmptyPath,

    /// A value had a different shape than the operation required.
    #[error("Type mismatch: expected {expected}, found {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },
}
