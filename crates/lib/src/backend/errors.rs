//! Storage error types for the Coffer backend.

use thiserror::Error;

/// Errors that can occur during backend storage operations.
///
/// These are infrastructure failures: a command that hits one aborts outright
/// rather than returning an error-as-data reply.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum BackendError {
    /// An in-process lock was poisoned by a panicking writer.
    #[error("Storage lock poisoned during {operation}")]
    LockPoisoned {
        /// The operation that observed the poisoned lock
        operation: &'static str,
    },

    /// The underlying store rejected or failed the call.
    #[error("Storage operation failed: {reason}")]
    StorageFailed { reason: String },
}
