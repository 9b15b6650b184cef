//! Validation error types for the command protocol.

use thiserror::Error;

/// Validation failures returned to the caller as data.
///
/// The rendered messages are the protocol: external callers pattern-match on
/// the exact strings in the `{"error": ...}` reply, so they must not change.
#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The command string matched no known family.
    #[error("Invalid event {0}")]
    UnknownEvent(String),

    /// The first argument was missing or not a string.
    #[error("Missing target player id")]
    MissingPlayerId,

    /// `add` was given a non-numeric operand.
    #[error("Must add a number to a number field")]
    AddOperandNotNumber,

    /// `add` targeted an existing field that is not a number.
    #[error("Cannot add to a field that is not a number")]
    AddTargetNotNumber,

    /// `push` targeted an existing field that is not a list.
    ///
    /// The message text matches [`CommandError::AddTargetNotNumber`] even
    /// though the condition is about lists. Callers of the wire protocol this
    /// crate replaces match on that exact string, so it is kept verbatim.
    #[error("Cannot add to a field that is not a number")]
    PushTargetNotList,

    /// `delete` targeted a top-level field present in the default record.
    #[error("Cannot delete a base field")]
    DeleteBaseField,

    /// `update` was given a non-mapping operand.
    #[error("Argument to `update` must be a map")]
    UpdateOperandNotMap,

    /// `format` was given a non-numeric operand.
    #[error("Argument to `format` must be a number")]
    FormatOperandNotNumber,

    /// `round` was given a non-numeric operand.
    #[error("Argument to `round` must be a number")]
    RoundOperandNotNumber,
}
