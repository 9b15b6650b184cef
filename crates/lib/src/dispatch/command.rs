//! The command-string grammar.
//!
//! A command is a family keyword, optionally followed by `.` and a dotted
//! path: `get`, `currency`, `get.stats.wins`, `add.currency`, `push.inventory`,
//! `delete.stats`, `update`, `format`, `round`. Parsing produces a tagged
//! [`Command`] so the dispatcher can match exhaustively instead of threading
//! string prefixes through every handler.

use crate::dispatch::errors::CommandError;
use crate::doc::PathBuf;

/// A parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Return the player's entire record
    Get,
    /// Return the player's formatted currency
    Currency,
    /// Return the value at a path in the player's record
    GetPath(PathBuf),
    /// Shallow-merge the operand mapping into the player's record
    Update,
    /// Set the field at a path to the operand
    Set(PathBuf),
    /// Add the numeric operand to the field at a path
    Add(PathBuf),
    /// Append the operand to the list at a path
    Push(PathBuf),
    /// Remove the field at a path
    Delete(PathBuf),
    /// Format the numeric operand as currency
    Format,
    /// Round the numeric operand to the configured precision
    Round,
}

impl Command {
    /// Parses a raw command string.
    ///
    /// Family keywords match exactly; path families require a non-empty path
    /// after normalization, so `set.` or `get...` are as invalid as a typo.
    ///
    /// # Errors
    /// Returns [`CommandError::UnknownEvent`] carrying the raw string for
    /// anything outside the grammar.
    pub fn parse(event: &str) -> Result<Self, CommandError> {
        match event {
            "get" => return Ok(Command::Get),
            "currency" => return Ok(Command::Currency),
            "update" => return Ok(Command::Update),
            "format" => return Ok(Command::Format),
            "round" => return Ok(Command::Round),
            _ => {}
        }

        let (family, suffix) = match event.split_once('.') {
            Some(parts) => parts,
            None => return Err(CommandError::UnknownEvent(event.to_string())),
        };

        let path = PathBuf::normalize(suffix);
        if path.is_empty() {
            return Err(CommandError::UnknownEvent(event.to_string()));
        }

        match family {
            "get" => Ok(Command::GetPath(path)),
            "set" => Ok(Command::Set(path)),
            "add" => Ok(Command::Add(path)),
            "push" => Ok(Command::Push(path)),
            "delete" => Ok(Command::Delete(path)),
            _ => Err(CommandError::UnknownEvent(event.to_string())),
        }
    }

    /// The family keyword, for logging.
    pub fn family(&self) -> &'static str {
        match self {
            Command::Get | Command::GetPath(_) => "get",
            Command::Currency => "currency",
            Command::Update => "update",
            Command::Set(_) => "set",
            Command::Add(_) => "add",
            Command::Push(_) => "push",
            Command::Delete(_) => "delete",
            Command::Format => "format",
            Command::Round => "round",
        }
    }
}
