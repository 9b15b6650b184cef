//!
//! Coffer: a per-player currency and data store addressed by dotted paths.
//!
//! The crate is the core of a currency plugin: the hosting process hands it an
//! abstract key-value store and a stream of commands, and it answers each one
//! with either a value or an error-as-data reply.
//!
//! ## Core Concepts
//!
//! * **Documents (`doc::Doc`)**: The per-player record, an arbitrarily nested
//!   mapping of string keys to [`doc::Value`]s.
//! * **Paths (`doc::Path` / `doc::PathBuf`)**: Dotted paths like
//!   `inventory.sword.count` addressing nested fields, with auto-vivification
//!   of intermediate mappings on mutation.
//! * **Backends (`backend::Backend`)**: The pluggable asynchronous storage the
//!   host supplies. [`backend::InMemory`] is provided for tests and development.
//! * **Ledger (`ledger::Ledger`)**: The record store adapter. Maps player ids to
//!   storage keys, supplies the default record, and applies the currency
//!   rounding/formatting contract on every persist.
//! * **Dispatcher (`dispatch::Dispatcher`)**: Parses command strings like
//!   `add.currency` or `push.inventory` into [`dispatch::Command`]s and executes
//!   them against the ledger.

pub mod backend;
pub mod dispatch;
pub mod doc;
pub mod ledger;

pub use dispatch::{Command, Dispatcher, Reply};
pub use doc::{Doc, Path, PathBuf, Value};
pub use ledger::{Config, Ledger};

/// Result type used throughout the Coffer library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Coffer library.
///
/// Validation failures of individual commands are *not* part of this type.
/// Those are data, carried inside a [`dispatch::Reply`]. This enum covers the
/// infrastructure failures that abort a command outright.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured storage errors from the backend module
    #[error(transparent)]
    Backend(backend::BackendError),

    /// Structured document errors from the doc module
    #[error(transparent)]
    Doc(doc::DocError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Backend(_) => "backend",
            Error::Doc(_) => "doc",
            Error::Serialize(_) => "serialize",
        }
    }
}

impl From<backend::BackendError> for Error {
    fn from(err: backend::BackendError) -> Self {
        Error::Backend(err)
    }
}

impl From<doc::DocError> for Error {
    fn from(err: doc::DocError) -> Self {
        Error::Doc(err)
    }
}
