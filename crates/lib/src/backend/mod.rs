//! Storage backends for player records.
//!
//! This module provides the core [`Backend`] trait and the built-in
//! [`InMemory`] implementation.
//!
//! The `Backend` trait is the boundary to the hosting process: a plain
//! asynchronous key-value store holding one [`Doc`] per storage key. The
//! library never serializes the record itself; how the backend persists a
//! `Doc` (JSON file, database row, host RPC) is its own concern.

use async_trait::async_trait;

use crate::Result;
use crate::doc::Doc;

mod errors;
mod in_memory;

pub use errors::BackendError;
pub use in_memory::InMemory;

/// Abstract asynchronous key-value store holding player records.
///
/// Implementations must be `Send + Sync` so one backend can serve concurrent
/// commands. No isolation is required between a `get` and a later `set` of the
/// same key. Callers performing read-modify-write cycles accept lost updates
/// unless the backend itself serializes per key.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Retrieves a record by storage key, or `None` if the key has never been
    /// written.
    async fn get(&self, key: &str) -> Result<Option<Doc>>;

    /// Stores a record under a storage key, overwriting any prior value.
    async fn set(&self, key: &str, record: Doc) -> Result<()>;
}
