//! In-memory backend implementation.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::backend::{Backend, BackendError};
use crate::doc::Doc;
use crate::Result;

/// A simple in-memory backend using a `HashMap` for storage.
///
/// Suitable for testing, development, or scenarios where persistence is
/// handled externally by snapshotting the whole map. Records are cloned on
/// read so callers can mutate them freely before writing back.
#[derive(Debug, Default)]
pub struct InMemory {
    /// Records keyed by storage key, behind a read-write lock for concurrent
    /// access
    records: RwLock<HashMap<String, Doc>>,
}

impl InMemory {
    /// Creates a new empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().map(|map| map.len()).unwrap_or(0)
    }

    /// Returns true if no records are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl Backend for InMemory {
    async fn get(&self, key: &str) -> Result<Option<Doc>> {
        let records = self
            .records
            .read()
            .map_err(|_| BackendError::LockPoisoned { operation: "get" })?;
        Ok(records.get(key).cloned())
    }

    async fn set(&self, key: &str, record: Doc) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| BackendError::LockPoisoned { operation: "set" })?;
        records.insert(key.to_string(), record);
        Ok(())
    }
}
