//! Key-value persistence contract.
//!
//! The store's only boundary with the outside world. Values are opaque
//! serialized blobs; the store decides what goes in them.

use std::collections::BTreeMap;

use anyhow::Result;

pub trait KeyValue {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
    /// All present keys, used for bulk cleanup of dated review records.
    fn list_keys(&self) -> Result<Vec<String>>;
}

/// In-memory implementation for tests and ephemeral sessions.
#[derive(Debug, Default, Clone)]
pub struct MemoryKv {
    entries: BTreeMap<String, String>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValue for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn list_keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }
}
