//! In-memory key-value store

use std::collections::BTreeMap;
use std::sync::RwLock;

use super::{KeyValueStore, StorageError, StorageResult, StoreOp};

/// Key-value store that lives only as long as the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with entries
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Number of entries currently stored
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn apply(&self, ops: Vec<StoreOp>) -> StorageResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        for op in ops {
            op.apply_to(&mut entries);
        }
        Ok(())
    }

    fn update(
        &self,
        key: &str,
        f: &mut dyn FnMut(Option<String>) -> StorageResult<Option<String>>,
    ) -> StorageResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        match f(entries.get(key).cloned())? {
            Some(value) => entries.insert(key.to_string(), value),
            None => entries.remove(key),
        };
        Ok(())
    }
}
