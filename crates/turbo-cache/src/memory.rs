//! In-process store for tests and ephemeral carts.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::kv::{CacheResult, KvStore};
use crate::CacheError;

/// In-memory Key-Value store.
///
/// Nothing survives the process; useful for tests and for sessions that
/// should not touch disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with a single entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        if let Ok(mut data) = store.data.lock() {
            data.insert(key.into(), value.into());
        }
        store
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.data.lock().map(|d| d.len()).unwrap_or(0)
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn poisoned() -> CacheError {
        CacheError::StoreError("memory store lock poisoned".to_string())
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let data = self.data.lock().map_err(|_| Self::poisoned())?;
        Ok(data.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> CacheResult<()> {
        let mut data = self.data.lock().map_err(|_| Self::poisoned())?;
        data.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
