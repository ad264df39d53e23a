//! Key-Value store abstraction with automatic serialization.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::CacheError;

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Durable string Key-Value store backend.
///
/// Implementations must overwrite any previous value on `set` and return
/// `None` from `get` for keys that were never written.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Get the raw payload stored under `key`.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous payload.
    async fn set(&self, key: &str, value: &str) -> CacheResult<()>;
}

/// Type-safe cache over any [`KvStore`].
///
/// Decodes JSON payloads into any `DeserializeOwned` type on read. Writes
/// take payloads that are already encoded.
///
/// # Example
///
/// ```rust,ignore
/// let cache = Cache::new(Arc::new(MemoryStore::new()));
/// cache.set_raw("cart:products", &serde_json::to_string(&items)?).await?;
/// let items: Option<Vec<LineItem>> = cache.get("cart:products").await?;
/// ```
#[derive(Clone)]
pub struct Cache {
    store: Arc<dyn KvStore>,
}

impl Cache {
    /// Wrap a store backend.
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist, and an error if the stored
    /// payload does not decode as `T`.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> CacheResult<Option<T>> {
        match self.store.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Store an already-encoded payload.
    pub async fn set_raw(&self, key: &str, raw: &str) -> CacheResult<()> {
        self.store.set(key, raw).await
    }
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache").finish_non_exhaustive()
    }
}

/// Helper to build cache keys with namespacing.
///
/// # Example
///
/// ```rust
/// let key = turbo_cache::cache_key!("@goMarketPlace", "products");
/// assert_eq!(key, "@goMarketPlace:products");
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Entry {
        id: String,
        quantity: u32,
    }

    #[test]
    fn test_cache_key_joins_parts() {
        assert_eq!(cache_key!("cart", "user123"), "cart:user123");
        assert_eq!(cache_key!("a", "b", 3), "a:b:3");
    }

    #[tokio::test]
    async fn test_typed_get() {
        let cache = Cache::new(Arc::new(MemoryStore::new()));
        let entries = vec![Entry {
            id: "p1".to_string(),
            quantity: 2,
        }];

        cache
            .set_raw("k", &serde_json::to_string(&entries).unwrap())
            .await
            .unwrap();
        let loaded: Option<Vec<Entry>> = cache.get("k").await.unwrap();

        assert_eq!(loaded, Some(entries));
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let cache = Cache::new(Arc::new(MemoryStore::new()));
        let loaded: Option<Vec<Entry>> = cache.get("missing").await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_get_malformed_payload() {
        let cache = Cache::new(Arc::new(MemoryStore::new()));
        cache.set_raw("k", "{not json").await.unwrap();

        let result = cache.get::<Vec<Entry>>("k").await;
        assert!(matches!(result, Err(CacheError::SerializeError(_))));
    }
}
