//! Async Key-Value persistence layer for TurboCommerce.
//!
//! Provides a small store abstraction ([`KvStore`]) with in-memory and
//! file-backed implementations, plus a [`Cache`] wrapper that decodes JSON
//! payloads.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use turbo_cache::{cache_key, Cache, FileStore};
//!
//! let store = FileStore::open("./data").await?;
//! let cache = Cache::new(Arc::new(store));
//!
//! let key = cache_key!("@goMarketPlace", "products");
//! cache.set_raw(&key, &serde_json::to_string(&items)?).await?;
//! let items: Option<Vec<LineItem>> = cache.get(&key).await?;
//! ```

mod error;
mod file;
mod kv;
mod memory;

pub use error::CacheError;
pub use file::FileStore;
pub use kv::{Cache, CacheResult, KvStore};
pub use memory::MemoryStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, CacheResult, FileStore, KvStore, MemoryStore};
}
