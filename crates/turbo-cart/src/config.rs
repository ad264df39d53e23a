//! Cart configuration.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use turbo_cache::{cache_key, FileStore, KvStore, MemoryStore};

use crate::error::CartError;

/// Where cart snapshots are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StoreConfig {
    /// Process memory; nothing survives a restart.
    #[default]
    Memory,
    /// One file per key under `dir`.
    File { dir: PathBuf },
}

/// Cart configuration file.
///
/// ```toml
/// storage_key = "@goMarketPlace:products"
///
/// [store]
/// kind = "file"
/// dir = "./data"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartConfig {
    /// Key the cart snapshot is stored under.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Persistence backend.
    #[serde(default)]
    pub store: StoreConfig,
}

fn default_storage_key() -> String {
    cache_key!("@goMarketPlace", "products")
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            store: StoreConfig::default(),
        }
    }
}

impl CartConfig {
    /// Config with a file-backed store under `dir`.
    pub fn with_file_store(dir: impl Into<PathBuf>) -> Self {
        Self {
            store: StoreConfig::File { dir: dir.into() },
            ..Self::default()
        }
    }

    /// Load config from a `.toml` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Open the configured persistence backend.
    pub async fn open_store(&self) -> Result<Arc<dyn KvStore>, CartError> {
        let store: Arc<dyn KvStore> = match &self.store {
            StoreConfig::Memory => Arc::new(MemoryStore::new()),
            StoreConfig::File { dir } => Arc::new(FileStore::open(dir).await?),
        };
        Ok(store)
    }
}
