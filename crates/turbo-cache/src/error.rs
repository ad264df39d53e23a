//! Cache error types.

use thiserror::Error;

/// Errors that can occur when using the cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Filesystem failure in a file-backed store.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to serialize or deserialize a value.
    #[error("Serialization error: {0}")]
    SerializeError(#[from] serde_json::Error),

    /// The backing store rejected the operation.
    #[error("Store operation failed: {0}")]
    StoreError(String),

    /// Key cannot be used with this store.
    #[error("Invalid key: {0}")]
    InvalidKey(String),
}
