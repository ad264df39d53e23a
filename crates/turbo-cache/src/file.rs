//! File-backed store: one file per key under a directory.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use crate::kv::{CacheResult, KvStore};
use crate::CacheError;

/// Durable Key-Value store on the local filesystem.
///
/// Each key maps to `<dir>/<encoded key>.json`. Writes go to a temporary
/// sibling file first and are renamed into place, so a reader sees either
/// the previous payload or the new one, never a torn write.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    tmp_seq: AtomicU64,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub async fn open(dir: impl Into<PathBuf>) -> CacheResult<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        tracing::debug!(dir = %dir.display(), "opened file store");
        Ok(Self {
            dir,
            tmp_seq: AtomicU64::new(0),
        })
    }

    /// Root directory of the store.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> CacheResult<PathBuf> {
        if key.is_empty() {
            return Err(CacheError::InvalidKey("key must not be empty".to_string()));
        }
        Ok(self.dir.join(format!("{}.json", encode_key(key))))
    }
}

/// Encode a key into a portable file name.
///
/// ASCII alphanumerics, `-`, `_` and `.` pass through; every other byte
/// becomes `%XX`.
fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' | b'.' => {
                out.push(byte as char)
            }
            _ => {
                let _ = write!(out, "%{:02X}", byte);
            }
        }
    }
    out
}

#[async_trait]
impl KvStore for FileStore {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> CacheResult<()> {
        let path = self.path_for(key)?;
        let seq = self.tmp_seq.fetch_add(1, Ordering::Relaxed);
        let tmp = path.with_extension(format!("json.{seq}.tmp"));

        tokio::fs::write(&tmp, value).await?;
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_key() {
        assert_eq!(encode_key("plain-key_1.v2"), "plain-key_1.v2");
        assert_eq!(encode_key("@goMarketPlace:products"), "%40goMarketPlace%3Aproducts");
        assert_eq!(encode_key("../etc"), "..%2Fetc");
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();
        assert!(store.get("nothing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_then_get_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileStore::open(dir.path()).await.unwrap();
            store.set("@app:cart", r#"[{"id":"p1"}]"#).await.unwrap();
            store.set("@app:cart", r#"[{"id":"p2"}]"#).await.unwrap();
        }

        let reopened = FileStore::open(dir.path()).await.unwrap();
        assert_eq!(
            reopened.get("@app:cart").await.unwrap().as_deref(),
            Some(r#"[{"id":"p2"}]"#)
        );
    }

    #[tokio::test]
    async fn test_no_tmp_files_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();
        store.set("k", "v").await.unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["k.json".to_string()]);
    }

    #[tokio::test]
    async fn test_empty_key_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();
        assert!(matches!(
            store.set("", "v").await,
            Err(CacheError::InvalidKey(_))
        ));
    }

    #[tokio::test]
    async fn test_open_creates_nested_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = FileStore::open(&nested).await.unwrap();
        assert!(store.dir().is_dir());
    }
}
