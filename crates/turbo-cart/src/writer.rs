//! Background snapshot I/O.
//!
//! One task owns all reads and writes of the cart key. Mutations hand it
//! snapshots over an unbounded channel, so writes land in the order they
//! were issued and callers never wait on I/O. The initial load is the first
//! command in the queue, so it always sees storage as it was before this
//! session wrote anything.

use tokio::sync::{mpsc, oneshot};
use turbo_cache::{Cache, CacheError, CacheResult};

use crate::collection::CartCollection;

type LoadResult = CacheResult<Option<CartCollection>>;

/// Result of the initial load, delivered once by the writer task.
pub(crate) type PendingLoad = oneshot::Receiver<LoadResult>;

enum WriteCommand {
    Load(oneshot::Sender<LoadResult>),
    Persist(String),
    Flush(oneshot::Sender<()>),
}

/// Fire-and-forget persistence of cart snapshots under one key.
///
/// Dropping the writer closes the queue; snapshots already enqueued are
/// still written.
#[derive(Debug)]
pub(crate) struct SnapshotWriter {
    tx: mpsc::UnboundedSender<WriteCommand>,
}

impl SnapshotWriter {
    /// Spawn the writer task. Must be called within a Tokio runtime.
    pub(crate) fn spawn(cache: Cache, key: String) -> (Self, PendingLoad) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (load_tx, load_rx) = oneshot::channel();

        // Receiver is alive, so this cannot fail.
        let _ = tx.send(WriteCommand::Load(load_tx));
        tokio::spawn(run(cache, key, rx));

        (Self { tx }, load_rx)
    }

    /// Queue a snapshot for writing. Never blocks.
    pub(crate) fn enqueue(&self, snapshot: String) {
        if self.tx.send(WriteCommand::Persist(snapshot)).is_err() {
            tracing::warn!("cart writer stopped; snapshot dropped");
        }
    }

    /// Wait until every snapshot queued before this call has been attempted.
    pub(crate) async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        if self.tx.send(WriteCommand::Flush(done)).is_ok() {
            let _ = wait.await;
        }
    }
}

/// Await a pending load, folding a vanished writer into a store error.
///
/// A snapshot that does not decode comes back as
/// [`CacheError::SerializeError`].
pub(crate) async fn resolve_load(pending: PendingLoad) -> LoadResult {
    pending
        .await
        .unwrap_or_else(|_| Err(CacheError::StoreError("cart writer stopped".to_string())))
}

async fn run(cache: Cache, key: String, mut rx: mpsc::UnboundedReceiver<WriteCommand>) {
    while let Some(command) = rx.recv().await {
        match command {
            WriteCommand::Load(reply) => {
                let _ = reply.send(cache.get::<CartCollection>(&key).await);
            }
            WriteCommand::Persist(snapshot) => {
                if let Err(e) = cache.set_raw(&key, &snapshot).await {
                    tracing::warn!(key = %key, error = %e, "failed to persist cart snapshot");
                }
            }
            WriteCommand::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    tracing::debug!(key = %key, "cart writer finished");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use turbo_cache::{KvStore, MemoryStore};

    const ONE_ITEM: &str = r#"[{"id":"p1","title":"T","image_url":"u","price":1.0,"quantity":2}]"#;

    fn spawn(store: &Arc<MemoryStore>) -> (SnapshotWriter, PendingLoad) {
        SnapshotWriter::spawn(Cache::new(store.clone()), "k".to_string())
    }

    #[tokio::test]
    async fn test_last_enqueued_snapshot_wins() {
        let store = Arc::new(MemoryStore::new());
        let (writer, _load) = spawn(&store);

        for n in 0..50 {
            writer.enqueue(format!("[{n}]"));
        }
        writer.flush().await;

        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("[49]"));
    }

    #[tokio::test]
    async fn test_load_precedes_queued_writes() {
        let store = Arc::new(MemoryStore::with_entry("k", ONE_ITEM));
        let (writer, load) = spawn(&store);
        writer.enqueue("[]".to_string());

        let loaded = resolve_load(load).await.unwrap().unwrap();
        assert_eq!(loaded.item_count(), 2);
        writer.flush().await;
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_load_reports_malformed_snapshot() {
        let store = Arc::new(MemoryStore::with_entry("k", "[0]"));
        let (_writer, load) = spawn(&store);

        assert!(matches!(
            resolve_load(load).await,
            Err(CacheError::SerializeError(_))
        ));
    }

    #[tokio::test]
    async fn test_flush_without_writes() {
        let store = Arc::new(MemoryStore::new());
        let (writer, load) = spawn(&store);
        writer.flush().await;

        assert!(resolve_load(load).await.unwrap().is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_drop_drains_queue() {
        let store = Arc::new(MemoryStore::new());
        let (writer, _load) = spawn(&store);
        writer.enqueue("[1]".to_string());
        drop(writer);

        for _ in 0..100 {
            if store.get("k").await.unwrap().is_some() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("[1]"));
    }
}
