//! Cart state container with write-behind persistence.

use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use turbo_cache::{Cache, CacheError, KvStore};

use crate::collection::CartCollection;
use crate::config::CartConfig;
use crate::ids::ProductId;
use crate::item::NewLineItem;
use crate::writer::{resolve_load, PendingLoad, SnapshotWriter};

/// Shared cart state.
///
/// Mutations apply synchronously and are visible to readers at once; the
/// resulting snapshot is written to the backing store in the background.
/// The persisted cart is loaded once, when the store is mounted, and
/// replaces whatever is in memory at that point.
#[derive(Debug)]
pub struct CartStore {
    state: watch::Sender<CartCollection>,
    loaded: watch::Sender<bool>,
    pending_load: Mutex<Option<PendingLoad>>,
    storage_key: String,
    writer: SnapshotWriter,
}

impl CartStore {
    /// Create a store and start loading the persisted cart.
    ///
    /// Returns immediately with an empty cart. Must be called within a Tokio
    /// runtime.
    pub fn mount(store: Arc<dyn KvStore>, config: &CartConfig) -> Arc<Self> {
        let cart = Arc::new(Self::new(store, config.storage_key.clone()));

        let loader = Arc::clone(&cart);
        tokio::spawn(async move { loader.initialize().await });

        cart
    }

    fn new(store: Arc<dyn KvStore>, storage_key: String) -> Self {
        let (writer, pending_load) = SnapshotWriter::spawn(Cache::new(store), storage_key.clone());
        Self {
            state: watch::Sender::new(CartCollection::new()),
            loaded: watch::Sender::new(false),
            pending_load: Mutex::new(Some(pending_load)),
            storage_key,
            writer,
        }
    }

    /// Load the persisted cart, replacing the in-memory one.
    ///
    /// Runs at most once per store. Missing, unreadable, or malformed
    /// snapshots leave the cart as it is.
    pub(crate) async fn initialize(&self) {
        let pending = self.pending_load.lock().ok().and_then(|mut p| p.take());
        let Some(pending) = pending else {
            tracing::debug!("cart already initialized");
            return;
        };

        match resolve_load(pending).await {
            Ok(Some(cart)) => {
                tracing::info!(items = cart.len(), "loaded persisted cart");
                self.state.send_replace(cart);
            }
            Err(CacheError::SerializeError(e)) => {
                tracing::warn!(key = %self.storage_key, error = %e, "discarding malformed cart snapshot");
            }
            Ok(None) => tracing::debug!(key = %self.storage_key, "no persisted cart"),
            Err(e) => {
                tracing::warn!(key = %self.storage_key, error = %e, "failed to load cart; starting empty");
            }
        }

        self.loaded.send_replace(true);
    }

    /// Wait until the initial load has finished.
    pub async fn ready(&self) {
        let mut rx = self.loaded.subscribe();
        let _ = rx.wait_for(|done| *done).await;
    }

    /// Whether the initial load has finished.
    pub fn is_ready(&self) -> bool {
        *self.loaded.borrow()
    }

    /// Snapshot of the current cart.
    pub fn products(&self) -> CartCollection {
        self.state.borrow().clone()
    }

    /// Observe cart changes.
    pub fn subscribe(&self) -> watch::Receiver<CartCollection> {
        self.state.subscribe()
    }

    /// Add a product, or one more unit of it if already in the cart.
    pub fn add_to_cart(&self, item: NewLineItem) {
        self.state.send_modify(|cart| {
            let id = item.id.clone();
            let quantity = cart.add(item);
            tracing::debug!(product_id = %id, quantity, items = cart.len(), "added to cart");
            self.persist(cart);
        });
    }

    /// Add one unit of a product already in the cart.
    ///
    /// Returns `false` and changes nothing if the product is not in the cart.
    pub fn increment(&self, id: &ProductId) -> bool {
        self.state.send_if_modified(|cart| match cart.increment(id) {
            Some(quantity) => {
                tracing::debug!(product_id = %id, quantity, "incremented");
                self.persist(cart);
                true
            }
            None => {
                tracing::debug!(product_id = %id, "increment ignored; not in cart");
                false
            }
        })
    }

    /// Remove one unit of a product, dropping it from the cart at zero.
    ///
    /// Returns `false` and changes nothing if the product is not in the cart.
    pub fn decrement(&self, id: &ProductId) -> bool {
        self.state.send_if_modified(|cart| match cart.decrement(id) {
            Some(quantity) => {
                tracing::debug!(product_id = %id, quantity, items = cart.len(), "decremented");
                self.persist(cart);
                true
            }
            None => {
                tracing::debug!(product_id = %id, "decrement ignored; not in cart");
                false
            }
        })
    }

    /// Wait until every snapshot written so far has reached the store.
    ///
    /// Mutations never need this; it exists for shutdown and diagnostics.
    pub async fn flush(&self) {
        self.writer.flush().await;
    }

    /// Key the cart is persisted under.
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    // Called with the state lock held, so snapshots are queued in mutation order.
    fn persist(&self, cart: &CartCollection) {
        match cart.to_snapshot() {
            Ok(snapshot) => self.writer.enqueue(snapshot),
            Err(e) => tracing::warn!(error = %e, "failed to encode cart snapshot"),
        }
    }
}
