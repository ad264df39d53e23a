//! Provider scope for reaching the cart without explicit wiring.
//!
//! A [`CartProvider`] owns one mounted [`CartStore`]. Code running inside
//! [`CartProvider::scope`] can call [`use_cart`] to get a handle; code
//! outside any scope gets [`CartError::OutsideScope`].
//!
//! The scope is a Tokio task-local, so tasks spawned from inside it do not
//! inherit it. Pass a [`CartHandle`] to them instead.

use std::future::Future;
use std::ops::Deref;
use std::sync::Arc;

use turbo_cache::KvStore;

use crate::config::CartConfig;
use crate::error::CartError;
use crate::store::CartStore;

tokio::task_local! {
    static CURRENT_CART: CartHandle;
}

/// Cheap, cloneable access to a mounted cart.
#[derive(Debug, Clone)]
pub struct CartHandle {
    store: Arc<CartStore>,
}

impl Deref for CartHandle {
    type Target = CartStore;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

/// Owner of the process-wide cart.
///
/// # Example
///
/// ```rust,ignore
/// let provider = CartProvider::from_config(&CartConfig::load("cart.toml")?).await?;
///
/// provider
///     .scope(async {
///         let cart = use_cart()?;
///         cart.add_to_cart(NewLineItem::new("p1", "Mug", "mug.png", 12.5));
///         Ok::<_, CartError>(())
///     })
///     .await?;
/// ```
#[derive(Debug)]
pub struct CartProvider {
    handle: CartHandle,
}

impl CartProvider {
    /// Mount a cart over `store`. Must be called within a Tokio runtime.
    pub fn mount(store: Arc<dyn KvStore>, config: &CartConfig) -> Self {
        Self {
            handle: CartHandle {
                store: CartStore::mount(store, config),
            },
        }
    }

    /// Open the configured backend and mount a cart over it.
    pub async fn from_config(config: &CartConfig) -> Result<Self, CartError> {
        let store = config.open_store().await?;
        Ok(Self::mount(store, config))
    }

    /// Handle for explicit dependency injection.
    pub fn handle(&self) -> CartHandle {
        self.handle.clone()
    }

    /// Run `f` with this cart reachable through [`use_cart`].
    pub async fn scope<F: Future>(&self, f: F) -> F::Output {
        CURRENT_CART.scope(self.handle(), f).await
    }

    /// Synchronous counterpart of [`CartProvider::scope`].
    pub fn sync_scope<R>(&self, f: impl FnOnce() -> R) -> R {
        CURRENT_CART.sync_scope(self.handle(), f)
    }
}

/// Get the cart of the enclosing [`CartProvider`] scope.
///
/// Fails with [`CartError::OutsideScope`] when no scope is active; that is
/// a wiring mistake in the caller and should not be ignored.
pub fn use_cart() -> Result<CartHandle, CartError> {
    CURRENT_CART.try_with(CartHandle::clone).map_err(|_| {
        tracing::error!("use_cart called outside of a CartProvider scope");
        CartError::OutsideScope
    })
}
