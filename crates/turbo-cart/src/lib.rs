//! Persistent client-side shopping cart for TurboCommerce.
//!
//! Holds an ordered, id-unique list of line items in memory and keeps a JSON
//! snapshot of it in a Key-Value store so the cart survives restarts.
//!
//! - **Collection**: [`CartCollection`] with add / increment / decrement
//! - **Store**: [`CartStore`], synchronous mutations with write-behind persistence
//! - **Scope**: [`CartProvider`] and [`use_cart`] for reaching the cart without wiring
//!
//! # Example
//!
//! ```rust,ignore
//! use turbo_cart::prelude::*;
//!
//! let provider = CartProvider::from_config(&CartConfig::with_file_store("./data")).await?;
//! let cart = provider.handle();
//! cart.ready().await;
//!
//! cart.add_to_cart(NewLineItem::new("p1", "Mug", "https://img/mug.png", 12.5));
//! cart.increment(&ProductId::new("p1"));
//! assert_eq!(cart.products().item_count(), 2);
//! ```

pub mod collection;
pub mod config;
pub mod error;
pub mod ids;
pub mod item;
pub mod scope;
pub mod store;
mod writer;

pub use collection::CartCollection;
pub use config::{CartConfig, StoreConfig};
pub use error::{CartError, InvariantError};
pub use ids::ProductId;
pub use item::{LineItem, NewLineItem};
pub use scope::{use_cart, CartHandle, CartProvider};
pub use store::CartStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::collection::CartCollection;
    pub use crate::config::{CartConfig, StoreConfig};
    pub use crate::error::CartError;
    pub use crate::ids::ProductId;
    pub use crate::item::{LineItem, NewLineItem};
    pub use crate::scope::{use_cart, CartHandle, CartProvider};
    pub use crate::store::CartStore;
}
