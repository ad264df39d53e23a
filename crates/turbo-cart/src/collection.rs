//! Ordered, id-unique collection of line items.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{CartError, InvariantError};
use crate::ids::ProductId;
use crate::item::{LineItem, NewLineItem};

/// The cart contents.
///
/// Items keep insertion order. At most one item exists per [`ProductId`]
/// and every item has `quantity >= 1`; deserialization rejects payloads
/// that break either rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartCollection {
    #[serde(deserialize_with = "deserialize_checked")]
    items: Vec<LineItem>,
}

impl CartCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a product.
    ///
    /// An existing item gains one unit and keeps its stored title, image and
    /// price. A new item is appended with quantity 1. Returns the resulting
    /// quantity.
    ///
    /// JSON has no encoding for NaN or infinity, so a non-finite price is
    /// stored as `0.0`; otherwise the next snapshot would not decode.
    pub fn add(&mut self, mut item: NewLineItem) -> u32 {
        if let Some(existing) = self.items.iter_mut().find(|i| i.id == item.id) {
            existing.quantity = existing.quantity.saturating_add(1);
            return existing.quantity;
        }

        if !item.price.is_finite() {
            tracing::warn!(product_id = %item.id, price = item.price, "non-finite price stored as 0");
            item.price = 0.0;
        }

        self.items.push(item.into_line_item());
        1
    }

    /// Add one unit of an existing item.
    ///
    /// Returns the new quantity, or `None` (leaving the cart untouched) if
    /// the product is not in the cart.
    pub fn increment(&mut self, id: &ProductId) -> Option<u32> {
        let item = self.items.iter_mut().find(|i| &i.id == id)?;
        item.quantity = item.quantity.saturating_add(1);
        Some(item.quantity)
    }

    /// Remove one unit of an existing item.
    ///
    /// The item is dropped from the cart when it reaches zero. Returns the new
    /// quantity (`Some(0)` on removal), or `None` if the product is not in
    /// the cart.
    pub fn decrement(&mut self, id: &ProductId) -> Option<u32> {
        let index = self.items.iter().position(|i| &i.id == id)?;
        let quantity = self.items[index].quantity.saturating_sub(1);

        if quantity == 0 {
            self.items.remove(index);
        } else {
            self.items[index].quantity = quantity;
        }
        Some(quantity)
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Iterate over the items in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.items.iter()
    }

    /// Get an item by product ID.
    pub fn get(&self, id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|i| &i.id == id)
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total units across all items.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Encode as a persistence snapshot.
    pub fn to_snapshot(&self) -> Result<String, CartError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a persistence snapshot.
    pub fn from_snapshot(raw: &str) -> Result<Self, CartError> {
        Ok(serde_json::from_str(raw)?)
    }
}

impl TryFrom<Vec<LineItem>> for CartCollection {
    type Error = InvariantError;

    fn try_from(items: Vec<LineItem>) -> Result<Self, Self::Error> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if item.quantity == 0 {
                return Err(InvariantError::ZeroQuantity(item.id.clone()));
            }
            if !seen.insert(&item.id) {
                return Err(InvariantError::DuplicateId(item.id.clone()));
            }
        }
        Ok(Self { items })
    }
}

impl<'a> IntoIterator for &'a CartCollection {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

fn deserialize_checked<'de, D>(deserializer: D) -> Result<Vec<LineItem>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let items = Vec::<LineItem>::deserialize(deserializer)?;
    CartCollection::try_from(items)
        .map(|c| c.items)
        .map_err(serde::de::Error::custom)
}
