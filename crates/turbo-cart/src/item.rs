//! Line item types.

use serde::{Deserialize, Serialize};

use crate::ids::ProductId;

/// A product in the cart, with its quantity.
///
/// `title`, `image_url` and `price` are denormalized from the catalog at
/// first insertion and never updated afterwards.
///
/// Snapshot fields are `id`, `title`, `image_url`, `price` and `quantity`.
/// The image field is written as `image_url`, matching carts persisted by
/// earlier releases; `imageUrl` is accepted when reading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    /// Product identity; unique within a cart.
    pub id: ProductId,
    /// Display name.
    pub title: String,
    /// Product image location.
    #[serde(alias = "imageUrl")]
    pub image_url: String,
    /// Unit price as supplied by the catalog.
    pub price: f64,
    /// Always at least 1 while the item is in a cart.
    pub quantity: u32,
}

/// A catalog product about to be added to the cart.
///
/// Carries no quantity; the store owns that.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewLineItem {
    pub id: ProductId,
    pub title: String,
    #[serde(alias = "imageUrl")]
    pub image_url: String,
    pub price: f64,
}

impl NewLineItem {
    /// Create a new item.
    pub fn new(
        id: impl Into<ProductId>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            price,
        }
    }

    /// Turn into a stored line item with quantity 1.
    pub fn into_line_item(self) -> LineItem {
        LineItem {
            id: self.id,
            title: self.title,
            image_url: self.image_url,
            price: self.price,
            quantity: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_line_item_starts_at_one() {
        let item = NewLineItem::new("p1", "Mug", "https://img/mug.png", 12.5).into_line_item();
        assert_eq!(item.quantity, 1);
        assert_eq!(item.id.as_str(), "p1");
        assert_eq!(item.image_url, "https://img/mug.png");
    }

    #[test]
    fn test_wire_field_names() {
        let item = NewLineItem::new("p1", "T", "u", 9.99).into_line_item();
        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "id": "p1",
                "title": "T",
                "image_url": "u",
                "price": 9.99,
                "quantity": 1
            })
        );
    }

    #[test]
    fn test_accepts_camel_case_image_url() {
        let item: LineItem = serde_json::from_str(
            r#"{"id":"p1","title":"T","imageUrl":"u","price":9.99,"quantity":3}"#,
        )
        .unwrap();
        assert_eq!(item.image_url, "u");
        assert_eq!(item.quantity, 3);
    }

    #[test]
    fn test_rejects_negative_quantity() {
        let result: Result<LineItem, _> = serde_json::from_str(
            r#"{"id":"p1","title":"T","image_url":"u","price":1.0,"quantity":-1}"#,
        );
        assert!(result.is_err());
    }
}
