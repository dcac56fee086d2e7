//! # Domain Types
//!
//! Core domain types used throughout Storefront.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    CartItem     │   │     Order       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (u64)       │   │  product (flat) │   │  id (ORD-...)   │       │
//! │  │  title          │   │  quantity       │   │  date           │       │
//! │  │  price (Money)  │   │                 │   │  items snapshot │       │
//! │  │  rating         │   │                 │   │  totalAmount    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `Product` is immutable once fetched; the remote API is its source of
//! truth. `CartItem` flattens the product fields so the persisted JSON keeps
//! the original `{...product, quantity}` shape.

use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Rating
// =============================================================================

/// Aggregate customer rating attached to a product by the remote API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    /// Average rating, 0.0 - 5.0.
    pub rate: f64,

    /// Number of ratings contributing to the average.
    pub count: u64,
}

// =============================================================================
// Product
// =============================================================================

/// A product from the remote catalog.
///
/// Field names match the remote API wire format exactly; the whole struct
/// is stored verbatim inside cache envelopes and cart items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique, stable identifier assigned by the remote API.
    pub id: u64,

    /// Display title.
    pub title: String,

    /// Unit price. Decimal on the wire, integer cents in memory.
    pub price: Money,

    /// Long-form description.
    pub description: String,

    /// Category name (one of the strings returned by the categories listing).
    pub category: String,

    /// Product image URL.
    pub image: String,

    /// Aggregate customer rating.
    pub rating: Rating,
}

// =============================================================================
// Cart Item
// =============================================================================

/// A product in the cart together with its quantity.
///
/// Serializes flat: the product fields and `quantity` live at the same JSON
/// level, so persisted carts read as `{id, title, price, ..., quantity}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// The product being purchased. All fields are frozen copies of what the
    /// catalog returned at add time.
    #[serde(flatten)]
    pub product: Product,

    /// Quantity in the cart. The store applies caller-supplied values
    /// verbatim; see [`crate::cart::Cart::update_quantity`].
    pub quantity: i64,
}

impl CartItem {
    /// Creates a cart item for a single unit of `product`.
    pub fn new(product: Product) -> Self {
        CartItem {
            product,
            quantity: 1,
        }
    }

    /// The product id this line refers to.
    #[inline]
    pub fn id(&self) -> u64 {
        self.product.id
    }

    /// Line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.product.price * self.quantity
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product_json() -> &'static str {
        r#"{
            "id": 1,
            "title": "Fjallraven Backpack",
            "price": 109.95,
            "description": "Fits 15 inch laptops",
            "category": "men's clothing",
            "image": "https://example.test/1.jpg",
            "rating": { "rate": 3.9, "count": 120 }
        }"#
    }

    #[test]
    fn test_product_deserializes_from_api_shape() {
        let product: Product = serde_json::from_str(sample_product_json()).unwrap();

        assert_eq!(product.id, 1);
        assert_eq!(product.price.cents(), 10995);
        assert_eq!(product.rating.count, 120);
    }

    #[test]
    fn test_cart_item_serializes_flat() {
        let product: Product = serde_json::from_str(sample_product_json()).unwrap();
        let item = CartItem::new(product);

        let value = serde_json::to_value(&item).unwrap();
        // Product fields and quantity share one JSON level.
        assert_eq!(value["id"], 1);
        assert_eq!(value["title"], "Fjallraven Backpack");
        assert_eq!(value["quantity"], 1);
        assert!(value.get("product").is_none());
    }

    #[test]
    fn test_cart_item_line_total() {
        let product: Product = serde_json::from_str(sample_product_json()).unwrap();
        let mut item = CartItem::new(product);
        item.quantity = 3;

        assert_eq!(item.line_total().cents(), 32985);
    }
}
