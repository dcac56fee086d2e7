//! # Cart
//!
//! The pure shopping-cart state machine.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Cart State Operations                             │
//! │                                                                         │
//! │  Caller Action              Operation             State Change          │
//! │  ─────────────              ─────────             ────────────          │
//! │                                                                         │
//! │  Pick product ────────────► add() ──────────────► qty += 1 or append   │
//! │                                                                         │
//! │  Change quantity ─────────► update_quantity() ──► items[i].qty = n     │
//! │                                                                         │
//! │  Remove line ─────────────► remove() ───────────► items.retain(...)    │
//! │                                                                         │
//! │  Checkout / reset ────────► clear() ────────────► items.clear()        │
//! │                                                                         │
//! │  Totals ──────────────────► total(), total_quantity()  (read only)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Items are unique by product id (adding the same product increments its
//!   quantity in place).
//! - Insertion order is first-add order; updates keep an item's position.
//! - Totals are computed on demand from the item list, never cached.
//!
//! Persistence lives in `storefront-db`; this type only transitions state.

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{CartItem, Product};

/// The shopping cart: an ordered sequence of [`CartItem`]s.
///
/// Serializes transparently as a JSON array of items, which is the persisted
/// shape under the `cart-storage` key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Adds one unit of `product` to the cart.
    ///
    /// If an item with the same product id already exists its quantity is
    /// incremented by 1 and every other field is left untouched; otherwise a
    /// new item with quantity 1 is appended.
    pub fn add(&mut self, product: &Product) {
        if let Some(item) = self.items.iter_mut().find(|i| i.id() == product.id) {
            item.quantity += 1;
            return;
        }

        self.items.push(CartItem::new(product.clone()));
    }

    /// Removes the item with the given product id. No-op if absent.
    pub fn remove(&mut self, product_id: u64) {
        self.items.retain(|i| i.id() != product_id);
    }

    /// Sets the quantity of the item with the given product id. No-op if the
    /// item is absent.
    ///
    /// The value is applied verbatim: callers are expected to pass
    /// `quantity >= 1`, but the cart does not reject zero or negative values.
    pub fn update_quantity(&mut self, product_id: u64, quantity: i64) {
        if let Some(item) = self.items.iter_mut().find(|i| i.id() == product_id) {
            item.quantity = quantity;
        }
    }

    /// Removes all items.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Cart total: Σ(price × quantity), in exact cents.
    pub fn total(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Total quantity across all items.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Number of distinct items (lines) in the cart.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Read-only view of the items in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
