//! # Cart Store
//!
//! The persisted shopping-cart service.
//!
//! ## Thread Safety
//! The cart is wrapped in a `Mutex` because mutations may be issued from
//! multiple UI triggers; each operation is one atomic state transition. The
//! guard is always released before the persistence write so no lock is held
//! across a suspension point.
//!
//! ## Persistence
//! Write-through under the `cart-storage` key. Storage failures are logged
//! and swallowed: persistence is a convenience here, not a correctness
//! requirement, and the in-memory cart stays authoritative for the session.
//! The consuming layer calls [`CartStore::hydrate`] once at startup, before
//! the first read, to restore the previous session's cart.

use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use storefront_core::{Cart, CartItem, Money, Product};

use crate::kv::KeyValueStore;

/// Persisted-store key for the cart.
pub const CART_STORAGE_KEY: &str = "cart-storage";

/// Stateful cart service: in-memory [`Cart`] plus optional durable backend.
///
/// Constructed without a backend, every operation works purely in memory
/// and persistence becomes a no-op.
pub struct CartStore {
    cart: Mutex<Cart>,
    backend: Option<Arc<dyn KeyValueStore>>,
}

impl CartStore {
    /// Creates an empty cart store over an optional storage backend.
    pub fn new(backend: Option<Arc<dyn KeyValueStore>>) -> Self {
        CartStore {
            cart: Mutex::new(Cart::new()),
            backend,
        }
    }

    /// Creates a cart store with no durable backend.
    pub fn detached() -> Self {
        CartStore::new(None)
    }

    /// Restores the cart persisted by a previous session, if any.
    ///
    /// Absent or unparseable state leaves the cart empty; both cases are
    /// logged, neither is an error.
    pub async fn hydrate(&self) {
        let Some(backend) = &self.backend else {
            return;
        };

        let raw = match backend.get(CART_STORAGE_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No persisted cart found");
                return;
            }
            Err(error) => {
                warn!(%error, "Failed to read persisted cart");
                return;
            }
        };

        match serde_json::from_str::<Cart>(&raw) {
            Ok(stored) => {
                let mut cart = self.cart.lock().expect("cart mutex poisoned");
                *cart = stored;
                debug!(items = cart.len(), "Cart rehydrated");
            }
            Err(error) => {
                warn!(%error, "Persisted cart is malformed, starting empty");
            }
        }
    }

    /// Adds one unit of `product` (incrementing quantity if already present).
    pub async fn add_to_cart(&self, product: &Product) {
        let snapshot = {
            let mut cart = self.cart.lock().expect("cart mutex poisoned");
            cart.add(product);
            cart.clone()
        };
        self.persist(&snapshot).await;
    }

    /// Removes the item with the given product id. No-op if absent.
    pub async fn remove_from_cart(&self, product_id: u64) {
        let snapshot = {
            let mut cart = self.cart.lock().expect("cart mutex poisoned");
            cart.remove(product_id);
            cart.clone()
        };
        self.persist(&snapshot).await;
    }

    /// Sets the quantity of the item with the given product id, verbatim.
    pub async fn update_quantity(&self, product_id: u64, quantity: i64) {
        let snapshot = {
            let mut cart = self.cart.lock().expect("cart mutex poisoned");
            cart.update_quantity(product_id, quantity);
            cart.clone()
        };
        self.persist(&snapshot).await;
    }

    /// Empties the cart (e.g. after a successful checkout).
    pub async fn clear_cart(&self) {
        let snapshot = {
            let mut cart = self.cart.lock().expect("cart mutex poisoned");
            cart.clear();
            cart.clone()
        };
        self.persist(&snapshot).await;
    }

    /// Cart total: Σ(price × quantity). Computed on demand.
    pub fn cart_total(&self) -> Money {
        self.cart.lock().expect("cart mutex poisoned").total()
    }

    /// Total quantity across all items.
    pub fn cart_item_count(&self) -> i64 {
        self.cart
            .lock()
            .expect("cart mutex poisoned")
            .total_quantity()
    }

    /// Snapshot of the items in insertion order.
    pub fn items(&self) -> Vec<CartItem> {
        self.cart
            .lock()
            .expect("cart mutex poisoned")
            .items()
            .to_vec()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.cart.lock().expect("cart mutex poisoned").is_empty()
    }

    /// Writes the given snapshot through to the backend, swallowing failures.
    async fn persist(&self, cart: &Cart) {
        let Some(backend) = &self.backend else {
            return;
        };

        let json = match serde_json::to_string(cart) {
            Ok(json) => json,
            Err(error) => {
                warn!(%error, "Failed to serialize cart");
                return;
            }
        };

        if let Err(error) = backend.set(CART_STORAGE_KEY, &json).await {
            warn!(%error, "Failed to persist cart");
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
