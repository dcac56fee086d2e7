//! # Order Store
//!
//! The persisted order-history service.
//!
//! Orders are append-only: [`OrderStore::create_order`] is the only mutation,
//! performed exactly once per checkout. The created order snapshots the cart
//! items it is given, so the history can never be rewritten by later cart
//! activity. Persistence follows the same write-through, swallow-on-failure
//! policy as the cart store, under the `order-storage` key.

use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use storefront_core::{CartItem, Money, Order, OrderLog};

use crate::kv::KeyValueStore;

/// Persisted-store key for the order log.
pub const ORDER_STORAGE_KEY: &str = "order-storage";

/// Stateful order service: in-memory [`OrderLog`] plus optional durable
/// backend.
pub struct OrderStore {
    log: Mutex<OrderLog>,
    backend: Option<Arc<dyn KeyValueStore>>,
}

impl OrderStore {
    /// Creates an empty order store over an optional storage backend.
    pub fn new(backend: Option<Arc<dyn KeyValueStore>>) -> Self {
        OrderStore {
            log: Mutex::new(OrderLog::new()),
            backend,
        }
    }

    /// Creates an order store with no durable backend.
    pub fn detached() -> Self {
        OrderStore::new(None)
    }

    /// Restores the order log persisted by a previous session, if any.
    pub async fn hydrate(&self) {
        let Some(backend) = &self.backend else {
            return;
        };

        let raw = match backend.get(ORDER_STORAGE_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No persisted orders found");
                return;
            }
            Err(error) => {
                warn!(%error, "Failed to read persisted orders");
                return;
            }
        };

        match serde_json::from_str::<OrderLog>(&raw) {
            Ok(stored) => {
                let mut log = self.log.lock().expect("order log mutex poisoned");
                *log = stored;
                debug!(orders = log.orders().len(), "Order log rehydrated");
            }
            Err(error) => {
                warn!(%error, "Persisted order log is malformed, starting empty");
            }
        }
    }

    /// Creates a new order from a snapshot of `items`, appends it to the log,
    /// points `lastOrder` at it, and returns it.
    pub async fn create_order(&self, items: &[CartItem], total_amount: Money) -> Order {
        let order = Order::new(items, total_amount);

        let snapshot = {
            let mut log = self.log.lock().expect("order log mutex poisoned");
            log.push(order.clone());
            log.clone()
        };
        self.persist(&snapshot).await;

        debug!(order_id = %order.id, total = %order.total_amount, "Order created");
        order
    }

    /// Linear lookup by order id.
    pub fn order_by_id(&self, order_id: &str) -> Option<Order> {
        self.log
            .lock()
            .expect("order log mutex poisoned")
            .find(order_id)
            .cloned()
    }

    /// All orders, oldest first.
    pub fn all_orders(&self) -> Vec<Order> {
        self.log
            .lock()
            .expect("order log mutex poisoned")
            .orders()
            .to_vec()
    }

    /// The most recently created order.
    pub fn last_order(&self) -> Option<Order> {
        self.log
            .lock()
            .expect("order log mutex poisoned")
            .last()
            .cloned()
    }

    /// Writes the given snapshot through to the backend, swallowing failures.
    async fn persist(&self, log: &OrderLog) {
        let Some(backend) = &self.backend else {
            return;
        };

        let json = match serde_json::to_string(log) {
            Ok(json) => json,
            Err(error) => {
                warn!(%error, "Failed to serialize order log");
                return;
            }
        };

        if let Err(error) = backend.set(ORDER_STORAGE_KEY, &json).await {
            warn!(%error, "Failed to persist order log");
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;
    use storefront_core::{Product, Rating};

    fn test_item(id: u64, price_cents: i64, quantity: i64) -> CartItem {
        CartItem {
            product: Product {
                id,
                title: format!("Product {}", id),
                price: Money::from_cents(price_cents),
                description: String::new(),
                category: "test".to_string(),
                image: String::new(),
                rating: Rating {
                    rate: 4.0,
                    count: 10,
                },
            },
            quantity,
        }
    }

    #[tokio::test]
    async fn test_create_order_appends_and_sets_last() {
        let store = OrderStore::detached();

        let first = store
            .create_order(&[test_item(1, 100, 1)], Money::from_cents(100))
            .await;
        let second = store
            .create_order(&[test_item(2, 200, 2)], Money::from_cents(400))
            .await;

        assert_eq!(store.all_orders().len(), 2);
        assert_eq!(store.last_order().unwrap().id, second.id);
        assert_eq!(store.order_by_id(&first.id).unwrap().id, first.id);
        assert!(store.order_by_id("ORD-XXXXXX-0").is_none());
    }

    #[tokio::test]
    async fn test_orders_do_not_alias_caller_items() {
        let store = OrderStore::detached();
        let mut items = vec![test_item(1, 9999, 3)];

        store.create_order(&items, Money::from_cents(29997)).await;

        // Mutating the caller's list afterwards leaves history untouched.
        items[0].quantity = 1;
        assert_eq!(store.last_order().unwrap().items[0].quantity, 3);
    }

    #[tokio::test]
    async fn test_persists_across_instances() {
        let backend: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());

        let store = OrderStore::new(Some(backend.clone()));
        let order = store
            .create_order(&[test_item(1, 1099, 1)], Money::from_cents(1099))
            .await;

        let reborn = OrderStore::new(Some(backend));
        reborn.hydrate().await;

        assert_eq!(reborn.all_orders().len(), 1);
        assert_eq!(reborn.last_order().unwrap().id, order.id);
    }

    #[tokio::test]
    async fn test_hydrate_with_malformed_state_starts_empty() {
        let backend: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        backend.set(ORDER_STORAGE_KEY, "{broken").await.unwrap();

        let store = OrderStore::new(Some(backend));
        store.hydrate().await;

        assert!(store.all_orders().is_empty());
        assert!(store.last_order().is_none());
    }
}
