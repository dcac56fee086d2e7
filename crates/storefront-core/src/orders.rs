//! # Orders
//!
//! Completed-order types and the append-only order log.
//!
//! An [`Order`] is created exactly once per checkout and is immutable after
//! creation: its item list is a deep snapshot of the cart at checkout time,
//! so later cart mutations can never rewrite history.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::CartItem;

/// Characters used for the human-scannable order-id token.
const ORDER_ID_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of the random token segment of an order id.
const ORDER_ID_TOKEN_LEN: usize = 6;

// =============================================================================
// Order
// =============================================================================

/// A completed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique id of the form `ORD-XXXXXX-<epoch millis>` where `XXXXXX` is a
    /// random uppercase-alphanumeric token.
    pub id: String,

    /// Creation time (ISO-8601 on the wire).
    pub date: DateTime<Utc>,

    /// Snapshot of the cart items at checkout. Never aliases the live cart.
    pub items: Vec<CartItem>,

    /// Order total as computed at checkout.
    pub total_amount: Money,
}

impl Order {
    /// Creates a new order from a snapshot of cart items and a total.
    ///
    /// The caller passes items by reference; the order stores its own copy.
    pub fn new(items: &[CartItem], total_amount: Money) -> Self {
        Order {
            id: generate_order_id(),
            date: Utc::now(),
            items: items.to_vec(),
            total_amount,
        }
    }
}

/// Generates an order id: `ORD-<6 uppercase alphanumerics>-<epoch millis>`.
///
/// The random token keeps ids human-scannable; the timestamp suffix makes
/// collisions across checkouts vanishingly unlikely without needing any
/// coordination.
pub fn generate_order_id() -> String {
    let mut rng = rand::thread_rng();
    let token: String = (0..ORDER_ID_TOKEN_LEN)
        .map(|_| ORDER_ID_CHARSET[rng.gen_range(0..ORDER_ID_CHARSET.len())] as char)
        .collect();

    format!("ORD-{}-{}", token, Utc::now().timestamp_millis())
}

// =============================================================================
// Order Log
// =============================================================================

/// Append-only order history plus a pointer to the most recent order.
///
/// Serializes as `{orders, lastOrder}`, the persisted shape under the
/// `order-storage` key. `last_order` holds a copy of the latest order;
/// because orders are immutable this is a pure relation, not shared state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLog {
    /// All orders in creation order.
    pub orders: Vec<Order>,

    /// The most recently created order, if any.
    pub last_order: Option<Order>,
}

impl OrderLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        OrderLog::default()
    }

    /// Appends `order` and points `last_order` at it.
    pub fn push(&mut self, order: Order) {
        self.last_order = Some(order.clone());
        self.orders.push(order);
    }

    /// Linear lookup by order id.
    pub fn find(&self, order_id: &str) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == order_id)
    }

    /// All orders, oldest first.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// The most recently created order.
    pub fn last(&self) -> Option<&Order> {
        self.last_order.as_ref()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Product, Rating};
    use std::collections::HashSet;

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
                    count: 5,
                },
            },
            quantity,
        }
    }

    /// Asserts the `ORD-[A-Z0-9]{6}-\d+` shape without a regex engine.
    fn assert_order_id_format(id: &str) {
        let mut parts = id.splitn(3, '-');
        assert_eq!(parts.next(), Some("ORD"));

        let token = parts.next().expect("missing token segment");
        assert_eq!(token.len(), 6);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));

        let suffix = parts.next().expect("missing timestamp segment");
        suffix.parse::<i64>().expect("timestamp segment not numeric");
    }

    #[test]
    fn test_order_id_format() {
        assert_order_id_format(&generate_order_id());
    }

    #[test]
    fn test_order_ids_are_distinct() {
        let ids: HashSet<String> = (0..100).map(|_| generate_order_id()).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_order_snapshots_items() {
        let items = vec![test_item(1, 9999, 2)];
        let order = Order::new(&items, Money::from_cents(19998));

        // Mutating the source list afterwards does not touch the order.
        let mut items = items;
        items[0].quantity = 99;

        assert_eq!(order.items[0].quantity, 2);
        assert_eq!(order.total_amount.cents(), 19998);
    }

    #[test]
    fn test_log_push_updates_last_order() {
        let mut log = OrderLog::new();
        assert!(log.last().is_none());

        let first = Order::new(&[test_item(1, 100, 1)], Money::from_cents(100));
        let second = Order::new(&[test_item(2, 200, 1)], Money::from_cents(200));

        log.push(first.clone());
        assert_eq!(log.last().unwrap().id, first.id);

        log.push(second.clone());
        assert_eq!(log.last().unwrap().id, second.id);
        assert_eq!(log.orders().len(), 2);
    }

    #[test]
    fn test_log_find() {
        let mut log = OrderLog::new();
        let order = Order::new(&[test_item(1, 100, 1)], Money::from_cents(100));
        let id = order.id.clone();
        log.push(order);

        assert!(log.find(&id).is_some());
        assert!(log.find("ORD-NOPE42-0").is_none());
    }

    #[test]
    fn test_log_serialized_shape() {
        let mut log = OrderLog::new();
        log.push(Order::new(&[test_item(1, 100, 1)], Money::from_cents(100)));

        let value = serde_json::to_value(&log).unwrap();
        assert!(value["orders"].is_array());
        assert!(value["lastOrder"]["totalAmount"].is_number());
        assert!(value["lastOrder"]["date"].is_string());
    }
}
