//! # storefront-core: Pure Business Logic for Storefront
//!
//! This crate is the **heart** of Storefront. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Storefront Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   Consuming UI (out of scope)                   │   │
//! │  │    Catalog pages ──► Cart view ──► Checkout ──► Order history   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              storefront-catalog (network + cache)               │   │
//! │  │     fetcher ──► cache codec ──► catalog service ──► sync        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              storefront-db (durable key-value store)            │   │
//! │  │          SQLite backend, cart store, order store                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ storefront-core (THIS CRATE) ★                  │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │  orders   │  │   │
//! │  │   │  Product  │  │   Money   │  │   Cart    │  │  Order    │  │   │
//! │  │   │  CartItem │  │  (cents)  │  │  add/...  │  │  OrderLog │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Rating, CartItem)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - Pure cart state machine
//! - [`orders`] - Order creation, id generation, append-only order log
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic up to clock/rng reads
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Snapshot Orders**: Orders copy cart items; history is immutable

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod money;
pub mod orders;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use storefront_core::Money` instead of
// `use storefront_core::money::Money`

pub use cart::Cart;
pub use money::Money;
pub use orders::{generate_order_id, Order, OrderLog};
pub use types::{CartItem, Product, Rating};
