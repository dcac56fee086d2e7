//! # storefront-db: Persistence Layer for Storefront
//!
//! Durable storage for the storefront client, reduced to the one shape every
//! persisted feature shares: a string-keyed key-value store.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        storefront-db                                    │
//! │                                                                         │
//! │  ┌──────────────────┐      ┌──────────────────────────────────────┐    │
//! │  │  KeyValueStore   │◄─────│  consumers                           │    │
//! │  │  (port)          │      │                                      │    │
//! │  │                  │      │  • CacheCodec (storefront-catalog)   │    │
//! │  │  get / set /     │      │  • CartStore  (this crate)           │    │
//! │  │  remove          │      │  • OrderStore (this crate)           │    │
//! │  └───────┬──────────┘      └──────────────────────────────────────┘    │
//! │          │                                                              │
//! │   ┌──────┴───────┐                                                      │
//! │   ▼              ▼                                                      │
//! │  MemoryStore   SqliteStore (WAL, embedded migrations)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Services take `Option<Arc<dyn KeyValueStore>>`: with `None` every cache
//! read misses and every write is a no-op, so storage-less hosts run
//! unchanged instead of branching on environment at each call site.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod kv;
pub mod migrations;
pub mod orders;
pub mod sqlite;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{CartStore, CART_STORAGE_KEY};
pub use error::{StoreError, StoreResult};
pub use kv::{KeyValueStore, MemoryStore};
pub use orders::{OrderStore, ORDER_STORAGE_KEY};
pub use sqlite::{SqliteStore, StoreConfig};
