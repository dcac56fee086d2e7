//! # storefront-catalog: Remote Catalog, Cache Layer, and Background Sync
//!
//! Every read of product or category data goes through this crate. It
//! decides when to trust local state, when to hit the network, how to
//! recover from network failure, and how a background refresh coexists with
//! concurrent foreground reads.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Catalog Data Flow                                │
//! │                                                                         │
//! │  UI read ──► CatalogService ──► CacheCodec ──► KeyValueStore            │
//! │                   │                  ▲                                  │
//! │                   │ (miss)           │ (write-back)                     │
//! │                   ▼                  │                                  │
//! │              ProductFetcher ─────────┘                                  │
//! │                   ▲                  ▲                                  │
//! │                   │                  │                                  │
//! │  connectivity ──► SyncOrchestrator ──┘  (refresh both caches,           │
//! │  events            │                     racing foreground reads;      │
//! │                    ▼                     last writer wins)             │
//! │              NotificationSink ("Sync failed")                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`codec`] - cache envelopes, hard-TTL expiry, swallow-on-failure writes
//! - [`fetcher`] - the `ProductFetcher` port and its reqwest implementation
//! - [`service`] - the read/refresh/fallback protocol
//! - [`sync`] - background refresh on startup and connectivity regained
//! - [`notify`] - fire-and-forget notification port
//! - [`config`] - endpoint, TTLs, and storage configuration (TOML)
//! - [`error`] - typed fetch/config failures

// =============================================================================
// Module Declarations
// =============================================================================

pub mod codec;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod notify;
pub mod service;
pub mod sync;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use codec::{
    CacheCodec, CategoriesEnvelope, Envelope, ProductsEnvelope, CATEGORIES_CACHE_KEY,
    PRODUCTS_CACHE_KEY,
};
pub use config::CatalogConfig;
pub use error::{CatalogError, CatalogResult};
pub use fetcher::{HttpFetcher, ProductFetcher};
pub use notify::{LogSink, NoOpSink, Notification, NotificationSink, Severity};
pub use service::CatalogService;
pub use sync::{AlwaysOnline, ConnectivityEvent, ConnectivityProbe, SyncOrchestrator};
