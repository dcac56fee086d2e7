//! # Cache Codec
//!
//! Serializes catalog payloads into timestamped envelopes in the key-value
//! store, and owns the expiry check on the way back out.
//!
//! ## Read Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Codec Read Decision                              │
//! │                                                                         │
//! │  read(key, ttl)                                                        │
//! │       │                                                                 │
//! │       ├── no backend ───────────────────────────► absent               │
//! │       ├── key missing ──────────────────────────► absent               │
//! │       ├── storage error ──────────── log ───────► absent               │
//! │       ├── malformed JSON ─────────── log ───────► absent               │
//! │       ├── age > ttl ──── invalidate(key) ───────► absent               │
//! │       └── otherwise ────────────────────────────► payload              │
//! │                                                                         │
//! │  Absence is the ONLY failure mode callers ever see.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Writes stamp the current time, so envelope timestamps are monotonically
//! non-decreasing per key. Write failures (quota, serialization) are logged
//! and swallowed: a missing cache entry costs one extra network call, never
//! correctness.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use storefront_core::Product;
use storefront_db::KeyValueStore;

/// Persisted-store key for the cached product list.
pub const PRODUCTS_CACHE_KEY: &str = "cachedProducts";

/// Persisted-store key for the cached category list.
pub const CATEGORIES_CACHE_KEY: &str = "cachedCategories";

// =============================================================================
// Envelopes
// =============================================================================

/// A cache envelope: payload plus write timestamp (epoch milliseconds).
///
/// Implementations pin down the persisted field name of the payload, which
/// differs per resource (`products` vs `categories`).
pub trait Envelope: Serialize + DeserializeOwned + Send {
    /// The payload type carried by this envelope.
    type Payload: Send;

    /// Wraps a payload with its write timestamp.
    fn seal(payload: Self::Payload, timestamp_ms: i64) -> Self;

    /// The envelope's write timestamp in epoch milliseconds.
    fn timestamp_ms(&self) -> i64;

    /// Unwraps the payload.
    fn into_payload(self) -> Self::Payload;
}

/// Persisted shape of the product-list cache: `{products, timestamp}`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ProductsEnvelope {
    pub products: Vec<Product>,
    pub timestamp: i64,
}

impl Envelope for ProductsEnvelope {
    type Payload = Vec<Product>;

    fn seal(payload: Self::Payload, timestamp_ms: i64) -> Self {
        ProductsEnvelope {
            products: payload,
            timestamp: timestamp_ms,
        }
    }

    fn timestamp_ms(&self) -> i64 {
        self.timestamp
    }

    fn into_payload(self) -> Self::Payload {
        self.products
    }
}

/// Persisted shape of the category-list cache: `{categories, timestamp}`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CategoriesEnvelope {
    pub categories: Vec<String>,
    pub timestamp: i64,
}

impl Envelope for CategoriesEnvelope {
    type Payload = Vec<String>;

    fn seal(payload: Self::Payload, timestamp_ms: i64) -> Self {
        CategoriesEnvelope {
            categories: payload,
            timestamp: timestamp_ms,
        }
    }

    fn timestamp_ms(&self) -> i64 {
        self.timestamp
    }

    fn into_payload(self) -> Self::Payload {
        self.categories
    }
}

// =============================================================================
// Cache Codec
// =============================================================================

/// Envelope codec over an optional key-value backend.
///
/// Without a backend every read is a miss and every write/invalidate is a
/// no-op, so callers never branch on storage availability.
#[derive(Clone)]
pub struct CacheCodec {
    backend: Option<Arc<dyn KeyValueStore>>,
}

impl CacheCodec {
    /// Creates a codec over an optional storage backend.
    pub fn new(backend: Option<Arc<dyn KeyValueStore>>) -> Self {
        CacheCodec { backend }
    }

    /// Creates a codec with no backend (always-miss).
    pub fn detached() -> Self {
        CacheCodec::new(None)
    }

    /// Reads the payload cached under `key`, enforcing the hard TTL.
    ///
    /// Entries older than `ttl` are deleted and reported absent. Storage and
    /// parse failures are logged and reported absent.
    pub async fn read<E: Envelope>(&self, key: &str, ttl: Duration) -> Option<E::Payload> {
        let backend = self.backend.as_ref()?;

        let raw = match backend.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(error) => {
                warn!(key = %key, %error, "Failed to read cache entry");
                return None;
            }
        };

        let envelope: E = match serde_json::from_str(&raw) {
            Ok(envelope) => envelope,
            Err(error) => {
                warn!(key = %key, %error, "Malformed cache entry, treating as absent");
                return None;
            }
        };

        let age_ms = Utc::now().timestamp_millis() - envelope.timestamp_ms();
        if age_ms > ttl.as_millis() as i64 {
            debug!(key = %key, age_ms, "Cache entry expired");
            self.invalidate(key).await;
            return None;
        }

        debug!(key = %key, age_ms, "Cache hit");
        Some(envelope.into_payload())
    }

    /// Writes `payload` under `key`, stamped with the current time.
    ///
    /// Failures are logged and swallowed; caching is an optimization, not a
    /// correctness requirement.
    pub async fn write<E: Envelope>(&self, key: &str, payload: E::Payload) {
        let Some(backend) = &self.backend else {
            return;
        };

        let envelope = E::seal(payload, Utc::now().timestamp_millis());
        let json = match serde_json::to_string(&envelope) {
            Ok(json) => json,
            Err(error) => {
                warn!(key = %key, %error, "Failed to serialize cache entry");
                return;
            }
        };

        if let Err(error) = backend.set(key, &json).await {
            warn!(key = %key, %error, "Failed to persist cache entry");
        }
    }

    /// Removes the entry under `key`. Absent key is a no-op.
    pub async fn invalidate(&self, key: &str) {
        let Some(backend) = &self.backend else {
            return;
        };

        if let Err(error) = backend.remove(key).await {
            warn!(key = %key, %error, "Failed to invalidate cache entry");
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::{Money, Rating};
    use storefront_db::MemoryStore;

    const DAY: Duration = Duration::from_secs(24 * 60 * 60);

    fn test_product(id: u64) -> Product {
        Product {
            id,
            title: format!("Product {}", id),
            price: Money::from_cents(999),
            description: String::new(),
            category: "test".to_string(),
            image: String::new(),
            rating: Rating {
                rate: 4.0,
                count: 7,
            },
        }
    }

    fn codec_over(backend: Arc<dyn KeyValueStore>) -> CacheCodec {
        CacheCodec::new(Some(backend))
    }

    /// Plants a products envelope whose timestamp lies `age` in the past.
    async fn plant_products(backend: &Arc<dyn KeyValueStore>, age: Duration, ids: &[u64]) {
        let envelope = ProductsEnvelope {
            products: ids.iter().map(|&id| test_product(id)).collect(),
            timestamp: Utc::now().timestamp_millis() - age.as_millis() as i64,
        };
        backend
            .set(
                PRODUCTS_CACHE_KEY,
                &serde_json::to_string(&envelope).unwrap(),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_absent_key_reads_absent() {
        let codec = codec_over(Arc::new(MemoryStore::new()));
        let read = codec
            .read::<ProductsEnvelope>(PRODUCTS_CACHE_KEY, DAY)
            .await;
        assert!(read.is_none());
    }

    #[tokio::test]
    async fn test_write_then_read_round_trip() {
        let codec = codec_over(Arc::new(MemoryStore::new()));

        codec
            .write::<ProductsEnvelope>(PRODUCTS_CACHE_KEY, vec![test_product(1)])
            .await;

        let read = codec
            .read::<ProductsEnvelope>(PRODUCTS_CACHE_KEY, DAY)
            .await
            .unwrap();
        assert_eq!(read.len(), 1);
        assert_eq!(read[0].id, 1);
    }

    #[tokio::test]
    async fn test_malformed_entry_reads_absent() {
        let backend: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        backend.set(PRODUCTS_CACHE_KEY, "{oops").await.unwrap();

        let codec = codec_over(backend.clone());
        let read = codec
            .read::<ProductsEnvelope>(PRODUCTS_CACHE_KEY, DAY)
            .await;

        assert!(read.is_none());
        // Malformed entries are reported absent but not deleted.
        assert!(backend.get(PRODUCTS_CACHE_KEY).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_entry_just_past_ttl_is_expired_and_invalidated() {
        let backend: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        plant_products(&backend, DAY + Duration::from_millis(1), &[1]).await;

        let codec = codec_over(backend.clone());
        let read = codec
            .read::<ProductsEnvelope>(PRODUCTS_CACHE_KEY, DAY)
            .await;

        assert!(read.is_none());
        // Expiry deletes the key.
        assert!(backend.get(PRODUCTS_CACHE_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_entry_inside_ttl_is_valid() {
        let backend: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        // 23h59m old: one minute short of the 24h TTL.
        plant_products(&backend, Duration::from_secs(23 * 3600 + 59 * 60), &[1]).await;

        let codec = codec_over(backend.clone());
        let read = codec
            .read::<ProductsEnvelope>(PRODUCTS_CACHE_KEY, DAY)
            .await;

        assert!(read.is_some());
        assert!(backend.get(PRODUCTS_CACHE_KEY).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_categories_envelope_shape() {
        let backend: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let codec = codec_over(backend.clone());

        codec
            .write::<CategoriesEnvelope>(
                CATEGORIES_CACHE_KEY,
                vec!["electronics".to_string(), "jewelery".to_string()],
            )
            .await;

        let raw = backend.get(CATEGORIES_CACHE_KEY).await.unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value["categories"].is_array());
        assert!(value["timestamp"].is_i64() || value["timestamp"].is_u64());
    }

    #[tokio::test]
    async fn test_detached_codec_always_misses() {
        let codec = CacheCodec::detached();

        codec
            .write::<ProductsEnvelope>(PRODUCTS_CACHE_KEY, vec![test_product(1)])
            .await;

        let read = codec
            .read::<ProductsEnvelope>(PRODUCTS_CACHE_KEY, DAY)
            .await;
        assert!(read.is_none());
    }

    #[tokio::test]
    async fn test_invalidate_absent_key_is_noop() {
        let codec = codec_over(Arc::new(MemoryStore::new()));
        codec.invalidate(PRODUCTS_CACHE_KEY).await;
    }
}
