//! # Catalog Cache Service
//!
//! The read path for all product and category data: local cache first,
//! network on miss, cache fallback on network failure.
//!
//! ## Read Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      get_products() Flow                                │
//! │                                                                         │
//! │  codec.read("cachedProducts")                                          │
//! │       │                                                                 │
//! │       ├── hit ──────────────────────────────► return cached            │
//! │       │         (no network call, even if the upstream                 │
//! │       │          revalidation hint has lapsed - only the               │
//! │       │          hard TTL gates the network)                           │
//! │       │                                                                 │
//! │       └── miss ──► fetcher.fetch_all()                                 │
//! │                        │                                                │
//! │                        ├── ok ───► codec.write(...) ──► return fresh   │
//! │                        │                                                │
//! │                        └── err ──► codec.read(...) again               │
//! │                                        │                                │
//! │                                        ├── hit ──► return cached       │
//! │                                        └── miss ─► propagate error     │
//! │                                                                         │
//! │  get_categories(): same shape, but total failure returns [] instead    │
//! │  of an error. An empty category list renders as "no filters"; a        │
//! │  product list failure has no safe empty rendering and must surface.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Single products are looked up in the cached *list* only; a miss there
//! goes straight to the network and the result is returned without touching
//! the cache, so list-shaped consumers never see an orphaned entry.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use storefront_core::Product;

use crate::codec::{
    CacheCodec, CategoriesEnvelope, ProductsEnvelope, CATEGORIES_CACHE_KEY, PRODUCTS_CACHE_KEY,
};
use crate::config::CatalogConfig;
use crate::error::CatalogResult;
use crate::fetcher::ProductFetcher;

/// Cached read access to the remote product catalog.
#[derive(Clone)]
pub struct CatalogService {
    codec: CacheCodec,
    fetcher: Arc<dyn ProductFetcher>,
    products_ttl: Duration,
    categories_ttl: Duration,
}

impl CatalogService {
    /// Creates a service over the given codec and fetcher.
    pub fn new(
        codec: CacheCodec,
        fetcher: Arc<dyn ProductFetcher>,
        config: &CatalogConfig,
    ) -> Self {
        CatalogService {
            codec,
            fetcher,
            products_ttl: config.products_ttl(),
            categories_ttl: config.categories_ttl(),
        }
    }

    /// Returns the product list, serving the cache when it is fresh enough.
    ///
    /// On a cache miss the list is fetched and cached. If the fetch fails,
    /// the cache is consulted once more before the error propagates: a
    /// concurrent sync may have repopulated it while the fetch was failing.
    pub async fn get_products(&self) -> CatalogResult<Vec<Product>> {
        if let Some(products) = self
            .codec
            .read::<ProductsEnvelope>(PRODUCTS_CACHE_KEY, self.products_ttl)
            .await
        {
            return Ok(products);
        }

        match self.fetcher.fetch_all().await {
            Ok(products) => {
                self.codec
                    .write::<ProductsEnvelope>(PRODUCTS_CACHE_KEY, products.clone())
                    .await;
                debug!(count = products.len(), "Fetched and cached product list");
                Ok(products)
            }
            Err(error) => {
                warn!(%error, "Product fetch failed, checking cache fallback");

                if let Some(products) = self
                    .codec
                    .read::<ProductsEnvelope>(PRODUCTS_CACHE_KEY, self.products_ttl)
                    .await
                {
                    info!("Serving cached products after fetch failure");
                    return Ok(products);
                }

                Err(error)
            }
        }
    }

    /// Returns the category list, degrading to an empty list on total
    /// failure.
    ///
    /// Unlike [`get_products`](Self::get_products) this never fails: with no
    /// fetch and no cache the caller gets `[]`, which the UI renders as "no
    /// filters available".
    pub async fn get_categories(&self) -> Vec<String> {
        if let Some(categories) = self
            .codec
            .read::<CategoriesEnvelope>(CATEGORIES_CACHE_KEY, self.categories_ttl)
            .await
        {
            return categories;
        }

        match self.fetcher.fetch_categories().await {
            Ok(categories) => {
                self.codec
                    .write::<CategoriesEnvelope>(CATEGORIES_CACHE_KEY, categories.clone())
                    .await;
                debug!(count = categories.len(), "Fetched and cached categories");
                categories
            }
            Err(error) => {
                warn!(%error, "Category fetch failed, checking cache fallback");

                if let Some(categories) = self
                    .codec
                    .read::<CategoriesEnvelope>(CATEGORIES_CACHE_KEY, self.categories_ttl)
                    .await
                {
                    info!("Serving cached categories after fetch failure");
                    return categories;
                }

                warn!("No cached categories available, degrading to empty list");
                Vec::new()
            }
        }
    }

    /// Returns a single product by id.
    ///
    /// Served from the cached product *list* when possible. On a list-cache
    /// miss the product is fetched individually and returned as-is - single
    /// products are never written into any cache.
    pub async fn get_product(&self, id: u64) -> CatalogResult<Product> {
        if let Some(products) = self
            .codec
            .read::<ProductsEnvelope>(PRODUCTS_CACHE_KEY, self.products_ttl)
            .await
        {
            if let Some(product) = products.into_iter().find(|p| p.id == id) {
                debug!(id, "Single product served from list cache");
                return Ok(product);
            }
        }

        self.fetcher.fetch_one(id).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
