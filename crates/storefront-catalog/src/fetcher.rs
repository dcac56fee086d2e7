//! # Catalog Fetcher
//!
//! Network access to the remote product API.
//!
//! One request per call, no retries, no timeout: retry policy belongs to the
//! callers (the cache service falls back to cached data, the sync
//! orchestrator notifies and gives up), and timeouts belong to the transport.
//!
//! ## Endpoints
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Operation          GET path                  Revalidation hint         │
//! │  ─────────          ────────                  ─────────────────         │
//! │  fetch_all          /products                 max-age=3600              │
//! │  fetch_categories   /products/categories      max-age=86400             │
//! │  fetch_one(id)      /products/{id}            max-age=3600              │
//! │  *_fresh (sync)     same paths                none                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The hint is informational for upstream caches only; the local cache layer
//! never consults it.

use async_trait::async_trait;
use reqwest::header::CACHE_CONTROL;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use storefront_core::Product;

use crate::config::CatalogConfig;
use crate::error::{CatalogError, CatalogResult};

// =============================================================================
// Fetcher Port
// =============================================================================

/// Read access to the remote product catalog.
///
/// A non-success response fails with [`CatalogError::Remote`], a transport
/// failure with [`CatalogError::Network`], and a malformed body with
/// [`CatalogError::Decode`].
#[async_trait]
pub trait ProductFetcher: Send + Sync {
    /// Fetches the full product list.
    async fn fetch_all(&self) -> CatalogResult<Vec<Product>>;

    /// Fetches the category list.
    async fn fetch_categories(&self) -> CatalogResult<Vec<String>>;

    /// Fetches a single product by id.
    async fn fetch_one(&self, id: u64) -> CatalogResult<Product>;

    /// Fetches the full product list without an upstream revalidation hint.
    /// Used by the background sync, which always wants origin data.
    async fn fetch_all_fresh(&self) -> CatalogResult<Vec<Product>> {
        self.fetch_all().await
    }

    /// Fetches the category list without an upstream revalidation hint.
    async fn fetch_categories_fresh(&self) -> CatalogResult<Vec<String>> {
        self.fetch_categories().await
    }
}

// =============================================================================
// HTTP Fetcher
// =============================================================================

/// [`ProductFetcher`] implementation over HTTP.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    http: Client,
    base_url: Url,
    products_revalidate_secs: u64,
    categories_revalidate_secs: u64,
}

impl HttpFetcher {
    /// Creates a fetcher from the given configuration.
    ///
    /// Fails with [`CatalogError::InvalidBaseUrl`] when the configured base
    /// endpoint does not parse.
    pub fn new(config: &CatalogConfig) -> CatalogResult<Self> {
        let base_url =
            Url::parse(&config.api.base_url).map_err(|source| CatalogError::InvalidBaseUrl {
                url: config.api.base_url.clone(),
                source,
            })?;

        Ok(HttpFetcher {
            http: Client::new(),
            base_url,
            products_revalidate_secs: config.api.products_revalidate_secs,
            categories_revalidate_secs: config.api.categories_revalidate_secs,
        })
    }

    /// Builds the absolute URL for a resource path.
    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path
        )
    }

    /// Issues one GET request and decodes the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        revalidate_secs: Option<u64>,
    ) -> CatalogResult<T> {
        let url = self.endpoint(path);
        debug!(%url, ?revalidate_secs, "Fetching from remote API");

        let mut request = self.http.get(&url);
        if let Some(secs) = revalidate_secs {
            request = request.header(CACHE_CONTROL, format!("max-age={}", secs));
        }

        let response = request.send().await.map_err(CatalogError::Network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Remote {
                status: status.as_u16(),
            });
        }

        response.json::<T>().await.map_err(CatalogError::Decode)
    }
}

#[async_trait]
impl ProductFetcher for HttpFetcher {
    async fn fetch_all(&self) -> CatalogResult<Vec<Product>> {
        self.get_json("products", Some(self.products_revalidate_secs))
            .await
    }

    async fn fetch_categories(&self) -> CatalogResult<Vec<String>> {
        self.get_json(
            "products/categories",
            Some(self.categories_revalidate_secs),
        )
        .await
    }

    async fn fetch_one(&self, id: u64) -> CatalogResult<Product> {
        self.get_json(
            &format!("products/{}", id),
            Some(self.products_revalidate_secs),
        )
        .await
    }

    async fn fetch_all_fresh(&self) -> CatalogResult<Vec<Product>> {
        self.get_json("products", None).await
    }

    async fn fetch_categories_fresh(&self) -> CatalogResult<Vec<String>> {
        self.get_json("products/categories", None).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_building() {
        let mut config = CatalogConfig::default();
        config.api.base_url = "https://fakestoreapi.com".to_string();
        let fetcher = HttpFetcher::new(&config).unwrap();

        assert_eq!(
            fetcher.endpoint("products"),
            "https://fakestoreapi.com/products"
        );
        assert_eq!(
            fetcher.endpoint("products/categories"),
            "https://fakestoreapi.com/products/categories"
        );
        assert_eq!(
            fetcher.endpoint("products/7"),
            "https://fakestoreapi.com/products/7"
        );
    }

    #[test]
    fn test_endpoint_tolerates_trailing_slash() {
        let mut config = CatalogConfig::default();
        config.api.base_url = "http://localhost:8080/".to_string();
        let fetcher = HttpFetcher::new(&config).unwrap();

        assert_eq!(fetcher.endpoint("products"), "http://localhost:8080/products");
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let mut config = CatalogConfig::default();
        config.api.base_url = "definitely not a url".to_string();

        assert!(matches!(
            HttpFetcher::new(&config),
            Err(CatalogError::InvalidBaseUrl { .. })
        ));
    }
}
