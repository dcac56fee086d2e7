//! # Catalog Configuration
//!
//! Configuration for the remote API endpoint, cache TTLs, and local storage.
//!
//! ## Time Scales
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              Two Different Freshness Time Scales                        │
//! │                                                                         │
//! │  REVALIDATION HINT (api.*_revalidate_secs)                             │
//! │  ──────────────────────────────────────────                            │
//! │  • Sent upstream as Cache-Control: max-age on foreground fetches       │
//! │  • Governs how long intermediaries may serve their copies              │
//! │  • Informational: never consulted by the local cache                   │
//! │                                                                         │
//! │  HARD TTL (cache.*_ttl_secs)                                           │
//! │  ──────────────────────────                                            │
//! │  • Age at which a locally cached envelope is discarded outright        │
//! │  • The ONLY thing that gates a network call on the read path           │
//! │                                                                         │
//! │  Defaults: products 1h hint / 24h TTL, categories 1d hint / 7d TTL     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Loaded from `storefront.toml` in the platform config directory, with
//! defaults for every field and a `STOREFRONT_API_URL` environment override.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{CatalogError, CatalogResult};

// =============================================================================
// Remote API Settings
// =============================================================================

/// Remote product API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base endpoint of the remote product API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Upstream revalidation hint for product fetches, in seconds.
    #[serde(default = "default_products_revalidate_secs")]
    pub products_revalidate_secs: u64,

    /// Upstream revalidation hint for category fetches, in seconds.
    #[serde(default = "default_categories_revalidate_secs")]
    pub categories_revalidate_secs: u64,
}

fn default_base_url() -> String {
    "https://fakestoreapi.com".to_string()
}

fn default_products_revalidate_secs() -> u64 {
    3_600 // 1 hour
}

fn default_categories_revalidate_secs() -> u64 {
    86_400 // 1 day
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            products_revalidate_secs: default_products_revalidate_secs(),
            categories_revalidate_secs: default_categories_revalidate_secs(),
        }
    }
}

// =============================================================================
// Cache Settings
// =============================================================================

/// Local hard-TTL settings for the cache layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Hard TTL for the cached product list, in seconds.
    #[serde(default = "default_products_ttl_secs")]
    pub products_ttl_secs: u64,

    /// Hard TTL for the cached category list, in seconds.
    #[serde(default = "default_categories_ttl_secs")]
    pub categories_ttl_secs: u64,
}

fn default_products_ttl_secs() -> u64 {
    24 * 60 * 60 // 24 hours
}

fn default_categories_ttl_secs() -> u64 {
    7 * 24 * 60 * 60 // 7 days
}

impl Default for CacheSettings {
    fn default() -> Self {
        CacheSettings {
            products_ttl_secs: default_products_ttl_secs(),
            categories_ttl_secs: default_categories_ttl_secs(),
        }
    }
}

// =============================================================================
// Storage Settings
// =============================================================================

/// Local storage settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Path to the SQLite database file. Defaults to `storefront.db` in the
    /// platform data directory when unset.
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

// =============================================================================
// Catalog Configuration
// =============================================================================

/// Full configuration for the catalog layer.
///
/// ## Example (`storefront.toml`)
/// ```toml
/// [api]
/// base_url = "https://fakestoreapi.com"
/// products_revalidate_secs = 3600
/// categories_revalidate_secs = 86400
///
/// [cache]
/// products_ttl_secs = 86400
/// categories_ttl_secs = 604800
///
/// [storage]
/// database_path = "/var/lib/storefront/storefront.db"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Remote API settings.
    #[serde(default)]
    pub api: ApiSettings,

    /// Cache TTL settings.
    #[serde(default)]
    pub cache: CacheSettings,

    /// Local storage settings.
    #[serde(default)]
    pub storage: StorageSettings,
}

impl CatalogConfig {
    /// Creates a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`storefront.toml`)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> CatalogResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading catalog config from file");
                let contents = std::fs::read_to_string(&path)
                    .map_err(|e| CatalogError::ConfigLoadFailed(e.to_string()))?;
                config = toml::from_str(&contents)
                    .map_err(|e| CatalogError::ConfigLoadFailed(e.to_string()))?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns defaults if the load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load catalog config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> CatalogResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| CatalogError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CatalogError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CatalogError::ConfigSaveFailed(e.to_string()))?;
        std::fs::write(&path, contents)
            .map_err(|e| CatalogError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Catalog config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CatalogResult<()> {
        let parsed = Url::parse(&self.api.base_url).map_err(|source| {
            CatalogError::InvalidBaseUrl {
                url: self.api.base_url.clone(),
                source,
            }
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(CatalogError::InvalidBaseUrl {
                url: self.api.base_url.clone(),
                source: url::ParseError::RelativeUrlWithoutBase,
            });
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(base_url) = std::env::var("STOREFRONT_API_URL") {
            info!(%base_url, "Overriding API base URL from environment");
            self.api.base_url = base_url;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "storefront", "storefront")
            .map(|dirs| dirs.config_dir().join("storefront.toml"))
    }

    /// Returns the database path, falling back to the platform data dir.
    pub fn database_path(&self) -> Option<PathBuf> {
        self.storage.database_path.clone().or_else(|| {
            directories::ProjectDirs::from("com", "storefront", "storefront")
                .map(|dirs| dirs.data_dir().join("storefront.db"))
        })
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Hard TTL for the cached product list.
    pub fn products_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.products_ttl_secs)
    }

    /// Hard TTL for the cached category list.
    pub fn categories_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.categories_ttl_secs)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CatalogConfig::default();

        assert_eq!(config.api.base_url, "https://fakestoreapi.com");
        assert_eq!(config.products_ttl(), Duration::from_secs(86_400));
        assert_eq!(config.categories_ttl(), Duration::from_secs(604_800));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        let mut config = CatalogConfig::default();

        config.api.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.api.base_url = "ftp://example.test".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storefront.toml");

        let mut config = CatalogConfig::default();
        config.api.base_url = "http://localhost:9000".to_string();
        config.cache.products_ttl_secs = 120;
        config.save(Some(path.clone())).unwrap();

        let loaded = CatalogConfig::load(Some(path)).unwrap();
        assert_eq!(loaded.api.base_url, "http://localhost:9000");
        assert_eq!(loaded.products_ttl(), Duration::from_secs(120));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: CatalogConfig = toml::from_str(
            r#"
            [api]
            base_url = "http://localhost:8080"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.api.products_revalidate_secs, 3_600);
        assert_eq!(config.cache.categories_ttl_secs, 604_800);
    }
}
