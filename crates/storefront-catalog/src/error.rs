//! # Catalog Error Types
//!
//! Error types for catalog fetch and configuration operations.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Catalog Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │    Transport    │  │     Remote      │  │     Configuration       │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Network        │  │  Remote{status} │  │  InvalidBaseUrl         │ │
//! │  │  (no response)  │  │  Decode         │  │  ConfigLoadFailed       │ │
//! │  │                 │  │  (bad body)     │  │  ConfigSaveFailed       │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Propagation Policy
//! - Product-list failures propagate only when no cache fallback exists.
//! - Category failures never propagate (degrade to an empty list).
//! - Single-product failures always propagate after a list-cache miss.
//! - Sync failures become one notification, never an error.
//!
//! Storage failures are not represented here at all: the cache layer
//! swallows them (see `storefront-db`).

use thiserror::Error;

/// Result type alias for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog fetch and configuration errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// The request never produced a response (DNS, connect, TLS, ...).
    #[error("network request failed: {0}")]
    Network(#[source] reqwest::Error),

    // =========================================================================
    // Remote Errors
    // =========================================================================
    /// The remote answered with a non-success HTTP status.
    #[error("remote API returned status {status}")]
    Remote {
        /// The HTTP status code of the response.
        status: u16,
    },

    /// The response body was not the JSON shape we expected.
    #[error("failed to decode response body: {0}")]
    Decode(#[source] reqwest::Error),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// The configured API base endpoint is not a valid URL.
    #[error("invalid API base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Failed to load the config file.
    #[error("failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save the config file.
    #[error("failed to save config: {0}")]
    ConfigSaveFailed(String),
}

impl CatalogError {
    /// The HTTP status for [`CatalogError::Remote`] failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            CatalogError::Remote { status } => Some(*status),
            _ => None,
        }
    }
}
