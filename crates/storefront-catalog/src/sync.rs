//! # Background Sync Orchestrator
//!
//! Opportunistic cache refresh, independent of the foreground read path.
//!
//! ## Sync Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         sync() Flow                                     │
//! │                                                                         │
//! │  probe.is_online()?                                                    │
//! │       │                                                                 │
//! │       ├── no ───────────────────────────► return (no-op)               │
//! │       │                                                                 │
//! │       └── yes ──► fetch_all_fresh()                                    │
//! │                        │                                                │
//! │                        ├── err ──► notify("Sync failed") ──► return    │
//! │                        │           (categories NOT attempted)          │
//! │                        │                                                │
//! │                        └── ok ──► write products cache                 │
//! │                                        │                                │
//! │                                   fetch_categories_fresh()             │
//! │                                        │                                │
//! │                                        ├── err ─► notify ─► return     │
//! │                                        │          (products cache      │
//! │                                        │           stays written)      │
//! │                                        └── ok ──► write categories     │
//! │                                                                         │
//! │  sync() NEVER returns an error: it runs opportunistically in the       │
//! │  background, and failures surface as one notification.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Fetches ignore any existing cache state and carry no upstream
//! revalidation hint: sync always wants origin data. Cache writes race
//! foreground reads by design; last writer wins, and both writers store
//! idempotent full-payload replacements.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::codec::{
    CacheCodec, CategoriesEnvelope, ProductsEnvelope, CATEGORIES_CACHE_KEY, PRODUCTS_CACHE_KEY,
};
use crate::error::CatalogResult;
use crate::fetcher::ProductFetcher;
use crate::notify::{Notification, NotificationSink};

// =============================================================================
// Connectivity Port
// =============================================================================

/// Synchronous connectivity check, evaluated at call time.
///
/// The orchestrator does not monitor connectivity itself; ongoing detection
/// belongs to the host, which feeds [`ConnectivityEvent`]s into
/// [`SyncOrchestrator::run`].
pub trait ConnectivityProbe: Send + Sync {
    /// Whether the host currently believes it is online.
    fn is_online(&self) -> bool;
}

/// Probe for hosts without connectivity detection: always online.
pub struct AlwaysOnline;

impl ConnectivityProbe for AlwaysOnline {
    fn is_online(&self) -> bool {
        true
    }
}

/// A connectivity transition reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityEvent {
    /// The host came online.
    Online,
    /// The host went offline.
    Offline,
}

// =============================================================================
// Sync Orchestrator
// =============================================================================

/// Refreshes both catalog caches unconditionally when online.
pub struct SyncOrchestrator {
    codec: CacheCodec,
    fetcher: Arc<dyn ProductFetcher>,
    probe: Arc<dyn ConnectivityProbe>,
    notifier: Arc<dyn NotificationSink>,
}

impl SyncOrchestrator {
    /// Creates an orchestrator over the given codec, fetcher, and ports.
    pub fn new(
        codec: CacheCodec,
        fetcher: Arc<dyn ProductFetcher>,
        probe: Arc<dyn ConnectivityProbe>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        SyncOrchestrator {
            codec,
            fetcher,
            probe,
            notifier,
        }
    }

    /// Runs one sync pass. Never fails; failures become one notification.
    ///
    /// No-op when offline - the probe is a precondition, not a retry
    /// trigger.
    pub async fn sync(&self) {
        if !self.probe.is_online() {
            debug!("Offline, skipping catalog sync");
            return;
        }

        match self.refresh().await {
            Ok(()) => info!("Catalog sync complete"),
            Err(error) => {
                warn!(%error, "Catalog sync failed");
                self.notifier.notify(Notification::sync_failed());
            }
        }
    }

    /// Fetches products then categories, writing each cache on success.
    ///
    /// A products failure returns before categories are attempted. A
    /// categories failure leaves the already-written products cache valid
    /// (partial success).
    async fn refresh(&self) -> CatalogResult<()> {
        let products = self.fetcher.fetch_all_fresh().await?;
        self.codec
            .write::<ProductsEnvelope>(PRODUCTS_CACHE_KEY, products)
            .await;
        debug!("Product cache refreshed");

        let categories = self.fetcher.fetch_categories_fresh().await?;
        self.codec
            .write::<CategoriesEnvelope>(CATEGORIES_CACHE_KEY, categories)
            .await;
        debug!("Category cache refreshed");

        Ok(())
    }

    /// Consumes connectivity events until the channel closes.
    ///
    /// Syncs once at startup when already online, then once per
    /// offline-to-online transition. Repeated `Online` events without an
    /// intervening `Offline` do not re-sync.
    pub async fn run(&self, mut events: mpsc::Receiver<ConnectivityEvent>) {
        let mut online = self.probe.is_online();
        if online {
            self.sync().await;
        }

        while let Some(event) = events.recv().await {
            match event {
                ConnectivityEvent::Online => {
                    if !online {
                        info!("Connectivity regained, syncing catalog");
                        self.sync().await;
                    }
                    online = true;
                }
                ConnectivityEvent::Offline => {
                    debug!("Connectivity lost");
                    online = false;
                }
            }
        }

        debug!("Connectivity event stream closed, sync loop exiting");
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use storefront_core::{Money, Product, Rating};
    use storefront_db::{KeyValueStore, MemoryStore, StoreResult};

    use crate::error::CatalogError;
    use crate::notify::Severity;

    fn test_product(id: u64) -> Product {
        Product {
            id,
            title: format!("Product {}", id),
            price: Money::from_cents(999),
            description: String::new(),
            category: "test".to_string(),
            image: String::new(),
            rating: Rating {
                rate: 3.5,
                count: 4,
            },
        }
    }

    #[derive(Default)]
    struct ScriptedFetcher {
        fail_products: bool,
        fail_categories: bool,
        fetch_all_calls: AtomicUsize,
        fetch_categories_calls: AtomicUsize,
    }

    #[async_trait]
    impl ProductFetcher for ScriptedFetcher {
        async fn fetch_all(&self) -> CatalogResult<Vec<Product>> {
            self.fetch_all_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_products {
                return Err(CatalogError::Remote { status: 500 });
            }
            Ok(vec![test_product(1), test_product(2)])
        }

        async fn fetch_categories(&self) -> CatalogResult<Vec<String>> {
            self.fetch_categories_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_categories {
                return Err(CatalogError::Remote { status: 500 });
            }
            Ok(vec!["electronics".to_string()])
        }

        async fn fetch_one(&self, id: u64) -> CatalogResult<Product> {
            Ok(test_product(id))
        }
    }

    /// Sink that records every notification for assertions.
    #[derive(Default)]
    struct RecordingSink {
        notifications: Mutex<Vec<Notification>>,
    }

    impl NotificationSink for RecordingSink {
        fn notify(&self, notification: Notification) {
            self.notifications
                .lock()
                .expect("sink mutex poisoned")
                .push(notification);
        }
    }

    impl RecordingSink {
        fn count(&self) -> usize {
            self.notifications.lock().expect("sink mutex poisoned").len()
        }
    }

    struct Offline;

    impl ConnectivityProbe for Offline {
        fn is_online(&self) -> bool {
            false
        }
    }

    /// Store wrapper that counts writes per key.
    struct CountingStore {
        inner: MemoryStore,
        set_calls: Mutex<Vec<String>>,
    }

    impl CountingStore {
        fn new() -> Self {
            CountingStore {
                inner: MemoryStore::new(),
                set_calls: Mutex::new(Vec::new()),
            }
        }

        fn sets_for(&self, key: &str) -> usize {
            self.set_calls
                .lock()
                .expect("counter mutex poisoned")
                .iter()
                .filter(|k| *k == key)
                .count()
        }
    }

    #[async_trait]
    impl KeyValueStore for CountingStore {
        async fn get(&self, key: &str) -> StoreResult<Option<String>> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
            self.set_calls
                .lock()
                .expect("counter mutex poisoned")
                .push(key.to_string());
            self.inner.set(key, value).await
        }

        async fn remove(&self, key: &str) -> StoreResult<()> {
            self.inner.remove(key).await
        }
    }

    struct Harness {
        backend: Arc<CountingStore>,
        fetcher: Arc<ScriptedFetcher>,
        sink: Arc<RecordingSink>,
        sync: SyncOrchestrator,
    }

    fn harness(fetcher: ScriptedFetcher, probe: Arc<dyn ConnectivityProbe>) -> Harness {
        let backend = Arc::new(CountingStore::new());
        let fetcher = Arc::new(fetcher);
        let sink = Arc::new(RecordingSink::default());
        let sync = SyncOrchestrator::new(
            CacheCodec::new(Some(backend.clone() as Arc<dyn KeyValueStore>)),
            fetcher.clone(),
            probe,
            sink.clone(),
        );
        Harness {
            backend,
            fetcher,
            sink,
            sync,
        }
    }

    #[tokio::test]
    async fn test_offline_sync_is_a_noop() {
        let h = harness(ScriptedFetcher::default(), Arc::new(Offline));

        h.sync.sync().await;

        assert_eq!(h.fetcher.fetch_all_calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.sink.count(), 0);
    }

    #[tokio::test]
    async fn test_successful_sync_writes_both_caches() {
        let h = harness(ScriptedFetcher::default(), Arc::new(AlwaysOnline));

        h.sync.sync().await;

        assert_eq!(h.backend.sets_for(PRODUCTS_CACHE_KEY), 1);
        assert_eq!(h.backend.sets_for(CATEGORIES_CACHE_KEY), 1);
        assert_eq!(h.sink.count(), 0);
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_products_and_notifies_once() {
        let h = harness(
            ScriptedFetcher {
                fail_categories: true,
                ..Default::default()
            },
            Arc::new(AlwaysOnline),
        );

        h.sync.sync().await;

        // Products were written exactly once and stay valid.
        assert_eq!(h.backend.sets_for(PRODUCTS_CACHE_KEY), 1);
        assert_eq!(h.backend.sets_for(CATEGORIES_CACHE_KEY), 0);

        // Exactly one notification, destructive severity.
        let notifications = h.sink.notifications.lock().unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].title, "Sync failed");
        assert_eq!(notifications[0].severity, Severity::Destructive);
    }

    #[tokio::test]
    async fn test_products_failure_skips_categories() {
        let h = harness(
            ScriptedFetcher {
                fail_products: true,
                ..Default::default()
            },
            Arc::new(AlwaysOnline),
        );

        h.sync.sync().await;

        assert_eq!(h.fetcher.fetch_all_calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.fetcher.fetch_categories_calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.backend.sets_for(PRODUCTS_CACHE_KEY), 0);
        assert_eq!(h.sink.count(), 1);
    }

    #[tokio::test]
    async fn test_run_syncs_at_startup_and_on_reconnect() {
        let h = harness(ScriptedFetcher::default(), Arc::new(AlwaysOnline));

        let (tx, rx) = mpsc::channel(8);
        tx.send(ConnectivityEvent::Offline).await.unwrap();
        tx.send(ConnectivityEvent::Online).await.unwrap();
        // A repeated Online without an intervening Offline must not re-sync.
        tx.send(ConnectivityEvent::Online).await.unwrap();
        drop(tx);

        h.sync.run(rx).await;

        // Once at startup (already online) + once on the reconnect.
        assert_eq!(h.fetcher.fetch_all_calls.load(Ordering::SeqCst), 2);
    }
}
