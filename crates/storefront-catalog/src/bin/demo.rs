//! # Storefront Demo
//!
//! End-to-end wiring of the catalog layer against the live remote API:
//! config → SQLite store → fetcher → cached catalog reads → cart → checkout.
//!
//! ## Usage
//! ```bash
//! # Default database next to the working directory
//! cargo run -p storefront-catalog --bin storefront-demo
//!
//! # Specify database path and API endpoint
//! cargo run -p storefront-catalog --bin storefront-demo -- --db ./storefront.db
//! STOREFRONT_API_URL=http://localhost:8080 cargo run -p storefront-catalog --bin storefront-demo
//! ```
//!
//! Run it twice: the second run serves the catalog from the local cache.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use storefront_catalog::{
    AlwaysOnline, CacheCodec, CatalogConfig, CatalogService, HttpFetcher, LogSink,
    SyncOrchestrator,
};
use storefront_db::{CartStore, KeyValueStore, OrderStore, SqliteStore, StoreConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Storefront Demo");
                println!();
                println!("Usage: storefront-demo [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: platform data dir)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let config = CatalogConfig::load_or_default(None);

    let db_path = db_path
        .or_else(|| config.database_path())
        .unwrap_or_else(|| PathBuf::from("./storefront_dev.db"));
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Durable key-value store shared by the cache and the cart/order stores
    let backend: Arc<dyn KeyValueStore> =
        Arc::new(SqliteStore::open(StoreConfig::new(&db_path)).await?);

    let fetcher = Arc::new(HttpFetcher::new(&config)?);
    let codec = CacheCodec::new(Some(backend.clone()));
    let catalog = CatalogService::new(codec.clone(), fetcher.clone(), &config);

    // Startup sync, the way a host would trigger it when already online
    let sync = SyncOrchestrator::new(
        codec,
        fetcher,
        Arc::new(AlwaysOnline),
        Arc::new(LogSink),
    );
    sync.sync().await;

    // Cached reads
    let products = catalog.get_products().await?;
    let categories = catalog.get_categories().await;

    println!("Catalog: {} products, {} categories", products.len(), categories.len());
    for product in products.iter().take(3) {
        println!("  [{}] {} - {}", product.id, product.title, product.price);
    }

    // Cart and checkout
    let cart = CartStore::new(Some(backend.clone()));
    cart.hydrate().await;

    if let Some(product) = products.first() {
        cart.add_to_cart(product).await;
        cart.add_to_cart(product).await;
    }
    if let Some(product) = products.get(1) {
        cart.add_to_cart(product).await;
    }

    println!(
        "Cart: {} units, total {}",
        cart.cart_item_count(),
        cart.cart_total()
    );

    let orders = OrderStore::new(Some(backend));
    orders.hydrate().await;

    let order = orders.create_order(&cart.items(), cart.cart_total()).await;
    cart.clear_cart().await;

    println!("Order {} placed for {}", order.id, order.total_amount);
    println!("Order history: {} orders", orders.all_orders().len());

    Ok(())
}
