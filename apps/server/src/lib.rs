//! # mart-server: HTTP API for Smart Mart POS
//!
//! ## Startup Sequence
//! ```text
//! 1. Initialize logging       tracing-subscriber with env filter
//! 2. Load configuration       MART_* env vars over typed defaults
//! 3. Select a store           SQLite, or the local JSON fallback
//! 4. Build application state  stores + session cart + config
//! 5. Serve                    axum router on the configured address
//! ```
//!
//! ## Module Organization
//! ```text
//! mart_server/
//! ├── lib.rs       ◄─── you are here (startup & serve)
//! ├── config.rs    ◄─── typed configuration from the environment
//! ├── state.rs     ◄─── AppState, CartState
//! ├── error.rs     ◄─── ApiError for handlers
//! ├── store/       ◄─── ProductStore/SaleStore traits + two impls
//! └── routes/      ◄─── products, sales, cart handlers
//! ```

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod store;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::ServerConfig;
use state::AppState;

/// Runs the server until the process is stopped.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = ServerConfig::from_env();
    info!(bind = %config.bind_addr, store = %config.store_name, "Starting Smart Mart POS server");

    let stores = store::select_store(&config).await;
    let bind_addr = config.bind_addr.clone();
    let state = AppState::new(stores, config);

    let app = routes::router(state);

    let listener = TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "Listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// Default filter is `info,mart=debug,sqlx=warn`; override with `RUST_LOG`.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,mart=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
