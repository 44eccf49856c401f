//! # Routes
//!
//! Handler-per-entity files, assembled into one router:
//!
//! - [`products`] - catalog CRUD and barcode lookup
//! - [`sales`] - ledger listing, direct creation, receipt download
//! - [`cart`] - session cart, scan, checkout

pub mod cart;
pub mod products;
pub mod sales;

use axum::routing::{get, post, put};
use axum::Router;

use crate::state::AppState;

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Catalog
        .route(
            "/api/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/api/products/barcode/{barcode}",
            get(products::get_product_by_barcode),
        )
        .route(
            "/api/products/{id}",
            put(products::update_product).delete(products::delete_product),
        )
        // Ledger
        .route("/api/sales", get(sales::list_sales).post(sales::create_sale))
        .route("/api/sales/{id}/receipt", get(sales::get_receipt))
        // Session cart
        .route("/api/cart", get(cart::get_cart))
        .route("/api/cart/items", post(cart::add_cart_item))
        .route(
            "/api/cart/items/{product_id}",
            put(cart::update_cart_item).delete(cart::remove_cart_item),
        )
        .route("/api/cart/checkout", post(cart::checkout))
        .route("/api/cart/scan", post(cart::scan))
        // Liveness
        .route("/health", get(health))
        .with_state(state)
}

/// Liveness probe.
async fn health() -> &'static str {
    "ok"
}
