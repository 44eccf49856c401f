//! # Cart Routes
//!
//! The barcode-driven checkout flow, server-side:
//!
//! ```text
//! scan / add by barcode ──► cart aggregation ──► checkout
//!                                                   │
//!                                    Sale persisted ┘ cart cleared
//! ```
//!
//! There is one session cart per process; every handler goes through
//! [`CartState`]'s mutex, so cart mutations never interleave.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{AppState, CartState};
use mart_core::{Cart, CartLine, Product, Sale};
use mart_scan::{NoOpEvents, Scanner, ScannerConfig, SimulatedDecoder, TestPattern};

// =============================================================================
// DTOs
// =============================================================================

/// Cart snapshot returned by every cart mutation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub subtotal_cents: i64,
}

/// A cart line plus its derived total.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    pub product_id: String,
    pub name: String,
    pub unit_price_cents: i64,
    pub quantity: i64,
    pub line_total_cents: i64,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        CartLineView {
            product_id: line.product_id.clone(),
            name: line.name.clone(),
            unit_price_cents: line.unit_price_cents,
            quantity: line.quantity,
            line_total_cents: line.line_total_cents(),
        }
    }
}

impl CartView {
    fn from_cart(cart: &Cart) -> Self {
        CartView {
            lines: cart.lines().iter().map(CartLineView::from).collect(),
            subtotal_cents: cart.subtotal_cents(),
        }
    }
}

fn cart_view(cart: &CartState) -> CartView {
    cart.with_cart(CartView::from_cart)
}

/// Body of `POST /api/cart/items`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCartItemRequest {
    pub barcode: String,
}

/// Body of `PUT /api/cart/items/{product_id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartItemRequest {
    pub quantity: i64,
}

/// Response of `POST /api/cart/scan`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResponse {
    /// The detected barcode, if the session produced one.
    pub code: Option<String>,

    /// The matching product, added to the cart when found.
    pub product: Option<Product>,

    pub cart: CartView,
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /api/cart` - current session cart.
pub async fn get_cart(State(state): State<AppState>) -> Json<CartView> {
    Json(cart_view(&state.cart))
}

/// `POST /api/cart/items` - add a product by barcode.
///
/// The till's manual-entry path: looks the barcode up in the catalog and
/// aggregates it into the cart. 404 when the barcode is unknown.
pub async fn add_cart_item(
    State(state): State<AppState>,
    Json(body): Json<AddCartItemRequest>,
) -> Result<Json<CartView>, ApiError> {
    debug!(barcode = %body.barcode, "add_cart_item");

    let product = state
        .products
        .get_by_barcode(&body.barcode)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", &body.barcode))?;

    state.cart.with_cart_mut(|cart| cart.add(&product));

    Ok(Json(cart_view(&state.cart)))
}

/// `PUT /api/cart/items/{product_id}` - set a line's quantity.
///
/// Quantities below 1, and unknown lines, are silent no-ops: the response
/// is the (unchanged) cart.
pub async fn update_cart_item(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Json(body): Json<UpdateCartItemRequest>,
) -> Json<CartView> {
    state
        .cart
        .with_cart_mut(|cart| cart.set_quantity(&product_id, body.quantity));

    Json(cart_view(&state.cart))
}

/// `DELETE /api/cart/items/{product_id}` - remove a line. No-op if absent.
pub async fn remove_cart_item(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Json<CartView> {
    state.cart.with_cart_mut(|cart| cart.remove(&product_id));

    Json(cart_view(&state.cart))
}

/// `POST /api/cart/checkout` - finalize the session.
///
/// Snapshots the cart into a sale, persists it, and clears the cart only
/// after the write succeeded; a failed write leaves the session intact.
/// 400 `EMPTY_CART` when there is nothing to check out.
pub async fn checkout(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Sale>), ApiError> {
    let sale = state
        .cart
        .with_cart(|cart| cart.snapshot_sale(Utc::now()))?;

    state.sales.insert(&sale).await?;

    state.cart.with_cart_mut(Cart::clear);

    info!(id = %sale.id, total = sale.total_cents, items = sale.items.len(), "Checkout complete");
    Ok((StatusCode::CREATED, Json(sale)))
}

/// `POST /api/cart/scan` - run a capture session and add the result.
///
/// Uses the test-pattern source with the simulated decode strategy, so
/// the flow is demonstrable without camera hardware: the session yields a
/// demo code after the fixed fallback delay. A detected code that matches
/// a catalog product is added to the cart.
pub async fn scan(State(state): State<AppState>) -> Result<Json<ScanResponse>, ApiError> {
    let (scanner, _handle) = Scanner::new(
        ScannerConfig::default(),
        Box::new(TestPattern::new()),
        Box::new(SimulatedDecoder::new()),
        Arc::new(NoOpEvents),
    );

    let code = scanner.run().await?;

    let Some(code) = code else {
        return Ok(Json(ScanResponse {
            code: None,
            product: None,
            cart: cart_view(&state.cart),
        }));
    };

    debug!(code = %code, "Scan session detected a code");

    let product = state.products.get_by_barcode(&code).await?;
    if let Some(product) = &product {
        state.cart.with_cart_mut(|cart| cart.add(product));
    }

    Ok(Json(ScanResponse {
        code: Some(code),
        product,
        cart: cart_view(&state.cart),
    }))
}
