//! # Product Routes
//!
//! Catalog CRUD. Duplicate barcodes are rejected with a 400 on both the
//! create and update paths; lookups by barcode serve the scan flow.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;
use mart_core::validation::{validate_barcode, validate_price_cents, validate_product_name};
use mart_core::{NewProduct, Product, ProductPatch};

/// Body of the delete response, matching the contract this API replaces.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// `GET /api/products` - all products, newest first.
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state.products.list().await?;
    Ok(Json(products))
}

/// `GET /api/products/barcode/{barcode}` - lookup for the scan flow.
pub async fn get_product_by_barcode(
    State(state): State<AppState>,
    Path(barcode): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let product = state
        .products
        .get_by_barcode(&barcode)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", &barcode))?;

    Ok(Json(product))
}

/// `POST /api/products` - create a product.
///
/// ## Returns
/// * `201` with the created product
/// * `400` on missing/invalid fields or duplicate barcode
pub async fn create_product(
    State(state): State<AppState>,
    Json(body): Json<NewProduct>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    debug!(barcode = %body.barcode, "create_product");

    validate_barcode(&body.barcode)?;
    validate_product_name(&body.name)?;
    validate_price_cents(body.price_cents)?;

    let product = Product {
        id: Uuid::new_v4().to_string(),
        barcode: body.barcode.trim().to_string(),
        name: body.name.trim().to_string(),
        price_cents: body.price_cents,
        created_at: Utc::now(),
    };

    state.products.insert(&product).await?;

    info!(id = %product.id, barcode = %product.barcode, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// `PUT /api/products/{id}` - partial update.
///
/// Fields left out of the body are unchanged. A barcode change is checked
/// against the rest of the catalog.
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<Product>, ApiError> {
    debug!(id = %id, "update_product");

    if let Some(barcode) = &patch.barcode {
        validate_barcode(barcode)?;
    }
    if let Some(name) = &patch.name {
        validate_product_name(name)?;
    }
    if let Some(price_cents) = patch.price_cents {
        validate_price_cents(price_cents)?;
    }

    let updated = state.products.update(&id, &patch).await?;

    info!(id = %id, "Product updated");
    Ok(Json(updated))
}

/// `DELETE /api/products/{id}`.
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.products.delete(&id).await?;

    info!(id = %id, "Product deleted");
    Ok(Json(MessageResponse {
        message: "Product removed".to_string(),
    }))
}
