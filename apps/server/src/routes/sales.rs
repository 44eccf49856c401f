//! # Sale Routes
//!
//! Ledger listing, direct sale creation, and receipt download. Sales are
//! immutable once created, so there is no update or delete surface.

use axum::extract::{Path, State};
use axum::http::header;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;
use mart_core::receipt::render_receipt;
use mart_core::validation::validate_sale_lines;
use mart_core::{Sale, SaleLine};

/// Body of `POST /api/sales`: pre-aggregated lines plus the claimed total.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleRequest {
    pub items: Vec<SaleLine>,
    pub total_cents: i64,
}

/// `GET /api/sales` - all sales, oldest first.
pub async fn list_sales(State(state): State<AppState>) -> Result<Json<Vec<Sale>>, ApiError> {
    let sales = state.sales.list().await?;
    Ok(Json(sales))
}

/// `POST /api/sales` - record a sale directly.
///
/// The totals invariant is enforced: every line total must equal
/// `unit_price * quantity` and the claimed total must equal the sum of
/// line totals, else 400.
pub async fn create_sale(
    State(state): State<AppState>,
    Json(body): Json<CreateSaleRequest>,
) -> Result<(StatusCode, Json<Sale>), ApiError> {
    debug!(items = body.items.len(), total = body.total_cents, "create_sale");

    validate_sale_lines(&body.items, body.total_cents)?;

    let date = Utc::now();
    let sale = Sale {
        id: Sale::derive_id(date),
        date,
        items: body.items,
        total_cents: body.total_cents,
    };

    state.sales.insert(&sale).await?;

    info!(id = %sale.id, total = sale.total_cents, "Sale recorded");
    Ok((StatusCode::CREATED, Json(sale)))
}

/// `GET /api/sales/{id}/receipt` - downloadable receipt document.
///
/// Plain text, served as an attachment; 404 if the sale is absent.
pub async fn get_receipt(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<([(header::HeaderName, String); 2], String), ApiError> {
    let sale = state
        .sales
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Sale", &id))?;

    let text = render_receipt(&sale, &state.config.receipt_options());

    Ok((
        [
            (
                header::CONTENT_TYPE,
                "text/plain; charset=utf-8".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"receipt-{}.txt\"", sale.id),
            ),
        ],
        text,
    ))
}
