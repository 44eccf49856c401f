//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Flow
//! ```text
//! ValidationError / CoreError  (mart-core)
//! StoreError                   (store layer, wraps DbError / file I/O)
//! ScanError                    (mart-scan)
//!          │
//!          ▼
//! ApiError { code, message }   (this module)
//!          │
//!          ▼
//! HTTP status + JSON body      (IntoResponse)
//! ```
//!
//! Clients receive a machine-readable `code` and a human-readable
//! `message`:
//! ```json
//! { "code": "DUPLICATE_BARCODE", "message": "barcode '890...' already exists" }
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::store::StoreError;
use mart_core::{CoreError, ValidationError};
use mart_scan::ScanError;

/// API error returned from HTTP handlers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling.
    pub code: ErrorCode,

    /// Human-readable error message for display.
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404).
    NotFound,

    /// Input validation failed (400).
    ValidationError,

    /// Duplicate barcode on create/update (400).
    DuplicateBarcode,

    /// Checkout attempted on an empty cart (400).
    EmptyCart,

    /// Persistence operation failed (500).
    StoreError,

    /// Camera/capture failure on the scan route (502).
    ScannerError,

    /// Anything else (500).
    Internal,
}

impl ErrorCode {
    fn status(self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            // Duplicate barcode is 400, not 409: the contract this API
            // replaces returned 400 from both duplicate paths.
            ErrorCode::ValidationError | ErrorCode::DuplicateBarcode | ErrorCode::EmptyCart => {
                StatusCode::BAD_REQUEST
            }
            ErrorCode::StoreError | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::ScannerError => StatusCode::BAD_GATEWAY,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::Duplicate { value, .. } => {
                ApiError::new(ErrorCode::DuplicateBarcode, err_message_duplicate(&value))
            }
            other => ApiError::validation(other.to_string()),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", &id),
            CoreError::SaleNotFound(id) => ApiError::not_found("Sale", &id),
            CoreError::EmptyCart => ApiError::new(ErrorCode::EmptyCart, "Cart is empty"),
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            StoreError::Conflict { field, value } => {
                if field.contains("barcode") {
                    ApiError::new(ErrorCode::DuplicateBarcode, err_message_duplicate(&value))
                } else {
                    ApiError::validation(format!("{} '{}' already exists", field, value))
                }
            }
            StoreError::Unavailable(e) => {
                tracing::error!("Store unavailable: {}", e);
                ApiError::new(ErrorCode::StoreError, "Store unavailable")
            }
            StoreError::Internal(e) => {
                // Log the real error; clients get a generic message.
                tracing::error!("Store operation failed: {}", e);
                ApiError::new(ErrorCode::StoreError, "Store operation failed")
            }
        }
    }
}

impl From<ScanError> for ApiError {
    fn from(err: ScanError) -> Self {
        ApiError::new(ErrorCode::ScannerError, err.to_string())
    }
}

fn err_message_duplicate(value: &str) -> String {
    format!("Product with barcode '{}' already exists", value)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status();
        (status, Json(self)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Unit Tests
// =============================================================================
