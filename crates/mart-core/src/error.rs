//! # Error Types
//!
//! Domain-specific error types for mart-core.
//!
//! ## Error Hierarchy
//! ```text
//! mart-core errors (this file)
//! ├── CoreError        - General domain errors
//! └── ValidationError  - Input validation failures
//!
//! mart-db errors (separate crate)
//! └── DbError          - Database operation failures
//!
//! HTTP API errors (in apps/server)
//! └── ApiError         - What clients see (serialized)
//!
//! Flow: ValidationError → CoreError → DbError → ApiError → client
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (barcode, id, etc.)
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These represent business rule violations. They are caught at the API
/// layer and translated to user-facing messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found by id or barcode.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Sale cannot be found.
    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    /// Checkout was requested on a cart with no lines.
    ///
    /// The cart is left untouched; the caller may keep adding items.
    #[error("Cart is empty")]
    EmptyCart,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when user input doesn't meet requirements. Used for early
/// validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g. bad characters in a barcode).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g. duplicate barcode).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },

    /// A sale line's arithmetic doesn't hold
    /// (line_total != unit_price * quantity, or total != sum of lines).
    #[error("sale totals are inconsistent: {reason}")]
    InconsistentTotals { reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::ProductNotFound("8901234567890".to_string());
        assert_eq!(err.to_string(), "Product not found: 8901234567890");

        assert_eq!(CoreError::EmptyCart.to_string(), "Cart is empty");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "barcode".to_string(),
        };
        assert_eq!(err.to_string(), "barcode is required");

        let err = ValidationError::Duplicate {
            field: "barcode".to_string(),
            value: "8901234567890".to_string(),
        };
        assert_eq!(err.to_string(), "barcode '8901234567890' already exists");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
