//! # Validation Module
//!
//! Input validation for Smart Mart POS.
//!
//! ## Validation Layers
//! 1. HTTP handlers: type validation (deserialization)
//! 2. THIS MODULE: business rule validation
//! 3. SQLite: NOT NULL and UNIQUE constraints
//!
//! Multiple layers catch different errors; a duplicate barcode that slips
//! past the application check is still stopped by the UNIQUE index.

use crate::error::ValidationError;
use crate::types::SaleLine;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a barcode.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 64 characters
/// - Only alphanumeric characters and hyphens
pub fn validate_barcode(barcode: &str) -> ValidationResult<()> {
    let barcode = barcode.trim();

    if barcode.is_empty() {
        return Err(ValidationError::Required {
            field: "barcode".to_string(),
        });
    }

    if barcode.len() > 64 {
        return Err(ValidationError::TooLong {
            field: "barcode".to_string(),
            max: 64,
        });
    }

    if !barcode.chars().all(|c| c.is_alphanumeric() || c == '-') {
        return Err(ValidationError::InvalidFormat {
            field: "barcode".to_string(),
            reason: "must contain only letters, numbers and hyphens".to_string(),
        });
    }

    Ok(())
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price in the smallest currency unit.
///
/// Zero is allowed (free items); negatives are not.
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a quantity value (must be >= 1).
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 1 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Sale Invariant
// =============================================================================

/// Validates that a set of sale lines and a claimed total are internally
/// consistent.
///
/// ## Checks
/// - at least one line
/// - every quantity >= 1, every unit price >= 0
/// - every `line_total_cents == unit_price_cents * quantity`
/// - `total_cents == sum(line_total_cents)`
pub fn validate_sale_lines(items: &[SaleLine], total_cents: i64) -> ValidationResult<()> {
    if items.is_empty() {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        });
    }

    let mut sum = 0i64;
    for item in items {
        validate_quantity(item.quantity)?;
        validate_price_cents(item.unit_price_cents)?;

        let expected = item.unit_price_cents * item.quantity;
        if item.line_total_cents != expected {
            return Err(ValidationError::InconsistentTotals {
                reason: format!(
                    "line '{}' total {} != {} x {}",
                    item.product_id, item.line_total_cents, item.unit_price_cents, item.quantity
                ),
            });
        }
        sum += item.line_total_cents;
    }

    if total_cents != sum {
        return Err(ValidationError::InconsistentTotals {
            reason: format!("total {} != sum of line totals {}", total_cents, sum),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
