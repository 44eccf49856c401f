//! # Domain Types
//!
//! Core domain types used throughout Smart Mart POS.
//!
//! ## Identity
//! - `Product.id`: UUID v4, immutable, used for database relations
//! - `Product.barcode`: business identifier, unique, scannable, mutable
//! - `Sale.id`: `SALE-<unix-millis>` - monotonically derived, human-legible
//!
//! ## Snapshot Pattern
//! A [`SaleLine`] freezes the product name and unit price at the moment of
//! checkout. Later edits to the catalog never rewrite sales history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Barcode (EAN-13, UPC-A, etc.). Unique across the catalog;
    /// uniqueness is enforced at write time.
    pub barcode: String,

    /// Display name shown at the till and on receipts.
    pub name: String,

    /// Price in the smallest currency unit. Never negative.
    pub price_cents: i64,

    /// When the product was created.
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money value.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

/// Fields for creating a product. Id and timestamp are assigned by the
/// system, never by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub barcode: String,
    pub name: String,
    pub price_cents: i64,
}

/// A partial product update. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price_cents: Option<i64>,
    pub barcode: Option<String>,
}

impl ProductPatch {
    /// Checks whether the patch changes anything at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price_cents.is_none() && self.barcode.is_none()
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A persisted, immutable record of a completed checkout.
///
/// ## Invariants
/// - `total_cents == sum(items[i].line_total_cents)`
/// - each `line_total_cents == unit_price_cents * quantity`
/// - `items` keeps cart insertion order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    /// Unique identifier, `SALE-<unix-millis>`.
    pub id: String,

    /// When the checkout completed.
    pub date: DateTime<Utc>,

    /// Ordered line-item snapshots.
    pub items: Vec<SaleLine>,

    /// Grand total in the smallest currency unit.
    pub total_cents: i64,
}

impl Sale {
    /// Returns the total as a Money value.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Derives a sale id from a timestamp.
    ///
    /// Millisecond resolution keeps ids monotonic across checkouts on a
    /// single till, which is all this system has.
    pub fn derive_id(date: DateTime<Utc>) -> String {
        format!("SALE-{}", date.timestamp_millis())
    }
}

// =============================================================================
// Sale Line
// =============================================================================

/// A line item in a sale - the frozen snapshot of a cart line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleLine {
    /// Product the line refers to (for later lookup; may be deleted).
    pub product_id: String,

    /// Product name at time of sale (frozen).
    pub name: String,

    /// Unit price in the smallest currency unit at time of sale (frozen).
    pub unit_price_cents: i64,

    /// Quantity sold. Always >= 1.
    pub quantity: i64,

    /// Line total (unit_price x quantity).
    pub line_total_cents: i64,
}

impl SaleLine {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
