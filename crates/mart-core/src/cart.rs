//! # Cart Aggregator
//!
//! In-memory mapping from product identity to an accumulated line, built
//! up during a checkout session.
//!
//! ## Operations
//! ```text
//! add(product)          - qty +1 if present, else new line with qty 1
//! remove(product_id)    - delete the line; no-op if absent
//! set_quantity(id, n)   - no-op if n < 1 or line absent
//! subtotal_cents()      - sum of line totals, recomputed on demand
//! snapshot_sale(..)     - EmptyCart error, or a Sale worth the subtotal
//! clear()               - drop every line
//! ```
//!
//! ## Ownership
//! Lines exist only inside the cart and only for the duration of a
//! checkout session. Checkout snapshots them into an immutable [`Sale`];
//! the caller persists the sale and clears the cart only after
//! persistence succeeds, so a failed write leaves the session intact.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::{Product, Sale, SaleLine};

// =============================================================================
// Cart Line
// =============================================================================

/// A line in the cart.
///
/// `name` and `unit_price_cents` are frozen copies of product data taken
/// when the line was created, so the cart displays consistent data even
/// if the catalog changes mid-session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Product ID (UUID).
    pub product_id: String,

    /// Product name at time of adding (frozen).
    pub name: String,

    /// Price in the smallest currency unit at time of adding (frozen).
    pub unit_price_cents: i64,

    /// Quantity in cart. Always >= 1.
    pub quantity: i64,
}

impl CartLine {
    /// Creates a new cart line from a product, with quantity 1.
    fn from_product(product: &Product) -> Self {
        CartLine {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price_cents: product.price_cents,
            quantity: 1,
        }
    }

    /// The line total (unit price × quantity). Derived, never stored.
    pub fn line_total_cents(&self) -> i64 {
        self.unit_price_cents * self.quantity
    }

    /// Freezes this line into a sale line.
    fn snapshot(&self) -> SaleLine {
        SaleLine {
            product_id: self.product_id.clone(),
            name: self.name.clone(),
            unit_price_cents: self.unit_price_cents,
            quantity: self.quantity,
            line_total_cents: self.line_total_cents(),
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The cart aggregator.
///
/// ## Invariants
/// - Lines are unique by `product_id` (adding the same product again
///   increments its quantity)
/// - Quantity on every line is >= 1
/// - Insertion order is preserved through to the sale snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Lines in insertion order.
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Adds a product to the cart.
    ///
    /// If the product is already present (matched by id) its quantity is
    /// incremented by 1; otherwise a new line with quantity 1 is appended.
    /// Always succeeds.
    pub fn add(&mut self, product: &Product) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product.id) {
            line.quantity += 1;
            return;
        }
        self.lines.push(CartLine::from_product(product));
    }

    /// Removes a line by product id. Silent no-op if absent.
    pub fn remove(&mut self, product_id: &str) {
        self.lines.retain(|l| l.product_id != product_id);
    }

    /// Sets the quantity of a line.
    ///
    /// Silent no-op if `quantity < 1` or the line is absent.
    pub fn set_quantity(&mut self, product_id: &str, quantity: i64) {
        if quantity < 1 {
            return;
        }
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            line.quantity = quantity;
        }
    }

    /// The running subtotal: sum of all line totals.
    ///
    /// Recomputed on every call, never cached. Carts are tens of items at
    /// most, so O(n) per query is fine and staleness is impossible.
    pub fn subtotal_cents(&self) -> i64 {
        self.lines.iter().map(|l| l.line_total_cents()).sum()
    }

    /// Lines currently in the cart, in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Checks if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Drops every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Snapshots the cart into a [`Sale`].
    ///
    /// Fails with [`CoreError::EmptyCart`] if there are no lines. The cart
    /// itself is NOT cleared here - the checkout service clears it after
    /// the sale has been persisted, so a failed write keeps the session.
    pub fn snapshot_sale(&self, date: DateTime<Utc>) -> CoreResult<Sale> {
        if self.lines.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        let items: Vec<SaleLine> = self.lines.iter().map(CartLine::snapshot).collect();
        let total_cents = items.iter().map(|i| i.line_total_cents).sum();

        Ok(Sale {
            id: Sale::derive_id(date),
            date,
            items,
            total_cents,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
