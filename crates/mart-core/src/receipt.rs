//! # Receipt Rendering
//!
//! Pure conversion of a [`Sale`] into a plain-text receipt document.
//!
//! The renderer takes every knob from [`ReceiptOptions`] so the server can
//! wire its configuration straight through; nothing here reads config or
//! touches I/O. The HTTP layer serves the result as a downloadable
//! attachment.

use crate::money::Money;
use crate::types::Sale;

/// Width of the separator rules, matching the printed till-roll layout.
const RULE_WIDTH: usize = 40;

// =============================================================================
// Receipt Options
// =============================================================================

/// Everything the receipt renderer is allowed to vary on.
///
/// Every recognized option is an explicit typed field with a default;
/// there is no open-ended settings map.
#[derive(Debug, Clone)]
pub struct ReceiptOptions {
    /// Store name printed at the top.
    pub store_name: String,

    /// Store address line.
    pub store_address: String,

    /// Store phone number.
    pub store_phone: String,

    /// Currency symbol or code prefix, e.g. "PKR".
    pub currency_symbol: String,

    /// Number of decimal places for the currency.
    pub currency_decimals: u8,

    /// Print the address/phone block under the store name.
    pub show_store_info: bool,

    /// Print an informational tax line under the total.
    ///
    /// The tax line is display-only: the sale total never includes tax.
    pub show_tax_details: bool,

    /// Tax rate in basis points (825 = 8.25%). Used only when
    /// `show_tax_details` is set.
    pub tax_rate_bps: u32,

    /// Footer message, printed when present.
    pub footer_message: Option<String>,
}

impl Default for ReceiptOptions {
    fn default() -> Self {
        ReceiptOptions {
            store_name: "Smart Mart".to_string(),
            store_address: "123 Main Street, City".to_string(),
            store_phone: "+92 123 4567890".to_string(),
            currency_symbol: "PKR".to_string(),
            currency_decimals: 2,
            show_store_info: true,
            show_tax_details: false,
            tax_rate_bps: 0,
            footer_message: Some("Thank you for shopping with us!".to_string()),
        }
    }
}

impl ReceiptOptions {
    /// Formats an amount in the smallest currency unit as a display string.
    pub fn format_currency(&self, cents: i64) -> String {
        let divisor = 10_i64.pow(self.currency_decimals as u32);
        let whole = cents / divisor;
        let frac = (cents % divisor).abs();

        format!(
            "{}{} {}",
            if cents < 0 { "-" } else { "" },
            self.currency_symbol,
            if self.currency_decimals > 0 {
                format!(
                    "{}.{:0width$}",
                    whole.abs(),
                    frac,
                    width = self.currency_decimals as usize
                )
            } else {
                whole.abs().to_string()
            }
        )
    }
}

// =============================================================================
// Rendering
// =============================================================================

/// Renders a sale as a plain-text receipt.
///
/// ## Layout
/// ```text
/// Smart Mart
/// 123 Main Street, City
/// Tel: +92 123 4567890
///
/// SALES RECEIPT
/// ID: SALE-1769859200000
/// Date: 2026-01-31 12:00:00 UTC
///
/// ----------------------------------------
/// ITEMS
/// ----------------------------------------
/// Dairy Milk Chocolate x 2
///   PKR 150.00 each
///   Total: PKR 300.00
///
/// ----------------------------------------
/// TOTAL: PKR 400.00
/// ----------------------------------------
///
/// Thank you for shopping with us!
/// ```
pub fn render_receipt(sale: &Sale, options: &ReceiptOptions) -> String {
    let rule = "-".repeat(RULE_WIDTH);
    let mut out = String::new();

    out.push_str(&options.store_name);
    out.push('\n');
    if options.show_store_info {
        out.push_str(&options.store_address);
        out.push('\n');
        out.push_str(&format!("Tel: {}\n", options.store_phone));
    }
    out.push('\n');

    out.push_str("SALES RECEIPT\n");
    out.push_str(&format!("ID: {}\n", sale.id));
    out.push_str(&format!("Date: {}\n", sale.date.format("%Y-%m-%d %H:%M:%S UTC")));
    out.push('\n');

    out.push_str(&rule);
    out.push_str("\nITEMS\n");
    out.push_str(&rule);
    out.push('\n');

    for item in &sale.items {
        out.push_str(&format!("{} x {}\n", item.name, item.quantity));
        out.push_str(&format!(
            "  {} each\n",
            options.format_currency(item.unit_price_cents)
        ));
        out.push_str(&format!(
            "  Total: {}\n",
            options.format_currency(item.line_total_cents)
        ));
        out.push('\n');
    }

    out.push_str(&rule);
    out.push('\n');
    out.push_str(&format!(
        "TOTAL: {}\n",
        options.format_currency(sale.total_cents)
    ));
    if options.show_tax_details && options.tax_rate_bps > 0 {
        let tax = Money::from_cents(sale.total_cents).at_bps(options.tax_rate_bps);
        out.push_str(&format!(
            "Tax ({}%): {}\n",
            options.tax_rate_bps as f64 / 100.0,
            options.format_currency(tax.cents())
        ));
    }
    out.push_str(&rule);
    out.push('\n');

    if let Some(footer) = &options.footer_message {
        out.push('\n');
        out.push_str(footer);
        out.push('\n');
    }

    out
}

// =============================================================================
// Unit Tests
// =============================================================================
