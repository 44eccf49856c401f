//! # Server Configuration
//!
//! Every recognized option is an explicit typed field with a default;
//! there is no open-ended settings map. Overrides come from `MART_*`
//! environment variables.
//!
//! ## Environment Variables
//! - `MART_BIND` - listen address (default `127.0.0.1:4000`)
//! - `MART_DB_PATH` - SQLite file path (default `./mart.db`)
//! - `MART_LOCAL_STORE_PATH` - JSON fallback path (default `./mart-local.json`)
//! - `MART_STORE_NAME` / `MART_STORE_ADDRESS` / `MART_STORE_PHONE`
//! - `MART_CURRENCY` - currency code/symbol prefix (default `PKR`)
//! - `MART_TAX_RATE` - percentage, e.g. `8.25` (default `0`)
//! - `MART_RECEIPT_SHOW_STORE_INFO` / `MART_RECEIPT_SHOW_TAX` - `true`/`false`
//! - `MART_RECEIPT_FOOTER` - footer message (empty string disables it)

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use mart_core::ReceiptOptions;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Listen address for the HTTP server.
    pub bind_addr: String,

    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Path to the local JSON fallback store.
    pub local_store_path: PathBuf,

    /// Store name (displayed on receipts).
    pub store_name: String,

    /// Store address line (for receipts).
    pub store_address: String,

    /// Store phone number (for receipts).
    pub store_phone: String,

    /// Currency code, also used as the display prefix.
    pub currency: String,

    /// Number of decimal places for the currency.
    pub currency_decimals: u8,

    /// Tax rate in basis points (825 = 8.25%). Display-only: sale totals
    /// never include tax.
    pub tax_rate_bps: u32,

    /// Receipt rendering toggles.
    pub receipt: ReceiptConfig,
}

/// Receipt rendering toggles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptConfig {
    /// Print the address/phone block under the store name.
    pub show_store_info: bool,

    /// Print the informational tax line under the total.
    pub show_tax_details: bool,

    /// Footer message; `None` omits the footer entirely.
    pub footer_message: Option<String>,
}

impl Default for ReceiptConfig {
    fn default() -> Self {
        ReceiptConfig {
            show_store_info: true,
            show_tax_details: false,
            footer_message: Some("Thank you for shopping with us!".to_string()),
        }
    }
}

impl Default for ServerConfig {
    /// Defaults suitable for development: local files next to the binary,
    /// the demo store identity, tax off.
    fn default() -> Self {
        ServerConfig {
            bind_addr: "127.0.0.1:4000".to_string(),
            database_path: PathBuf::from("./mart.db"),
            local_store_path: PathBuf::from("./mart-local.json"),
            store_name: "Smart Mart".to_string(),
            store_address: "123 Main Street, City".to_string(),
            store_phone: "+92 123 4567890".to_string(),
            currency: "PKR".to_string(),
            currency_decimals: 2,
            tax_rate_bps: 0,
            receipt: ReceiptConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Creates a configuration from environment variables and defaults.
    pub fn from_env() -> Self {
        let mut config = ServerConfig::default();

        if let Ok(bind) = env::var("MART_BIND") {
            config.bind_addr = bind;
        }
        if let Ok(path) = env::var("MART_DB_PATH") {
            config.database_path = PathBuf::from(path);
        }
        if let Ok(path) = env::var("MART_LOCAL_STORE_PATH") {
            config.local_store_path = PathBuf::from(path);
        }
        if let Ok(name) = env::var("MART_STORE_NAME") {
            config.store_name = name;
        }
        if let Ok(address) = env::var("MART_STORE_ADDRESS") {
            config.store_address = address;
        }
        if let Ok(phone) = env::var("MART_STORE_PHONE") {
            config.store_phone = phone;
        }
        if let Ok(currency) = env::var("MART_CURRENCY") {
            config.currency = currency;
        }
        if let Ok(rate_str) = env::var("MART_TAX_RATE") {
            if let Ok(rate) = rate_str.parse::<f64>() {
                config.tax_rate_bps = (rate * 100.0).round() as u32;
            }
        }
        if let Ok(flag) = env::var("MART_RECEIPT_SHOW_STORE_INFO") {
            config.receipt.show_store_info = flag == "true";
        }
        if let Ok(flag) = env::var("MART_RECEIPT_SHOW_TAX") {
            config.receipt.show_tax_details = flag == "true";
        }
        if let Ok(footer) = env::var("MART_RECEIPT_FOOTER") {
            config.receipt.footer_message = if footer.is_empty() {
                None
            } else {
                Some(footer)
            };
        }

        config
    }

    /// Maps the configuration onto receipt rendering options.
    pub fn receipt_options(&self) -> ReceiptOptions {
        ReceiptOptions {
            store_name: self.store_name.clone(),
            store_address: self.store_address.clone(),
            store_phone: self.store_phone.clone(),
            currency_symbol: self.currency.clone(),
            currency_decimals: self.currency_decimals,
            show_store_info: self.receipt.show_store_info,
            show_tax_details: self.receipt.show_tax_details,
            tax_rate_bps: self.tax_rate_bps,
            footer_message: self.receipt.footer_message.clone(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.store_name, "Smart Mart");
        assert_eq!(config.currency, "PKR");
        assert_eq!(config.tax_rate_bps, 0);
        assert!(config.receipt.show_store_info);
        assert!(!config.receipt.show_tax_details);
    }

    #[test]
    fn test_receipt_options_mapping() {
        let mut config = ServerConfig::default();
        config.store_name = "Corner Shop".to_string();
        config.tax_rate_bps = 825;
        config.receipt.show_tax_details = true;
        config.receipt.footer_message = None;

        let options = config.receipt_options();
        assert_eq!(options.store_name, "Corner Shop");
        assert_eq!(options.tax_rate_bps, 825);
        assert!(options.show_tax_details);
        assert!(options.footer_message.is_none());
    }
}
