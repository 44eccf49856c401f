//! # Seed Data Generator
//!
//! Populates the database with demo products for development.
//!
//! ## Usage
//! ```bash
//! # Seed the demo catalog into the default database
//! cargo run -p mart-db --bin seed
//!
//! # Specify database path and extra generated products
//! cargo run -p mart-db --bin seed -- --db ./data/mart.db --count 50
//! ```
//!
//! Always seeds the three demo-counter products (the ones the simulated
//! scanner can "detect"), then generates `--count` extra products on top.

use chrono::Utc;
use std::env;

use mart_core::Product;
use mart_db::repository::product::generate_product_id;
use mart_db::{Database, DbConfig};

/// The demo-counter catalog. Barcodes match the simulated scanner's
/// candidate set so a scanned code always resolves to a product.
const DEMO_PRODUCTS: &[(&str, &str, i64)] = &[
    ("8901234567890", "Dairy Milk Chocolate", 15000),
    ("8902345678901", "Pepsi Cola 500ml", 10000),
    ("8903456789012", "Lays Chips Classic", 5000),
];

/// Name stems for generated filler products.
const FILLER_NAMES: &[&str] = &[
    "Tetra Milk 1L",
    "Basmati Rice 5kg",
    "Sunflower Oil 1L",
    "Green Tea 100g",
    "Washing Powder 1kg",
    "Toothpaste 120g",
    "Instant Noodles",
    "Orange Juice 1L",
    "Biscuits Family Pack",
    "Mineral Water 1.5L",
];

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().collect();
    let db_path = flag_value(&args, "--db").unwrap_or_else(|| "./mart.db".to_string());
    let count: usize = flag_value(&args, "--count")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);

    println!("Seeding database at {db_path}");

    let db = match Database::new(DbConfig::new(&db_path)).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Failed to open database: {e}");
            std::process::exit(1);
        }
    };

    let repo = db.products();
    let mut inserted = 0usize;

    for (barcode, name, price_cents) in DEMO_PRODUCTS {
        let product = Product {
            id: generate_product_id(),
            barcode: (*barcode).to_string(),
            name: (*name).to_string(),
            price_cents: *price_cents,
            created_at: Utc::now(),
        };
        match repo.insert(&product).await {
            Ok(()) => inserted += 1,
            // Re-running the seed against an existing database is fine
            Err(mart_db::DbError::UniqueViolation { .. }) => {
                println!("  {barcode} already present, skipping");
            }
            Err(e) => {
                eprintln!("Failed to insert {barcode}: {e}");
                std::process::exit(1);
            }
        }
    }

    for i in 0..count {
        let name = FILLER_NAMES[i % FILLER_NAMES.len()];
        let product = Product {
            id: generate_product_id(),
            barcode: format!("890{:010}", 5_000_000_000u64 + i as u64),
            name: format!("{name} #{}", i + 1),
            price_cents: 2500 + (i as i64 % 40) * 500,
            created_at: Utc::now(),
        };
        match repo.insert(&product).await {
            Ok(()) => inserted += 1,
            Err(mart_db::DbError::UniqueViolation { .. }) => {}
            Err(e) => {
                eprintln!("Failed to insert filler product: {e}");
                std::process::exit(1);
            }
        }
    }

    let total = repo.count().await.unwrap_or(-1);
    println!("Inserted {inserted} products ({total} total in catalog)");
}

/// Reads the value following a `--flag` argument, if present.
fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
