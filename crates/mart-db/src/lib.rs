//! # mart-db: Database Layer for Smart Mart POS
//!
//! SQLite persistence for the catalog and the sales ledger, built on sqlx.
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (product, sale)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mart_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/mart.db")).await?;
//! let products = db.products().list().await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
