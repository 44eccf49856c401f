//! # mart-core: Pure Business Logic for Smart Mart POS
//!
//! This crate is the heart of the system. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   HTTP API (apps/server)                    │
//! │   /api/products   /api/cart   /api/sales   .../receipt      │
//! └──────────────────────────────┬──────────────────────────────┘
//!                                │
//! ┌──────────────────────────────▼──────────────────────────────┐
//! │                 ★ mart-core (THIS CRATE) ★                  │
//! │                                                             │
//! │   ┌─────────┐  ┌───────┐  ┌──────┐  ┌──────────┐  ┌──────┐ │
//! │   │  types  │  │ money │  │ cart │  │validation│  │receipt│ │
//! │   │ Product │  │ Money │  │ Cart │  │  rules   │  │ text │ │
//! │   │  Sale   │  │ cents │  │Lines │  │  checks  │  │render│ │
//! │   └─────────┘  └───────┘  └──────┘  └──────────┘  └──────┘ │
//! │                                                             │
//! │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS        │
//! └──────────────────────────────┬──────────────────────────────┘
//!                                │
//! ┌──────────────────────────────▼──────────────────────────────┐
//! │                 mart-db (Database Layer)                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, SaleLine)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - The cart aggregator (add/remove/adjust, subtotal, snapshot)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//! - [`receipt`] - Plain-text receipt rendering
//!
//! ## Design Principles
//!
//! 1. Every function is deterministic - same input, same output
//! 2. No I/O: database, network and file system access is forbidden here
//! 3. Integer money: all monetary values are minor units (i64)
//! 4. Explicit errors: typed enums, never strings or panics

pub mod cart;
pub mod error;
pub mod money;
pub mod receipt;
pub mod types;
pub mod validation;

// Re-exports for convenience: `use mart_core::Money` instead of
// `use mart_core::money::Money`.
pub use cart::{Cart, CartLine};
pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use receipt::ReceiptOptions;
pub use types::{NewProduct, Product, ProductPatch, Sale, SaleLine};
