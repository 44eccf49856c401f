//! # Repository Module
//!
//! Repository implementations for database entities.
//!
//! - [`product`] - catalog CRUD, barcode lookup
//! - [`sale`] - sales ledger (append-only) with ordered line items

pub mod product;
pub mod sale;
