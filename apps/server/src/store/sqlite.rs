//! # SQLite Store
//!
//! The primary store: a thin adapter from the store traits onto the
//! `mart-db` repositories. All conflict/not-found semantics come from the
//! repository layer; this file only maps error types.

use async_trait::async_trait;

use super::{ProductStore, SaleStore, StoreResult};
use mart_core::{Product, ProductPatch, Sale};
use mart_db::Database;

/// Store backed by the SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Wraps an open database.
    pub fn new(db: Database) -> Self {
        SqliteStore { db }
    }

    /// The underlying database handle (health checks).
    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl ProductStore for SqliteStore {
    async fn list(&self) -> StoreResult<Vec<Product>> {
        Ok(self.db.products().list().await?)
    }

    async fn get(&self, id: &str) -> StoreResult<Option<Product>> {
        Ok(self.db.products().get_by_id(id).await?)
    }

    async fn get_by_barcode(&self, barcode: &str) -> StoreResult<Option<Product>> {
        Ok(self.db.products().get_by_barcode(barcode).await?)
    }

    async fn insert(&self, product: &Product) -> StoreResult<()> {
        Ok(self.db.products().insert(product).await?)
    }

    async fn update(&self, id: &str, patch: &ProductPatch) -> StoreResult<Product> {
        Ok(self.db.products().update(id, patch).await?)
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        Ok(self.db.products().delete(id).await?)
    }
}

#[async_trait]
impl SaleStore for SqliteStore {
    async fn list(&self) -> StoreResult<Vec<Sale>> {
        Ok(self.db.sales().list().await?)
    }

    async fn get(&self, id: &str) -> StoreResult<Option<Sale>> {
        Ok(self.db.sales().get_by_id(id).await?)
    }

    async fn insert(&self, sale: &Sale) -> StoreResult<()> {
        Ok(self.db.sales().insert(sale).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
