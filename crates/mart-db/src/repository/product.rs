//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! ## Key Operations
//! - List newest-first (the catalog page order)
//! - Lookup by id and by barcode (the scan path)
//! - Insert / partial update with duplicate-barcode checks
//! - Delete
//!
//! Duplicate barcodes are rejected twice: an application-level pre-check
//! that produces a precise error, and the UNIQUE index that backstops
//! races between the check and the write.

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use mart_core::{Product, ProductPatch};

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists all products, newest first.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, barcode, name, price_cents, created_at
            FROM products
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, barcode, name, price_cents, created_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by its barcode.
    pub async fn get_by_barcode(&self, barcode: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, barcode, name, price_cents, created_at
            FROM products
            WHERE barcode = ?1
            "#,
        )
        .bind(barcode)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(())` - Inserted
    /// * `Err(DbError::UniqueViolation)` - barcode already exists
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(barcode = %product.barcode, "Inserting product");

        if self.get_by_barcode(&product.barcode).await?.is_some() {
            return Err(DbError::duplicate("barcode", &product.barcode));
        }

        sqlx::query(
            r#"
            INSERT INTO products (id, barcode, name, price_cents, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&product.id)
        .bind(&product.barcode)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(product.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Applies a partial update to a product.
    ///
    /// ## Behavior
    /// - Fields left `None` in the patch are unchanged
    /// - A barcode change is checked against the rest of the catalog
    ///
    /// ## Returns
    /// * `Ok(Product)` - the updated product
    /// * `Err(DbError::NotFound)` - no such product
    /// * `Err(DbError::UniqueViolation)` - new barcode already taken
    pub async fn update(&self, id: &str, patch: &ProductPatch) -> DbResult<Product> {
        debug!(id = %id, "Updating product");

        let mut product = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))?;

        if let Some(barcode) = &patch.barcode {
            if *barcode != product.barcode {
                if let Some(existing) = self.get_by_barcode(barcode).await? {
                    if existing.id != product.id {
                        return Err(DbError::duplicate("barcode", barcode));
                    }
                }
            }
            product.barcode = barcode.clone();
        }
        if let Some(name) = &patch.name {
            product.name = name.clone();
        }
        if let Some(price_cents) = patch.price_cents {
            product.price_cents = price_cents;
        }

        let result = sqlx::query(
            r#"
            UPDATE products SET barcode = ?2, name = ?3, price_cents = ?4
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.barcode)
        .bind(&product.name)
        .bind(product.price_cents)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(product)
    }

    /// Deletes a product.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - no such product
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts products (for diagnostics and the seed binary).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
