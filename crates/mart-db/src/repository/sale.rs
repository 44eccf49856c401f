//! # Sale Repository
//!
//! Database operations for the sales ledger.
//!
//! The ledger is append-only: sales are inserted exactly once, whole, and
//! never updated. A sale spans two tables - the `sales` row and its
//! `sale_items` rows - written in a single transaction so a crash can
//! never leave a sale without its lines.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use mart_core::{Sale, SaleLine};

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

/// Row shape of the `sales` table. Items are joined in afterwards.
#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: String,
    date: chrono::DateTime<chrono::Utc>,
    total_cents: i64,
}

/// Row shape of the `sale_items` table.
#[derive(Debug, sqlx::FromRow)]
struct SaleItemRow {
    sale_id: String,
    product_id: String,
    name: String,
    unit_price_cents: i64,
    quantity: i64,
    line_total_cents: i64,
}

impl SaleItemRow {
    fn into_line(self) -> SaleLine {
        SaleLine {
            product_id: self.product_id,
            name: self.name,
            unit_price_cents: self.unit_price_cents,
            quantity: self.quantity,
            line_total_cents: self.line_total_cents,
        }
    }
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Inserts a complete sale (row + ordered items) in one transaction.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - sale id already exists
    pub async fn insert(&self, sale: &Sale) -> DbResult<()> {
        debug!(id = %sale.id, total = sale.total_cents, items = sale.items.len(), "Inserting sale");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO sales (id, date, total_cents)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(&sale.id)
        .bind(sale.date)
        .bind(sale.total_cents)
        .execute(&mut *tx)
        .await?;

        for (position, item) in sale.items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO sale_items (
                    sale_id, position, product_id, name,
                    unit_price_cents, quantity, line_total_cents
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(&sale.id)
            .bind(position as i64)
            .bind(&item.product_id)
            .bind(&item.name)
            .bind(item.unit_price_cents)
            .bind(item.quantity)
            .bind(item.line_total_cents)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    /// Lists all sales with their items, oldest first.
    pub async fn list(&self) -> DbResult<Vec<Sale>> {
        let rows = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT id, date, total_cents
            FROM sales
            ORDER BY date ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        // One query for every item row, grouped in memory; the ledger of a
        // single till stays small enough that this beats N+1 round trips.
        let item_rows = sqlx::query_as::<_, SaleItemRow>(
            r#"
            SELECT sale_id, product_id, name, unit_price_cents, quantity, line_total_cents
            FROM sale_items
            ORDER BY sale_id ASC, position ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut items_by_sale: std::collections::HashMap<String, Vec<SaleLine>> =
            std::collections::HashMap::new();
        for row in item_rows {
            items_by_sale
                .entry(row.sale_id.clone())
                .or_default()
                .push(row.into_line());
        }

        let sales = rows
            .into_iter()
            .map(|row| Sale {
                items: items_by_sale.remove(&row.id).unwrap_or_default(),
                id: row.id,
                date: row.date,
                total_cents: row.total_cents,
            })
            .collect();

        Ok(sales)
    }

    /// Gets a sale with its items by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let row = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT id, date, total_cents
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, SaleItemRow>(
            r#"
            SELECT sale_id, product_id, name, unit_price_cents, quantity, line_total_cents
            FROM sale_items
            WHERE sale_id = ?1
            ORDER BY position ASC
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(Sale {
            id: row.id,
            date: row.date,
            items: items.into_iter().map(SaleItemRow::into_line).collect(),
            total_cents: row.total_cents,
        }))
    }

    /// Counts sales (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use chrono::{Duration, Utc};

    fn sample_sale(offset_secs: i64) -> Sale {
        let date = Utc::now() + Duration::seconds(offset_secs);
        Sale {
            id: Sale::derive_id(date),
            date,
            items: vec![
                SaleLine {
                    product_id: "a".to_string(),
                    name: "Dairy Milk Chocolate".to_string(),
                    unit_price_cents: 150,
                    quantity: 2,
                    line_total_cents: 300,
                },
                SaleLine {
                    product_id: "b".to_string(),
                    name: "Pepsi Cola 500ml".to_string(),
                    unit_price_cents: 100,
                    quantity: 1,
                    line_total_cents: 100,
                },
            ],
            total_cents: 400,
        }
    }

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get_preserves_item_order() {
        let db = test_db().await;
        let repo = db.sales();

        let sale = sample_sale(0);
        repo.insert(&sale).await.unwrap();

        let loaded = repo.get_by_id(&sale.id).await.unwrap().unwrap();
        assert_eq!(loaded.total_cents, 400);
        assert_eq!(loaded.items.len(), 2);
        assert_eq!(loaded.items[0].product_id, "a");
        assert_eq!(loaded.items[1].product_id, "b");
        assert_eq!(
            loaded.total_cents,
            loaded.items.iter().map(|i| i.line_total_cents).sum::<i64>()
        );
    }

    #[tokio::test]
    async fn test_get_missing_sale() {
        let db = test_db().await;
        assert!(db.sales().get_by_id("SALE-0").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_returns_all_with_items() {
        let db = test_db().await;
        let repo = db.sales();

        let first = sample_sale(-60);
        let second = sample_sale(0);
        repo.insert(&first).await.unwrap();
        repo.insert(&second).await.unwrap();

        let sales = repo.list().await.unwrap();
        assert_eq!(sales.len(), 2);
        assert_eq!(sales[0].id, first.id);
        assert_eq!(sales[1].id, second.id);
        assert!(sales.iter().all(|s| s.items.len() == 2));
    }

    #[tokio::test]
    async fn test_duplicate_sale_id_rejected() {
        let db = test_db().await;
        let repo = db.sales();

        let sale = sample_sale(0);
        repo.insert(&sale).await.unwrap();

        let err = repo.insert(&sale).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));

        // The failed transaction must not have written partial items
        let loaded = repo.get_by_id(&sale.id).await.unwrap().unwrap();
        assert_eq!(loaded.items.len(), 2);
    }
}
