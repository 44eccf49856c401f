//! # Local JSON Store
//!
//! The fallback store: a single JSON file holding two named collections,
//! `"products"` and `"sales"`, each a serialized ordered sequence. Used
//! when the SQLite store is unreachable, preserving the same conflict and
//! not-found semantics so handlers cannot tell the difference.
//!
//! Data lives in memory behind a mutex; every mutation rewrites the file.
//! Collections at this scale are small, so whole-file rewrites are cheap
//! and keep the on-disk layout trivially inspectable.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::{ProductStore, SaleStore, StoreError, StoreResult};
use mart_core::{Product, ProductPatch, Sale};

/// On-disk layout: two named collections.
#[derive(Debug, Default, Serialize, Deserialize)]
struct LocalData {
    products: Vec<Product>,
    sales: Vec<Sale>,
}

/// Store backed by a local JSON file.
pub struct LocalStore {
    path: PathBuf,
    data: Mutex<LocalData>,
}

impl LocalStore {
    /// Opens (or initializes) a local store at `path`.
    ///
    /// Never fails: a missing or unreadable file yields empty collections,
    /// which keeps the interface responsive; the next successful write
    /// replaces the file.
    pub async fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();

        let data = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<LocalData>(&bytes) {
                Ok(data) => {
                    debug!(
                        products = data.products.len(),
                        sales = data.sales.len(),
                        "Loaded local store"
                    );
                    data
                }
                Err(e) => {
                    warn!(error = %e, path = %path.display(), "Local store unreadable, starting empty");
                    LocalData::default()
                }
            },
            Err(_) => LocalData::default(),
        };

        LocalStore {
            path,
            data: Mutex::new(data),
        }
    }

    /// Writes the current collections back to disk.
    async fn persist(&self, data: &LocalData) -> StoreResult<()> {
        let json = serde_json::to_vec_pretty(data).map_err(|e| StoreError::Internal(e.to_string()))?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl ProductStore for LocalStore {
    async fn list(&self) -> StoreResult<Vec<Product>> {
        let data = self.data.lock().await;
        let mut products = data.products.clone();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(products)
    }

    async fn get(&self, id: &str) -> StoreResult<Option<Product>> {
        let data = self.data.lock().await;
        Ok(data.products.iter().find(|p| p.id == id).cloned())
    }

    async fn get_by_barcode(&self, barcode: &str) -> StoreResult<Option<Product>> {
        let data = self.data.lock().await;
        Ok(data.products.iter().find(|p| p.barcode == barcode).cloned())
    }

    async fn insert(&self, product: &Product) -> StoreResult<()> {
        let mut data = self.data.lock().await;

        if data.products.iter().any(|p| p.barcode == product.barcode) {
            return Err(StoreError::duplicate_barcode(&product.barcode));
        }

        data.products.push(product.clone());
        self.persist(&data).await
    }

    async fn update(&self, id: &str, patch: &ProductPatch) -> StoreResult<Product> {
        let mut data = self.data.lock().await;

        if let Some(barcode) = &patch.barcode {
            if data
                .products
                .iter()
                .any(|p| p.barcode == *barcode && p.id != id)
            {
                return Err(StoreError::duplicate_barcode(barcode));
            }
        }

        let product = data
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::not_found("Product", id))?;

        if let Some(barcode) = &patch.barcode {
            product.barcode = barcode.clone();
        }
        if let Some(name) = &patch.name {
            product.name = name.clone();
        }
        if let Some(price_cents) = patch.price_cents {
            product.price_cents = price_cents;
        }
        let updated = product.clone();

        self.persist(&data).await?;
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let mut data = self.data.lock().await;

        let before = data.products.len();
        data.products.retain(|p| p.id != id);
        if data.products.len() == before {
            return Err(StoreError::not_found("Product", id));
        }

        self.persist(&data).await
    }
}

#[async_trait]
impl SaleStore for LocalStore {
    async fn list(&self) -> StoreResult<Vec<Sale>> {
        let data = self.data.lock().await;
        Ok(data.sales.clone())
    }

    async fn get(&self, id: &str) -> StoreResult<Option<Sale>> {
        let data = self.data.lock().await;
        Ok(data.sales.iter().find(|s| s.id == id).cloned())
    }

    async fn insert(&self, sale: &Sale) -> StoreResult<()> {
        let mut data = self.data.lock().await;

        if data.sales.iter().any(|s| s.id == sale.id) {
            return Err(StoreError::Conflict {
                field: "sale id".to_string(),
                value: sale.id.clone(),
            });
        }

        data.sales.push(sale.clone());
        self.persist(&data).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use mart_core::SaleLine;

    fn product(barcode: &str, name: &str, price_cents: i64) -> Product {
        Product {
            id: uuid::Uuid::new_v4().to_string(),
            barcode: barcode.to_string(),
            name: name.to_string(),
            price_cents,
            created_at: Utc::now(),
        }
    }

    fn sample_sale() -> Sale {
        let date = Utc::now();
        Sale {
            id: Sale::derive_id(date),
            date,
            items: vec![SaleLine {
                product_id: "a".to_string(),
                name: "Dairy Milk Chocolate".to_string(),
                unit_price_cents: 150,
                quantity: 2,
                line_total_cents: 300,
            }],
            total_cents: 300,
        }
    }

    async fn temp_store() -> (tempfile::TempDir, LocalStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path().join("mart-local.json")).await;
        (dir, store)
    }

    #[tokio::test]
    async fn test_missing_file_starts_empty() {
        let (_dir, store) = temp_store().await;
        assert!(ProductStore::list(&store).await.unwrap().is_empty());
        assert!(SaleStore::list(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_products_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mart-local.json");

        {
            let store = LocalStore::open(&path).await;
            ProductStore::insert(&store, &product("111", "A", 100))
                .await
                .unwrap();
            SaleStore::insert(&store, &sample_sale()).await.unwrap();
        }

        let reopened = LocalStore::open(&path).await;
        assert_eq!(ProductStore::list(&reopened).await.unwrap().len(), 1);
        assert_eq!(SaleStore::list(&reopened).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_barcode_conflict() {
        let (_dir, store) = temp_store().await;

        ProductStore::insert(&store, &product("111", "A", 100))
            .await
            .unwrap();
        let err = ProductStore::insert(&store, &product("111", "B", 200))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let (_dir, store) = temp_store().await;

        let mut older = product("111", "Older", 100);
        older.created_at = Utc::now() - Duration::seconds(60);
        ProductStore::insert(&store, &older).await.unwrap();
        ProductStore::insert(&store, &product("222", "Newer", 200))
            .await
            .unwrap();

        let listed = ProductStore::list(&store).await.unwrap();
        assert_eq!(listed[0].name, "Newer");
        assert_eq!(listed[1].name, "Older");
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (_dir, store) = temp_store().await;

        let p = product("111", "A", 100);
        ProductStore::insert(&store, &p).await.unwrap();

        let updated = store
            .update(
                &p.id,
                &ProductPatch {
                    name: Some("Renamed".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.barcode, "111");

        store.delete(&p.id).await.unwrap();
        let err = store.delete(&p.id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_barcode_conflict() {
        let (_dir, store) = temp_store().await;

        ProductStore::insert(&store, &product("111", "A", 100))
            .await
            .unwrap();
        let b = product("222", "B", 200);
        ProductStore::insert(&store, &b).await.unwrap();

        let err = store
            .update(
                &b.id,
                &ProductPatch {
                    barcode: Some("111".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mart-local.json");
        tokio::fs::write(&path, b"{not json").await.unwrap();

        let store = LocalStore::open(&path).await;
        assert!(ProductStore::list(&store).await.unwrap().is_empty());
    }
}
