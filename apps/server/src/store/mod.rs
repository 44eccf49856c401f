//! # Store Layer
//!
//! Persistence sits behind two async traits with two implementations,
//! selected by availability at startup:
//!
//! ```text
//! ProductStore + SaleStore
//!        │
//!        ├── SqliteStore  (primary: mart-db repositories)
//!        │
//!        └── LocalStore   (fallback: one JSON file, "products" and
//!                          "sales" collections)
//! ```
//!
//! Handlers never know which one they are talking to, and there is no
//! per-call-site fallback: [`select_store`] makes the choice once.

pub mod local;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::ServerConfig;
use mart_core::{Product, ProductPatch, Sale};
use mart_db::{Database, DbConfig, DbError};

pub use local::LocalStore;
pub use sqlite::SqliteStore;

// =============================================================================
// Store Error
// =============================================================================

/// Errors from either store implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Entity not found.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique-field conflict (duplicate barcode, duplicate sale id).
    #[error("{field} '{value}' already exists")]
    Conflict { field: String, value: String },

    /// The backing store cannot be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Anything else (I/O, serialization, SQL).
    #[error("store error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Creates a NotFound error.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a duplicate-barcode conflict.
    pub fn duplicate_barcode(value: impl Into<String>) -> Self {
        StoreError::Conflict {
            field: "barcode".to_string(),
            value: value.into(),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => StoreError::NotFound { entity, id },
            DbError::UniqueViolation { field, value } => StoreError::Conflict { field, value },
            DbError::ConnectionFailed(e) | DbError::MigrationFailed(e) => {
                StoreError::Unavailable(e)
            }
            DbError::PoolExhausted => StoreError::Unavailable("connection pool exhausted".into()),
            other => StoreError::Internal(other.to_string()),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Traits
// =============================================================================

/// Key-value persistence of products, keyed by id and unique barcode.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All products, newest first.
    async fn list(&self) -> StoreResult<Vec<Product>>;

    /// Product by id.
    async fn get(&self, id: &str) -> StoreResult<Option<Product>>;

    /// Product by barcode.
    async fn get_by_barcode(&self, barcode: &str) -> StoreResult<Option<Product>>;

    /// Inserts a product; conflict if the barcode is taken.
    async fn insert(&self, product: &Product) -> StoreResult<()>;

    /// Applies a partial update; conflict if a changed barcode is taken.
    async fn update(&self, id: &str, patch: &ProductPatch) -> StoreResult<Product>;

    /// Deletes a product; NotFound if absent.
    async fn delete(&self, id: &str) -> StoreResult<()>;
}

/// Append-only persistence of sales.
#[async_trait]
pub trait SaleStore: Send + Sync {
    /// All sales, oldest first.
    async fn list(&self) -> StoreResult<Vec<Sale>>;

    /// Sale by id.
    async fn get(&self, id: &str) -> StoreResult<Option<Sale>>;

    /// Appends a sale; conflict if the id is taken.
    async fn insert(&self, sale: &Sale) -> StoreResult<()>;
}

// =============================================================================
// Selection
// =============================================================================

/// The selected store pair handed to the application state.
#[derive(Clone)]
pub struct Stores {
    pub products: Arc<dyn ProductStore>,
    pub sales: Arc<dyn SaleStore>,
}

/// Selects a store by availability.
///
/// Tries SQLite first; if the database cannot be opened, degrades to the
/// local JSON store and keeps serving. Never fails: the local store
/// itself starts from empty collections when its file is unreadable.
pub async fn select_store(config: &ServerConfig) -> Stores {
    match Database::new(DbConfig::new(&config.database_path)).await {
        Ok(db) => {
            info!(path = %config.database_path.display(), "Using SQLite store");
            let store = Arc::new(SqliteStore::new(db));
            Stores {
                products: store.clone(),
                sales: store,
            }
        }
        Err(e) => {
            warn!(
                error = %e,
                path = %config.local_store_path.display(),
                "SQLite unavailable, falling back to local JSON store"
            );
            let store = Arc::new(LocalStore::open(&config.local_store_path).await);
            Stores {
                products: store.clone(),
                sales: store,
            }
        }
    }
}
