//! SQLite storage backend implementation using sqlx
//!
//! # Architecture
//!
//! - **migrations**: SQL schema in `migrations/sqlite/` (applied via sqlx)
//! - **records**: write side (batch insert, bulk delete)
//! - **queries**: read side (list, filter/text search, fetch by id, distinct values)
//!
//! # Connection Management
//!
//! Uses sqlx's SqlitePool for async database operations without blocking
//! the Tokio runtime. In-memory databases are held by a single pooled
//! connection, since each SQLite connection to `:memory:` would otherwise
//! see its own empty database.
//!
//! # Security
//!
//! All values are bound through sqlx (`bind()`). Identifier lists expand to
//! one `?` placeholder per id; user data is never interpolated into SQL.

use async_trait::async_trait;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use std::str::FromStr;
use std::time::Duration;

use crate::config::StorageConfig;
use crate::error::StorageError;
use crate::traits::{InventoryStore, Storage};
use crate::types::{
    ClusterContext, FilterOptions, HostService, InventoryQuery, InventoryRecord, RecordId,
};

mod queries;
mod records;

/// Embedded SQLite migrations
static MIGRATIONS: sqlx::migrate::Migrator = sqlx::migrate!("migrations/sqlite");

/// Default pool size for file-backed databases
///
/// SQLite is single-writer; extra connections only help concurrent readers.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// SQLite storage backend
///
/// # Examples
///
/// ```no_run
/// use infra_inventory_storage::backends::sqlite::SqliteStorage;
/// use infra_inventory_storage::Storage;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// // In-memory database for testing
/// let storage = SqliteStorage::new(":memory:").await?;
/// storage.initialize().await?;
///
/// // File-based database for production
/// let storage = SqliteStorage::new("/var/lib/inventory/inventory.db").await?;
/// storage.initialize().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Open a SQLite database with the default pool size
    ///
    /// # Arguments
    ///
    /// * `path` - Database path or `:memory:` for in-memory database
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Open` if the database cannot be opened.
    pub async fn new(path: &str) -> Result<Self, StorageError> {
        Self::from_config(&StorageConfig::sqlite_file(path)).await
    }

    /// Open a SQLite database described by a [`StorageConfig`]
    ///
    /// The file is created if absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Open` if the database cannot be opened.
    pub async fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        let pool = if config.is_memory() {
            let options = SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| StorageError::open(&config.path, e))?;

            SqlitePoolOptions::new()
                .min_connections(1)
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await
                .map_err(|e| StorageError::open(&config.path, e))?
        } else {
            let options = SqliteConnectOptions::new()
                .filename(&config.path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .busy_timeout(Duration::from_secs(5));

            SqlitePoolOptions::new()
                .min_connections(1)
                .max_connections(config.pool_size.unwrap_or(DEFAULT_MAX_CONNECTIONS))
                .acquire_timeout(Duration::from_secs(30))
                .idle_timeout(Duration::from_secs(600))
                .connect_with(options)
                .await
                .map_err(|e| StorageError::open(&config.path, e))?
        };

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool for internal use
    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl InventoryStore for SqliteStorage {
    async fn insert_batch(
        &self,
        context: &ClusterContext,
        hosts: &[HostService],
    ) -> Result<u64, StorageError> {
        self.insert_batch_impl(context, hosts).await
    }

    async fn list_all(&self) -> Result<Vec<InventoryRecord>, StorageError> {
        self.list_all_impl().await
    }

    async fn search(&self, query: &InventoryQuery) -> Result<Vec<InventoryRecord>, StorageError> {
        self.search_impl(query).await
    }

    async fn get_by_ids(&self, ids: &[RecordId]) -> Result<Vec<InventoryRecord>, StorageError> {
        self.get_by_ids_impl(ids).await
    }

    async fn delete_by_ids(&self, ids: &[RecordId]) -> Result<u64, StorageError> {
        self.delete_by_ids_impl(ids).await
    }

    async fn filter_options(&self) -> Result<FilterOptions, StorageError> {
        self.filter_options_impl().await
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn initialize(&self) -> Result<(), StorageError> {
        MIGRATIONS
            .run(self.pool())
            .await
            .map_err(StorageError::from)
    }

    async fn health_check(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1")
            .execute(self.pool())
            .await
            .map_err(|e| StorageError::query("health check", e))?;

        let table_exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM sqlite_master
                WHERE type = 'table' AND name = 'inventory'
            )
            "#,
        )
        .fetch_one(self.pool())
        .await
        .map_err(|e| StorageError::query("schema lookup", e))?;

        if !table_exists {
            return Err(StorageError::SchemaMissing);
        }

        Ok(())
    }

    async fn close(&self) -> Result<(), StorageError> {
        self.pool.close().await;
        Ok(())
    }
}

/// Comma-separated `?` list sized to `count`, for `IN (...)` clauses
pub(crate) fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}
