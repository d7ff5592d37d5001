//! Storage trait definitions
//!
//! - InventoryStore: reads and writes over the inventory table
//! - Storage: InventoryStore plus lifecycle management

use async_trait::async_trait;

use crate::error::StorageError;
use crate::types::{
    ClusterContext, FilterOptions, HostService, InventoryQuery, InventoryRecord, RecordId,
};

/// Operations over the single inventory table
///
/// Every multi-row read is ordered by `created_date` descending, newest
/// insert first among rows sharing a timestamp.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Insert one row per host, each carrying the shared context
    ///
    /// All rows are written in one transaction. An empty `hosts` slice
    /// inserts nothing and returns 0.
    ///
    /// # Returns
    /// Number of rows inserted
    ///
    /// # Errors
    /// * `StorageError::InsertRejected` - A host was rejected; no row of the batch is kept
    async fn insert_batch(
        &self,
        context: &ClusterContext,
        hosts: &[HostService],
    ) -> Result<u64, StorageError>;

    /// List every row
    ///
    /// # Errors
    /// * `StorageError::Query` - Database error
    async fn list_all(&self) -> Result<Vec<InventoryRecord>, StorageError>;

    /// Run a filter-mode or text-mode query
    ///
    /// An empty filter returns every row.
    ///
    /// # Errors
    /// * `StorageError::Query` - Database error
    async fn search(&self, query: &InventoryQuery) -> Result<Vec<InventoryRecord>, StorageError>;

    /// Fetch exactly the rows whose id is in `ids`
    ///
    /// Unknown ids are ignored. An empty slice returns no rows.
    ///
    /// # Errors
    /// * `StorageError::Query` - Database error
    async fn get_by_ids(&self, ids: &[RecordId]) -> Result<Vec<InventoryRecord>, StorageError>;

    /// Delete the rows whose id is in `ids`
    ///
    /// # Returns
    /// Number of rows actually removed, which may be less than `ids.len()`
    ///
    /// # Errors
    /// * `StorageError::Query` - Database error
    async fn delete_by_ids(&self, ids: &[RecordId]) -> Result<u64, StorageError>;

    /// Distinct platform, app_name, environment and data_center values
    ///
    /// Recomputed from live data on every call.
    ///
    /// # Errors
    /// * `StorageError::Query` - Database error
    async fn filter_options(&self) -> Result<FilterOptions, StorageError>;
}

/// Combined storage interface with lifecycle management
#[async_trait]
pub trait Storage: InventoryStore {
    /// Short backend identifier used in logs
    fn backend_name(&self) -> &'static str;

    /// Ensure the schema exists
    ///
    /// Must be called before any other operations. Idempotent - safe to
    /// call on every process start.
    ///
    /// # Errors
    /// * `StorageError::Migration` - Schema setup failed
    async fn initialize(&self) -> Result<(), StorageError>;

    /// Check storage connectivity and schema presence
    ///
    /// # Errors
    /// * `StorageError::Query` - Backend unreachable
    /// * `StorageError::SchemaMissing` - `initialize` has not run
    async fn health_check(&self) -> Result<(), StorageError>;

    /// Close storage connections
    ///
    /// Called during graceful shutdown. Safe to call more than once.
    async fn close(&self) -> Result<(), StorageError>;
}
