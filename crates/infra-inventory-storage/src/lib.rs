//! Storage layer for the infrastructure inventory service
//!
//! Holds inventory rows (platform/app/cluster context paired with one
//! host/service entry each) in a single relational table.
//!
//! # Architecture
//!
//! Backends implement two traits:
//! - [`InventoryStore`] - Batch insert, filtered/text search, fetch and delete by id
//! - [`Storage`] - Lifecycle management (initialize, health check, close)
//!
//! # Examples
//!
//! ```no_run
//! use infra_inventory_storage::{create_storage, StorageConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // In-memory for testing
//! let config = StorageConfig::from_url("sqlite://:memory:")?;
//! let storage = create_storage(&config).await?;
//!
//! // File-based for production
//! let config = StorageConfig::from_url("sqlite:///var/lib/inventory/inventory.db")?;
//! let storage = create_storage(&config).await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod traits;
mod types;

pub mod backends;

// Re-exports
pub use config::{ConfigError, StorageConfig, MEMORY_PATH};
pub use error::StorageError;
pub use traits::{InventoryStore, Storage};
pub use types::{
    ClusterContext, FilterOptions, HostService, InventoryFilter, InventoryQuery,
    InventoryRecord, RecordId, CREATED_DATE_FORMAT,
};

/// Create storage from configuration
///
/// This is the primary entry point for creating a storage backend.
/// It opens the database and ensures the schema exists.
///
/// # Errors
///
/// Returns `StorageError::Open` if the database cannot be opened and
/// `StorageError::Migration` if schema setup fails.
pub async fn create_storage(
    config: &StorageConfig,
) -> Result<std::sync::Arc<dyn Storage>, StorageError> {
    let storage: std::sync::Arc<dyn Storage> =
        std::sync::Arc::new(backends::sqlite::SqliteStorage::from_config(config).await?);

    storage.initialize().await?;
    tracing::debug!(backend = storage.backend_name(), "storage initialized");
    Ok(storage)
}
