//! Inventory operations behind the HTTP boundary
//!
//! This module centralizes request validation for ingestion, search, export
//! selection and bulk delete. Handlers translate HTTP input into calls here
//! and never talk to storage directly.

use crate::server::export::ExportError;
use crate::server::import::parse_hostname_block;
use infra_inventory_storage::{
    ClusterContext, FilterOptions, InventoryFilter, InventoryQuery, InventoryRecord, RecordId,
    Storage, StorageError,
};
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("{0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

pub type InventoryResult<T> = Result<T, InventoryError>;

/// Submitted ingestion form
///
/// Every field is optional at the wire level so a missing field is reported
/// as a validation failure rather than a decoding error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddInventoryForm {
    pub platform: Option<String>,
    pub app_name: Option<String>,
    pub cluster_name: Option<String>,
    pub environment: Option<String>,
    pub data_center: Option<String>,
    pub hostname_data: Option<String>,
}

impl AddInventoryForm {
    /// Split into cluster context and hostname block, rejecting missing or empty fields
    fn into_parts(self) -> InventoryResult<(ClusterContext, String)> {
        fn required(value: Option<String>) -> InventoryResult<String> {
            value
                .filter(|v| !v.is_empty())
                .ok_or_else(|| InventoryError::Validation("All fields are required".to_string()))
        }

        let context = ClusterContext {
            platform: required(self.platform)?,
            app_name: required(self.app_name)?,
            cluster_name: required(self.cluster_name)?,
            environment: required(self.environment)?,
            data_center: required(self.data_center)?,
        };
        let hostname_data = required(self.hostname_data)?;

        Ok((context, hostname_data))
    }
}

/// Search request body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
    pub search_type: Option<String>,
    pub platform: Option<String>,
    pub app_name: Option<String>,
    pub environment: Option<String>,
    pub data_center: Option<String>,
    pub search_term: Option<String>,
}

impl SearchRequest {
    /// Resolve the mode discriminator into a storage query
    pub fn into_query(self) -> InventoryResult<InventoryQuery> {
        // Empty strings come from unselected dropdowns and mean "any"
        fn constraint(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.is_empty())
        }

        match self.search_type.as_deref() {
            Some("filter") => Ok(InventoryQuery::Filter(InventoryFilter {
                platform: constraint(self.platform),
                app_name: constraint(self.app_name),
                environment: constraint(self.environment),
                data_center: constraint(self.data_center),
            })),
            Some("text") => {
                let term = self.search_term.ok_or_else(|| {
                    InventoryError::Validation("search_term is required for text search".into())
                })?;
                Ok(InventoryQuery::Text(term.trim().to_string()))
            }
            Some(other) => Err(InventoryError::Validation(format!(
                "Unknown search_type: {}",
                other
            ))),
            None => Err(InventoryError::Validation(
                "search_type is required".to_string(),
            )),
        }
    }
}

/// Identifier set used by delete and export-selected
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SelectionRequest {
    #[serde(default)]
    pub ids: Vec<RecordId>,
}

pub struct InventoryService {
    storage: Arc<dyn Storage>,
}

impl InventoryService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Validate a submission, parse its hostname block and insert one row per host
    ///
    /// Returns the number of rows inserted, which is zero when the block
    /// holds no line with at least four fields.
    pub async fn add_inventory(&self, form: AddInventoryForm) -> InventoryResult<u64> {
        let (context, hostname_data) = form.into_parts()?;
        let hosts = parse_hostname_block(&hostname_data);

        let inserted = self.storage.insert_batch(&context, &hosts).await?;

        if inserted == 0 {
            warn!(
                cluster = %context.cluster_name,
                "Hostname block contained no usable lines; nothing inserted"
            );
        } else {
            info!(
                rows = inserted,
                platform = %context.platform,
                cluster = %context.cluster_name,
                "Inventory batch added"
            );
        }

        Ok(inserted)
    }

    pub async fn search(&self, request: SearchRequest) -> InventoryResult<Vec<InventoryRecord>> {
        let query = request.into_query()?;
        Ok(self.storage.search(&query).await?)
    }

    pub async fn list_all(&self) -> InventoryResult<Vec<InventoryRecord>> {
        Ok(self.storage.list_all().await?)
    }

    pub async fn filter_options(&self) -> InventoryResult<FilterOptions> {
        Ok(self.storage.filter_options().await?)
    }

    /// Rows for a selected export, newest first
    pub async fn selected_records(
        &self,
        ids: &[RecordId],
    ) -> InventoryResult<Vec<InventoryRecord>> {
        if ids.is_empty() {
            return Err(InventoryError::Validation(
                "No items selected for export".to_string(),
            ));
        }

        Ok(self.storage.get_by_ids(ids).await?)
    }

    /// Delete the selected rows, returning how many actually existed
    pub async fn delete_selected(&self, ids: &[RecordId]) -> InventoryResult<u64> {
        if ids.is_empty() {
            return Err(InventoryError::Validation(
                "No items selected for deletion".to_string(),
            ));
        }

        let deleted = self.storage.delete_by_ids(ids).await?;
        info!(requested = ids.len(), deleted, "Deleted inventory rows");
        Ok(deleted)
    }

    /// Storage readiness for the `/readyz` probe
    pub async fn health_check(&self) -> InventoryResult<()> {
        Ok(self.storage.health_check().await?)
    }
}
