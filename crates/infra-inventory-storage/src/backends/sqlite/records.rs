//! Write side for SQLite: batch insert and bulk delete

use sqlx::Sqlite;
use tracing::debug;

use super::{placeholders, SqliteStorage};
use crate::error::StorageError;
use crate::types::{ClusterContext, HostService, RecordId};

impl SqliteStorage {
    /// Insert one row per host inside a single transaction
    ///
    /// `id` and `created_date` are assigned by SQLite.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InsertRejected` naming the first host that
    /// failed; the transaction is rolled back when dropped uncommitted.
    pub(super) async fn insert_batch_impl(
        &self,
        context: &ClusterContext,
        hosts: &[HostService],
    ) -> Result<u64, StorageError> {
        if hosts.is_empty() {
            return Ok(0);
        }

        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| StorageError::query("begin insert transaction", e))?;

        let mut inserted = 0u64;
        for (position, host) in hosts.iter().enumerate() {
            let result = sqlx::query(
                r#"
                INSERT INTO inventory (
                    platform, app_name, cluster_name, environment, data_center,
                    hostname, ip_address, service, port
                )
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&context.platform)
            .bind(&context.app_name)
            .bind(&context.cluster_name)
            .bind(&context.environment)
            .bind(&context.data_center)
            .bind(&host.hostname)
            .bind(&host.ip_address)
            .bind(&host.service)
            .bind(&host.port)
            .execute(&mut *tx)
            .await
            .map_err(|source| StorageError::InsertRejected {
                position,
                hostname: host.hostname.clone(),
                source,
            })?;

            inserted += result.rows_affected();
        }

        tx.commit()
            .await
            .map_err(|e| StorageError::query("commit insert transaction", e))?;

        debug!(
            rows = inserted,
            cluster = %context.cluster_name,
            "inserted inventory batch"
        );
        Ok(inserted)
    }

    /// Delete rows by id, returning the number actually removed
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Query` if the delete fails.
    pub(super) async fn delete_by_ids_impl(&self, ids: &[RecordId]) -> Result<u64, StorageError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let sql = format!(
            "DELETE FROM inventory WHERE id IN ({})",
            placeholders(ids.len())
        );

        let mut query = sqlx::query::<Sqlite>(&sql);
        for id in ids {
            query = query.bind(*id);
        }

        let result = query
            .execute(self.pool())
            .await
            .map_err(|e| StorageError::query("delete inventory rows", e))?;

        debug!(
            requested = ids.len(),
            deleted = result.rows_affected(),
            "deleted inventory rows"
        );
        Ok(result.rows_affected())
    }
}
