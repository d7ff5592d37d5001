//! Read side for SQLite
//!
//! - List all rows
//! - Filter-mode search (exact, conjunctive equality)
//! - Text-mode search (substring over hostname, ip_address, cluster_name)
//! - Fetch by id set
//! - Distinct filter values
//!
//! Rows are decoded by column name through [`InventoryRow`].

use chrono::NaiveDateTime;
use sqlx::Sqlite;

use super::{placeholders, SqliteStorage};
use crate::error::StorageError;
use crate::types::{FilterOptions, InventoryFilter, InventoryQuery, InventoryRecord, RecordId};

const SELECT_INVENTORY: &str = r#"
    SELECT
        id,
        platform,
        app_name,
        cluster_name,
        environment,
        data_center,
        hostname,
        ip_address,
        service,
        port,
        created_date
    FROM inventory
"#;

/// Newest first; `id` breaks ties between rows created within the same second
const ORDER_NEWEST_FIRST: &str = " ORDER BY created_date DESC, id DESC";

#[derive(Debug, sqlx::FromRow)]
struct InventoryRow {
    id: i64,
    platform: String,
    app_name: String,
    cluster_name: String,
    environment: String,
    data_center: String,
    hostname: String,
    ip_address: String,
    service: String,
    port: String,
    created_date: NaiveDateTime,
}

impl From<InventoryRow> for InventoryRecord {
    fn from(row: InventoryRow) -> Self {
        Self {
            id: row.id,
            platform: row.platform,
            app_name: row.app_name,
            cluster_name: row.cluster_name,
            environment: row.environment,
            data_center: row.data_center,
            hostname: row.hostname,
            ip_address: row.ip_address,
            service: row.service,
            port: row.port,
            created_date: row.created_date,
        }
    }
}

/// Map a read failure, separating undecodable rows from statement errors
fn read_error(operation: &str, error: sqlx::Error) -> StorageError {
    match error {
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            StorageError::InvalidData(format!("{}: {}", operation, error))
        }
        other => StorageError::query(operation, other),
    }
}

/// Escape `LIKE` wildcards so the term matches as a literal substring
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Build the filter-mode statement and its bound values, in order
fn filter_sql(filter: &InventoryFilter) -> (String, Vec<&str>) {
    let mut sql = format!("{} WHERE 1=1", SELECT_INVENTORY);
    let mut params: Vec<&str> = Vec::new();

    let constraints = [
        ("platform", &filter.platform),
        ("app_name", &filter.app_name),
        ("environment", &filter.environment),
        ("data_center", &filter.data_center),
    ];

    for (column, value) in constraints {
        if let Some(value) = value {
            sql.push_str(&format!(" AND {} = ?", column));
            params.push(value.as_str());
        }
    }

    sql.push_str(ORDER_NEWEST_FIRST);
    (sql, params)
}

impl SqliteStorage {
    /// List every row, newest first
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Query` if the database operation fails.
    pub(super) async fn list_all_impl(&self) -> Result<Vec<InventoryRecord>, StorageError> {
        let sql = format!("{}{}", SELECT_INVENTORY, ORDER_NEWEST_FIRST);

        let rows: Vec<InventoryRow> = sqlx::query_as(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(|e| read_error("list inventory", e))?;

        Ok(rows.into_iter().map(InventoryRecord::from).collect())
    }

    /// Run a filter-mode or text-mode search
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Query` if the database operation fails.
    pub(super) async fn search_impl(
        &self,
        query: &InventoryQuery,
    ) -> Result<Vec<InventoryRecord>, StorageError> {
        let rows: Vec<InventoryRow> = match query {
            InventoryQuery::Filter(filter) if filter.is_empty() => {
                return self.list_all_impl().await;
            }
            InventoryQuery::Filter(filter) => {
                let (sql, params) = filter_sql(filter);

                let mut statement = sqlx::query_as::<Sqlite, InventoryRow>(&sql);
                for param in params {
                    statement = statement.bind(param);
                }

                statement
                    .fetch_all(self.pool())
                    .await
                    .map_err(|e| read_error("filter search", e))?
            }
            InventoryQuery::Text(term) => {
                let pattern = like_pattern(term);
                let sql = format!(
                    r#"{} WHERE hostname LIKE ? ESCAPE '\'
                          OR ip_address LIKE ? ESCAPE '\'
                          OR cluster_name LIKE ? ESCAPE '\'{}"#,
                    SELECT_INVENTORY, ORDER_NEWEST_FIRST
                );

                sqlx::query_as::<Sqlite, InventoryRow>(&sql)
                    .bind(&pattern)
                    .bind(&pattern)
                    .bind(&pattern)
                    .fetch_all(self.pool())
                    .await
                    .map_err(|e| read_error("text search", e))?
            }
        };

        Ok(rows.into_iter().map(InventoryRecord::from).collect())
    }

    /// Fetch rows whose id is in the set, newest first
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Query` if the database operation fails.
    pub(super) async fn get_by_ids_impl(
        &self,
        ids: &[RecordId],
    ) -> Result<Vec<InventoryRecord>, StorageError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "{} WHERE id IN ({}){}",
            SELECT_INVENTORY,
            placeholders(ids.len()),
            ORDER_NEWEST_FIRST
        );

        let mut statement = sqlx::query_as::<Sqlite, InventoryRow>(&sql);
        for id in ids {
            statement = statement.bind(*id);
        }

        let rows: Vec<InventoryRow> = statement
            .fetch_all(self.pool())
            .await
            .map_err(|e| read_error("fetch inventory by id", e))?;

        Ok(rows.into_iter().map(InventoryRecord::from).collect())
    }

    /// Distinct values for the four filterable columns
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Query` if the database operation fails.
    pub(super) async fn filter_options_impl(&self) -> Result<FilterOptions, StorageError> {
        Ok(FilterOptions {
            platforms: self.distinct_values("platform").await?,
            app_names: self.distinct_values("app_name").await?,
            environments: self.distinct_values("environment").await?,
            data_centers: self.distinct_values("data_center").await?,
        })
    }

    /// `column` is always one of the fixed names above, never caller input
    async fn distinct_values(&self, column: &'static str) -> Result<Vec<String>, StorageError> {
        let sql = format!(
            "SELECT DISTINCT {column} FROM inventory ORDER BY {column}",
            column = column
        );

        sqlx::query_scalar::<Sqlite, String>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(|e| StorageError::query(format!("list distinct {}", column), e))
    }
}
