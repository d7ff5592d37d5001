//! Storage error types

use sqlx::migrate::MigrateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    /// The database file could not be opened or created
    #[error("failed to open database {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("schema migration failed: {0}")]
    Migration(#[from] MigrateError),

    /// The inventory table is absent; `initialize` has not run
    #[error("schema not initialized: inventory table missing")]
    SchemaMissing,

    /// One host of a batch was rejected and the whole batch rolled back
    ///
    /// `position` is the zero-based index of the host within the batch.
    #[error("insert of host {hostname} (batch position {position}) failed: {source}")]
    InsertRejected {
        position: usize,
        hostname: String,
        #[source]
        source: sqlx::Error,
    },

    /// Any other statement failure
    #[error("{operation} failed: {source}")]
    Query {
        operation: String,
        #[source]
        source: sqlx::Error,
    },

    /// Row could not be decoded into a domain type
    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl StorageError {
    pub fn open(path: impl Into<String>, source: sqlx::Error) -> Self {
        Self::Open {
            path: path.into(),
            source,
        }
    }

    pub fn query(operation: impl Into<String>, source: sqlx::Error) -> Self {
        Self::Query {
            operation: operation.into(),
            source,
        }
    }
}
