//! CSV export and single-use download handles
//!
//! [`write_csv`] renders rows with a fixed 11-column header. Selected exports
//! are parked in an [`ExportStore`] under a ULID token; the download endpoint
//! exchanges the token for the bytes exactly once.

use chrono::{DateTime, Local};
use infra_inventory_storage::InventoryRecord;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;
use ulid::Ulid;

/// Header row written before any data
pub const CSV_HEADER: [&str; 11] = [
    "ID",
    "Platform",
    "App Name",
    "Cluster Name",
    "Environment",
    "Data Center",
    "Hostname",
    "IP Address",
    "Service",
    "Port",
    "Created Date",
];

/// File name prefix for a full export
pub const EXPORT_ALL_PREFIX: &str = "inventory_export";

/// File name prefix for a downloaded selected export
pub const EXPORT_SELECTED_PREFIX: &str = "selected_inventory";

/// Route prefix a token is appended to
pub const DOWNLOAD_PATH: &str = "/download_temp";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV buffer flush failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Serialize rows to CSV in the order given
pub fn write_csv(records: &[InventoryRecord]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for record in records {
        let id = record.id.to_string();
        let created_date = record.created_date_string();
        writer.write_record([
            id.as_str(),
            record.platform.as_str(),
            record.app_name.as_str(),
            record.cluster_name.as_str(),
            record.environment.as_str(),
            record.data_center.as_str(),
            record.hostname.as_str(),
            record.ip_address.as_str(),
            record.service.as_str(),
            record.port.as_str(),
            created_date.as_str(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))
}

/// `<prefix>_YYYYmmdd_HHMMSS.csv`
pub fn attachment_name(prefix: &str, now: DateTime<Local>) -> String {
    format!("{}_{}.csv", prefix, now.format("%Y%m%d_%H%M%S"))
}

#[derive(Debug)]
struct ExportArtifact {
    data: Vec<u8>,
    created_at: Instant,
}

/// In-memory store of rendered exports awaiting download
///
/// Maps token -> CSV bytes. Entries older than the TTL are treated as
/// missing and are evicted whenever a new export is stored.
#[derive(Debug)]
pub struct ExportStore {
    artifacts: RwLock<HashMap<Ulid, ExportArtifact>>,
    ttl: Duration,
}

impl ExportStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            artifacts: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Park rendered bytes and return the token that claims them
    pub async fn insert(&self, data: Vec<u8>) -> Ulid {
        let token = Ulid::new();
        let mut artifacts = self.artifacts.write().await;

        let before = artifacts.len();
        artifacts.retain(|_, artifact| artifact.created_at.elapsed() < self.ttl);
        let evicted = before - artifacts.len();
        if evicted > 0 {
            debug!(evicted, "Evicted expired exports");
        }

        debug!(token = %token, bytes = data.len(), "Storing export");
        artifacts.insert(
            token,
            ExportArtifact {
                data,
                created_at: Instant::now(),
            },
        );
        token
    }

    /// Claim an export; the token is invalid afterwards
    ///
    /// Returns `None` for malformed, unknown, already claimed or expired tokens.
    pub async fn take(&self, token: &str) -> Option<Vec<u8>> {
        let token = Ulid::from_string(token).ok()?;
        let artifact = self.artifacts.write().await.remove(&token)?;

        if artifact.created_at.elapsed() >= self.ttl {
            debug!(token = %token, "Export expired before download");
            return None;
        }

        debug!(token = %token, "Export claimed");
        Some(artifact.data)
    }

    /// Number of exports currently held, expired or not
    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.artifacts.read().await.len()
    }

    #[cfg(test)]
    pub async fn is_empty(&self) -> bool {
        self.artifacts.read().await.is_empty()
    }
}

/// Relative URL the browser follows to fetch an export
pub fn download_url(token: &Ulid) -> String {
    format!("{}/{}", DOWNLOAD_PATH, token)
}
