//! Domain types for storage layer

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Storage-assigned row identifier
pub type RecordId = i64;

/// Text layout used for `created_date` everywhere it leaves the database
///
/// Matches SQLite's `CURRENT_TIMESTAMP` representation.
pub const CREATED_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One persisted inventory row: cluster context plus one host/service entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub id: RecordId,
    pub platform: String,
    pub app_name: String,
    pub cluster_name: String,
    pub environment: String,
    pub data_center: String,
    pub hostname: String,
    pub ip_address: String,
    pub service: String,
    /// Kept as text; ports are never interpreted numerically
    pub port: String,
    /// Set once by storage at insert time
    #[serde(with = "created_date_format")]
    pub created_date: NaiveDateTime,
}

impl InventoryRecord {
    /// `created_date` rendered as `YYYY-MM-DD HH:MM:SS`
    pub fn created_date_string(&self) -> String {
        self.created_date.format(CREATED_DATE_FORMAT).to_string()
    }
}

/// Context shared by every host row produced from one submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterContext {
    pub platform: String,
    pub app_name: String,
    pub cluster_name: String,
    pub environment: String,
    pub data_center: String,
}

/// One host/service line extracted from a hostname block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostService {
    pub hostname: String,
    pub ip_address: String,
    pub service: String,
    pub port: String,
}

/// Exact-match, conjunctive filter; `None` leaves a column unconstrained
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryFilter {
    pub platform: Option<String>,
    pub app_name: Option<String>,
    pub environment: Option<String>,
    pub data_center: Option<String>,
}

impl InventoryFilter {
    /// True when no column is constrained
    pub fn is_empty(&self) -> bool {
        self.platform.is_none()
            && self.app_name.is_none()
            && self.environment.is_none()
            && self.data_center.is_none()
    }
}

/// The two mutually exclusive query modes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryQuery {
    /// Equality constraints over platform, app_name, environment, data_center
    Filter(InventoryFilter),
    /// Substring match over hostname, ip_address and cluster_name
    Text(String),
}

/// Distinct values currently present, each sorted ascending
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub platforms: Vec<String>,
    pub app_names: Vec<String>,
    pub environments: Vec<String>,
    pub data_centers: Vec<String>,
}

mod created_date_format {
    use super::CREATED_DATE_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&value.format(CREATED_DATE_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, CREATED_DATE_FORMAT).map_err(serde::de::Error::custom)
    }
}
