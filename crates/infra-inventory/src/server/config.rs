use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("bind_address is required but not provided")]
    MissingBindAddress,

    #[error("database.url is required but not provided")]
    MissingDatabaseUrl,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

/// Database/storage configuration
///
/// `url` is a storage URL understood by `StorageConfig::from_url`, e.g.
/// `sqlite:///var/lib/inventory/inventory.db` or `sqlite://:memory:`.
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
}

/// Selected-export handoff settings
#[derive(Debug, Deserialize, Clone)]
pub struct ExportConfig {
    /// Seconds an unclaimed export stays downloadable
    #[serde(default = "default_export_ttl_seconds")]
    pub ttl_seconds: u64,
}

impl ExportConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

fn default_bind_address() -> String {
    "0.0.0.0:5000".to_string()
}

fn default_database_url() -> String {
    "sqlite://inventory.db".to_string()
}

fn default_export_ttl_seconds() -> u64 {
    600
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_export_ttl_seconds(),
        }
    }
}

/// Service configuration
///
/// Every section is optional; a missing file section falls back to defaults.
///
/// ```toml
/// [server]
/// bind_address = "0.0.0.0:5000"
///
/// [database]
/// url = "sqlite://inventory.db"
///
/// [export]
/// ttl_seconds = 600
/// ```
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse and validate TOML content
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.bind_address.trim().is_empty() {
            return Err(ConfigError::MissingBindAddress);
        }

        if self.database.url.trim().is_empty() {
            return Err(ConfigError::MissingDatabaseUrl);
        }

        Ok(())
    }
}
