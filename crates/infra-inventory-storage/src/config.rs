//! Storage configuration

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// In-memory database marker understood by the SQLite backend
pub const MEMORY_PATH: &str = ":memory:";

/// Errors that can occur when parsing storage configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid URL format
    #[error("Invalid URL format: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Unsupported URL scheme
    #[error("Unsupported URL scheme: {0}. Supported schemes: sqlite")]
    UnsupportedScheme(String),

    /// Invalid pool size
    #[error("Invalid pool size: {0}")]
    InvalidPoolSize(String),

    /// URL carries no database path
    #[error("Missing database path in URL: {0}")]
    MissingPath(String),
}

/// Storage configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Database file path, or `:memory:`
    pub path: String,

    /// Maximum pooled connections (ignored for in-memory databases)
    pub pool_size: Option<u32>,
}

impl StorageConfig {
    /// Parse connection URL into storage configuration
    ///
    /// Supported URL formats:
    /// - `sqlite://:memory:` - In-memory SQLite
    /// - `sqlite:///var/lib/inventory/inventory.db` - Absolute file path
    /// - `sqlite://inventory.db` - Path relative to the working directory
    /// - `sqlite://inventory.db?pool_size=4` - With pool size
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if the URL cannot be parsed.
    /// Returns `ConfigError::UnsupportedScheme` if the URL scheme is not `sqlite`.
    /// Returns `ConfigError::InvalidPoolSize` if the pool_size parameter is invalid.
    /// Returns `ConfigError::MissingPath` if no database path is present.
    pub fn from_url(url: &str) -> Result<Self, ConfigError> {
        // `:memory:` is not a valid authority, rewrite it into the path for parsing
        let normalized_url = if url.contains("://:memory:") {
            url.replace("://:memory:", ":///:memory:")
        } else {
            url.to_string()
        };

        let parsed = url::Url::parse(&normalized_url)?;

        if parsed.scheme() != "sqlite" {
            return Err(ConfigError::UnsupportedScheme(parsed.scheme().to_string()));
        }

        // `sqlite://inventory.db` puts the file name in the host position
        let path = match parsed.host_str() {
            Some(host) if !host.is_empty() => format!("{}{}", host, parsed.path()),
            _ => parsed.path().to_string(),
        };

        let path = if path == "/:memory:" || path == MEMORY_PATH {
            MEMORY_PATH.to_string()
        } else {
            path
        };

        if path.is_empty() || path == "/" {
            return Err(ConfigError::MissingPath(url.to_string()));
        }

        let pool_size = parsed
            .query_pairs()
            .find(|(key, _)| key == "pool_size")
            .map(|(_, value)| {
                value
                    .parse::<u32>()
                    .ok()
                    .filter(|size| *size > 0)
                    .ok_or_else(|| ConfigError::InvalidPoolSize(value.to_string()))
            })
            .transpose()?;

        Ok(Self { path, pool_size })
    }

    /// Create in-memory SQLite configuration for testing
    #[must_use]
    pub fn sqlite_memory() -> Self {
        Self {
            path: MEMORY_PATH.to_string(),
            pool_size: None,
        }
    }

    /// Create file-based SQLite configuration
    #[must_use]
    pub fn sqlite_file(path: &str) -> Self {
        Self {
            path: path.to_string(),
            pool_size: None,
        }
    }

    /// Whether this configuration targets an in-memory database
    pub fn is_memory(&self) -> bool {
        self.path == MEMORY_PATH
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::sqlite_file("inventory.db")
    }
}
