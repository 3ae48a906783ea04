//! Configuration loading and management
//!
//! Configuration comes from an optional YAML file, then environment
//! overrides. Every section has defaults, so an empty file (or no file) is a
//! valid configuration that serves an in-memory store on port 5000.
//!
//! ```yaml
//! server:
//!   host: 0.0.0.0
//!   port: 5000
//! store:
//!   backend: mongodb
//!   uri: mongodb://localhost:27017
//!   database: salesdash
//!   collection: transactions
//! query:
//!   default_limit: 10
//!   max_limit: 500
//! import:
//!   batch_size: 1000
//!   clear_existing: true
//! ```
//!
//! Environment overrides: `PORT`, `MONGO_URI` (also selects the mongodb
//! backend) and `SALESDASH_DATABASE`.

use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub query: QueryConfig,
    pub import: ImportConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl ServerConfig {
    /// `host:port` for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Which record store backs the service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Mongodb,
}

/// Record store settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,

    /// Connection string (mongodb backend)
    pub uri: Option<String>,

    pub database: String,

    pub collection: String,

    /// CSV file loaded into the store when the server starts
    pub seed_csv: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            uri: None,
            database: "salesdash".to_string(),
            collection: "transactions".to_string(),
            seed_csv: None,
        }
    }
}

/// Query defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Page size when the client sends none, or an unusable one
    pub default_limit: u64,

    /// Largest page size served; `None` leaves page size unbounded
    pub max_limit: Option<u64>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: None,
        }
    }
}

/// Bulk import settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Records per insert
    pub batch_size: usize,

    /// Empty the store before importing
    pub clear_existing: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            clear_existing: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let file = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            file: file.clone(),
            message: e.to_string(),
        })?;
        Self::parse_yaml(&content, Some(file))
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Self::parse_yaml(yaml, None)
    }

    fn parse_yaml(yaml: &str, file: Option<String>) -> Result<Self, ConfigError> {
        // An empty document parses as null rather than an empty mapping
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
            file,
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from an optional file, then apply process environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        config.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply environment overrides read through `lookup`
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.server.port = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT".to_string(),
                message: format!("'{}' is not a port number", port),
            })?;
        }

        if let Some(uri) = lookup("MONGO_URI").filter(|u| !u.trim().is_empty()) {
            self.store.backend = StoreBackend::Mongodb;
            self.store.uri = Some(uri);
        }

        if let Some(database) = lookup("SALESDASH_DATABASE").filter(|d| !d.trim().is_empty()) {
            self.store.database = database;
        }

        self.validate()?;
        Ok(self)
    }

    /// Reject values no component can work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.query.default_limit == 0 {
            return Err(ConfigError::InvalidValue {
                key: "query.default_limit".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.query.max_limit == Some(0) {
            return Err(ConfigError::InvalidValue {
                key: "query.max_limit".to_string(),
                message: "must be at least 1 when set".to_string(),
            });
        }
        if self.import.batch_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "import.batch_size".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.store.backend == StoreBackend::Mongodb && self.store.uri.is_none() {
            return Err(ConfigError::InvalidValue {
                key: "store.uri".to_string(),
                message: "required for the mongodb backend".to_string(),
            });
        }
        Ok(())
    }
}
