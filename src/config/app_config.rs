use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::adapters::transport::graphql_transport::DEFAULT_ENDPOINT;
use crate::core::errors::{OverseeError, Result};
use crate::core::services::log_columns::default_column_keys;

/// Name of the per-project config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "oversee.toml";

/// Top-level configuration read from `oversee.toml`.
///
/// Every section and key is optional; missing values take defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub table: TableSection,
}

impl AppConfig {
    /// Resolve and load the configuration.
    ///
    /// An explicit path must exist. Otherwise `./oversee.toml`, then
    /// `<config dir>/oversee/config.toml`, then built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) if !path.exists() => {
                return Err(OverseeError::ConfigNotFound {
                    path: path.to_path_buf(),
                });
            }
            Some(path) => Some(path.to_path_buf()),
            None => Self::discover(),
        };

        match path {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Parse and validate a specific config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| OverseeError::Configuration {
            detail: format!("Failed to parse {}: {e}", path.display()),
        })?;
        config.validate()?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    fn discover() -> Option<PathBuf> {
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Some(local);
        }
        dirs::config_dir()
            .map(|dir| dir.join("oversee").join("config.toml"))
            .filter(|path| path.exists())
    }

    fn validate(&self) -> Result<()> {
        if self.table.page_size == 0 {
            return Err(OverseeError::Configuration {
                detail: "[table] page_size must be a positive integer".into(),
            });
        }
        if self.server.timeout_secs == 0 {
            return Err(OverseeError::Configuration {
                detail: "[server] timeout_secs must be a positive integer".into(),
            });
        }
        if self.server.endpoint.trim().is_empty() {
            return Err(OverseeError::Configuration {
                detail: "[server] endpoint must not be empty".into(),
            });
        }
        Ok(())
    }
}

/// The `[server]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// The `[table]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableSection {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Column keys in display order.
    #[serde(default = "default_column_keys")]
    pub columns: Vec<String>,
    /// Show timestamps as UTC dates instead of epoch seconds.
    #[serde(default)]
    pub human_timestamps: bool,
}

impl Default for TableSection {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            columns: default_column_keys(),
            human_timestamps: false,
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_page_size() -> usize {
    20
}
