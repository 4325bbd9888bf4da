//! Configuration management
//!
//! Settings come from `~/.config/pbi-client/config.toml` when present.
//! Priority: explicit value in config.toml > environment variable > default.

use super::Result;
use crate::error::{ConfigError, StorageError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_API_BASE_URL: &str = "https://api.powerbi.com/v1.0/myorg";
pub const DEFAULT_AUTHORITY_URL: &str = "https://login.microsoftonline.com";
pub const DEFAULT_SCOPE: &str = "https://analysis.windows.net/powerbi/api/.default";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_CONCURRENCY: usize = 1;
pub const DEFAULT_REFRESH_HISTORY_TOP: u32 = 10;

/// Library configuration
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// REST API root, e.g. `https://api.powerbi.com/v1.0/myorg`
    pub api_base_url: Option<String>,
    /// OAuth2 authority host
    pub authority_url: Option<String>,
    /// OAuth2 scope requested for the token
    pub scope: Option<String>,
    pub tenant_id: Option<String>,
    pub client_id: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: Option<u64>,
    /// Attempts per request, first attempt included
    pub max_retries: Option<u32>,
    /// Parents fetched at once during bulk aggregation
    pub concurrency: Option<usize>,
    /// `$top` used for dataset refresh history
    pub refresh_history_top: Option<u32>,
    /// Reuse access tokens until shortly before they expire
    pub token_cache: Option<bool>,
}

impl Config {
    /// Load configuration from file, falling back to defaults when absent
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p,
            None => Self::config_file_path()?,
        };

        if !config_path.exists() {
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    fn load_from(config_path: &Path) -> Result<Self> {
        let content = fs::read_to_string(config_path).map_err(|source| StorageError::FileIo {
            path: config_path.to_string_lossy().to_string(),
            source,
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|e| StorageError::ConfigParseError {
                message: format!("Failed to parse config file: {}", e),
            })?;

        Ok(config)
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().ok_or(StorageError::ConfigDirNotFound)?;

        Ok(home_dir
            .join(".config")
            .join("pbi-client")
            .join("config.toml"))
    }

    /// API root with fallback to `PBI_API_URL`, then the public endpoint
    pub fn get_api_base_url(&self) -> String {
        self.api_base_url
            .clone()
            .or_else(|| env_value("PBI_API_URL"))
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string()
    }

    /// Authority host with fallback to `PBI_AUTHORITY_URL`
    pub fn get_authority_url(&self) -> String {
        self.authority_url
            .clone()
            .or_else(|| env_value("PBI_AUTHORITY_URL"))
            .unwrap_or_else(|| DEFAULT_AUTHORITY_URL.to_string())
            .trim_end_matches('/')
            .to_string()
    }

    pub fn get_scope(&self) -> String {
        self.scope
            .clone()
            .unwrap_or_else(|| DEFAULT_SCOPE.to_string())
    }

    pub fn get_timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    pub fn get_max_retries(&self) -> u32 {
        self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES).max(1)
    }

    pub fn get_concurrency(&self) -> usize {
        self.concurrency.unwrap_or(DEFAULT_CONCURRENCY).max(1)
    }

    pub fn get_refresh_history_top(&self) -> u32 {
        self.refresh_history_top
            .unwrap_or(DEFAULT_REFRESH_HISTORY_TOP)
    }

    pub fn token_cache_enabled(&self) -> bool {
        self.token_cache.unwrap_or(true)
    }

    /// Reject values no request could be built with
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.timeout_secs == Some(0) {
            return Err(invalid_value("timeout_secs", "0", "must be at least 1 second"));
        }
        if self.refresh_history_top == Some(0) {
            return Err(invalid_value("refresh_history_top", "0", "must be at least 1"));
        }
        Ok(())
    }
}

fn invalid_value(field: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}
