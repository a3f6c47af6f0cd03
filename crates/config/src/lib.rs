#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for fdroid-repo
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/fdroid-repo/config.toml)
//! - Environment variables

use fdr_errors::{ConfigError, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Well-known file whose presence identifies a repository index directory
pub const SIGNED_INDEX_FILE: &str = "index-v1.jar";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub probe: ProbeConfig,
}

/// Network configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_timeout")]
    pub timeout: u64, // seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64, // seconds
    #[serde(default)]
    pub retries: u32,
    #[serde(default = "default_retry_delay")]
    pub retry_delay: u64, // seconds
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Repository search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Path suffixes appended to the candidate address, tried in order
    #[serde(default = "default_suffixes")]
    pub suffixes: Vec<String>,
    #[serde(default = "default_signed_index_file")]
    pub signed_index_file: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            connect_timeout: default_connect_timeout(),
            retries: 0,
            retry_delay: default_retry_delay(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            suffixes: default_suffixes(),
            signed_index_file: default_signed_index_file(),
        }
    }
}

// Default value functions for serde
fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_retry_delay() -> u64 {
    1
}

fn default_user_agent() -> String {
    format!("fdroid-repo/{}", env!("CARGO_PKG_VERSION"))
}

fn default_suffixes() -> Vec<String> {
    vec![String::new(), "fdroid/repo".to_string(), "repo".to_string()]
}

fn default_signed_index_file() -> String {
    SIGNED_INDEX_FILE.to_string()
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join("fdroid-repo").join("config.toml"))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        let config: Self = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        // FDR_NETWORK_TIMEOUT
        if let Ok(timeout) = std::env::var("FDR_NETWORK_TIMEOUT") {
            self.network.timeout = timeout.parse().map_err(|_| ConfigError::InvalidValue {
                field: "FDR_NETWORK_TIMEOUT".to_string(),
                value: timeout,
            })?;
        }

        // FDR_NETWORK_RETRIES
        if let Ok(retries) = std::env::var("FDR_NETWORK_RETRIES") {
            self.network.retries = retries.parse().map_err(|_| ConfigError::InvalidValue {
                field: "FDR_NETWORK_RETRIES".to_string(),
                value: retries,
            })?;
        }

        // FDR_SIGNED_INDEX_FILE
        if let Ok(file) = std::env::var("FDR_SIGNED_INDEX_FILE") {
            if file.is_empty() || file.contains('/') {
                return Err(ConfigError::InvalidValue {
                    field: "FDR_SIGNED_INDEX_FILE".to_string(),
                    value: file,
                }
                .into());
            }
            self.probe.signed_index_file = file;
        }

        Ok(())
    }
}
