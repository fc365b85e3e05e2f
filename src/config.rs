//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.salaryscope.toml` files.

use crate::filter::ParsePolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".salaryscope.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Record store settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// Statistics and filtering settings.
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Deployment environment reported by the health endpoint.
    #[serde(default = "default_environment")]
    pub environment: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: default_environment(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_environment() -> String {
    "development".to_string()
}

/// Record store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// PostgREST project URL (e.g. `https://xyz.supabase.co`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// API key sent with every request. Prefer the SUPABASE_KEY env var.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Table holding the salary records.
    #[serde(default = "default_table")]
    pub table: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Serve records from this JSON file instead of a remote store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            table: default_table(),
            timeout_seconds: default_timeout(),
            data_file: None,
        }
    }
}

fn default_table() -> String {
    "employee_salaries".to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Statistics and filtering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Number of histogram bins when the request does not specify one.
    #[serde(default = "default_histogram_bins")]
    pub histogram_bins: usize,

    /// Length of the dashboard's average-salary ranking.
    #[serde(default = "default_top_agencies")]
    pub top_agencies: usize,

    /// Handling of unparsable numeric filters: "strict" or "lenient".
    #[serde(default)]
    pub numeric_filters: ParsePolicy,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            histogram_bins: default_histogram_bins(),
            top_agencies: default_top_agencies(),
            numeric_filters: ParsePolicy::Strict,
        }
    }
}

fn default_histogram_bins() -> usize {
    10
}

fn default_top_agencies() -> usize {
    10
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments (and their env var fallbacks) take precedence over
    /// config file settings, but only when they were actually provided.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref host) = args.host {
            self.server.host = host.clone();
        }
        if let Some(port) = args.port {
            self.server.port = port;
        }
        if let Some(ref environment) = args.environment {
            self.server.environment = environment.clone();
        }

        if let Some(ref url) = args.store_url {
            self.store.url = Some(url.clone());
        }
        if let Some(ref key) = args.store_key {
            self.store.api_key = Some(key.clone());
        }
        if let Some(ref table) = args.table {
            self.store.table = table.clone();
        }
        if let Some(timeout) = args.timeout {
            self.store.timeout_seconds = timeout;
        }
        if let Some(ref data) = args.data {
            self.store.data_file = Some(data.clone());
        }

        if args.lenient_filters {
            self.analysis.numeric_filters = ParsePolicy::Lenient;
        }
    }

    /// Validate settings that would otherwise fail at request time.
    pub fn validate(&self) -> Result<(), String> {
        if self.analysis.histogram_bins == 0 {
            return Err("histogram_bins must be at least 1".to_string());
        }
        if self.analysis.top_agencies == 0 {
            return Err("top_agencies must be at least 1".to_string());
        }
        if self.store.timeout_seconds == 0 {
            return Err("Timeout must be at least 1 second".to_string());
        }
        if let Some(ref url) = self.store.url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("Store URL must start with 'http://' or 'https://'".to_string());
            }
        }
        Ok(())
    }

    /// Generate a default configuration file content.
    ///
    /// Credentials are never part of the generated file.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
