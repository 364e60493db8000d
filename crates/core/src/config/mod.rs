//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (SITESNAP_*)
//! 2. TOML config file (if SITESNAP_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::resolve::ResolverConfig;

mod validation;

pub use validation::ConfigError;

/// Column names for the three cache record attributes.
///
/// Configurable, but their meaning is fixed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldNames {
    #[serde(default = "default_url_field")]
    pub url: String,

    #[serde(default = "default_content_field")]
    pub content: String,

    #[serde(default = "default_created_at_field")]
    pub created_at: String,
}

fn default_url_field() -> String {
    "url".into()
}

fn default_content_field() -> String {
    "data".into()
}

fn default_created_at_field() -> String {
    "create_date".into()
}

impl Default for FieldNames {
    fn default() -> Self {
        Self { url: default_url_field(), content: default_content_field(), created_at: default_created_at_field() }
    }
}

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (SITESNAP_*)
/// 2. TOML config file (if SITESNAP_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to SQLite cache database.
    ///
    /// Set via SITESNAP_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Table holding cache records.
    ///
    /// Set via SITESNAP_TABLE environment variable.
    #[serde(default = "default_table")]
    pub table: String,

    /// Column names of the records table.
    ///
    /// Set via SITESNAP_FIELD_NAMES__URL, SITESNAP_FIELD_NAMES__CONTENT and
    /// SITESNAP_FIELD_NAMES__CREATED_AT.
    #[serde(default)]
    pub field_names: FieldNames,

    /// Maximum age in seconds of a cache record that may still be reused.
    ///
    /// Set via SITESNAP_RECENCY_WINDOW_SECS environment variable.
    #[serde(default = "default_recency_window_secs")]
    pub recency_window_secs: u64,

    /// Maximum number of URLs accepted in one batch.
    ///
    /// Set via SITESNAP_MAX_URLS_COUNT environment variable.
    #[serde(default = "default_max_urls_count")]
    pub max_urls_count: usize,

    /// Timeout for a single remote fetch in milliseconds.
    ///
    /// Set via SITESNAP_FETCH_TIMEOUT_MS environment variable.
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,

    /// Deadline for a single cache read or write in milliseconds.
    ///
    /// Set via SITESNAP_STORE_TIMEOUT_MS environment variable.
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,

    /// Deadline for a whole batch request in milliseconds.
    ///
    /// Set via SITESNAP_REQUEST_TIMEOUT_MS environment variable.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via SITESNAP_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./sitesnap-cache.sqlite")
}

fn default_table() -> String {
    "sites".into()
}

fn default_recency_window_secs() -> u64 {
    60
}

fn default_max_urls_count() -> usize {
    20
}

fn default_fetch_timeout_ms() -> u64 {
    500
}

fn default_store_timeout_ms() -> u64 {
    1_000
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_user_agent() -> String {
    "sitesnap/0.1".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            table: default_table(),
            field_names: FieldNames::default(),
            recency_window_secs: default_recency_window_secs(),
            max_urls_count: default_max_urls_count(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
            store_timeout_ms: default_store_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            user_agent: default_user_agent(),
        }
    }
}

impl AppConfig {
    pub fn recency_window(&self) -> Duration {
        Duration::from_secs(self.recency_window_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Orchestrator settings derived from this configuration.
    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig { recency_window: self.recency_window() }
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `SITESNAP_`
    /// 2. TOML file from `SITESNAP_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("SITESNAP_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("SITESNAP_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
