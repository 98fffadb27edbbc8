//! Configuration file parsing for the server.
//!
//! Loads settings from TOML files: bind address, upstream token, timezone,
//! client tuning, the optional cache and database sections, and per-list
//! query overrides.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use taskpipe_client::{ClientConfig, ListQuery};
use thiserror::Error;

/// Environment variable that overrides the configured API token
pub const API_TOKEN_ENV: &str = "TASKPIPE_API_TOKEN";

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Bind address (e.g., "127.0.0.1")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Bind port (e.g., 8000)
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,

    /// Upstream API token; [`API_TOKEN_ENV`] overrides this
    #[serde(default)]
    pub api_token: String,

    /// tz-database name for output timestamps (default: UTC)
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Records per upstream page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Bound on simultaneous in-flight upstream requests
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,

    /// Courtesy delay between sequential page requests, in seconds
    #[serde(default = "default_page_delay_secs")]
    pub page_delay_secs: u64,

    /// Run the per-task status-duration sub-fetch after the page walk
    #[serde(default)]
    pub fetch_time_in_status: bool,

    /// Optional Redis cache
    #[serde(default)]
    pub cache: Option<CacheSection>,

    /// Optional SQLite persistence
    #[serde(default)]
    pub database: Option<DatabaseSection>,

    /// Per-list query overrides and dataset names, keyed by list id
    #[serde(default)]
    pub lists: HashMap<String, ListSection>,
}

/// Cache section
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSection {
    /// Redis connection URL
    pub url: String,

    /// Entry time-to-live in seconds (default: 600)
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
}

/// Database section
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSection {
    /// SQLite database path
    pub path: String,
}

/// Per-list overrides
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListSection {
    /// Include closed tasks for this list
    #[serde(default)]
    pub include_closed: bool,

    /// Page-size override for this list
    pub page_size: Option<u32>,

    /// Due-date lower bound, milliseconds since epoch
    pub due_date_gt: Option<i64>,

    /// Due-date upper bound, milliseconds since epoch
    pub due_date_lt: Option<i64>,

    /// Records dataset name (default: `lista_<list id>`)
    pub dataset: Option<String>,

    /// Status-history dataset name (default: `status_history_<list id>`)
    pub status_history_dataset: Option<String>,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_bind_port() -> u16 {
    8000
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_page_size() -> u32 {
    100
}

fn default_max_in_flight() -> usize {
    10
}

fn default_page_delay_secs() -> u64 {
    1
}

fn default_cache_ttl_secs() -> u64 {
    600
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// The API token may come from the file or from [`API_TOKEN_ENV`]; the
    /// environment wins, and ending up with no token at all is an error.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: AppConfig = toml::from_str(&contents)?;

        if let Ok(token) = std::env::var(API_TOKEN_ENV) {
            config.api_token = token;
        }
        if config.api_token.is_empty() {
            return Err(ConfigError::MissingField("api_token".to_string()));
        }

        Ok(config)
    }

    /// Create a default configuration for testing
    pub fn default_test_config() -> Self {
        AppConfig {
            bind_address: default_bind_address(),
            bind_port: default_bind_port(),
            api_token: "test-token".to_string(),
            timezone: default_timezone(),
            page_size: default_page_size(),
            max_in_flight: default_max_in_flight(),
            page_delay_secs: 0,
            fetch_time_in_status: false,
            cache: None,
            database: None,
            lists: HashMap::new(),
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }

    /// Derive the upstream client configuration.
    pub fn client_config(&self) -> ClientConfig {
        let mut client = ClientConfig::new(self.api_token.clone());
        client.page_size = self.page_size;
        client.max_in_flight = self.max_in_flight;
        client.page_delay = Duration::from_secs(self.page_delay_secs);
        client
    }

    /// Build the collection query for a list, applying its overrides.
    pub fn list_query(&self, list_id: &str) -> ListQuery {
        let section = self.lists.get(list_id);
        ListQuery {
            include_closed: section.map(|s| s.include_closed).unwrap_or(false),
            page_size: section.and_then(|s| s.page_size),
            due_date_gt: section.and_then(|s| s.due_date_gt),
            due_date_lt: section.and_then(|s| s.due_date_lt),
            ..ListQuery::default()
        }
    }

    /// Records dataset name for a list.
    pub fn records_dataset(&self, list_id: &str) -> String {
        self.lists
            .get(list_id)
            .and_then(|s| s.dataset.clone())
            .unwrap_or_else(|| format!("lista_{}", list_id))
    }

    /// Status-history dataset name for a list.
    pub fn status_history_dataset(&self, list_id: &str) -> String {
        self.lists
            .get(list_id)
            .and_then(|s| s.status_history_dataset.clone())
            .unwrap_or_else(|| format!("status_history_{}", list_id))
    }
}
