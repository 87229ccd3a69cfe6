// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    #[serde(default)]
    pub listing: ListingConfig,
    #[serde(default)]
    pub keep_awake: KeepAwakeConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory tree exposed by the server
    pub root: String,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Minimum level written: error, warn, info or debug
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive: bool,
    /// Upper bound for a whole connection, in seconds (0 disables it)
    pub connection_timeout: u64,
    pub max_connections: Option<u64>,
}

/// Directory listing configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ListingConfig {
    /// Entry names hidden from listings, in addition to dotfiles
    #[serde(default = "default_listing_exclude")]
    pub exclude: Vec<String>,
}

fn default_listing_exclude() -> Vec<String> {
    vec!["node_modules".to_string()]
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            exclude: default_listing_exclude(),
        }
    }
}

/// Keep-awake background task configuration
#[derive(Debug, Deserialize, Clone)]
pub struct KeepAwakeConfig {
    #[serde(default = "default_keep_awake_enabled")]
    pub enabled: bool,
    #[serde(default = "default_keep_awake_interval")]
    pub interval_secs: u64,
}

#[allow(clippy::missing_const_for_fn)]
fn default_keep_awake_enabled() -> bool {
    true
}

#[allow(clippy::missing_const_for_fn)]
fn default_keep_awake_interval() -> u64 {
    15
}

impl Default for KeepAwakeConfig {
    fn default() -> Self {
        Self {
            enabled: default_keep_awake_enabled(),
            interval_secs: default_keep_awake_interval(),
        }
    }
}
