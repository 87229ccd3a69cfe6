// Configuration module entry point
// Manages application configuration and runtime state

mod state;
mod types;

use std::net::SocketAddr;
use std::path::PathBuf;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, KeepAwakeConfig, ListingConfig, LoggingConfig, PerformanceConfig, ServerConfig,
};

/// Environment variable prefix, e.g. `RANGESERVE_SERVER__PORT=8080`
const ENV_PREFIX: &str = "RANGESERVE";

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("server.root", ".")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.connection_timeout", 0)?
            .set_default("listing.exclude", vec!["node_modules"])?
            .set_default("keep_awake.enabled", true)?
            .set_default("keep_awake.interval_secs", 15)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Root directory as a path, relative roots are kept relative to the working directory
    pub fn root_dir(&self) -> PathBuf {
        PathBuf::from(&self.server.root)
    }
}
