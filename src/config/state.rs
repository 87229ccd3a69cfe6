// Application state module
// Shared, read-only state handed to every connection task

use std::path::PathBuf;
use std::sync::Arc;

use super::types::Config;
use crate::server::signal::ShutdownSignal;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Directory tree exposed by the server
    pub root: PathBuf,
    /// Fired once when the process is asked to stop
    pub shutdown: Arc<ShutdownSignal>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            root: config.root_dir(),
            shutdown: Arc::new(ShutdownSignal::new()),
        }
    }

    pub const fn access_log_enabled(&self) -> bool {
        self.config.logging.access_log
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_log_follows_config() {
        let mut cfg = Config::load_from("does-not-exist/config").unwrap();
        assert!(AppState::new(&cfg).access_log_enabled());

        cfg.logging.access_log = false;
        assert!(!AppState::new(&cfg).access_log_enabled());
    }
}
