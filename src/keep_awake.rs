//! Keep-awake background task
//!
//! Periodically asks the OS not to sleep while the server runs. Independent
//! of request handling; it only listens for the shutdown signal.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::config::KeepAwakeConfig;
use crate::logger;
use crate::server::signal::ShutdownSignal;

/// Spawn the task if enabled in `config`
pub fn spawn(config: &KeepAwakeConfig, shutdown: Arc<ShutdownSignal>) -> Option<JoinHandle<()>> {
    if !config.enabled {
        return None;
    }
    let interval = Duration::from_secs(config.interval_secs.max(1));
    logger::log_debug(&format!(
        "Keep-awake task started, interval {}s",
        interval.as_secs()
    ));
    Some(tokio::spawn(async move {
        run(interval, &shutdown, platform::keep_awake).await;
        platform::restore();
        logger::log_debug("Keep-awake task stopped");
    }))
}

/// Call `tick` every `interval` (first call immediately) until shutdown
pub async fn run<F>(interval: Duration, shutdown: &ShutdownSignal, mut tick: F)
where
    F: FnMut(),
{
    let mut ticker = tokio::time::interval(interval);
    loop {
        tokio::select! {
            () = shutdown.wait() => break,
            _ = ticker.tick() => tick(),
        }
    }
}

#[cfg(windows)]
mod platform {
    use windows_sys::Win32::System::Power::{
        SetThreadExecutionState, ES_AWAYMODE_REQUIRED, ES_CONTINUOUS, ES_SYSTEM_REQUIRED,
    };

    #[allow(unsafe_code)]
    pub fn keep_awake() {
        // SAFETY: plain Win32 call with constant flags, no pointers involved
        unsafe {
            SetThreadExecutionState(ES_CONTINUOUS | ES_SYSTEM_REQUIRED | ES_AWAYMODE_REQUIRED);
        }
    }

    #[allow(unsafe_code)]
    pub fn restore() {
        // SAFETY: as above
        unsafe {
            SetThreadExecutionState(ES_CONTINUOUS);
        }
    }
}

#[cfg(not(windows))]
mod platform {
    use crate::logger;

    pub fn keep_awake() {
        logger::log_debug("Keep-awake tick (no-op on this platform)");
    }

    pub const fn restore() {}
}
