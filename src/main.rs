use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use rangeserve::config::{AppState, Config};
use rangeserve::{keep_awake, logger, server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Optional config path (without extension) as the only argument
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config".to_string());
    let cfg = Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    // Create Tokio runtime, sized by the workers setting
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;

    if !cfg.root_dir().is_dir() {
        return Err(format!("Root directory not found: {}", cfg.server.root).into());
    }

    let listener = server::create_listener(addr)?;
    let state = Arc::new(AppState::new(&cfg));

    server::start_signal_handler(Arc::clone(&state.shutdown));
    let keep_awake = keep_awake::spawn(&cfg.keep_awake, Arc::clone(&state.shutdown));

    logger::log_server_start(&addr, &cfg);

    server::start_server_loop(listener, state, Arc::new(AtomicUsize::new(0))).await;

    if let Some(task) = keep_awake {
        if let Err(e) = task.await {
            logger::log_error(&format!("Keep-awake task failed: {e}"));
        }
    }
    logger::log_info("Server stopped");
    Ok(())
}
