use std::path::PathBuf;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use refid_observe::{init_local_offset, init_logger};
use refid_prometheus::PrometheusMetrics;

mod app;
mod config;

use config::ServiceConfig;

fn main() -> anyhow::Result<()> {
    // Offset detection needs a single-threaded process.
    init_local_offset();

    // 1) config
    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => ServiceConfig::load(&path)?,
        None => ServiceConfig::default(),
    };

    // 2) logger
    let logger = config.logger.clone().with_env_overrides()?;
    init_logger(&logger)?;
    info!(listen = %config.listen, store = %config.store.path.display(), "logger initialized");

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("building tokio runtime")?
        .block_on(serve(config))
}

async fn serve(config: ServiceConfig) -> anyhow::Result<()> {
    // 3) allocator over the sqlite store
    let metrics = PrometheusMetrics::new()?;
    let allocator = app::build_allocator(&config, metrics.clone()).await?;

    // 4) http
    let listener = TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("binding {}", config.listen))?;
    info!(addr = %config.listen, "serving");

    axum::serve(listener, app::router(allocator, metrics))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "ctrl-c handler unavailable");
        std::future::pending::<()>().await;
    }
}
