//! contact-book server entry point.
//!
//! Loads configuration, opens the contact database behind the search cache,
//! and serves the contact routes over HTTP until Ctrl-C.

use std::ffi::OsStr;
use std::path::Path;

use anyhow::{Context, Result};
use contactbook_core::{AppConfig, CachedStore, SqliteStore};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod error;
mod handler;
mod routes;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    let _log_guard = init_tracing(&config)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting contact-book server");
    tracing::debug!(db_path = %config.db_path.display(), "database location");

    let store = SqliteStore::open(&config.db_path)
        .await
        .with_context(|| format!("failed to open database at {}", config.db_path.display()))?;
    let store = CachedStore::from_config(store, &config);
    tracing::info!(
        capacity = store.cache().capacity(),
        ttl_secs = store.cache().ttl().as_secs(),
        invalidate_on_write = config.invalidate_cache_on_write,
        "search cache ready"
    );
    let state = handler::AppState::new(store);

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, handler::router(state.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.store.close().await;
    tracing::info!("server stopped");

    Ok(())
}

/// Install console logging, plus a log file outside debug mode.
///
/// The returned guard flushes the file writer when dropped.
fn init_tracing(config: &AppConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_level()));

    let console = if config.log_json { fmt::layer().json().boxed() } else { fmt::layer().boxed() };

    let (file, guard) = match (&config.log_file, config.debug) {
        (Some(path), false) => {
            let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
            let name = path.file_name().unwrap_or(OsStr::new("logs.txt"));
            let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
            (Some(fmt::layer().with_writer(writer).with_ansi(false)), Some(guard))
        }
        _ => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(guard)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutdown requested");
}
