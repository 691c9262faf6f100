//! # ossa-api: Binary Entry Point
//!
//! Reads configuration from the environment, builds the engine and serves
//! the validation API on `0.0.0.0:$PORT` (default 8080).

use anyhow::Context;
use ossa_api::state::{AppConfig, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if std::env::var("OSSA_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let config = AppConfig::from_env();
    tracing::debug!(?config, "loaded configuration");
    let port = config.port;

    let state = AppState::new(config).map_err(|e| {
        tracing::error!("Engine initialization failed: {e}");
        e
    })?;
    tracing::info!(
        schemas = state.engine.schemas().schema_count(),
        "compliance engine ready"
    );

    let app = ossa_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("OSSA API listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
