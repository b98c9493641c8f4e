//! Pustak Server - library lending service
//!
//! Serves the lending HTTP API over an in-memory catalog.

use std::net::SocketAddr;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pustak_server::{api, config::AppConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("failed to load configuration")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("pustak_server={},tower_http=debug", config.logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Pustak Server v{}", env!("CARGO_PKG_VERSION"));

    if config.uses_default_secret() {
        tracing::warn!("JWT secret is the built-in default; set JWT_SECRET before deploying");
    }

    // Save server address before moving config
    let addr = SocketAddr::new(
        config
            .server
            .host
            .parse()
            .with_context(|| format!("invalid host address: {}", config.server.host))?,
        config.server.port,
    );

    let state = AppState::from_config(config)
        .await
        .context("failed to initialize application state")?;

    tracing::info!(
        books = state.services.catalog.list_books().await.len(),
        "Catalog seeded"
    );

    let app = api::create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
