use std::path::Path;

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;

use docuchat_backend::config::AppConfig;
use docuchat_backend::logging;
use docuchat_backend::server::router::router;
use docuchat_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init(Path::new("logs"));

    let config = AppConfig::from_env().context("configuration error")?;
    let state = AppState::initialize(config)?;

    // Index readiness is part of startup; a missing or unreachable index
    // must fail here, before any request is served.
    state
        .index
        .ensure_ready()
        .await
        .context("vector index not ready")?;

    let bind_addr = format!("0.0.0.0:{}", state.config.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    let app: Router = router(state);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
