//! ChildHealth AI Web Server
//!
//! Run with: cargo run -p childhealth-web

use tracing::info;
use tracing_subscriber::EnvFilter;

use childhealth_common::AppConfig;
use childhealth_web::{router::build_router, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("childhealth=debug,info")),
        )
        .init();

    info!("Starting ChildHealth AI web server...");

    let config = AppConfig::load()?;
    let bind = std::env::var("CHILDHEALTH_BIND").unwrap_or_else(|_| config.server.bind.clone());

    let state = AppState::from_config(config)?;
    info!(model_loaded = state.predictor.is_model_loaded(), "predictor ready");

    // Document indexing runs in the background; the chat page reports progress.
    state.assistant.start();

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!("Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
