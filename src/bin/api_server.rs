// API Server Binary Entry Point
//
// Purpose: Start the Axum web front end over the shared prediction service
// Usage: cargo run --features api --bin api_server

use aqi_advisor::{create_router, AppState, Settings};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (structured logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    // Default log level: info for our crate, warn for others
                    "aqi_advisor=info,api_server=info,tower_http=debug,axum=debug,warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting API server...");

    let settings = Settings::from_env();
    settings.log();

    // Model and dataset load once; failures leave the server in degraded mode
    tracing::info!("Initializing application state...");
    let state = AppState::new(&settings);
    if !state.context().model_available() {
        tracing::warn!("Running without a model: /api/pollution will answer 503");
    }
    tracing::info!("Application state initialized");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .await?;

    Ok(())
}
