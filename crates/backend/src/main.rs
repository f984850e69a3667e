// =============================================================================
// Atlas Backend - API Server Entry Point
// =============================================================================
// Table of Contents:
// 1. Imports
// 2. Main Entry Point
// =============================================================================

use atlas_backend::{config::Config, create_router, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// -----------------------------------------------------------------------------
// 2. Main Entry Point
// -----------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables: current directory first, then crates/backend/
    if dotenvy::dotenv().is_err() {
        let _ = dotenvy::from_filename("crates/backend/.env");
    }

    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging (RUST_LOG may come from .env)
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let bind_addr = config.bind_address.clone();
    match &config.engine_config_path {
        Some(path) => tracing::info!("Engine config: {}", path.display()),
        None => tracing::info!("Engine config: built-in defaults"),
    }

    // Build router
    let app = create_router(AppState::new(config));

    // Start server
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("GIS API Server running on http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
