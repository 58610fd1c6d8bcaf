//! Main entry point for the inventory web server

use inventory_web::{api, config::Settings, sessions, telemetry, AppState};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = Settings::load()?;
    telemetry::init_tracing(&settings.logging)?;

    info!("Starting Inventory Web");
    info!(
        "Loaded configuration: server={}:{} storage={} feedback={:?}",
        settings.server.host,
        settings.server.port,
        settings.storage.backend,
        settings.ui.feedback
    );

    let addr = settings.bind_address();

    // Create application state
    let app_state = Arc::new(AppState::from_settings(settings).await?);

    // Purge expired sessions in the background
    let deletion = sessions::spawn_expired_deletion(
        app_state.sessions.clone(),
        sessions::DELETION_INTERVAL,
    );

    // Build the router
    let app = api::routes::create_router(app_state);

    info!("Server listening on {}", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    deletion.abort();
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
