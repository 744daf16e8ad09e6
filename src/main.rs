//! Foundation API server
//!
//! Serves the contact, inquiry and site settings endpoints over HTTP.

use foundation_api::config::Settings;
use foundation_api::db::open_store;
use foundation_api::init_tracing;
use foundation_api::routes::create_router;
use foundation_api::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber for structured logging
    init_tracing();

    info!("🚀 Starting Foundation API...");

    // Load configuration
    let settings = Settings::load()?;
    info!("📋 Configuration loaded ({:?} storage)", settings.storage);

    let store = open_store(&settings).await?;
    let state = Arc::new(AppState::new(store));

    // Build the router
    let app = create_router(state, &settings);

    // Create socket address
    let addr = SocketAddr::from((settings.server.host, settings.server.port));

    info!("🌐 Server listening on http://{}", addr);
    info!("");
    info!("📚 API Endpoints:");
    info!("   GET    /health            - Health check");
    info!("   POST   /contact           - Submit a contact message");
    info!("   GET    /contact           - List contact messages (?page&limit)");
    info!("   GET    /contact/:id       - Get a contact message");
    info!("   DELETE /contact/:id       - Delete a contact message");
    info!("   POST   /messages          - Submit an inquiry");
    info!("   GET    /settings          - Get site settings");
    info!("   PUT    /settings/update   - Update site settings");
    info!("");

    // Create TCP listener and serve
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("📴 Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            info!("📴 Received terminate signal, initiating graceful shutdown...");
        },
    }
}
