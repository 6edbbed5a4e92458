//! `QueueBot` Server - Main Entry Point
//!
//! LINE webhook backend for clinic queue booking.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use qb_line::LineClient;
use qb_server::audit::PgAuditSink;
use qb_server::{api, config, db};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "qb_server=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting QueueBot Server"
    );

    // Initialize database
    let db_pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&db_pool).await?;

    // Messaging API client and audit sink
    let line = Arc::new(LineClient::with_base(
        config.line_api_base.clone(),
        config.channel_access_token.clone(),
    ));
    let audit = Arc::new(PgAuditSink::new(db_pool));

    // Build application state and router
    let state = api::AppState::new(config.clone(), line, audit);
    let app = api::create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!(address = %config.bind_address, "Server listening");

    // Graceful shutdown handler
    let shutdown_signal = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
        info!("Received shutdown signal, cleaning up...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shutdown complete");

    Ok(())
}
