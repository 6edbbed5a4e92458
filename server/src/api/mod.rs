//! API Router and Application State
//!
//! Central routing configuration and shared state.

use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use qb_line::MessagingApi;

use crate::audit::AuditSink;
use crate::config::Config;
use crate::webhook::{self, Dispatcher};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Arc<Config>,
    /// Event dispatcher (owns the messaging client and audit sink)
    pub dispatcher: Dispatcher,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(config: Config, line: Arc<dyn MessagingApi>, audit: Arc<dyn AuditSink>) -> Self {
        let dispatcher = Dispatcher::new(line, audit, &config);
        Self {
            config: Arc::new(config),
            dispatcher,
        }
    }
}

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // LINE webhook: GET answers a status probe, POST receives events
        .route(
            "/api/line/webhook",
            get(webhook::handlers::webhook_status).post(webhook::handlers::receive_webhook),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // State
        .with_state(state)
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    /// Service status
    status: &'static str,
    /// Crate version
    version: &'static str,
}

/// Health check endpoint.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
