//! Router configuration and server setup.

use std::any::Any;

use axum::{
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::handlers;
use crate::state::AppState;

/// Creates the router with all routes configured.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/api/health", get(handlers::health))
        // Webhook
        .route(
            "/webhook",
            post(handlers::receive_webhook).fallback(handlers::method_not_allowed),
        )
        .fallback(handlers::not_found)
        // Apply middleware
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Converts a handler panic into the JSON error envelope.
fn panic_response(_panic: Box<dyn Any + Send + 'static>) -> Response {
    error!("Handler panicked");
    ApiError::Internal("internal error".to_string()).into_response()
}

/// Starts the HTTP server.
pub async fn serve(config: ApiConfig, state: AppState) -> Result<(), std::io::Error> {
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Webhook relay listening on {}", addr);
    axum::serve(listener, create_router(state)).await
}
