//! HTTP API module
//!
//! A small control surface over one timer engine: event endpoints, a status
//! endpoint and a server-sent event stream of snapshots.

pub mod handlers;
pub mod responses;
pub mod state;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use state::ApiState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/pause", post(pause_handler))
        .route("/unpause", post(unpause_handler))
        .route("/reset", post(reset_handler))
        .route("/duration", post(duration_handler))
        .route("/events", post(event_handler))
        .route("/status", get(status_handler))
        .route("/stream", get(stream_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
