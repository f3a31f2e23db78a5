//! HTTP API module
//! 
//! This module contains the endpoints that stand in for the timer screen:
//! +/- buttons, the start/pause toggle, status, and a live event stream.

pub mod events;
pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use events::events_handler;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/time/add", post(add_time_handler))
        .route("/time/subtract", post(subtract_time_handler))
        .route("/start", post(start_handler))
        .route("/stop", post(stop_handler))
        .route("/toggle", post(toggle_handler))
        .route("/status", get(status_handler))
        .route("/events", get(events_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
