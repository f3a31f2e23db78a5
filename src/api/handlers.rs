//! HTTP endpoint handlers

use std::{sync::Arc, time::Duration};
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::{error, info};

use crate::state::{AppState, TimerState};
use super::responses::{AdjustRequest, ApiResponse, HealthResponse, StatusResponse};

/// Seconds asked for in the body, falling back to the configured step
fn requested_seconds(state: &AppState, body: Option<Json<AdjustRequest>>) -> u64 {
    body.and_then(|Json(request)| request.seconds)
        .unwrap_or(state.step_seconds)
}

/// Handle POST /time/add - Add time to the countdown
pub async fn add_time_handler(
    State(state): State<Arc<AppState>>,
    body: Option<Json<AdjustRequest>>,
) -> Json<ApiResponse> {
    let seconds = requested_seconds(&state, body);
    let time = state.add_time(Duration::from_secs(seconds));
    Json(ApiResponse::new(
        state.timer_state(),
        format!("Added {} seconds", seconds),
        time,
    ))
}

/// Handle POST /time/subtract - Remove time from the countdown
pub async fn subtract_time_handler(
    State(state): State<Arc<AppState>>,
    body: Option<Json<AdjustRequest>>,
) -> Json<ApiResponse> {
    let seconds = requested_seconds(&state, body);
    let time = state.subtract_time(Duration::from_secs(seconds));
    Json(ApiResponse::new(
        state.timer_state(),
        format!("Subtracted {} seconds", seconds),
        time,
    ))
}

/// Handle POST /start - Start or restart the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.start_timer() {
        Ok(TimerState::Running) => {
            info!("Start endpoint called - countdown running");
            Ok(Json(ApiResponse::new(TimerState::Running, "Countdown started".to_string(), state.time())))
        }
        Ok(timer_state) => {
            info!("Start endpoint called - no time remaining");
            Ok(Json(ApiResponse::new(timer_state, "No time remaining".to_string(), state.time())))
        }
        Err(e) => {
            error!("Failed to start countdown: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /stop - Stop the countdown
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.stop_timer() {
        Ok(timer_state) => {
            info!("Stop endpoint called - countdown stopped");
            Ok(Json(ApiResponse::new(timer_state, "Countdown stopped".to_string(), state.time())))
        }
        Err(e) => {
            error!("Failed to stop countdown: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /toggle - Start when stopped, stop when running
pub async fn toggle_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.toggle_timer() {
        Ok(timer_state) => {
            info!("Toggle endpoint called - countdown {}", timer_state.as_str());
            Ok(Json(ApiResponse::new(
                timer_state,
                format!("Countdown {}", timer_state.as_str()),
                state.time(),
            )))
        }
        Err(e) => {
            error!("Failed to toggle countdown: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /status - Return current timer status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let errors = match state.get_errors() {
        Ok(errors) => errors,
        Err(e) => {
            error!("Failed to get errors: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let time = state.time();
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        state: state.timer_state(),
        time,
        readout: time.formatted(),
        progress: time.progress(),
        can_toggle: state.can_toggle(),
        step_seconds: state.step_seconds,
        errors,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
