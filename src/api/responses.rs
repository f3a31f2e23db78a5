//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{Time, TimerState};

/// Optional body of the +/- endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdjustRequest {
    /// Seconds to add or subtract; the configured step when absent
    pub seconds: Option<u64>,
}

/// API response structure for timer command endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: TimerState,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub time: Time,
    pub readout: String,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: TimerState, message: String, time: Time) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            readout: time.formatted(),
            time,
        }
    }
}

/// Full timer status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub state: TimerState,
    pub time: Time,
    pub readout: String,
    pub progress: f64,
    pub can_toggle: bool,
    pub step_seconds: u64,
    pub errors: Vec<String>,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
