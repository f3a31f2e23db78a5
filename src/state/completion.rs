//! Completion notification

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Emitted once when a countdown reaches zero
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionEvent {
    /// Total the countdown was measured against
    pub total_seconds: u64,
    pub completed_at: DateTime<Utc>,
}

impl CompletionEvent {
    /// Event stamped with the current time
    pub fn now(total_seconds: u64) -> Self {
        Self {
            total_seconds,
            completed_at: Utc::now(),
        }
    }
}
