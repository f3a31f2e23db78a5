//! Timer state enumeration

use serde::{Deserialize, Serialize};

/// Whether the countdown loop is ticking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    #[default]
    Stopped,
    Running,
}

impl TimerState {
    /// Whether the countdown loop is active
    pub fn is_running(&self) -> bool {
        matches!(self, TimerState::Running)
    }

    /// Lowercase name, as serialized
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerState::Stopped => "stopped",
            TimerState::Running => "running",
        }
    }
}
