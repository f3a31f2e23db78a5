//! Countdown time value

use serde::{Deserialize, Serialize};

/// Remaining and total seconds of the countdown.
///
/// `remaining_seconds` never exceeds `total_seconds`; the total is the basis a
/// dial renders the remaining time against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Time {
    pub total_seconds: u64,
    pub remaining_seconds: u64,
}

impl Time {
    /// Create a full countdown of `seconds`
    pub fn new(seconds: u64) -> Self {
        Self {
            total_seconds: seconds,
            remaining_seconds: seconds,
        }
    }

    /// Add seconds to the remaining time, growing the total only when it is exceeded
    pub fn added(self, seconds: u64) -> Self {
        let remaining_seconds = self.remaining_seconds.saturating_add(seconds);
        Self {
            total_seconds: self.total_seconds.max(remaining_seconds),
            remaining_seconds,
        }
    }

    /// Remove seconds from the remaining time, stopping at zero
    pub fn subtracted(self, seconds: u64) -> Self {
        Self {
            remaining_seconds: self.remaining_seconds.saturating_sub(seconds),
            ..self
        }
    }

    /// Whether the countdown has run out
    pub fn is_elapsed(&self) -> bool {
        self.remaining_seconds == 0
    }

    /// Digital readout as `MM:SS`
    pub fn formatted(&self) -> String {
        let minutes = self.remaining_seconds / 60;
        let seconds = self.remaining_seconds % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }

    /// Fraction of the total still remaining, in `[0, 1]`
    pub fn progress(&self) -> f64 {
        if self.total_seconds == 0 {
            return 0.0;
        }
        self.remaining_seconds as f64 / self.total_seconds as f64
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new(60)
    }
}
