//! Windup - a single countdown timer served over a small local HTTP API
//! 
//! The timer holds a remaining/total duration that can be adjusted by
//! whole seconds, counts down once per second while running, and fires a
//! vibration when it reaches zero.

pub mod config;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{AppState, Time, TimerState};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
