//! State management module
//! 
//! This module contains the countdown values and the state holder that drives them.

pub mod app_state;
pub mod completion;
pub mod time;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use completion::CompletionEvent;
pub use time::Time;
pub use timer_state::TimerState;
