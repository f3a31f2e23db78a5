//! Background tasks module
//! 
//! This module contains the countdown loop and the tasks that react to it.

pub mod countdown;
pub mod vibration;

// Re-export main functions
pub use countdown::{countdown_task, TICK_PERIOD};
pub use vibration::vibration_task;
