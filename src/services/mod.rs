//! External collaborator module
//! 
//! This module contains the device capabilities the timer drives, currently
//! the completion vibration.

pub mod vibrator;

// Re-export main items
pub use vibrator::*;
