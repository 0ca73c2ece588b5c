//! Utility functions module
//!
//! Signal handling, raw input normalization and time formatting.

pub mod input;
pub mod signals;
pub mod time_format;

// Re-export main functions
pub use input::{minutes_from_value, parse_minutes};
pub use signals::shutdown_signal;
pub use time_format::format_remaining;
