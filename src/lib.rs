//! Focus Timer - A state-managed HTTP server for a subject-tagged focus timer
//!
//! This library provides a countdown timer with fixed and custom durations,
//! a to-do list whose tasks are tagged with the subject selected when they
//! were written, and the HTTP surface a single-page UI drives them through.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use error::FocusError;
pub use state::AppState;
pub use utils::signals::shutdown_signal;
