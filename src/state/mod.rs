//! State management module
//!
//! Timer and task state, the rules that keep them consistent, and the
//! application state that serializes access to both.

pub mod app_state;
pub mod preferences;
pub mod task_store;
pub mod timer_engine;
pub mod timer_state;

// Re-export main types
pub use app_state::{AppState, StartOutcome};
pub use preferences::{PreferenceRepository, Preferences};
pub use task_store::{Subject, Task, TaskId, TaskStore, TaskSubject};
pub use timer_engine::{TickOutcome, TimerEngine};
pub use timer_state::{TimerMode, TimerPhase, TimerState, DEFAULT_CUSTOM_MINUTES};
