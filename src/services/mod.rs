//! External collaborator module
//!
//! Presentation surface and notification publishing, tick scheduling, and
//! preference storage backends.

pub mod preference_store;
pub mod presentation;
pub mod ticker;

// Re-export main types
pub use preference_store::{JsonFilePreferenceStore, MemoryPreferenceStore, PreferenceStore};
pub use presentation::{EventPublisher, FocusEvent, Notifier, PresentationSurface, TIME_UP_MESSAGE};
pub use ticker::{TickHandle, TickScheduler, TokioTicker, TICK_PERIOD};
