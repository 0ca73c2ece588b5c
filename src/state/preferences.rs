//! User preferences and the repository that keeps them in sync with a store

use std::sync::Mutex;

use tracing::{debug, info, warn};

use super::{Subject, TimerMode, DEFAULT_CUSTOM_MINUTES};
use crate::services::{MemoryPreferenceStore, PreferenceStore};

/// The three persisted preference slots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    pub timer_mode: TimerMode,
    pub custom_duration_minutes: u32,
    pub active_subject_filter: Option<Subject>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            timer_mode: TimerMode::Pomodoro,
            custom_duration_minutes: DEFAULT_CUSTOM_MINUTES,
            active_subject_filter: None,
        }
    }
}

/// Loads preferences once and upserts them whenever a slot changes.
///
/// Shared by the timer engine (mode, custom duration) and the task store
/// (subject filter). Store failures are logged and swallowed.
pub struct PreferenceRepository {
    store: Box<dyn PreferenceStore>,
    current: Mutex<Preferences>,
}

impl PreferenceRepository {
    /// Read the store once, falling back to defaults on failure
    pub fn load(store: Box<dyn PreferenceStore>) -> Self {
        let current = match store.load() {
            Ok(preferences) => {
                info!(
                    "Loaded preferences: mode={}, custom={}min, subject={:?}",
                    preferences.timer_mode.as_str(),
                    preferences.custom_duration_minutes,
                    preferences.active_subject_filter
                );
                preferences
            }
            Err(e) => {
                warn!("Failed to load preferences, using defaults: {}", e);
                Preferences::default()
            }
        };

        Self {
            store,
            current: Mutex::new(current),
        }
    }

    /// Repository backed by a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::load(Box::new(MemoryPreferenceStore::new()))
    }

    pub fn snapshot(&self) -> Preferences {
        match self.current.lock() {
            Ok(current) => current.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn set_timer_mode(&self, mode: TimerMode) {
        self.upsert("timerMode", |p| p.timer_mode = mode);
    }

    pub fn set_custom_duration(&self, minutes: u32) {
        self.upsert("customDurationMinutes", |p| p.custom_duration_minutes = minutes);
    }

    pub fn set_subject_filter(&self, filter: Option<Subject>) {
        self.upsert("activeSubjectFilter", |p| p.active_subject_filter = filter);
    }

    fn upsert<F>(&self, key: &str, updater: F)
    where
        F: FnOnce(&mut Preferences),
    {
        let mut current = match self.current.lock() {
            Ok(current) => current,
            Err(e) => {
                warn!("Failed to lock preferences for {}: {}", key, e);
                return;
            }
        };

        let before = current.clone();
        updater(&mut *current);
        if *current == before {
            return;
        }

        match self.store.save(&*current) {
            Ok(()) => debug!("Saved preference {}", key),
            Err(e) => warn!("Failed to save preference {}: {}", key, e),
        }
    }
}

impl std::fmt::Debug for PreferenceRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceRepository")
            .field("current", &self.snapshot())
            .finish_non_exhaustive()
    }
}
