//! Preference storage backends
//!
//! The JSON file layout mirrors a browser key/value store: three flat keys
//! holding a mode name, a minute count and a subject name (`""` for none).

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    error::FocusError,
    state::{Preferences, Subject, TimerMode},
};

pub const TIMER_MODE_KEY: &str = "timerMode";
pub const CUSTOM_DURATION_KEY: &str = "customDurationMinutes";
pub const SUBJECT_FILTER_KEY: &str = "activeSubjectFilter";

/// Key/value storage for the three preference slots
pub trait PreferenceStore: Send + Sync {
    /// Read all slots. Missing or invalid slots take their defaults.
    fn load(&self) -> Result<Preferences, FocusError>;

    fn save(&self, preferences: &Preferences) -> Result<(), FocusError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StoredPreferences<'a> {
    timer_mode: &'a str,
    custom_duration_minutes: u32,
    active_subject_filter: &'a str,
}

/// Preferences kept in a JSON file, replaced atomically on save
#[derive(Debug, Clone)]
pub struct JsonFilePreferenceStore {
    path: PathBuf,
}

impl JsonFilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for JsonFilePreferenceStore {
    fn load(&self) -> Result<Preferences, FocusError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No preference file at {}, using defaults", self.path.display());
                return Ok(Preferences::default());
            }
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<Value>(&text) {
            Ok(value) => Ok(preferences_from_value(&value)),
            Err(e) => {
                warn!("Preference file {} is not valid JSON: {}", self.path.display(), e);
                Ok(Preferences::default())
            }
        }
    }

    fn save(&self, preferences: &Preferences) -> Result<(), FocusError> {
        let stored = StoredPreferences {
            timer_mode: preferences.timer_mode.as_str(),
            custom_duration_minutes: preferences.custom_duration_minutes,
            active_subject_filter: Subject::filter_name(preferences.active_subject_filter),
        };
        let text = serde_json::to_string_pretty(&stored)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut tmp_path = self.path.clone().into_os_string();
        tmp_path.push(".tmp");
        fs::write(&tmp_path, text)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

/// Field-by-field lenient decoding
fn preferences_from_value(value: &Value) -> Preferences {
    let defaults = Preferences::default();

    let timer_mode = value
        .get(TIMER_MODE_KEY)
        .and_then(Value::as_str)
        .and_then(TimerMode::parse)
        .unwrap_or(defaults.timer_mode);

    let custom_duration_minutes = value
        .get(CUSTOM_DURATION_KEY)
        .and_then(|v| {
            v.as_u64()
                .or_else(|| v.as_str().and_then(|s| s.trim().parse::<u64>().ok()))
        })
        .filter(|minutes| *minutes >= 1)
        .and_then(|minutes| u32::try_from(minutes).ok())
        .unwrap_or(defaults.custom_duration_minutes);

    let active_subject_filter = match value.get(SUBJECT_FILTER_KEY).and_then(Value::as_str) {
        Some(name) => Subject::parse(name),
        None => defaults.active_subject_filter,
    };

    Preferences {
        timer_mode,
        custom_duration_minutes,
        active_subject_filter,
    }
}

/// Process-local store used with `--no-persist` and in tests
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    saved: Mutex<Option<Preferences>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an already persisted value
    pub fn with(preferences: Preferences) -> Self {
        Self {
            saved: Mutex::new(Some(preferences)),
        }
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> Result<Preferences, FocusError> {
        let saved = self
            .saved
            .lock()
            .map_err(|_| FocusError::LockPoisoned("memory preference store"))?;
        Ok(saved.clone().unwrap_or_default())
    }

    fn save(&self, preferences: &Preferences) -> Result<(), FocusError> {
        let mut saved = self
            .saved
            .lock()
            .map_err(|_| FocusError::LockPoisoned("memory preference store"))?;
        *saved = Some(preferences.clone());
        Ok(())
    }
}
