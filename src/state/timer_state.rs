//! Timer state structure and duration table

use serde::{Deserialize, Serialize};

use crate::utils::format_remaining;

/// Fallback custom duration when nothing valid was persisted
pub const DEFAULT_CUSTOM_MINUTES: u32 = 30;

/// Which duration governs the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    /// 25 minute focus block
    #[default]
    Pomodoro,
    /// 90 minute focus block
    Ultradian,
    /// User-defined number of minutes
    Custom,
}

impl TimerMode {
    pub const POMODORO_SECONDS: u64 = 25 * 60;
    pub const ULTRADIAN_SECONDS: u64 = 90 * 60;

    /// Stable name used in preferences and the HTTP API
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerMode::Pomodoro => "pomodoro",
            TimerMode::Ultradian => "ultradian",
            TimerMode::Custom => "custom",
        }
    }

    /// Parse a stored or user supplied mode name, ignoring case
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pomodoro" => Some(TimerMode::Pomodoro),
            "ultradian" => Some(TimerMode::Ultradian),
            "custom" => Some(TimerMode::Custom),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimerMode::Pomodoro => "Pomodoro (25m)",
            TimerMode::Ultradian => "Ultradian (90m)",
            TimerMode::Custom => "Custom",
        }
    }

    /// Full countdown length for this mode
    pub fn duration_seconds(&self, custom_minutes: u32) -> u64 {
        match self {
            TimerMode::Pomodoro => Self::POMODORO_SECONDS,
            TimerMode::Ultradian => Self::ULTRADIAN_SECONDS,
            TimerMode::Custom => u64::from(custom_minutes) * 60,
        }
    }
}

/// Observable timer phase. Expiry is momentary and always lands back on `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    Idle,
    Running,
}

/// Countdown aggregate owned by the timer engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimerState {
    pub mode: TimerMode,
    pub custom_duration_minutes: u32,
    pub remaining_seconds: u64,
    pub running: bool,
}

impl TimerState {
    /// Create an idle timer preset to the mode's full duration
    pub fn new(mode: TimerMode, custom_duration_minutes: u32) -> Self {
        let custom_duration_minutes = custom_duration_minutes.max(1);
        Self {
            mode,
            custom_duration_minutes,
            remaining_seconds: mode.duration_seconds(custom_duration_minutes),
            running: false,
        }
    }

    /// Duration of the currently selected mode
    pub fn duration_seconds(&self) -> u64 {
        self.mode.duration_seconds(self.custom_duration_minutes)
    }

    pub fn phase(&self) -> TimerPhase {
        if self.running {
            TimerPhase::Running
        } else {
            TimerPhase::Idle
        }
    }

    pub fn display(&self) -> String {
        format_remaining(self.remaining_seconds)
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(TimerMode::default(), DEFAULT_CUSTOM_MINUTES)
    }
}
