//! Countdown state machine
//!
//! Idle -> Running on `start`, back to Idle on `pause`, `reset`, `set_mode`,
//! an external presentation exit, or expiry. Expiry is the tick that takes
//! `remaining_seconds` to zero; it fires its side effects and leaves the
//! timer Idle at zero.
//!
//! The one-second tick source is armed only while running. Every transition
//! out of Running cancels it before returning.

use std::sync::Arc;

use tracing::{debug, info};

use super::{PreferenceRepository, TimerMode, TimerState};
use crate::services::{Notifier, PresentationSurface, TickHandle, TickScheduler};

/// What a delivered tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Timer not running, or the tick belongs to an earlier run
    Ignored,
    /// One second counted down
    Counted { remaining_seconds: u64 },
    /// Countdown reached zero
    Expired,
}

pub struct TimerEngine {
    state: TimerState,
    surface: Arc<dyn PresentationSurface>,
    notifier: Arc<dyn Notifier>,
    scheduler: Arc<dyn TickScheduler>,
    preferences: Arc<PreferenceRepository>,
    ticker: Option<Box<dyn TickHandle>>,
    next_epoch: u64,
}

impl TimerEngine {
    /// Create an idle engine preset from the loaded preferences
    pub fn new(
        preferences: Arc<PreferenceRepository>,
        surface: Arc<dyn PresentationSurface>,
        notifier: Arc<dyn Notifier>,
        scheduler: Arc<dyn TickScheduler>,
    ) -> Self {
        let loaded = preferences.snapshot();
        Self {
            state: TimerState::new(loaded.timer_mode, loaded.custom_duration_minutes),
            surface,
            notifier,
            scheduler,
            preferences,
            ticker: None,
            next_epoch: 1,
        }
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// Epoch of the currently armed tick source
    pub fn armed_epoch(&self) -> Option<u64> {
        self.ticker.as_ref().map(|ticker| ticker.epoch())
    }

    /// Start counting down. A timer sitting at zero is re-preset first.
    pub fn start(&mut self) -> bool {
        if self.state.running {
            debug!("Start ignored, timer already running");
            return false;
        }

        if self.state.remaining_seconds == 0 {
            self.state.remaining_seconds = self.state.duration_seconds();
        }

        self.state.running = true;
        self.arm_ticker();
        self.surface.request_enter();

        info!(
            "Timer started: mode={}, remaining={}",
            self.state.mode.as_str(),
            self.state.display()
        );
        true
    }

    /// Stop counting down, keeping the remaining time
    pub fn pause(&mut self) -> bool {
        if !self.state.running {
            debug!("Pause ignored, timer not running");
            return false;
        }

        self.stop_running();
        self.surface.request_exit();

        info!("Timer paused at {}", self.state.display());
        true
    }

    /// Start when idle, pause when running
    pub fn toggle(&mut self) -> bool {
        if self.state.running {
            self.pause()
        } else {
            self.start()
        }
    }

    /// Count down one second. Only valid while running.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.running {
            debug!("Tick ignored, timer not running");
            return TickOutcome::Ignored;
        }

        self.state.remaining_seconds = self.state.remaining_seconds.saturating_sub(1);
        if self.state.remaining_seconds > 0 {
            return TickOutcome::Counted {
                remaining_seconds: self.state.remaining_seconds,
            };
        }

        self.stop_running();
        self.surface.request_exit();
        self.notifier.time_up(self.state.mode);

        info!("Timer expired ({})", self.state.mode.as_str());
        TickOutcome::Expired
    }

    /// Deliver a tick from the scheduler armed with `epoch`
    pub fn tick_for(&mut self, epoch: u64) -> TickOutcome {
        if self.armed_epoch() != Some(epoch) {
            debug!("Discarding stale tick from ticker {}", epoch);
            return TickOutcome::Ignored;
        }
        self.tick()
    }

    /// Stop and preset the current mode's full duration
    pub fn reset(&mut self) {
        self.stop_running();
        self.surface.request_exit();
        self.state.remaining_seconds = self.state.duration_seconds();

        info!("Timer reset to {}", self.state.display());
    }

    /// Switch mode, stopping the timer and presetting the new duration
    pub fn set_mode(&mut self, mode: TimerMode) {
        if self.state.running {
            self.stop_running();
            self.surface.request_exit();
        }

        self.state.mode = mode;
        self.state.remaining_seconds = self.state.duration_seconds();
        self.preferences.set_timer_mode(mode);

        info!("Timer mode set to {} ({})", mode.as_str(), self.state.display());
    }

    /// Set the custom duration, clamped to at least one minute.
    ///
    /// In custom mode the remaining time follows immediately, even while
    /// running.
    pub fn set_custom_duration(&mut self, minutes: i64) -> u32 {
        let minutes = u32::try_from(minutes.max(1)).unwrap_or(u32::MAX);
        self.state.custom_duration_minutes = minutes;

        if self.state.mode == TimerMode::Custom {
            self.state.remaining_seconds = self.state.duration_seconds();
        }
        self.preferences.set_custom_duration(minutes);

        info!("Custom duration set to {} minutes", minutes);
        minutes
    }

    /// The presentation surface was left by other means; stop without
    /// asking it to exit again.
    pub fn on_presentation_exited(&mut self) -> bool {
        if !self.state.running {
            return false;
        }

        self.stop_running();
        info!("Presentation exited externally, timer paused at {}", self.state.display());
        true
    }

    fn arm_ticker(&mut self) {
        self.cancel_ticker();
        let epoch = self.next_epoch;
        self.next_epoch += 1;
        self.ticker = Some(self.scheduler.arm(epoch));
    }

    fn cancel_ticker(&mut self) {
        if let Some(mut ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }

    fn stop_running(&mut self) {
        self.state.running = false;
        self.cancel_ticker();
    }
}

impl Drop for TimerEngine {
    fn drop(&mut self) {
        self.cancel_ticker();
    }
}

impl std::fmt::Debug for TimerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerEngine")
            .field("state", &self.state)
            .field("armed_epoch", &self.armed_epoch())
            .finish_non_exhaustive()
    }
}
