//! Main application state management

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::{
    PreferenceRepository, Subject, Task, TaskId, TaskStore, TickOutcome, TimerEngine, TimerMode,
    TimerState,
};
use crate::{
    error::FocusError,
    services::{EventPublisher, FocusEvent, TickScheduler},
};

pub const SUBJECT_REQUIRED_MESSAGE: &str = "Please select a subject first";

/// Result of the Start (or Start/Pause) button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    /// Toggle hit a running timer and paused it
    Paused,
    /// Already running; nothing changed
    Unchanged,
    /// No subject selected while one is required
    SubjectRequired,
}

/// Snapshot of the task list as a UI shows it
#[derive(Debug, Clone)]
pub struct TaskView {
    pub subject_filter: Option<Subject>,
    pub heading: String,
    pub visible_tasks: Vec<Task>,
}

/// Owns the timer engine and the task store and serializes every operation
/// on them. Lock order is always task store before timer engine.
#[derive(Debug)]
pub struct AppState {
    pub timer_engine: Arc<Mutex<TimerEngine>>,
    pub task_store: Arc<Mutex<TaskStore>>,
    pub preferences: Arc<PreferenceRepository>,
    /// Outward event channel (presentation requests, time's up, ticks)
    pub events: EventPublisher,
    /// Refuse to start while no subject is selected
    pub require_subject: bool,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    /// Wire the engine and store to the shared preferences and event channel
    pub fn new(
        port: u16,
        host: String,
        require_subject: bool,
        preferences: Arc<PreferenceRepository>,
        events: EventPublisher,
        scheduler: Arc<dyn TickScheduler>,
    ) -> Self {
        let publisher = Arc::new(events.clone());
        let timer_engine = TimerEngine::new(
            Arc::clone(&preferences),
            publisher.clone(),
            publisher,
            scheduler,
        );
        let task_store = TaskStore::new(Arc::clone(&preferences));

        Self {
            timer_engine: Arc::new(Mutex::new(timer_engine)),
            task_store: Arc::new(Mutex::new(task_store)),
            preferences,
            events,
            require_subject,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
        }
    }

    fn lock_timer(&self) -> Result<MutexGuard<'_, TimerEngine>, FocusError> {
        self.timer_engine
            .lock()
            .map_err(|_| FocusError::LockPoisoned("timer engine"))
    }

    fn lock_tasks(&self) -> Result<MutexGuard<'_, TaskStore>, FocusError> {
        self.task_store
            .lock()
            .map_err(|_| FocusError::LockPoisoned("task store"))
    }

    /// Apply an operation to the timer engine and return its result with
    /// the resulting timer snapshot
    pub fn update_timer<F, R>(&self, action: &str, updater: F) -> Result<(R, TimerState), FocusError>
    where
        F: FnOnce(&mut TimerEngine) -> R,
    {
        let mut engine = self.lock_timer()?;
        let result = updater(&mut *engine);
        let snapshot = engine.state().clone();
        drop(engine);

        self.record_action(action);
        Ok((result, snapshot))
    }

    /// Apply an operation to the task store and return its result with the
    /// resulting view
    pub fn update_tasks<F, R>(&self, action: &str, updater: F) -> Result<(R, TaskView), FocusError>
    where
        F: FnOnce(&mut TaskStore) -> R,
    {
        let mut store = self.lock_tasks()?;
        let result = updater(&mut *store);
        let view = Self::view_of(&store);
        drop(store);

        self.record_action(action);
        Ok((result, view))
    }

    pub fn start_timer(&self) -> Result<(StartOutcome, TimerState), FocusError> {
        self.start_or_toggle("start", false)
    }

    /// Single Start/Pause button: start when idle, pause when running
    pub fn toggle_timer(&self) -> Result<(StartOutcome, TimerState), FocusError> {
        self.start_or_toggle("toggle", true)
    }

    fn start_or_toggle(
        &self,
        action: &str,
        pause_if_running: bool,
    ) -> Result<(StartOutcome, TimerState), FocusError> {
        let store = self.lock_tasks()?;
        let mut engine = self.lock_timer()?;

        let outcome = if engine.is_running() {
            if pause_if_running && engine.pause() {
                StartOutcome::Paused
            } else {
                StartOutcome::Unchanged
            }
        } else if self.require_subject && store.active_filter().is_none() {
            info!("Start refused: {}", SUBJECT_REQUIRED_MESSAGE);
            StartOutcome::SubjectRequired
        } else if engine.start() {
            StartOutcome::Started
        } else {
            StartOutcome::Unchanged
        };

        let snapshot = engine.state().clone();
        drop(engine);
        drop(store);

        self.record_action(action);
        Ok((outcome, snapshot))
    }

    pub fn pause_timer(&self) -> Result<(bool, TimerState), FocusError> {
        self.update_timer("pause", |engine| engine.pause())
    }

    pub fn reset_timer(&self) -> Result<TimerState, FocusError> {
        self.update_timer("reset", |engine| engine.reset())
            .map(|(_, snapshot)| snapshot)
    }

    pub fn set_timer_mode(&self, mode: TimerMode) -> Result<TimerState, FocusError> {
        self.update_timer("mode", |engine| engine.set_mode(mode))
            .map(|(_, snapshot)| snapshot)
    }

    pub fn set_custom_duration(&self, minutes: i64) -> Result<(u32, TimerState), FocusError> {
        self.update_timer("custom-duration", |engine| engine.set_custom_duration(minutes))
    }

    /// Inbound signal that the presentation surface was left externally
    pub fn presentation_exited(&self) -> Result<(bool, TimerState), FocusError> {
        self.update_timer("presentation-exited", |engine| engine.on_presentation_exited())
    }

    /// Deliver one tick from the scheduler armed with `epoch`
    pub fn deliver_tick(&self, epoch: u64) -> Result<TickOutcome, FocusError> {
        let mut engine = self.lock_timer()?;
        let outcome = engine.tick_for(epoch);
        let remaining = engine.state().remaining_seconds;
        drop(engine);

        match outcome {
            TickOutcome::Ignored => {}
            TickOutcome::Counted { .. } | TickOutcome::Expired => {
                debug!("Tick {} -> {}s remaining", epoch, remaining);
                self.events.publish(FocusEvent::tick(remaining));
            }
        }
        Ok(outcome)
    }

    pub fn add_task(&self, text: &str) -> Result<(Option<TaskId>, TaskView), FocusError> {
        self.update_tasks("add-task", |store| store.add_task(text))
    }

    pub fn toggle_task(&self, id: TaskId) -> Result<(Option<bool>, TaskView), FocusError> {
        self.update_tasks("toggle-task", |store| store.toggle_completed(id))
    }

    pub fn delete_task(&self, id: TaskId) -> Result<(bool, TaskView), FocusError> {
        self.update_tasks("delete-task", |store| store.delete_task(id))
    }

    pub fn set_subject_filter(&self, subject: Subject) -> Result<TaskView, FocusError> {
        self.update_tasks("subject", |store| store.set_subject_filter(subject))
            .map(|(_, view)| view)
    }

    pub fn get_timer_state(&self) -> Result<TimerState, FocusError> {
        Ok(self.lock_timer()?.state().clone())
    }

    pub fn get_task_view(&self) -> Result<TaskView, FocusError> {
        Ok(Self::view_of(&*self.lock_tasks()?))
    }

    pub fn subject_filter(&self) -> Result<Option<Subject>, FocusError> {
        Ok(self.lock_tasks()?.active_filter())
    }

    fn view_of(store: &TaskStore) -> TaskView {
        TaskView {
            subject_filter: store.active_filter(),
            heading: store.heading(),
            visible_tasks: store.visible_tasks().into_iter().cloned().collect(),
        }
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
