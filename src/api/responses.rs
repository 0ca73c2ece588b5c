//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::state::{
    app_state::TaskView, Subject, Task, TaskId, TimerMode, TimerPhase, TimerState,
};

pub const STATUS_CHANGED: &str = "changed";
pub const STATUS_UNCHANGED: &str = "unchanged";
pub const STATUS_REJECTED: &str = "rejected";

/// Timer snapshot as shown to a UI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerView {
    pub mode: TimerMode,
    pub mode_label: String,
    pub custom_duration_minutes: u32,
    pub remaining_seconds: u64,
    pub display: String,
    pub running: bool,
    pub phase: TimerPhase,
}

impl From<&TimerState> for TimerView {
    fn from(state: &TimerState) -> Self {
        Self {
            mode: state.mode,
            mode_label: state.mode.label().to_string(),
            custom_duration_minutes: state.custom_duration_minutes,
            remaining_seconds: state.remaining_seconds,
            display: state.display(),
            running: state.running,
            phase: state.phase(),
        }
    }
}

/// Response for timer control endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerView,
}

impl ApiResponse {
    pub fn new(status: &str, message: impl Into<String>, timer: &TimerState) -> Self {
        Self {
            status: status.to_string(),
            message: message.into(),
            timestamp: Utc::now(),
            timer: timer.into(),
        }
    }

    pub fn changed(message: impl Into<String>, timer: &TimerState) -> Self {
        Self::new(STATUS_CHANGED, message, timer)
    }

    pub fn unchanged(message: impl Into<String>, timer: &TimerState) -> Self {
        Self::new(STATUS_UNCHANGED, message, timer)
    }

    pub fn rejected(message: impl Into<String>, timer: &TimerState) -> Self {
        Self::new(STATUS_REJECTED, message, timer)
    }
}

/// Task list as shown to a UI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskListView {
    /// `None` when every task is shown
    pub subject_filter: Option<Subject>,
    pub heading: String,
    pub tasks: Vec<TaskDto>,
}

impl From<&TaskView> for TaskListView {
    fn from(view: &TaskView) -> Self {
        Self {
            subject_filter: view.subject_filter,
            heading: view.heading.clone(),
            tasks: view.visible_tasks.iter().map(TaskDto::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDto {
    pub id: TaskId,
    pub text: String,
    pub subject: String,
    pub completed: bool,
}

impl From<&Task> for TaskDto {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            text: task.text.clone(),
            subject: task.subject.to_string(),
            completed: task.completed,
        }
    }
}

/// Response for task and subject endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub task_id: Option<TaskId>,
    pub list: TaskListView,
}

impl TaskResponse {
    pub fn new(status: &str, message: impl Into<String>, task_id: Option<TaskId>, view: &TaskView) -> Self {
        Self {
            status: status.to_string(),
            message: message.into(),
            timestamp: Utc::now(),
            task_id,
            list: view.into(),
        }
    }
}

/// Full snapshot for GET /status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerView,
    pub list: TaskListView,
    pub require_subject: bool,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModeRequest {
    pub mode: String,
}

/// Raw custom duration; any JSON value is accepted and normalized
#[derive(Debug, Clone, Deserialize)]
pub struct CustomDurationRequest {
    #[serde(default)]
    pub minutes: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubjectRequest {
    pub subject: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddTaskRequest {
    #[serde(default)]
    pub text: String,
}
