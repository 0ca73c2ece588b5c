//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream};
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};

use crate::{
    error::FocusError,
    state::{
        app_state::SUBJECT_REQUIRED_MESSAGE, AppState, StartOutcome, Subject, TaskId, TimerMode,
        TimerState,
    },
    utils::minutes_from_value,
};
use super::responses::{
    AddTaskRequest, ApiResponse, CustomDurationRequest, HealthResponse, ModeRequest,
    StatusResponse, SubjectRequest, TaskListView, TaskResponse, STATUS_CHANGED,
    STATUS_UNCHANGED,
};

fn internal_error(context: &str, e: FocusError) -> StatusCode {
    error!("{}: {}", context, e);
    StatusCode::INTERNAL_SERVER_ERROR
}

/// Handle POST /timer/start
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    let (outcome, timer) = state
        .start_timer()
        .map_err(|e| internal_error("Failed to start timer", e))?;

    Ok(Json(start_response(outcome, &timer)))
}

/// Handle POST /timer/toggle - the combined Start/Pause button
pub async fn toggle_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    let (outcome, timer) = state
        .toggle_timer()
        .map_err(|e| internal_error("Failed to toggle timer", e))?;

    Ok(Json(start_response(outcome, &timer)))
}

fn start_response(outcome: StartOutcome, timer: &TimerState) -> ApiResponse {
    match outcome {
        StartOutcome::Started => ApiResponse::changed("Timer started", timer),
        StartOutcome::Paused => ApiResponse::changed("Timer paused", timer),
        StartOutcome::Unchanged => ApiResponse::unchanged("Timer already running", timer),
        StartOutcome::SubjectRequired => ApiResponse::rejected(SUBJECT_REQUIRED_MESSAGE, timer),
    }
}

/// Handle POST /timer/pause
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    let (paused, timer) = state
        .pause_timer()
        .map_err(|e| internal_error("Failed to pause timer", e))?;

    Ok(Json(if paused {
        ApiResponse::changed("Timer paused", &timer)
    } else {
        ApiResponse::unchanged("Timer is not running", &timer)
    }))
}

/// Handle POST /timer/reset
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    let timer = state
        .reset_timer()
        .map_err(|e| internal_error("Failed to reset timer", e))?;

    Ok(Json(ApiResponse::changed("Timer reset", &timer)))
}

/// Handle POST /timer/mode
pub async fn mode_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ModeRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let Some(mode) = TimerMode::parse(&request.mode) else {
        warn!("Unknown timer mode: {}", request.mode);
        return Err(StatusCode::BAD_REQUEST);
    };

    let timer = state
        .set_timer_mode(mode)
        .map_err(|e| internal_error("Failed to set timer mode", e))?;

    Ok(Json(ApiResponse::changed(format!("Timer mode set to {}", mode.label()), &timer)))
}

/// Handle POST /timer/custom-duration
pub async fn custom_duration_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CustomDurationRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let raw = minutes_from_value(&request.minutes);
    let (minutes, timer) = state
        .set_custom_duration(raw)
        .map_err(|e| internal_error("Failed to set custom duration", e))?;

    Ok(Json(ApiResponse::changed(
        format!("Custom duration set to {} minutes", minutes),
        &timer,
    )))
}

/// Handle POST /presentation/exited - surface was left outside our control
pub async fn presentation_exited_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let (stopped, timer) = state
        .presentation_exited()
        .map_err(|e| internal_error("Failed to handle presentation exit", e))?;

    Ok(Json(if stopped {
        ApiResponse::changed("Timer paused after presentation exit", &timer)
    } else {
        ApiResponse::unchanged("Timer is not running", &timer)
    }))
}

/// Handle POST /subject - select a subject, or clear it when already selected
pub async fn subject_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SubjectRequest>,
) -> Result<Json<TaskResponse>, StatusCode> {
    let Some(subject) = Subject::parse(&request.subject) else {
        warn!("Unknown subject: {}", request.subject);
        return Err(StatusCode::BAD_REQUEST);
    };

    let view = state
        .set_subject_filter(subject)
        .map_err(|e| internal_error("Failed to set subject filter", e))?;

    let message = match view.subject_filter {
        Some(active) => format!("Subject set to {}", active),
        None => "Subject cleared".to_string(),
    };
    Ok(Json(TaskResponse::new(STATUS_CHANGED, message, None, &view)))
}

/// Handle GET /tasks
pub async fn list_tasks_handler(State(state): State<Arc<AppState>>) -> Result<Json<TaskListView>, StatusCode> {
    let view = state
        .get_task_view()
        .map_err(|e| internal_error("Failed to read tasks", e))?;

    Ok(Json(TaskListView::from(&view)))
}

/// Handle POST /tasks
pub async fn add_task_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AddTaskRequest>,
) -> Result<Json<TaskResponse>, StatusCode> {
    let (added, view) = state
        .add_task(&request.text)
        .map_err(|e| internal_error("Failed to add task", e))?;

    Ok(Json(match added {
        Some(id) => TaskResponse::new(STATUS_CHANGED, "Task added", Some(id), &view),
        None => TaskResponse::new(STATUS_UNCHANGED, "Task text is blank", None, &view),
    }))
}

/// Handle POST /tasks/:id/toggle
pub async fn toggle_task_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<TaskResponse>, StatusCode> {
    let id = TaskId(id);
    let (toggled, view) = state
        .toggle_task(id)
        .map_err(|e| internal_error("Failed to toggle task", e))?;

    Ok(Json(match toggled {
        Some(true) => TaskResponse::new(STATUS_CHANGED, "Task completed", Some(id), &view),
        Some(false) => TaskResponse::new(STATUS_CHANGED, "Task reopened", Some(id), &view),
        None => TaskResponse::new(STATUS_UNCHANGED, "No such task", Some(id), &view),
    }))
}

/// Handle DELETE /tasks/:id
pub async fn delete_task_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<TaskResponse>, StatusCode> {
    let id = TaskId(id);
    let (removed, view) = state
        .delete_task(id)
        .map_err(|e| internal_error("Failed to delete task", e))?;

    Ok(Json(if removed {
        TaskResponse::new(STATUS_CHANGED, "Task deleted", Some(id), &view)
    } else {
        TaskResponse::new(STATUS_UNCHANGED, "No such task", Some(id), &view)
    }))
}

/// Handle GET /status - Return the full timer and task snapshot
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let view = state
        .get_task_view()
        .map_err(|e| internal_error("Failed to get task view", e))?;
    let timer = state
        .get_timer_state()
        .map_err(|e| internal_error("Failed to get timer state", e))?;

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer: (&timer).into(),
        list: (&view).into(),
        require_subject: state.require_subject,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /events - stream outward signals as server-sent events
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!("Event stream subscriber connected");
    let rx = state.events.subscribe();

    let events = stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => match serde_json::to_string(&event) {
                    Ok(data) => {
                        let sse = Event::default().event(event.name()).data(data);
                        return Some((Ok(sse), rx));
                    }
                    Err(e) => warn!("Failed to encode {} event: {}", event.name(), e),
                },
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Event stream lagged, skipped {} events", skipped)
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
