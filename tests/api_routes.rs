mod common;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::spawn_app;
use focus_timer::{
    services::{FocusEvent, MemoryPreferenceStore},
    state::{PreferenceRepository, Preferences, Subject, TimerMode},
};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn health_reports_ok() {
    let app = spawn_app(false);
    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn status_starts_from_defaults() {
    let app = spawn_app(false);
    let (status, body) = app.get("/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["mode"], "pomodoro");
    assert_eq!(body["timer"]["remaining_seconds"], 1500);
    assert_eq!(body["timer"]["display"], "25:00");
    assert_eq!(body["timer"]["phase"], "idle");
    assert_eq!(body["timer"]["custom_duration_minutes"], 30);
    assert_eq!(body["list"]["heading"], "Tasks (All)");
    assert!(body["list"]["subject_filter"].is_null());
}

#[tokio::test]
async fn status_reflects_loaded_preferences() {
    let preferences = Arc::new(PreferenceRepository::load(Box::new(
        MemoryPreferenceStore::with(Preferences {
            timer_mode: TimerMode::Ultradian,
            custom_duration_minutes: 15,
            active_subject_filter: Some(Subject::Maths),
        }),
    )));
    let app = common::spawn_app_with(false, preferences);

    let (_, body) = app.get("/status").await;
    assert_eq!(body["timer"]["mode"], "ultradian");
    assert_eq!(body["timer"]["display"], "90:00");
    assert_eq!(body["list"]["subject_filter"], "Maths");
    assert_eq!(body["list"]["heading"], "Tasks (Maths)");
}

#[tokio::test]
async fn start_and_pause_drive_presentation_requests() {
    let mut app = spawn_app(false);

    let (status, body) = app.post_empty("/timer/start").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "changed");
    assert_eq!(body["timer"]["running"], true);

    let (_, body) = app.post_empty("/timer/start").await;
    assert_eq!(body["status"], "unchanged");

    let (_, body) = app.post_empty("/timer/pause").await;
    assert_eq!(body["status"], "changed");
    assert_eq!(body["timer"]["running"], false);

    let (_, body) = app.post_empty("/timer/pause").await;
    assert_eq!(body["status"], "unchanged");

    assert_eq!(
        app.drain_events(),
        vec![FocusEvent::PresentationEnter, FocusEvent::PresentationExit]
    );
}

#[tokio::test]
async fn toggle_starts_then_pauses() {
    let app = spawn_app(false);

    let (_, body) = app.post_empty("/timer/toggle").await;
    assert_eq!(body["message"], "Timer started");
    assert_eq!(body["timer"]["phase"], "running");

    let (_, body) = app.post_empty("/timer/toggle").await;
    assert_eq!(body["message"], "Timer paused");
    assert_eq!(body["timer"]["phase"], "idle");
}

#[tokio::test]
async fn mode_change_presets_duration() {
    let app = spawn_app(false);

    let (_, body) = app.post("/timer/mode", json!({ "mode": "ultradian" })).await;
    assert_eq!(body["timer"]["remaining_seconds"], 5400);
    assert_eq!(body["timer"]["display"], "90:00");

    let (_, body) = app.post_empty("/timer/reset").await;
    assert_eq!(body["timer"]["remaining_seconds"], 5400);

    let (_, body) = app.post("/timer/mode", json!({ "mode": "pomodoro" })).await;
    assert_eq!(body["timer"]["remaining_seconds"], 1500);

    assert_eq!(
        app.state.preferences.snapshot().timer_mode,
        TimerMode::Pomodoro
    );
}

#[tokio::test]
async fn unknown_mode_is_bad_request() {
    let app = spawn_app(false);
    let (status, _) = app.post("/timer/mode", json!({ "mode": "sprint" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn custom_duration_input_is_normalized() {
    let app = spawn_app(false);
    app.post("/timer/mode", json!({ "mode": "custom" })).await;

    let (_, body) = app.post("/timer/custom-duration", json!({ "minutes": "-5" })).await;
    assert_eq!(body["timer"]["custom_duration_minutes"], 1);
    assert_eq!(body["timer"]["remaining_seconds"], 60);

    let (_, body) = app.post("/timer/custom-duration", json!({ "minutes": "abc" })).await;
    assert_eq!(body["timer"]["custom_duration_minutes"], 1);

    let (_, body) = app.post("/timer/custom-duration", json!({ "minutes": 45 })).await;
    assert_eq!(body["timer"]["remaining_seconds"], 2700);
    assert_eq!(body["timer"]["display"], "45:00");

    let (_, body) = app.post("/timer/custom-duration", json!({})).await;
    assert_eq!(body["timer"]["custom_duration_minutes"], 1);
}

#[tokio::test]
async fn external_presentation_exit_pauses_without_exit_request() {
    let mut app = spawn_app(false);
    app.post_empty("/timer/start").await;

    let (_, body) = app.post_empty("/presentation/exited").await;
    assert_eq!(body["status"], "changed");
    assert_eq!(body["timer"]["running"], false);
    assert_eq!(body["timer"]["remaining_seconds"], 1500);

    assert_eq!(app.drain_events(), vec![FocusEvent::PresentationEnter]);

    let (_, body) = app.post_empty("/presentation/exited").await;
    assert_eq!(body["status"], "unchanged");
}

#[tokio::test]
async fn blank_tasks_are_ignored() {
    let app = spawn_app(false);

    for text in ["", "   ", "\n\t"] {
        let (status, body) = app.post("/tasks", json!({ "text": text })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "unchanged");
    }

    let (_, body) = app.get("/tasks").await;
    assert_eq!(body["tasks"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn task_subject_is_frozen_at_creation() {
    let app = spawn_app(false);

    app.post("/subject", json!({ "subject": "Chemistry" })).await;
    let (_, body) = app.post("/tasks", json!({ "text": "titration notes" })).await;
    let id = body["task_id"].as_u64().unwrap();
    assert_eq!(body["list"]["tasks"][0]["subject"], "Chemistry");

    let (_, body) = app.post("/subject", json!({ "subject": "Physics" })).await;
    assert_eq!(body["list"]["heading"], "Tasks (Physics)");
    assert_eq!(body["list"]["tasks"].as_array().unwrap().len(), 0);

    let (_, body) = app.post("/subject", json!({ "subject": "chemistry" })).await;
    let tasks = body["list"]["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["id"], id);
    assert_eq!(tasks[0]["subject"], "Chemistry");
}

#[tokio::test]
async fn selecting_active_subject_clears_filter() {
    let app = spawn_app(false);

    let (_, body) = app.post("/subject", json!({ "subject": "Physics" })).await;
    assert_eq!(body["list"]["subject_filter"], "Physics");

    let (_, body) = app.post("/subject", json!({ "subject": "Physics" })).await;
    assert!(body["list"]["subject_filter"].is_null());
    assert_eq!(body["message"], "Subject cleared");
    assert_eq!(app.state.preferences.snapshot().active_subject_filter, None);
}

#[tokio::test]
async fn unknown_subject_is_bad_request() {
    let app = spawn_app(false);
    let (status, _) = app.post("/subject", json!({ "subject": "Biology" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unassigned_tasks_show_without_filter() {
    let app = spawn_app(false);
    let (_, body) = app.post("/tasks", json!({ "text": "buy pens" })).await;
    assert_eq!(body["list"]["tasks"][0]["subject"], "Unassigned");
    assert_eq!(body["list"]["tasks"][0]["completed"], false);
}

#[tokio::test]
async fn toggle_and_delete_tasks() {
    let app = spawn_app(false);
    let (_, body) = app.post("/tasks", json!({ "text": "past papers" })).await;
    let id = body["task_id"].as_u64().unwrap();

    let (_, body) = app.post_empty(&format!("/tasks/{}/toggle", id)).await;
    assert_eq!(body["message"], "Task completed");
    assert_eq!(body["list"]["tasks"][0]["completed"], true);

    let (_, body) = app.post_empty("/tasks/999/toggle").await;
    assert_eq!(body["status"], "unchanged");

    let (_, before) = app.get("/tasks").await;
    let (_, body) = app.delete("/tasks/999").await;
    assert_eq!(body["status"], "unchanged");
    assert_eq!(body["list"]["tasks"], before["tasks"]);

    let (_, body) = app.delete(&format!("/tasks/{}", id)).await;
    assert_eq!(body["status"], "changed");
    assert_eq!(body["list"]["tasks"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn require_subject_rejects_start_without_filter() {
    let app = spawn_app(true);

    let (_, body) = app.post_empty("/timer/start").await;
    assert_eq!(body["status"], "rejected");
    assert_eq!(body["message"], "Please select a subject first");
    assert_eq!(body["timer"]["running"], false);

    app.post("/subject", json!({ "subject": "Maths" })).await;
    let (_, body) = app.post_empty("/timer/toggle").await;
    assert_eq!(body["status"], "changed");
    assert_eq!(body["timer"]["running"], true);
}

#[tokio::test]
async fn events_endpoint_streams_sse() {
    let app = spawn_app(false);
    let request = Request::get("/events").body(Body::empty()).expect("request");
    let response = app.app.clone().oneshot(request).await.expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str().unwrap();
    assert!(content_type.starts_with("text/event-stream"));
}
