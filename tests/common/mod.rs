#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use focus_timer::{
    create_router,
    services::{EventPublisher, FocusEvent, TokioTicker},
    state::{AppState, PreferenceRepository},
    tasks::tick_driver_task,
};
use serde_json::Value;
use tokio::sync::broadcast;
use tower::ServiceExt;

pub struct TestApp {
    pub app: Router,
    pub state: Arc<AppState>,
    pub events: broadcast::Receiver<FocusEvent>,
}

/// Full app with the real tokio ticker and tick driver running
pub fn spawn_app(require_subject: bool) -> TestApp {
    spawn_app_with(require_subject, Arc::new(PreferenceRepository::in_memory()))
}

pub fn spawn_app_with(require_subject: bool, preferences: Arc<PreferenceRepository>) -> TestApp {
    let publisher = EventPublisher::new(1024);
    let events = publisher.subscribe();
    let (ticker, tick_rx) = TokioTicker::channel();

    let state = Arc::new(AppState::new(
        0,
        "127.0.0.1".to_string(),
        require_subject,
        preferences,
        publisher,
        Arc::new(ticker),
    ));
    tokio::spawn(tick_driver_task(Arc::clone(&state), tick_rx));

    TestApp {
        app: create_router(Arc::clone(&state)),
        state,
        events,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn post(&self, uri: &str, payload: Value) -> (StatusCode, Value) {
        let request = Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string()))
            .expect("request");
        self.send(request).await
    }

    pub async fn post_empty(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::post(uri).body(Body::empty()).expect("request");
        self.send(request).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::get(uri).body(Body::empty()).expect("request");
        self.send(request).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::delete(uri).body(Body::empty()).expect("request");
        self.send(request).await
    }

    /// Drain every event published so far
    pub fn drain_events(&mut self) -> Vec<FocusEvent> {
        let mut drained = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            drained.push(event);
        }
        drained
    }
}
