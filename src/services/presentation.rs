//! Outward signals: presentation surface requests and the time's-up notice
//!
//! The engine only talks to the [`PresentationSurface`] and [`Notifier`]
//! traits. The shipped implementation publishes [`FocusEvent`]s on a
//! broadcast channel that UIs follow through `GET /events`.

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::{state::TimerMode, utils::format_remaining};

pub const TIME_UP_MESSAGE: &str = "Time is up!";

/// Event delivered to connected UIs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FocusEvent {
    /// Ask the UI to enter its fullscreen/focus presentation
    PresentationEnter,
    /// Ask the UI to leave its fullscreen/focus presentation
    PresentationExit,
    /// The countdown reached zero
    TimeUp { mode: TimerMode, message: String },
    /// One second elapsed on a running timer
    Tick { remaining_seconds: u64, display: String },
}

impl FocusEvent {
    pub fn tick(remaining_seconds: u64) -> Self {
        FocusEvent::Tick {
            remaining_seconds,
            display: format_remaining(remaining_seconds),
        }
    }

    /// SSE event name
    pub fn name(&self) -> &'static str {
        match self {
            FocusEvent::PresentationEnter => "presentation_enter",
            FocusEvent::PresentationExit => "presentation_exit",
            FocusEvent::TimeUp { .. } => "time_up",
            FocusEvent::Tick { .. } => "tick",
        }
    }
}

/// External fullscreen/focus display the engine can ask to enter or leave.
///
/// Requests are one-way; the engine never waits for them to complete.
pub trait PresentationSurface: Send + Sync {
    fn request_enter(&self);
    fn request_exit(&self);
}

/// Receiver of the single time's-up notification fired per expiry
pub trait Notifier: Send + Sync {
    fn time_up(&self, mode: TimerMode);
}

/// Broadcast publisher backing both outward traits
#[derive(Debug, Clone)]
pub struct EventPublisher {
    tx: broadcast::Sender<FocusEvent>,
}

impl EventPublisher {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FocusEvent> {
        self.tx.subscribe()
    }

    /// Fire-and-forget publish; having no listeners is not an error
    pub fn publish(&self, event: FocusEvent) {
        let name = event.name();
        if self.tx.send(event).is_err() {
            debug!("No subscribers for {} event", name);
        }
    }
}

impl PresentationSurface for EventPublisher {
    fn request_enter(&self) {
        debug!("Requesting presentation enter");
        self.publish(FocusEvent::PresentationEnter);
    }

    fn request_exit(&self) {
        debug!("Requesting presentation exit");
        self.publish(FocusEvent::PresentationExit);
    }
}

impl Notifier for EventPublisher {
    fn time_up(&self, mode: TimerMode) {
        info!("{} ({} timer finished)", TIME_UP_MESSAGE, mode.as_str());
        self.publish(FocusEvent::TimeUp {
            mode,
            message: TIME_UP_MESSAGE.to_string(),
        });
    }
}
