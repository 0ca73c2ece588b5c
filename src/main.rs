//! Focus Timer - A state-managed HTTP server for a subject-tagged focus timer
//!
//! This is the main entry point for the focus-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use focus_timer::{
    api::create_router,
    config::Config,
    services::{EventPublisher, TokioTicker},
    state::{AppState, PreferenceRepository},
    tasks::tick_driver_task,
    utils::shutdown_signal,
};

/// Events buffered per SSE subscriber before it is considered lagging
const EVENT_CAPACITY: usize = 256;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("focus_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting focus-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, prefs={}, require_subject={}",
        config.host,
        config.port,
        if config.no_persist {
            "memory".to_string()
        } else {
            config.prefs.display().to_string()
        },
        config.require_subject
    );

    // Preferences are read exactly once here
    let preferences = Arc::new(PreferenceRepository::load(config.preference_store()));

    let events = EventPublisher::new(EVENT_CAPACITY);
    let (ticker, tick_rx) = TokioTicker::channel();

    // Create application state
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        config.require_subject,
        preferences,
        events,
        Arc::new(ticker),
    ));

    // Start the tick driver background task
    let tick_state = Arc::clone(&state);
    tokio::spawn(async move {
        tick_driver_task(tick_state, tick_rx).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST   /timer/start | /timer/pause | /timer/toggle | /timer/reset");
    info!("  POST   /timer/mode             - {{\"mode\": \"pomodoro\"|\"ultradian\"|\"custom\"}}");
    info!("  POST   /timer/custom-duration  - {{\"minutes\": ...}}");
    info!("  POST   /presentation/exited    - Fullscreen was left externally");
    info!("  POST   /subject                - {{\"subject\": \"Physics\"|\"Chemistry\"|\"Maths\"}}");
    info!("  GET    /tasks, POST /tasks, POST /tasks/:id/toggle, DELETE /tasks/:id");
    info!("  GET    /events                 - Server-sent event stream");
    info!("  GET    /status                 - Timer and task snapshot");
    info!("  GET    /health                 - Health check");

    // Open event streams never finish on their own, so shutdown drops the
    // server instead of draining connections
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
