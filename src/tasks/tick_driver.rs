//! Tick driver background task

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::state::{AppState, TickOutcome};

/// Background task that feeds scheduler ticks into the timer engine.
///
/// Each tick carries the epoch of the run that armed it; the engine drops
/// ticks from runs that have since stopped.
pub async fn tick_driver_task(state: Arc<AppState>, mut tick_rx: mpsc::UnboundedReceiver<u64>) {
    info!("Starting tick driver task");

    while let Some(epoch) = tick_rx.recv().await {
        match state.deliver_tick(epoch) {
            Ok(TickOutcome::Expired) => info!("Countdown finished"),
            Ok(TickOutcome::Counted { remaining_seconds }) => {
                debug!("{}s remaining", remaining_seconds)
            }
            Ok(TickOutcome::Ignored) => {}
            Err(e) => error!("Failed to deliver tick: {}", e),
        }
    }

    info!("Tick channel closed, tick driver exiting");
}
