//! One-second tick scheduling
//!
//! The engine arms a tick source when it starts running and cancels the
//! returned handle on every transition out of Running. Every arming gets a
//! fresh epoch; ticks carry it so a tick queued before a stop can be told
//! apart from ticks of the current run.

use std::time::Duration;

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::debug;

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Something that can deliver one tick per second until cancelled
pub trait TickScheduler: Send + Sync {
    fn arm(&self, epoch: u64) -> Box<dyn TickHandle>;
}

/// Handle to an armed tick source
pub trait TickHandle: Send {
    fn epoch(&self) -> u64;

    /// Stop delivering ticks. A tick already in flight keeps its old epoch
    /// and is discarded by the engine.
    fn cancel(&mut self);
}

/// Tokio interval per run, forwarding epochs to the tick driver task
#[derive(Debug, Clone)]
pub struct TokioTicker {
    tx: mpsc::UnboundedSender<u64>,
}

impl TokioTicker {
    /// Create a ticker and the receiver the tick driver drains
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<u64>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl TickScheduler for TokioTicker {
    fn arm(&self, epoch: u64) -> Box<dyn TickHandle> {
        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            // First tick one full period after arming, not immediately
            let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                interval.tick().await;
                if tx.send(epoch).is_err() {
                    debug!("Tick receiver dropped, stopping ticker {}", epoch);
                    break;
                }
            }
        });

        debug!("Armed ticker {}", epoch);
        Box::new(TokioTickHandle {
            epoch,
            task: Some(task),
        })
    }
}

struct TokioTickHandle {
    epoch: u64,
    task: Option<JoinHandle<()>>,
}

impl TickHandle for TokioTickHandle {
    fn epoch(&self) -> u64 {
        self.epoch
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("Cancelled ticker {}", self.epoch);
        }
    }
}

impl Drop for TokioTickHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn delivers_epoch_once_per_second() {
        let (ticker, mut rx) = TokioTicker::channel();
        let mut handle = ticker.arm(7);

        tokio::time::sleep(Duration::from_millis(3500)).await;
        handle.cancel();

        let mut ticks = Vec::new();
        while let Ok(epoch) = rx.try_recv() {
            ticks.push(epoch);
        }
        assert_eq!(ticks, vec![7, 7, 7]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_ticker_goes_quiet() {
        let (ticker, mut rx) = TokioTicker::channel();
        let mut handle = ticker.arm(1);
        handle.cancel();

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
    }
}
