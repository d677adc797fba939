// src/watch/poller.rs

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::engine::{MonitorEvent, TriggerReason};
use crate::errors::Result;
use crate::watch::TriggerSource;

/// Fixed-interval trigger source.
///
/// Sends `Trigger(Poll)` every `interval`. A tick is dropped when the
/// channel is full; queued ticks are coalesced by the loop anyway. Dropping
/// the poller stops the timer task.
#[derive(Debug)]
pub struct Poller {
    handle: JoinHandle<()>,
}

impl Poller {
    /// Must be called from within a Tokio runtime.
    pub fn spawn(interval: Duration, tx: mpsc::Sender<MonitorEvent>) -> Self {
        info!(?interval, "polling for changes");

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; the startup pass covers it.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                match tx.try_send(MonitorEvent::Trigger(TriggerReason::Poll)) {
                    Ok(()) => {}
                    Err(mpsc::error::TrySendError::Full(_)) => {
                        debug!("poll tick dropped; channel full");
                    }
                    Err(mpsc::error::TrySendError::Closed(_)) => break,
                }
            }
            debug!("poller finished");
        });

        Self { handle }
    }
}

impl TriggerSource for Poller {
    /// Every pass re-reads the directories anyway; nothing to register.
    fn sync_directories(&mut self, _dirs: &[PathBuf]) -> Result<()> {
        Ok(())
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
