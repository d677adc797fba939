// src/engine/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::errors::Result;
use crate::exec::Minifier;
use crate::watch::TriggerSource;

use super::core::MonitorCore;
use super::{MonitorEvent, MonitorOptions, MonitorState, TriggerReason};

/// Drives [`MonitorCore`] passes in response to `MonitorEvent`s.
///
/// `Initializing` runs the startup pass, `Watching` blocks on the event
/// channel, `Reacting` runs a full pass over every watched directory, and
/// `Terminated` is reached on shutdown. Passes are awaited inline, so a new
/// one never starts while another is running; triggers that pile up during a
/// pass are coalesced into the next one.
pub struct MonitorLoop<M: Minifier> {
    core: MonitorCore<M>,
    events_rx: mpsc::Receiver<MonitorEvent>,
    options: MonitorOptions,
    state: MonitorState,
}

impl<M: Minifier> fmt::Debug for MonitorLoop<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonitorLoop")
            .field("core", &self.core)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<M: Minifier> MonitorLoop<M> {
    pub fn new(
        core: MonitorCore<M>,
        events_rx: mpsc::Receiver<MonitorEvent>,
        options: MonitorOptions,
    ) -> Self {
        Self {
            core,
            events_rx,
            options,
            state: MonitorState::Initializing,
        }
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn core(&self) -> &MonitorCore<M> {
        &self.core
    }

    /// Main loop.
    ///
    /// `triggers` is kept in sync with the watched directory set; pass
    /// `None` when nothing but the event channel should wake the loop.
    /// Returns `Ok(())` on shutdown or when the channel closes, and `Err`
    /// only for fatal errors (the minifier can't be launched).
    pub async fn run(&mut self, mut triggers: Option<&mut dyn TriggerSource>) -> Result<()> {
        self.transition(MonitorState::Initializing);
        self.core.refresh_directories();
        self.pass(TriggerReason::Startup).await?;

        if self.options.exit_after_first_pass {
            self.transition(MonitorState::Terminated);
            return Ok(());
        }

        if let Some(source) = triggers.as_deref_mut() {
            source.sync_directories(self.core.watched_directories())?;
        }

        loop {
            self.transition(MonitorState::Watching);

            let reason = match self.events_rx.recv().await {
                Some(MonitorEvent::Trigger(reason)) => reason,
                Some(MonitorEvent::ShutdownRequested) => {
                    info!("shutdown requested");
                    break;
                }
                None => {
                    info!("monitor event channel closed; exiting");
                    break;
                }
            };

            if self.drain_pending() {
                info!("shutdown requested");
                break;
            }

            self.transition(MonitorState::Reacting);

            if self.options.rescan_directories && self.core.refresh_directories() {
                if let Some(source) = triggers.as_deref_mut() {
                    source.sync_directories(self.core.watched_directories())?;
                }
            }

            self.pass(reason).await?;
        }

        self.transition(MonitorState::Terminated);
        Ok(())
    }

    /// Swallow triggers queued behind the one being handled.
    ///
    /// Returns true if a shutdown request was among them.
    fn drain_pending(&mut self) -> bool {
        let mut coalesced = 0usize;
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                MonitorEvent::ShutdownRequested => return true,
                MonitorEvent::Trigger(_) => coalesced += 1,
            }
        }
        if coalesced > 0 {
            debug!(coalesced, "coalesced queued triggers");
        }
        false
    }

    async fn pass(&mut self, reason: TriggerReason) -> Result<()> {
        debug!(?reason, dirs = self.core.watched_directories().len(), "starting pass");
        match self.core.run_pass().await {
            Ok(report) => {
                if report.attempted() > 0 {
                    info!(
                        minified = report.minified,
                        failed = report.failed,
                        failing_total = self.core.ledger().len(),
                        "pass complete"
                    );
                }
                Ok(())
            }
            Err(err) => {
                self.transition(MonitorState::Terminated);
                Err(err)
            }
        }
    }

    fn transition(&mut self, next: MonitorState) {
        if self.state != next {
            debug!(from = ?self.state, to = ?next, "monitor state");
            self.state = next;
        }
    }
}
