// src/watch/watcher.rs

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::Context;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::{MonitorEvent, TriggerReason};
use crate::errors::Result;
use crate::watch::TriggerSource;

/// Filesystem-notification trigger source.
///
/// Watches each watched directory non-recursively (nested directories are
/// watched only if they match a pattern themselves). Create and modify events
/// become `Trigger(FileWatch)`; which file changed is irrelevant because the
/// loop always re-runs a full pass.
///
/// Only watched directories produce events. A matching directory created
/// under an unwatched parent is noticed at the next rescan, which needs some
/// event from a directory already being watched. The poll strategy has no
/// such gap.
///
/// Dropping the handle stops file watching.
pub struct DirectoryWatcher {
    inner: RecommendedWatcher,
    watched: HashSet<PathBuf>,
}

impl std::fmt::Debug for DirectoryWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryWatcher")
            .field("watched", &self.watched)
            .finish_non_exhaustive()
    }
}

impl DirectoryWatcher {
    /// Create the platform watcher; no directories are watched until
    /// [`TriggerSource::sync_directories`] is called.
    pub fn new(tx: mpsc::Sender<MonitorEvent>) -> Result<Self> {
        // Called synchronously by notify on its own thread.
        let inner = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if !is_trigger_kind(&event.kind) {
                        return;
                    }
                    debug!(kind = ?event.kind, paths = ?event.paths, "filesystem change");
                    // A full channel already holds a pending trigger.
                    if let Err(mpsc::error::TrySendError::Closed(_)) =
                        tx.try_send(MonitorEvent::Trigger(TriggerReason::FileWatch))
                    {
                        debug!("monitor loop gone; dropping filesystem event");
                    }
                }
                Err(err) => warn!(error = %err, "file watch error"),
            },
            Config::default(),
        )
        .context("starting filesystem watcher")?;

        Ok(Self {
            inner,
            watched: HashSet::new(),
        })
    }

    pub fn watched(&self) -> &HashSet<PathBuf> {
        &self.watched
    }
}

impl TriggerSource for DirectoryWatcher {
    fn sync_directories(&mut self, dirs: &[PathBuf]) -> Result<()> {
        let wanted: HashSet<PathBuf> = dirs.iter().cloned().collect();

        let stale: Vec<PathBuf> = self.watched.difference(&wanted).cloned().collect();
        for dir in stale {
            // The directory may already be gone, which also ends the watch.
            if let Err(err) = self.inner.unwatch(&dir) {
                debug!(dir = %dir.display(), error = %err, "unwatch failed");
            }
            self.watched.remove(&dir);
        }

        for dir in wanted.difference(&self.watched).cloned().collect::<Vec<_>>() {
            match self.inner.watch(&dir, RecursiveMode::NonRecursive) {
                Ok(()) => {
                    self.watched.insert(dir);
                }
                Err(err) => {
                    warn!(dir = %dir.display(), error = %err, "could not watch directory");
                }
            }
        }

        info!(count = self.watched.len(), "watching directories for changes");
        Ok(())
    }
}

/// Creates and content modifications start a pass; access and metadata-only
/// events don't.
fn is_trigger_kind(kind: &EventKind) -> bool {
    use notify::event::ModifyKind;

    match kind {
        EventKind::Create(_) => true,
        EventKind::Modify(ModifyKind::Metadata(_)) => false,
        EventKind::Modify(_) => true,
        _ => false,
    }
}
