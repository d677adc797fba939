// src/engine/mod.rs

//! Orchestration engine for mash.
//!
//! - [`core`] owns the error ledger and runs passes: walk the watched
//!   directories, filter sources through the staleness rule, minify, record
//!   and persist each outcome.
//! - [`runtime`] is the loop around it: the initial pass, then waiting on
//!   [`MonitorEvent`]s from the trigger source and Ctrl-C, one full pass per
//!   wake-up.

/// Why a pass was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerReason {
    /// The initial pass at startup.
    Startup,
    /// A filesystem notification for a watched directory.
    FileWatch,
    /// The polling interval elapsed.
    Poll,
}

/// Events flowing into the monitor loop from trigger sources and signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorEvent {
    Trigger(TriggerReason),
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

/// Lifecycle of the monitor loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Initializing,
    Watching,
    Reacting,
    Terminated,
}

/// Options that influence how the loop behaves.
#[derive(Debug, Clone, Copy)]
pub struct MonitorOptions {
    /// Stop after the initial pass (used for `--once`).
    pub exit_after_first_pass: bool,
    /// Recompute the watched directory set before every pass instead of
    /// keeping the startup snapshot.
    pub rescan_directories: bool,
}

impl Default for MonitorOptions {
    fn default() -> Self {
        Self {
            exit_after_first_pass: false,
            rescan_directories: true,
        }
    }
}

/// Counters for a single pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    pub directories: usize,
    pub directories_skipped: usize,
    pub files_checked: usize,
    pub files_skipped: usize,
    pub minified: usize,
    pub failed: usize,
}

impl PassReport {
    /// Number of minifier invocations in this pass.
    pub fn attempted(&self) -> usize {
        self.minified + self.failed
    }
}

pub mod core;
pub mod runtime;

pub use core::MonitorCore;
pub use runtime::MonitorLoop;
