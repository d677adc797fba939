// src/watch/mod.rs

//! Directory discovery and wake-up sources for the monitor loop.
//!
//! This module is responsible for:
//! - Walking the project tree for directories matching the `.mash` patterns
//!   and listing their minifiable sources ([`walker`]).
//! - Turning filesystem notifications ([`watcher`]) or a fixed timer
//!   ([`poller`]) into `MonitorEvent::Trigger`s on the loop's channel.
//!
//! It does **not** decide what to minify; every trigger simply starts a
//! full pass.

use std::path::PathBuf;

use crate::errors::Result;

pub mod poller;
pub mod walker;
pub mod watcher;

pub use poller::Poller;
pub use walker::{matched_directories, minifiable_files};
pub use watcher::DirectoryWatcher;

/// A strategy that wakes the monitor loop.
///
/// Both strategies send into the same channel, so the loop neither knows nor
/// cares which one is active. The loop calls `sync_directories` whenever
/// the watched set is (re)computed.
pub trait TriggerSource: Send {
    /// Make the source cover exactly `dirs`.
    fn sync_directories(&mut self, dirs: &[PathBuf]) -> Result<()>;
}
