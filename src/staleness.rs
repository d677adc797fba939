// src/staleness.rs

//! Deciding whether a source needs to be (re)minified.

use std::path::Path;
use std::time::SystemTime;

use anyhow::{anyhow, Result};

use crate::fs::FileSystem;
use crate::ledger::ErrorLedger;
use crate::source::artifact_path;

/// Pure staleness rule over the three timestamps.
///
/// - artifact strictly newer than the source: current, nothing to do;
/// - failure strictly newer than the source: still broken, don't retry;
/// - anything else, ties included, needs processing.
pub fn is_stale(
    source_modified: SystemTime,
    artifact_modified: Option<SystemTime>,
    last_failure: Option<SystemTime>,
) -> bool {
    if artifact_modified.is_some_and(|t| t > source_modified) {
        return false;
    }
    if last_failure.is_some_and(|t| t > source_modified) {
        return false;
    }
    true
}

/// Gather timestamps for `source` and apply [`is_stale`].
///
/// Errors if the source's mtime can't be read; a missing artifact is simply
/// treated as absent.
pub fn needs_processing(fs: &dyn FileSystem, ledger: &ErrorLedger, source: &Path) -> Result<bool> {
    let source_modified = fs.modified(source)?;
    let artifact = artifact_path(source)
        .ok_or_else(|| anyhow!("not a minifiable source: {:?}", source))?;
    let artifact_modified = if fs.is_file(&artifact) {
        fs.modified(&artifact).ok()
    } else {
        None
    };

    Ok(is_stale(
        source_modified,
        artifact_modified,
        ledger.failure_time(source),
    ))
}
