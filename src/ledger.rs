// src/ledger.rs

//! Record of source files whose latest minification attempt failed.
//!
//! The in-memory map is the single source of truth for both retry
//! suppression (see [`crate::staleness`]) and the `MASH_ERRORS` report on
//! disk. Every persist is a full rewrite of the report, so the file is
//! self-consistent even if the process dies between passes.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result};
use tracing::debug;

use crate::fs::FileSystem;

/// File name of the failure report, relative to the project root.
pub const ERROR_LOG_FILE: &str = "MASH_ERRORS";

/// Effective report path for a project root.
pub fn error_log_path(project_root: &Path) -> PathBuf {
    project_root.join(ERROR_LOG_FILE)
}

/// Failing source paths mapped to the time of their last failure.
#[derive(Debug, Clone, Default)]
pub struct ErrorLedger {
    failures: HashMap<PathBuf, SystemTime>,
}

impl ErrorLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of a minification attempt made just now.
    pub fn record_outcome(&mut self, source: &Path, succeeded: bool) {
        self.record_outcome_at(source, succeeded, SystemTime::now());
    }

    /// Record an outcome with an explicit failure time.
    ///
    /// Success clears the entry whatever its time; failure overwrites it.
    pub fn record_outcome_at(&mut self, source: &Path, succeeded: bool, at: SystemTime) {
        if succeeded {
            if self.failures.remove(source).is_some() {
                debug!(path = %source.display(), "cleared failure");
            }
        } else {
            self.failures.insert(source.to_path_buf(), at);
            debug!(path = %source.display(), "recorded failure");
        }
    }

    /// When `source` last failed, if it is currently failing.
    pub fn failure_time(&self, source: &Path) -> Option<SystemTime> {
        self.failures.get(source).copied()
    }

    pub fn contains(&self, source: &Path) -> bool {
        self.failures.contains_key(source)
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Currently failing paths, sorted.
    pub fn paths(&self) -> Vec<&Path> {
        let mut paths: Vec<&Path> = self.failures.keys().map(PathBuf::as_path).collect();
        paths.sort();
        paths
    }

    /// Mirror the key set to `error_log_path`.
    ///
    /// Non-empty: the file is overwritten with one path per line.
    /// Empty: the file is removed if present.
    pub fn persist(&self, fs: &dyn FileSystem, error_log_path: &Path) -> Result<()> {
        if self.failures.is_empty() {
            if fs.exists(error_log_path) {
                fs.remove_file(error_log_path)
                    .with_context(|| format!("clearing error log at {:?}", error_log_path))?;
                debug!(path = %error_log_path.display(), "removed error log");
            }
            return Ok(());
        }

        let mut contents = String::new();
        for path in self.paths() {
            // Writing into a String cannot fail.
            let _ = writeln!(contents, "{}", path.display());
        }

        fs.write(error_log_path, contents.as_bytes())
            .with_context(|| format!("writing error log at {:?}", error_log_path))?;
        debug!(
            path = %error_log_path.display(),
            failing = self.failures.len(),
            "wrote error log"
        );
        Ok(())
    }
}
