// src/engine/core.rs

//! One pass over the watched directories.
//!
//! Each source is resolved completely (staleness check, minify, ledger
//! update, persist) before the next one starts. Per-file and per-directory
//! problems are logged and absorbed; only an unavailable minifier aborts the
//! pass.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::config::patterns::PathPattern;
use crate::engine::PassReport;
use crate::errors::Result;
use crate::exec::{Minifier, MinifyOutcome};
use crate::fs::FileSystem;
use crate::ledger::{error_log_path, ErrorLedger};
use crate::staleness::needs_processing;
use crate::watch::walker::{matched_directories, minifiable_files};

pub struct MonitorCore<M: Minifier> {
    fs: Arc<dyn FileSystem>,
    project_root: PathBuf,
    patterns: Vec<PathPattern>,
    error_log: PathBuf,
    ledger: ErrorLedger,
    minifier: M,
    watched: Vec<PathBuf>,
}

impl<M: Minifier> fmt::Debug for MonitorCore<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonitorCore")
            .field("project_root", &self.project_root)
            .field("watched", &self.watched)
            .field("ledger", &self.ledger)
            .finish_non_exhaustive()
    }
}

impl<M: Minifier> MonitorCore<M> {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        project_root: impl Into<PathBuf>,
        patterns: Vec<PathPattern>,
        minifier: M,
    ) -> Self {
        let project_root = project_root.into();
        let error_log = error_log_path(&project_root);
        Self {
            fs,
            project_root,
            patterns,
            error_log,
            ledger: ErrorLedger::new(),
            minifier,
            watched: Vec::new(),
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn ledger(&self) -> &ErrorLedger {
        &self.ledger
    }

    pub fn minifier(&self) -> &M {
        &self.minifier
    }

    /// Directories the last [`refresh_directories`](Self::refresh_directories)
    /// found.
    pub fn watched_directories(&self) -> &[PathBuf] {
        &self.watched
    }

    /// Re-walk the project tree. Returns true if the watched set changed.
    pub fn refresh_directories(&mut self) -> bool {
        let dirs = matched_directories(self.fs.as_ref(), &self.project_root, &self.patterns);
        if dirs == self.watched {
            return false;
        }
        info!(count = dirs.len(), "watched directories updated");
        self.watched = dirs;
        true
    }

    /// Sources in the watched directories that a pass would minify now.
    pub fn stale_files(&self) -> Vec<PathBuf> {
        let mut stale = Vec::new();
        for dir in &self.watched {
            let Ok(files) = minifiable_files(self.fs.as_ref(), dir) else {
                continue;
            };
            for file in files {
                if needs_processing(self.fs.as_ref(), &self.ledger, &file).unwrap_or(false) {
                    stale.push(file);
                }
            }
        }
        stale
    }

    /// Run one full pass over every watched directory.
    ///
    /// Returns `Err` only when the minifier can't be launched at all.
    pub async fn run_pass(&mut self) -> Result<PassReport> {
        let mut report = PassReport::default();
        let dirs = self.watched.clone();

        for dir in &dirs {
            report.directories += 1;

            let files = match minifiable_files(self.fs.as_ref(), dir) {
                Ok(files) => files,
                Err(err) => {
                    warn!(dir = %dir.display(), error = %err, "skipping directory for this pass");
                    report.directories_skipped += 1;
                    continue;
                }
            };

            for source in &files {
                self.process_file(source, &mut report).await?;
            }
        }

        debug!(?report, "pass finished");
        Ok(report)
    }

    async fn process_file(&mut self, source: &Path, report: &mut PassReport) -> Result<()> {
        let stale = match needs_processing(self.fs.as_ref(), &self.ledger, source) {
            Ok(stale) => stale,
            Err(err) => {
                warn!(path = %source.display(), error = %err, "skipping file for this pass");
                report.files_skipped += 1;
                return Ok(());
            }
        };
        report.files_checked += 1;

        if !stale {
            return Ok(());
        }

        let succeeded = match self.minifier.minify(source).await? {
            MinifyOutcome::Minified => {
                println!("[{}] Minified {}", local_time(), source.display());
                report.minified += 1;
                true
            }
            MinifyOutcome::Failed { diagnostic } => {
                println!("[{}] Error minifying {}", local_time(), source.display());
                warn!(path = %source.display(), %diagnostic, "minification failed");
                report.failed += 1;
                false
            }
        };

        self.ledger.record_outcome(source, succeeded);
        if let Err(err) = self.ledger.persist(self.fs.as_ref(), &self.error_log) {
            error!(path = %self.error_log.display(), error = %err, "failed to update error log");
        }
        Ok(())
    }
}

/// Wall-clock time for operator messages, e.g. `14:03:59`.
fn local_time() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}
