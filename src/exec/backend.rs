// src/exec/backend.rs

//! Pluggable minifier abstraction.
//!
//! The monitor core calls a `Minifier` for each stale source instead of
//! spawning processes itself. [`super::CommandMinifier`] is what `mash`
//! uses in production; tests provide their own implementation that records
//! invocations and scripts outcomes.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use crate::errors::Result;

/// Per-file result of a minification attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MinifyOutcome {
    /// The artifact was (re)written.
    Minified,
    /// The tool reported a problem; `diagnostic` is what it said.
    Failed { diagnostic: String },
}

impl MinifyOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, MinifyOutcome::Minified)
    }
}

/// Trait abstracting how a single source gets minified.
///
/// - `Ok(MinifyOutcome::Failed { .. })` is a per-file failure: recorded and
///   retried once the source changes.
/// - `Err(MashError::ToolUnavailable(..))` means nothing can be minified at
///   all and stops the monitor.
pub trait Minifier: Send {
    fn minify<'a>(
        &'a mut self,
        source: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<MinifyOutcome>> + Send + 'a>>;
}
