use std::collections::HashSet;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use mash::errors::{MashError, Result};
use mash::exec::{Minifier, MinifyOutcome};
use mash::fs::FileSystem;
use mash::source::artifact_path;

#[derive(Debug, Default)]
struct Script {
    calls: Vec<PathBuf>,
    failing: HashSet<PathBuf>,
    unavailable: bool,
}

/// A fake minifier that:
/// - records every path it was asked to minify
/// - fails for paths marked with [`FakeMinifier::fail`]
/// - otherwise writes `/* min */` + the source to the artifact path.
///
/// Clones share state, so a test can keep one clone to script outcomes and
/// inspect calls after handing the other to the monitor.
#[derive(Debug, Clone)]
pub struct FakeMinifier {
    fs: Arc<dyn FileSystem>,
    script: Arc<Mutex<Script>>,
}

impl FakeMinifier {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            fs,
            script: Arc::new(Mutex::new(Script::default())),
        }
    }

    /// Make future attempts on `path` fail.
    pub fn fail(&self, path: impl AsRef<Path>) {
        self.script.lock().unwrap().failing.insert(path.as_ref().to_path_buf());
    }

    /// Make future attempts on `path` succeed again.
    pub fn succeed(&self, path: impl AsRef<Path>) {
        self.script.lock().unwrap().failing.remove(path.as_ref());
    }

    /// Behave as if the compressor binary could not be launched.
    pub fn make_unavailable(&self) {
        self.script.lock().unwrap().unavailable = true;
    }

    /// Every path passed to `minify`, in order.
    pub fn calls(&self) -> Vec<PathBuf> {
        self.script.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.script.lock().unwrap().calls.len()
    }

    fn attempt(&self, source: &Path) -> Result<MinifyOutcome> {
        let mut script = self.script.lock().unwrap();
        script.calls.push(source.to_path_buf());

        if script.unavailable {
            return Err(MashError::ToolUnavailable("fake compressor missing".to_string()));
        }
        if script.failing.contains(source) {
            return Ok(MinifyOutcome::Failed {
                diagnostic: format!("syntax error in {}", source.display()),
            });
        }

        let artifact = artifact_path(source).expect("fake minifier given a non-source path");
        let contents = self.fs.read_to_string(source)?;
        self.fs.write(&artifact, format!("/* min */{contents}").as_bytes())?;
        Ok(MinifyOutcome::Minified)
    }
}

impl Minifier for FakeMinifier {
    fn minify<'a>(
        &'a mut self,
        source: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<MinifyOutcome>> + Send + 'a>> {
        let outcome = self.attempt(source);
        Box::pin(async move { outcome })
    }
}
