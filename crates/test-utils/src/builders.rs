#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use mash::config::compile;
use mash::engine::MonitorCore;
use mash::errors::Result;
use mash::exec::Minifier;
use mash::fs::mock::MockFileSystem;
use mash::fs::FileSystem;
use mash::watch::TriggerSource;

/// A time comfortably in the past, so artifacts written "now" are newer.
pub fn long_ago() -> SystemTime {
    SystemTime::now() - Duration::from_secs(3600)
}

/// A time after anything the ledger could have recorded during a test.
pub fn in_the_future() -> SystemTime {
    SystemTime::now() + Duration::from_secs(3600)
}

/// Builder for an in-memory project tree.
pub struct MockProjectBuilder {
    root: PathBuf,
    fs: MockFileSystem,
    config: String,
}

impl MockProjectBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let fs = MockFileSystem::new();
        fs.add_dir(&root);
        Self {
            root,
            fs,
            config: String::new(),
        }
    }

    /// Append a line to `.mash`.
    pub fn with_pattern(mut self, line: &str) -> Self {
        self.config.push_str(line);
        self.config.push('\n');
        self
    }

    /// Add a source stamped [`long_ago`], relative to the root.
    pub fn with_source(self, rel: &str, content: &str) -> Self {
        self.fs.add_file_at(self.root.join(rel), content, long_ago());
        self
    }

    pub fn with_dir(self, rel: &str) -> Self {
        self.fs.add_dir(self.root.join(rel));
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn fs(&self) -> MockFileSystem {
        self.fs.clone()
    }

    /// Write `.mash` and build a core over the mock tree.
    pub fn build_core<M: Minifier>(self, minifier: M) -> Result<MonitorCore<M>> {
        self.fs.add_file(self.root.join(".mash"), self.config.as_bytes());
        let patterns = compile(&self.root, &self.config)?.patterns;
        let fs: Arc<dyn FileSystem> = Arc::new(self.fs.clone());
        Ok(MonitorCore::new(fs, self.root, patterns, minifier))
    }
}

/// Trigger source that only records what it was asked to watch.
#[derive(Debug, Clone, Default)]
pub struct RecordingTriggerSource {
    synced: Arc<Mutex<Vec<Vec<PathBuf>>>>,
}

impl RecordingTriggerSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// One entry per `sync_directories` call.
    pub fn syncs(&self) -> Vec<Vec<PathBuf>> {
        self.synced.lock().unwrap().clone()
    }
}

impl TriggerSource for RecordingTriggerSource {
    fn sync_directories(&mut self, dirs: &[PathBuf]) -> Result<()> {
        self.synced.lock().unwrap().push(dirs.to_vec());
        Ok(())
    }
}
