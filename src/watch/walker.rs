// src/watch/walker.rs

//! Finding watched directories and the sources inside them.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{debug, warn};

use crate::config::patterns::{matches, PathPattern};
use crate::fs::FileSystem;
use crate::source::is_minifiable;

/// Walk everything under `root` (root included) and return the directories
/// whose absolute path matches one of `patterns`.
///
/// Directories that can't be listed are logged and skipped; the walk carries
/// on with the rest of the tree. Symlinked directories are not followed.
pub fn matched_directories(
    fs: &dyn FileSystem,
    root: &Path,
    patterns: &[PathPattern],
) -> Vec<PathBuf> {
    let mut matched = Vec::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        if matches(&dir, patterns) {
            matched.push(dir.clone());
        }

        let entries = match fs.read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(dir = %dir.display(), error = %err, "skipping unreadable directory");
                continue;
            }
        };

        let mut subdirs: Vec<PathBuf> = entries
            .into_iter()
            .filter(|p| {
                if !fs.is_dir(p) {
                    return false;
                }
                if fs.is_symlink(p) {
                    debug!(dir = %p.display(), "not following symlinked directory");
                    return false;
                }
                true
            })
            .collect();
        // Reverse so the stack pops subdirectories in name order.
        subdirs.sort();
        subdirs.reverse();
        stack.extend(subdirs);
    }

    debug!(count = matched.len(), root = %root.display(), "matched watched directories");
    matched
}

/// Minifiable files directly inside `directory` (no recursion), sorted.
pub fn minifiable_files(fs: &dyn FileSystem, directory: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs
        .read_dir(directory)?
        .into_iter()
        .filter(|p| fs.is_file(p) && is_minifiable(p))
        .collect();
    files.sort();
    Ok(files)
}
