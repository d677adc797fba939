// src/source.rs

//! Rules for which files are minification sources and where their
//! artifacts live.

use std::path::{Path, PathBuf};

/// Extensions a source may carry.
pub const SOURCE_EXTENSIONS: [&str; 2] = [".js", ".css"];

/// Extensions that mark an already-minified artifact.
pub const MINIFIED_EXTENSIONS: [&str; 2] = [".min.js", ".min.css"];

/// JS or CSS files that aren't minified or hidden.
pub fn is_minifiable(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };

    if name.starts_with('.') {
        return false;
    }
    if !SOURCE_EXTENSIONS.iter().any(|ext| name.ends_with(ext)) {
        return false;
    }
    !MINIFIED_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

/// Path of the minified artifact for `source`: `.min` inserted before the
/// final extension. Only the file name is rewritten.
///
/// Returns `None` when `source` has no `.js`/`.css` suffix.
pub fn artifact_path(source: &Path) -> Option<PathBuf> {
    let name = source.file_name()?.to_str()?;
    let ext = SOURCE_EXTENSIONS.iter().find(|ext| name.ends_with(*ext))?;
    let stem = &name[..name.len() - ext.len()];
    Some(source.with_file_name(format!("{stem}.min{ext}")))
}
