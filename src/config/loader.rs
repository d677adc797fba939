// src/config/loader.rs

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::patterns::{compile, PathPattern};
use crate::config::settings::Settings;
use crate::errors::{MashError, Result};
use crate::fs::FileSystem;

/// Pattern file expected at the project root.
pub const CONFIG_FILE: &str = ".mash";

/// Optional settings file at the project root.
pub const SETTINGS_FILE: &str = ".mash.toml";

/// Everything loaded from a project directory at startup.
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    /// Absolute project root.
    pub root: PathBuf,
    pub patterns: Vec<PathPattern>,
    /// Skipped-line warnings from the pattern file.
    pub warnings: Vec<String>,
    pub settings: Settings,
}

/// Load `.mash` (required) and `.mash.toml` (optional) from `project_dir`.
///
/// - The directory is canonicalized so patterns anchor to an absolute path.
/// - A missing `.mash` is a configuration error.
/// - Skipped pattern lines are logged as warnings and also returned.
pub fn load_project(fs: &dyn FileSystem, project_dir: &Path) -> Result<ProjectConfig> {
    let root = fs.canonicalize(project_dir).map_err(|e| {
        MashError::ConfigError(format!("project directory {:?} is not usable: {e:#}", project_dir))
    })?;
    if !fs.is_dir(&root) {
        return Err(MashError::ConfigError(format!(
            "project path {:?} is not a directory",
            root
        )));
    }

    let config_path = root.join(CONFIG_FILE);
    if !fs.is_file(&config_path) {
        return Err(MashError::ConfigError(format!(
            "there isn't a {CONFIG_FILE} file at {:?}",
            root
        )));
    }
    let text = fs.read_to_string(&config_path)?;
    let compiled = compile(&root, &text)?;
    for warning in &compiled.warnings {
        warn!(file = %config_path.display(), "{warning}");
    }
    debug!(count = compiled.patterns.len(), "compiled directory patterns");

    let settings = load_settings(fs, &root)?;

    Ok(ProjectConfig {
        root,
        patterns: compiled.patterns,
        warnings: compiled.warnings,
        settings,
    })
}

/// Load `.mash.toml` from `root`, falling back to defaults when absent.
pub fn load_settings(fs: &dyn FileSystem, root: &Path) -> Result<Settings> {
    let path = root.join(SETTINGS_FILE);
    if !fs.is_file(&path) {
        return Ok(Settings::default());
    }
    let text = fs.read_to_string(&path)?;
    Settings::from_toml_str(&text)
}
