// src/config/mod.rs

//! Configuration loading for mash.
//!
//! Responsibilities:
//! - Compile `.mash` lines into anchored path patterns (`patterns.rs`).
//! - Define and validate the optional `.mash.toml` settings (`settings.rs`).
//! - Load both from a project directory (`loader.rs`).

pub mod loader;
pub mod patterns;
pub mod settings;

pub use loader::{load_project, load_settings, ProjectConfig, CONFIG_FILE, SETTINGS_FILE};
pub use patterns::{compile, matches, CompiledPatterns, PathPattern};
pub use settings::{MinifySection, MonitorSettings, RawSettings, Settings};
