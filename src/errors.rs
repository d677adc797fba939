// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MashError {
    /// Bad `.mash` line, missing `.mash`, or invalid `.mash.toml`.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The external compressor could not be launched at all.
    #[error("Minifier unavailable: {0}")]
    ToolUnavailable(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MashError {
    /// True for errors that must stop the whole process rather than a single
    /// file or directory.
    pub fn is_fatal(&self) -> bool {
        matches!(self, MashError::ConfigError(_) | MashError::ToolUnavailable(_))
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, MashError>;
