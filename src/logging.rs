// src/logging.rs

//! Diagnostics go to stderr through `tracing`; stdout is reserved for the
//! `[HH:MM:SS] Minified ...` lines.
//!
//! `--log-level` sets a single level for everything. Without it, `MASH_LOG`
//! is read as an `EnvFilter` directive list (`debug`, `mash::engine=trace`,
//! ...). The fallback is `info`.

use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "MASH_LOG";

const DEFAULT_DIRECTIVES: &str = "info";

pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env = std::env::var(LOG_ENV).ok();
    let directives = directives(cli_level, env.as_deref());

    let (filter, rejected) = match EnvFilter::try_new(&directives) {
        Ok(filter) => (filter, None),
        Err(err) => (EnvFilter::new(DEFAULT_DIRECTIVES), Some(err)),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    if let Some(err) = rejected {
        tracing::warn!(%directives, error = %err, "ignoring invalid MASH_LOG");
    }
    Ok(())
}

/// Filter directives in priority order: CLI flag, then environment, then
/// the default. Blank environment values count as unset.
fn directives(cli_level: Option<LogLevel>, env: Option<&str>) -> String {
    if let Some(level) = cli_level {
        return level_name(level).to_string();
    }
    match env.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => DEFAULT_DIRECTIVES.to_string(),
    }
}

fn level_name(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}
