// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::types::WatchStrategy;

/// Command-line arguments for `mash`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "mash",
    version,
    about = "Keep minified JavaScript and CSS up to date as the sources change.",
    long_about = None
)]
pub struct CliArgs {
    /// Project directory containing the `.mash` file.
    #[arg(value_name = "PROJECT_DIR")]
    pub project: PathBuf,

    /// How to wake up between passes. Overrides `monitor.strategy`.
    #[arg(long, value_enum, value_name = "STRATEGY")]
    pub strategy: Option<WatchStrategy>,

    /// Polling interval in milliseconds. Overrides `monitor.poll_interval_ms`.
    #[arg(long, value_name = "MS")]
    pub poll_interval_ms: Option<u64>,

    /// Run a single pass and exit, no watching.
    #[arg(long)]
    pub once: bool,

    /// Print patterns, watched directories and stale files without minifying.
    #[arg(long)]
    pub dry_run: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `MASH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
