// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod ledger;
pub mod logging;
pub mod source;
pub mod staleness;
pub mod types;
pub mod watch;

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{load_project, ProjectConfig, Settings};
use crate::engine::{MonitorCore, MonitorEvent, MonitorLoop, MonitorOptions};
use crate::errors::Result;
use crate::exec::{CommandMinifier, Minifier, MinifierCommands};
use crate::fs::{FileSystem, RealFileSystem};
use crate::types::WatchStrategy;
use crate::watch::{DirectoryWatcher, Poller, TriggerSource};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - `.mash` / `.mash.toml` loading
/// - the command minifier (with a startup check that its tools exist)
/// - the monitor core and loop
/// - the trigger source (notify watcher or poller)
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let project = load_project(fs.as_ref(), &args.project)?;
    let settings = project
        .settings
        .clone()
        .with_overrides(args.strategy, args.poll_interval_ms)?;

    let commands = MinifierCommands::from_settings(&settings.minify);
    debug!(?commands, "resolved minifier commands");
    let minifier = CommandMinifier::new(fs.clone(), commands);

    let mut core = MonitorCore::new(
        fs.clone(),
        project.root.clone(),
        project.patterns.clone(),
        minifier,
    );

    if args.dry_run {
        print_dry_run(&project, &settings, &mut core);
        return Ok(());
    }

    core.minifier().preflight()?;

    println!("Monitoring JavaScript and CSS files for changes.");
    println!("Press Ctrl-C to quit.");
    println!();

    let (tx, rx) = mpsc::channel::<MonitorEvent>(16);

    // Ctrl-C → graceful shutdown, observed at the loop's wait step.
    {
        let tx = tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(MonitorEvent::ShutdownRequested).await;
        });
    }

    let options = MonitorOptions {
        exit_after_first_pass: args.once,
        rescan_directories: settings.monitor.rescan_directories,
    };
    let mut monitor = MonitorLoop::new(core, rx, options);

    if args.once {
        return monitor.run(None).await;
    }

    let mut triggers: Box<dyn TriggerSource> = match settings.monitor.strategy {
        WatchStrategy::Notify => Box::new(DirectoryWatcher::new(tx.clone())?),
        WatchStrategy::Poll => Box::new(Poller::spawn(settings.monitor.poll_interval, tx.clone())),
    };
    info!(strategy = ?settings.monitor.strategy, root = %project.root.display(), "monitor starting");

    let result = monitor.run(Some(triggers.as_mut())).await;
    // Blank line after the ^C echo.
    println!();
    result
}

/// Print what a pass would do without running the minifier.
fn print_dry_run<M: Minifier>(project: &ProjectConfig, settings: &Settings, core: &mut MonitorCore<M>) {
    println!("mash dry-run");
    println!("  project = {}", project.root.display());
    println!("  monitor.strategy = {:?}", settings.monitor.strategy);
    println!(
        "  monitor.poll_interval_ms = {}",
        settings.monitor.poll_interval.as_millis()
    );
    println!(
        "  monitor.rescan_directories = {}",
        settings.monitor.rescan_directories
    );
    println!();

    println!("patterns ({}):", project.patterns.len());
    for pattern in &project.patterns {
        println!("  line {}: {}", pattern.line_number(), pattern.as_str());
    }
    for warning in &project.warnings {
        println!("  warning: {warning}");
    }
    println!();

    core.refresh_directories();
    println!("watched directories ({}):", core.watched_directories().len());
    for dir in core.watched_directories() {
        println!("  - {}", dir.display());
    }
    println!();

    let stale = core.stale_files();
    println!("stale files ({}):", stale.len());
    for file in &stale {
        println!("  - {}", file.display());
    }

    debug!("dry-run complete (nothing minified)");
}
