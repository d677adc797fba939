// tests/monitor_pass.rs

mod common;
use crate::common::builders::{in_the_future, long_ago, MockProjectBuilder};
use crate::common::{init_tracing, FakeMinifier};

use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use mash::errors::MashError;
use mash::fs::FileSystem;

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn first_pass_minifies_second_pass_is_idle() -> TestResult {
    init_tracing();

    let project = MockProjectBuilder::new("/p")
        .with_pattern("js")
        .with_source("js/foo.js", "var foo = 1;");
    let fs = project.fs();
    let minifier = FakeMinifier::new(Arc::new(fs.clone()));
    let mut core = project.build_core(minifier.clone())?;

    core.refresh_directories();
    assert_eq!(core.watched_directories(), &[PathBuf::from("/p/js")]);

    let first = core.run_pass().await?;
    assert_eq!(first.minified, 1);
    assert_eq!(minifier.calls(), vec![PathBuf::from("/p/js/foo.js")]);
    assert_eq!(
        fs.contents("/p/js/foo.min.js").as_deref(),
        Some("/* min */var foo = 1;")
    );

    let second = core.run_pass().await?;
    assert_eq!(second.attempted(), 0);
    assert_eq!(second.files_checked, 1);
    assert_eq!(minifier.call_count(), 1);

    assert!(!fs.exists(Path::new("/p/MASH_ERRORS")));
    Ok(())
}

#[tokio::test]
async fn failure_is_logged_then_cleared_after_fix() -> TestResult {
    init_tracing();

    let project = MockProjectBuilder::new("/p")
        .with_pattern("js")
        .with_source("js/bad.js", "function (");
    let fs = project.fs();
    let minifier = FakeMinifier::new(Arc::new(fs.clone()));
    minifier.fail("/p/js/bad.js");
    let mut core = project.build_core(minifier.clone())?;
    core.refresh_directories();

    let report = core.run_pass().await?;
    assert_eq!(report.failed, 1);
    assert_eq!(fs.contents("/p/MASH_ERRORS").as_deref(), Some("/p/js/bad.js\n"));
    assert!(core.ledger().contains(Path::new("/p/js/bad.js")));

    // Unchanged source: the failure is not retried.
    let report = core.run_pass().await?;
    assert_eq!(report.attempted(), 0);
    assert_eq!(minifier.call_count(), 1);

    // The file is edited and now minifies cleanly.
    fs.set_modified("/p/js/bad.js", in_the_future());
    minifier.succeed("/p/js/bad.js");

    let report = core.run_pass().await?;
    assert_eq!(report.minified, 1);
    assert_eq!(minifier.call_count(), 2);
    assert!(core.ledger().is_empty());
    assert!(!fs.exists(Path::new("/p/MASH_ERRORS")));
    Ok(())
}

#[tokio::test]
async fn one_failure_does_not_stop_the_pass() -> TestResult {
    init_tracing();

    let project = MockProjectBuilder::new("/p")
        .with_pattern("(js|css)")
        .with_source("js/a.js", "a")
        .with_source("js/b.js", "b")
        .with_source("js/c.js", "c")
        .with_source("css/site.css", "body{}");
    let fs = project.fs();
    let minifier = FakeMinifier::new(Arc::new(fs.clone()));
    minifier.fail("/p/js/b.js");
    let mut core = project.build_core(minifier.clone())?;
    core.refresh_directories();

    let report = core.run_pass().await?;
    assert_eq!(report.directories, 2);
    assert_eq!(report.minified, 3);
    assert_eq!(report.failed, 1);

    assert!(fs.exists(Path::new("/p/js/a.min.js")));
    assert!(!fs.exists(Path::new("/p/js/b.min.js")));
    assert!(fs.exists(Path::new("/p/js/c.min.js")));
    assert!(fs.exists(Path::new("/p/css/site.min.css")));
    assert_eq!(fs.contents("/p/MASH_ERRORS").as_deref(), Some("/p/js/b.js\n"));
    Ok(())
}

#[tokio::test]
async fn artifacts_and_hidden_files_are_never_sources() -> TestResult {
    init_tracing();

    let project = MockProjectBuilder::new("/p")
        .with_pattern("js")
        .with_source("js/app.js", "a")
        .with_source("js/vendor.min.js", "v")
        .with_source("js/.draft.js", "d")
        .with_source("js/README", "r");
    let minifier = FakeMinifier::new(Arc::new(project.fs()));
    let mut core = project.build_core(minifier.clone())?;
    core.refresh_directories();

    core.run_pass().await?;
    assert_eq!(minifier.calls(), vec![PathBuf::from("/p/js/app.js")]);
    Ok(())
}

#[tokio::test]
async fn unreadable_directory_is_skipped_for_the_pass() -> TestResult {
    init_tracing();

    let project = MockProjectBuilder::new("/p")
        .with_pattern("(js|css)")
        .with_source("js/a.js", "a")
        .with_source("css/site.css", "body{}");
    let fs = project.fs();
    let minifier = FakeMinifier::new(Arc::new(fs.clone()));
    let mut core = project.build_core(minifier.clone())?;
    core.refresh_directories();

    fs.mark_unreadable("/p/css");
    let report = core.run_pass().await?;

    assert_eq!(report.directories_skipped, 1);
    assert_eq!(minifier.calls(), vec![PathBuf::from("/p/js/a.js")]);
    Ok(())
}

#[tokio::test]
async fn unavailable_tool_aborts_the_pass() -> TestResult {
    init_tracing();

    let project = MockProjectBuilder::new("/p")
        .with_pattern("js")
        .with_source("js/a.js", "a")
        .with_source("js/b.js", "b");
    let fs = project.fs();
    let minifier = FakeMinifier::new(Arc::new(fs.clone()));
    minifier.make_unavailable();
    let mut core = project.build_core(minifier.clone())?;
    core.refresh_directories();

    let err = core.run_pass().await.unwrap_err();
    assert!(matches!(err, MashError::ToolUnavailable(_)));
    assert!(err.is_fatal());

    // Stopped at the first file; nothing recorded as a per-file failure.
    assert_eq!(minifier.call_count(), 1);
    assert!(core.ledger().is_empty());
    assert!(!fs.exists(Path::new("/p/MASH_ERRORS")));
    Ok(())
}

#[tokio::test]
async fn new_directories_appear_after_refresh() -> TestResult {
    init_tracing();

    let project = MockProjectBuilder::new("/p")
        .with_pattern("js/[^/]+")
        .with_dir("js/app");
    let fs = project.fs();
    let minifier = FakeMinifier::new(Arc::new(fs.clone()));
    let mut core = project.build_core(minifier.clone())?;

    assert!(core.refresh_directories());
    assert_eq!(core.watched_directories(), &[PathBuf::from("/p/js/app")]);
    assert!(!core.refresh_directories());

    fs.add_file_at("/p/js/admin/panel.js", "p", long_ago());
    assert!(core.refresh_directories());
    assert_eq!(
        core.watched_directories(),
        &[PathBuf::from("/p/js/admin"), PathBuf::from("/p/js/app")]
    );

    core.run_pass().await?;
    assert_eq!(minifier.calls(), vec![PathBuf::from("/p/js/admin/panel.js")]);
    Ok(())
}

#[tokio::test]
async fn stale_files_lists_pending_work_without_minifying() -> TestResult {
    init_tracing();

    let project = MockProjectBuilder::new("/p")
        .with_pattern("js")
        .with_source("js/a.js", "a")
        .with_source("js/b.js", "b");
    let fs = project.fs();
    fs.add_file("/p/js/b.min.js", "b");
    let minifier = FakeMinifier::new(Arc::new(fs.clone()));
    let mut core = project.build_core(minifier.clone())?;
    core.refresh_directories();

    assert_eq!(core.stale_files(), vec![PathBuf::from("/p/js/a.js")]);
    assert_eq!(minifier.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn error_log_write_failure_does_not_stop_the_pass() -> TestResult {
    init_tracing();

    let project = MockProjectBuilder::new("/p")
        .with_pattern("js")
        .with_source("js/a.js", "a")
        .with_source("js/b.js", "b");
    let fs = project.fs();
    // A directory where the report should go makes every write fail.
    fs.add_dir("/p/MASH_ERRORS");
    let minifier = FakeMinifier::new(Arc::new(fs.clone()));
    minifier.fail("/p/js/a.js");
    let mut core = project.build_core(minifier.clone())?;
    core.refresh_directories();

    let report = core.run_pass().await?;
    assert_eq!(report.failed, 1);
    assert_eq!(report.minified, 1);
    assert!(core.ledger().contains(Path::new("/p/js/a.js")));
    assert!(fs.is_dir(Path::new("/p/MASH_ERRORS")));
    Ok(())
}
