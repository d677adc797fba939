// tests/real_project.rs

mod common;
use crate::common::init_tracing;

use std::error::Error;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tempfile::TempDir;

use mash::config::load_project;
use mash::engine::MonitorCore;
use mash::errors::MashError;
use mash::exec::{CommandMinifier, MinifierCommands};
use mash::fs::{FileSystem, RealFileSystem};
use mash::types::WatchStrategy;

type TestResult = Result<(), Box<dyn Error>>;

fn write_file(path: &Path, contents: &str, modified: SystemTime) -> TestResult {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    File::options().write(true).open(path)?.set_modified(modified)?;
    Ok(())
}

fn hours_ago(n: u64) -> SystemTime {
    SystemTime::now() - Duration::from_secs(n * 3600)
}

fn project(mash: &str) -> Result<TempDir, Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join(".mash"), mash)?;
    Ok(dir)
}

#[test]
fn loads_patterns_and_settings_from_disk() -> TestResult {
    init_tracing();
    let dir = project("# watched\njs\nlib/\n\ncss/[a-z]+\n")?;
    fs::write(
        dir.path().join(".mash.toml"),
        "[monitor]\nstrategy = \"poll\"\npoll_interval_ms = 250\n",
    )?;

    let loaded = load_project(&RealFileSystem, dir.path())?;
    let root = dir.path().canonicalize()?;

    assert_eq!(loaded.root, root);
    assert_eq!(loaded.patterns.len(), 2);
    assert!(loaded.patterns[0].is_match(&root.join("js").to_string_lossy()));
    assert!(loaded.patterns[1].is_match(&root.join("css/site").to_string_lossy()));
    assert_eq!(loaded.warnings.len(), 1);
    assert!(loaded.warnings[0].contains("line 3"));
    assert_eq!(loaded.settings.monitor.strategy, WatchStrategy::Poll);
    assert_eq!(loaded.settings.monitor.poll_interval, Duration::from_millis(250));
    Ok(())
}

#[test]
fn missing_pattern_file_is_a_config_error() -> TestResult {
    let dir = tempfile::tempdir()?;
    let err = load_project(&RealFileSystem, dir.path()).unwrap_err();
    assert!(matches!(err, MashError::ConfigError(ref msg) if msg.contains(".mash")));
    Ok(())
}

#[test]
fn missing_project_directory_is_a_config_error() -> TestResult {
    let dir = tempfile::tempdir()?;
    let err = load_project(&RealFileSystem, &dir.path().join("nope")).unwrap_err();
    assert!(matches!(err, MashError::ConfigError(_)));
    Ok(())
}

#[test]
fn malformed_settings_are_rejected() -> TestResult {
    let dir = project("js\n")?;
    fs::write(dir.path().join(".mash.toml"), "[monitor]\nintervall = 3\n")?;
    let err = load_project(&RealFileSystem, dir.path()).unwrap_err();
    assert!(matches!(err, MashError::TomlError(_)));

    fs::write(dir.path().join(".mash.toml"), "[monitor]\npoll_interval_ms = 0\n")?;
    let err = load_project(&RealFileSystem, dir.path()).unwrap_err();
    assert!(matches!(err, MashError::ConfigError(_)));
    Ok(())
}

#[test]
fn invalid_pattern_names_its_line() -> TestResult {
    let dir = project("js\ncss/(unclosed\n")?;
    let err = load_project(&RealFileSystem, dir.path()).unwrap_err();
    assert!(matches!(err, MashError::ConfigError(ref msg) if msg.contains("line 2")));
    Ok(())
}

/// Core over a real project with shell commands standing in for the
/// compressors. Sources containing `BROKEN` make the command complain on
/// stderr; everything else is copied through unchanged.
#[cfg(unix)]
fn shell_core(dir: &TempDir) -> Result<(MonitorCore<CommandMinifier>, PathBuf), Box<dyn Error>> {
    let loaded = load_project(&RealFileSystem, dir.path())?;
    let template = "if grep -q BROKEN {input}; then echo 'parse error' >&2; else cat {input}; fi";
    let commands = MinifierCommands {
        js: template.to_string(),
        css: template.to_string(),
        jar: PathBuf::from("unused.jar"),
    };
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let minifier = CommandMinifier::new(fs.clone(), commands);
    let core = MonitorCore::new(fs, loaded.root.clone(), loaded.patterns, minifier);
    Ok((core, loaded.root))
}

#[cfg(unix)]
#[tokio::test]
async fn minifies_stale_sources_once() -> TestResult {
    init_tracing();
    let dir = project("js\n")?;
    let root = dir.path().canonicalize()?;
    write_file(&root.join("js/foo.js"), "var foo = 1;\n", hours_ago(1))?;
    // Current artifact: left alone.
    write_file(&root.join("js/done.js"), "done\n", hours_ago(2))?;
    write_file(&root.join("js/done.min.js"), "old\n", hours_ago(1))?;
    // Outside every pattern.
    write_file(&root.join("lib/other.js"), "x\n", hours_ago(1))?;

    let (mut core, root) = shell_core(&dir)?;
    core.refresh_directories();
    assert_eq!(core.watched_directories(), &[root.join("js")]);

    let report = core.run_pass().await?;
    assert_eq!(report.minified, 1);
    assert_eq!(fs::read_to_string(root.join("js/foo.min.js"))?, "var foo = 1;\n");
    assert_eq!(fs::read_to_string(root.join("js/done.min.js"))?, "old\n");
    assert!(!root.join("lib/other.min.js").exists());

    let report = core.run_pass().await?;
    assert_eq!(report.attempted(), 0);
    assert!(!root.join("MASH_ERRORS").exists());
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn failing_source_is_reported_until_fixed() -> TestResult {
    init_tracing();
    let dir = project("js\n")?;
    let root = dir.path().canonicalize()?;
    let bad = root.join("js/bad.js");
    write_file(&bad, "BROKEN (\n", hours_ago(1))?;

    let (mut core, root) = shell_core(&dir)?;
    core.refresh_directories();

    let report = core.run_pass().await?;
    assert_eq!(report.failed, 1);
    assert!(!root.join("js/bad.min.js").exists());
    assert_eq!(
        fs::read_to_string(root.join("MASH_ERRORS"))?,
        format!("{}\n", bad.display())
    );

    // Untouched since the failure: not retried.
    assert_eq!(core.run_pass().await?.attempted(), 0);

    write_file(&bad, "fixed();\n", SystemTime::now() + Duration::from_secs(60))?;
    let report = core.run_pass().await?;
    assert_eq!(report.minified, 1);
    assert_eq!(fs::read_to_string(root.join("js/bad.min.js"))?, "fixed();\n");
    assert!(!root.join("MASH_ERRORS").exists());
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn missing_compressor_fails_preflight() -> TestResult {
    init_tracing();
    let dir = project("js\n")?;
    let root = dir.path().canonicalize()?;
    write_file(&root.join("js/foo.js"), "x\n", hours_ago(1))?;

    let loaded = load_project(&RealFileSystem, dir.path())?;
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let commands = MinifierCommands {
        js: "no-such-compressor-xyz {input}".to_string(),
        css: "cat {input}".to_string(),
        jar: PathBuf::from("unused.jar"),
    };
    let minifier = CommandMinifier::new(fs.clone(), commands);
    assert!(matches!(minifier.preflight(), Err(MashError::ToolUnavailable(_))));

    let mut core = MonitorCore::new(fs, loaded.root, loaded.patterns, minifier);
    core.refresh_directories();
    // The shell itself starts fine, so the missing program surfaces as a
    // per-file failure (sh reports it on stderr).
    let report = core.run_pass().await?;
    assert_eq!(report.failed, 1);
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn root_with_regex_metacharacters_is_watched() -> TestResult {
    init_tracing();
    let parent = tempfile::tempdir()?;

    for name in ["site (v2)", "c++site", "a+b"] {
        let dir = parent.path().join(name);
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(".mash"), "js\n")?;
        write_file(&dir.join("js/app.js"), "app();\n", hours_ago(1))?;

        let loaded = load_project(&RealFileSystem, &dir)?;
        let fs_handle: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
        let commands = MinifierCommands {
            js: "cat {input}".to_string(),
            css: "cat {input}".to_string(),
            jar: PathBuf::from("unused.jar"),
        };
        let minifier = CommandMinifier::new(fs_handle.clone(), commands);
        let mut core = MonitorCore::new(fs_handle, loaded.root.clone(), loaded.patterns, minifier);

        core.refresh_directories();
        assert_eq!(core.watched_directories(), &[loaded.root.join("js")], "root {name:?}");
        assert_eq!(core.run_pass().await?.minified, 1, "root {name:?}");
        assert!(loaded.root.join("js/app.min.js").is_file());
    }
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn symlinked_directories_do_not_alias_sources() -> TestResult {
    use std::os::unix::fs::symlink;

    init_tracing();
    let dir = project("js[^/]*\n")?;
    let root = dir.path().canonicalize()?;
    let bad = root.join("js/bad.js");
    write_file(&bad, "BROKEN\n", hours_ago(1))?;
    symlink(root.join("js"), root.join("js_link"))?;
    symlink(&root, root.join("loop"))?;

    let (mut core, root) = shell_core(&dir)?;
    core.refresh_directories();
    assert_eq!(core.watched_directories(), &[root.join("js")]);

    let report = core.run_pass().await?;
    assert_eq!(report.failed, 1);
    assert_eq!(
        fs::read_to_string(root.join("MASH_ERRORS"))?,
        format!("{}\n", bad.display())
    );
    Ok(())
}
