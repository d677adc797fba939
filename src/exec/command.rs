// src/exec/command.rs

//! Production minifier: one external compressor process per source.
//!
//! Commands are shell templates with `{input}` (the quoted source path) and
//! optionally `{jar}` (the quoted YUI Compressor jar). The compressor's
//! stdout becomes the artifact. Any stderr output means failure, whatever
//! the exit code says.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::process::Stdio;
use std::sync::Arc;

use tokio::process::Command;
use tracing::{debug, info};

use crate::config::settings::MinifySection;
use crate::errors::{MashError, Result};
use crate::exec::backend::{Minifier, MinifyOutcome};
use crate::exec::tools::{is_installed, program_available, program_of, shell_quote};
use crate::fs::FileSystem;
use crate::source::artifact_path;

/// JS compressor used when `uglifyjs` is on `PATH`; `-nc` drops the leading
/// comment block.
pub const UGLIFY_COMMAND: &str = "uglifyjs -nc {input}";

/// Fallback for JS and the default for CSS.
pub const YUI_COMMAND: &str = "java -jar {jar} {input}";

/// Jar file name looked up next to the executable by default.
pub const YUI_JAR: &str = "yuicompressor-2.4.5.jar";

/// The resolved command templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinifierCommands {
    pub js: String,
    pub css: String,
    pub jar: PathBuf,
}

impl MinifierCommands {
    /// Resolve templates from settings, picking `uglifyjs` for JS when it
    /// is installed and no explicit command was configured.
    pub fn from_settings(settings: &MinifySection) -> Self {
        let js = settings.js_command.clone().unwrap_or_else(|| {
            if is_installed("uglifyjs") {
                UGLIFY_COMMAND.to_string()
            } else {
                YUI_COMMAND.to_string()
            }
        });
        let css = settings
            .css_command
            .clone()
            .unwrap_or_else(|| YUI_COMMAND.to_string());
        let jar = settings
            .yuicompressor_jar
            .clone()
            .unwrap_or_else(default_jar_path);

        Self { js, css, jar }
    }

    fn template_for(&self, source: &Path) -> Option<&str> {
        let name = source.file_name()?.to_str()?;
        if name.ends_with(".js") {
            Some(&self.js)
        } else if name.ends_with(".css") {
            Some(&self.css)
        } else {
            None
        }
    }

    /// Full shell command line for `source`.
    pub fn render(&self, source: &Path) -> Option<String> {
        let template = self.template_for(source)?;
        Some(
            template
                .replace("{jar}", &shell_quote(&self.jar.to_string_lossy()))
                .replace("{input}", &shell_quote(&source.to_string_lossy())),
        )
    }
}

fn default_jar_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(YUI_JAR)))
        .unwrap_or_else(|| PathBuf::from(YUI_JAR))
}

/// Minifier backed by external compressor processes.
#[derive(Debug, Clone)]
pub struct CommandMinifier {
    fs: Arc<dyn FileSystem>,
    commands: MinifierCommands,
}

impl CommandMinifier {
    pub fn new(fs: Arc<dyn FileSystem>, commands: MinifierCommands) -> Self {
        Self { fs, commands }
    }

    pub fn commands(&self) -> &MinifierCommands {
        &self.commands
    }

    /// Check that every program the templates launch can be found.
    ///
    /// Run once at startup so a missing `java` is reported before the first
    /// pass instead of as a stream of per-file failures.
    pub fn preflight(&self) -> Result<()> {
        for template in [&self.commands.js, &self.commands.css] {
            let Some(program) = program_of(template) else {
                return Err(MashError::ToolUnavailable("empty minifier command".to_string()));
            };
            if !program_available(program) {
                return Err(MashError::ToolUnavailable(format!(
                    "`{program}` must be installed and on your PATH to run mash"
                )));
            }
            if template.contains("{jar}") && !self.commands.jar.is_file() {
                return Err(MashError::ToolUnavailable(format!(
                    "YUI Compressor jar not found at {:?}",
                    self.commands.jar
                )));
            }
        }
        Ok(())
    }

    async fn run(&self, source: &Path) -> Result<MinifyOutcome> {
        let artifact = artifact_path(source).ok_or_else(|| {
            MashError::Other(anyhow::anyhow!("not a minifiable source: {:?}", source))
        })?;
        let command_line = self.commands.render(source).ok_or_else(|| {
            MashError::Other(anyhow::anyhow!("no minifier command for {:?}", source))
        })?;

        debug!(cmd = %command_line, "starting minifier process");

        let mut cmd = shell_command(&command_line);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = cmd.output().await.map_err(|e| {
            MashError::ToolUnavailable(format!("an error occurred running `{command_line}`: {e}"))
        })?;

        debug!(
            path = %source.display(),
            exit_code = output.status.code().unwrap_or(-1),
            stdout_bytes = output.stdout.len(),
            "minifier process exited"
        );

        let diagnostic = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !diagnostic.is_empty() {
            return Ok(MinifyOutcome::Failed { diagnostic });
        }

        if let Err(err) = self.fs.write(&artifact, &output.stdout) {
            return Ok(MinifyOutcome::Failed {
                diagnostic: format!("{err:#}"),
            });
        }

        info!(path = %artifact.display(), "wrote minified artifact");
        Ok(MinifyOutcome::Minified)
    }
}

impl Minifier for CommandMinifier {
    fn minify<'a>(
        &'a mut self,
        source: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<MinifyOutcome>> + Send + 'a>> {
        Box::pin(self.run(source))
    }
}

/// Build a shell command appropriate for the platform.
fn shell_command(command_line: &str) -> Command {
    if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(command_line);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(command_line);
        c
    }
}
