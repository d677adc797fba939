// src/config/patterns.rs

//! Compiling `.mash` lines into anchored full-path matchers.
//!
//! Each eligible line is a regular expression fragment relative to the
//! project root. It is joined onto the root and anchored on both ends, so
//! `js/[^/]+` under `/srv/site` becomes `^/srv/site/js/[^/]+$` and only ever
//! matches a complete absolute path.

use std::fmt;
use std::path::Path;

use regex::Regex;

use crate::errors::{MashError, Result};

/// A compiled matcher for one `.mash` line.
#[derive(Clone)]
pub struct PathPattern {
    regex: Regex,
    line_number: usize,
}

impl fmt::Debug for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathPattern")
            .field("regex", &self.regex.as_str())
            .field("line", &self.line_number)
            .finish()
    }
}

impl PathPattern {
    /// The anchored expression, e.g. `^/srv/site/js$`.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// 1-based line in the configuration text this pattern came from.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// True iff the whole (separator-normalized) path matches.
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

/// Result of compiling a configuration text.
#[derive(Debug, Clone, Default)]
pub struct CompiledPatterns {
    pub patterns: Vec<PathPattern>,
    /// Human-readable notes about lines that were skipped.
    pub warnings: Vec<String>,
}

/// Compile configuration text into patterns anchored at `project_root`.
///
/// - every line is trimmed;
/// - blank lines and `#` comments are dropped silently;
/// - lines ending in `/` produce a warning and no pattern;
/// - an invalid expression fails the whole compilation.
pub fn compile(project_root: &Path, config_text: &str) -> Result<CompiledPatterns> {
    let mut compiled = CompiledPatterns::default();

    for (index, raw_line) in config_text.lines().enumerate() {
        let line_number = index + 1;
        let line = raw_line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.ends_with('/') {
            compiled.warnings.push(format!(
                "directory patterns must not end with '/'; line {line_number} will not do anything"
            ));
            continue;
        }

        let expr = anchored_expression(project_root, line);
        let regex = Regex::new(&expr).map_err(|e| {
            MashError::ConfigError(format!("invalid pattern on line {line_number} ({line}): {e}"))
        })?;

        compiled.patterns.push(PathPattern { regex, line_number });
    }

    Ok(compiled)
}

/// Join `relative` onto `project_root` and wrap it in `^…$`.
///
/// The root is a literal path and is escaped; `relative` is an expression
/// fragment and is used as written.
pub fn anchored_expression(project_root: &Path, relative: &str) -> String {
    let root = normalize_separators(&project_root.to_string_lossy());
    let root = root.strip_suffix('/').unwrap_or(&root);
    format!("^{}/{}$", regex::escape(root), normalize_separators(relative))
}

/// True iff any pattern fully matches `path`.
pub fn matches(path: &Path, patterns: &[PathPattern]) -> bool {
    let normalized = normalize_separators(&path.to_string_lossy());
    patterns.iter().any(|p| p.is_match(&normalized))
}

fn normalize_separators(s: &str) -> String {
    s.replace('\\', "/")
}
