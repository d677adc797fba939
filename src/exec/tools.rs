// src/exec/tools.rs

//! Helpers for locating and invoking external compressors.

use std::path::Path;

/// Is this program installed and on `PATH`?
pub fn is_installed(name: &str) -> bool {
    let Some(path_var) = std::env::var_os("PATH") else {
        return false;
    };

    std::env::split_paths(&path_var).any(|dir| {
        let candidate = dir.join(name);
        candidate.is_file() || (cfg!(windows) && candidate.with_extension("exe").is_file())
    })
}

/// True if `program` can be found: an explicit path that exists, or a bare
/// name on `PATH`.
pub fn program_available(program: &str) -> bool {
    if program.contains('/') || program.contains('\\') {
        Path::new(program).is_file()
    } else {
        is_installed(program)
    }
}

/// First word of a command template, i.e. the program it launches.
pub fn program_of(template: &str) -> Option<&str> {
    template.split_whitespace().next()
}

/// Quote `arg` for the platform shell.
pub fn shell_quote(arg: &str) -> String {
    if cfg!(windows) {
        format!("\"{}\"", arg.replace('"', "\"\""))
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn program_is_first_word() {
        assert_eq!(program_of("uglifyjs -nc {input}"), Some("uglifyjs"));
        assert_eq!(program_of("   "), None);
    }

    #[cfg(unix)]
    #[test]
    fn quotes_single_quotes() {
        assert_eq!(shell_quote("/p/it's.js"), r"'/p/it'\''s.js'");
        assert_eq!(shell_quote("/p/a b.css"), "'/p/a b.css'");
    }

    #[cfg(unix)]
    #[test]
    fn finds_shell_on_path() {
        assert!(is_installed("sh"));
        assert!(program_available("/bin/sh"));
        assert!(!is_installed("definitely-not-a-real-mash-tool"));
    }
}
