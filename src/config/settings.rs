// src/config/settings.rs

//! Optional `.mash.toml` tuning for the monitor loop and the minifier.
//!
//! ```toml
//! [monitor]
//! strategy = "poll"
//! poll_interval_ms = 500
//! rescan_directories = false
//!
//! [minify]
//! js_command = "uglifyjs -nc {input}"
//! css_command = "java -jar {jar} {input}"
//! yuicompressor_jar = "/opt/yui/yuicompressor-2.4.5.jar"
//! ```
//!
//! Every key is optional. `RawSettings` is the serde view; `Settings` is the
//! validated form the rest of the crate uses.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::errors::{MashError, Result};
use crate::types::WatchStrategy;

/// Default polling interval.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawSettings {
    #[serde(default)]
    pub monitor: RawMonitorSection,
    #[serde(default)]
    pub minify: MinifySection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct RawMonitorSection {
    pub strategy: WatchStrategy,
    pub poll_interval_ms: u64,
    pub rescan_directories: bool,
}

impl Default for RawMonitorSection {
    fn default() -> Self {
        Self {
            strategy: WatchStrategy::default(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            rescan_directories: true,
        }
    }
}

/// `[minify]`: command templates; `None` means "pick automatically".
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields, default)]
pub struct MinifySection {
    pub js_command: Option<String>,
    pub css_command: Option<String>,
    pub yuicompressor_jar: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorSettings {
    pub strategy: WatchStrategy,
    pub poll_interval: Duration,
    pub rescan_directories: bool,
}

/// Validated settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub monitor: MonitorSettings,
    pub minify: MinifySection,
}

impl Default for Settings {
    fn default() -> Self {
        // The raw defaults always validate.
        Self {
            monitor: MonitorSettings {
                strategy: WatchStrategy::default(),
                poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
                rescan_directories: true,
            },
            minify: MinifySection::default(),
        }
    }
}

impl TryFrom<RawSettings> for Settings {
    type Error = MashError;

    fn try_from(raw: RawSettings) -> Result<Self> {
        let poll_interval = poll_interval_from_ms(raw.monitor.poll_interval_ms)?;

        for (key, template) in [
            ("minify.js_command", &raw.minify.js_command),
            ("minify.css_command", &raw.minify.css_command),
        ] {
            if let Some(template) = template {
                if !template.contains("{input}") {
                    return Err(MashError::ConfigError(format!(
                        "{key} must contain an {{input}} placeholder: {template:?}"
                    )));
                }
            }
        }

        Ok(Self {
            monitor: MonitorSettings {
                strategy: raw.monitor.strategy,
                poll_interval,
                rescan_directories: raw.monitor.rescan_directories,
            },
            minify: raw.minify,
        })
    }
}

impl Settings {
    /// Parse and validate `.mash.toml` contents.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let raw: RawSettings = toml::from_str(text)?;
        Settings::try_from(raw)
    }

    /// Apply CLI overrides on top of the file settings.
    pub fn with_overrides(
        mut self,
        strategy: Option<WatchStrategy>,
        poll_interval_ms: Option<u64>,
    ) -> Result<Self> {
        if let Some(strategy) = strategy {
            self.monitor.strategy = strategy;
        }
        if let Some(ms) = poll_interval_ms {
            self.monitor.poll_interval = poll_interval_from_ms(ms)?;
        }
        Ok(self)
    }
}

fn poll_interval_from_ms(ms: u64) -> Result<Duration> {
    if ms == 0 {
        return Err(MashError::ConfigError(
            "poll_interval_ms must be greater than 0".to_string(),
        ));
    }
    Ok(Duration::from_millis(ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(Settings::from_toml_str("").unwrap(), Settings::default());
    }

    #[test]
    fn parses_all_sections() {
        let settings = Settings::from_toml_str(
            r#"
[monitor]
strategy = "poll"
poll_interval_ms = 250
rescan_directories = false

[minify]
js_command = "terser {input}"
yuicompressor_jar = "/opt/yui.jar"
"#,
        )
        .unwrap();

        assert_eq!(settings.monitor.strategy, WatchStrategy::Poll);
        assert_eq!(settings.monitor.poll_interval, Duration::from_millis(250));
        assert!(!settings.monitor.rescan_directories);
        assert_eq!(settings.minify.js_command.as_deref(), Some("terser {input}"));
        assert_eq!(settings.minify.css_command, None);
        assert_eq!(settings.minify.yuicompressor_jar, Some(PathBuf::from("/opt/yui.jar")));
    }

    #[test]
    fn partial_monitor_section_keeps_other_defaults() {
        let settings = Settings::from_toml_str("[monitor]\nstrategy = \"poll\"\n").unwrap();
        assert_eq!(settings.monitor.poll_interval, Duration::from_millis(1000));
        assert!(settings.monitor.rescan_directories);
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = Settings::from_toml_str("[monitor]\ninterval = 3\n").unwrap_err();
        assert!(matches!(err, MashError::TomlError(_)));
    }

    #[test]
    fn rejects_zero_interval() {
        let err = Settings::from_toml_str("[monitor]\npoll_interval_ms = 0\n").unwrap_err();
        assert!(matches!(err, MashError::ConfigError(_)));
    }

    #[test]
    fn rejects_template_without_input() {
        let err = Settings::from_toml_str("[minify]\ncss_command = \"csso\"\n").unwrap_err();
        match err {
            MashError::ConfigError(msg) => assert!(msg.contains("minify.css_command")),
            other => panic!("expected ConfigError, got {other:?}"),
        }
    }

    #[test]
    fn cli_overrides_apply() {
        let settings = Settings::default()
            .with_overrides(Some(WatchStrategy::Poll), Some(50))
            .unwrap();
        assert_eq!(settings.monitor.strategy, WatchStrategy::Poll);
        assert_eq!(settings.monitor.poll_interval, Duration::from_millis(50));

        assert!(Settings::default().with_overrides(None, Some(0)).is_err());
    }
}
