use clap::ValueEnum;
use serde::Deserialize;

/// How the monitor loop is woken between passes.
///
/// - `Notify`: block on filesystem events for the watched directories
///   (default).
/// - `Poll`: wake on a fixed interval and always run a full pass; staleness
///   filtering keeps idle passes cheap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WatchStrategy {
    #[default]
    Notify,
    Poll,
}
