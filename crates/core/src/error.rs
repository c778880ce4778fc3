//! Error types shared across isosceles crates

use std::path::PathBuf;
use thiserror::Error;

/// Failure to read or parse the configuration file
///
/// Per-project problems (missing local folder, bad pattern) are not errors:
/// they mark the project invalid and loading continues.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine home directory for the default config path")]
    NoHomeDir,

    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("bad settings in {}: {reason}", .path.display())]
    Settings { path: PathBuf, reason: String },
}

/// Failure to hand a notification or URL to the desktop
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: &'static str,
        #[source]
        source: std::io::Error,
    },
}
