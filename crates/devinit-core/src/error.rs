//! Error types owned by devinit-core.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to load the version policy file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{}'", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config '{}'", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid config '{}': {reason}", .path.display())]
    Invalid { path: PathBuf, reason: String },

    #[error("Invalid {key} '{value}': {reason}")]
    InvalidSetting {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Text that does not describe a dotted version tuple.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid version '{input}': {reason}")]
pub struct VersionParseError {
    pub input: String,
    pub reason: String,
}

impl VersionParseError {
    pub(crate) fn new(input: &str, reason: impl Into<String>) -> Self {
        Self {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}
