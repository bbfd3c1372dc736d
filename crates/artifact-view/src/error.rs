//! Error types for the viewer
//!
//! Boundary cases (navigation past the ends, nothing selected, detaching an
//! unknown listener) are no-ops, not errors. What remains are real faults:
//! - configuration that cannot be read or parsed
//! - host capabilities that fail (clipboard)

use std::path::PathBuf;

/// Main viewer error type
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    /// Host capability failed
    #[error("host error: {0}")]
    Host(#[from] HostError),
}

/// Errors reported by host capabilities
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// Writing to the clipboard failed
    #[error("clipboard unavailable: {0}")]
    Clipboard(String),
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error while reading a config file
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed TOML or unknown key
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Value out of range
    #[error("invalid value: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
