//! Viewer configuration
//!
//! Loaded from TOML; every field has a default so an empty file is valid.
//!
//! ```toml
//! [scroll]
//! bottom_tolerance = 10.0
//!
//! [selection]
//! auto_select_newest = true
//!
//! [readiness]
//! on_ready = "preview"
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level viewer configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewConfig {
    /// Scroll anchoring
    pub scroll: ScrollConfig,
    /// Selection behaviour when the collection grows
    pub selection: SelectionConfig,
    /// View mode handling on readiness
    pub readiness: ReadinessConfig,
}

impl ViewConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a different "at bottom" tolerance
    #[inline]
    #[must_use]
    pub fn with_bottom_tolerance(mut self, tolerance: f64) -> Self {
        self.scroll.bottom_tolerance = tolerance;
        self
    }

    /// With a different readiness policy
    #[inline]
    #[must_use]
    pub fn with_ready_policy(mut self, policy: ReadyViewPolicy) -> Self {
        self.readiness.on_ready = policy;
        self
    }

    /// With auto-selection of new revisions toggled
    #[inline]
    #[must_use]
    pub fn with_auto_select(mut self, enabled: bool) -> Self {
        self.selection.auto_select_newest = enabled;
        self
    }

    /// Parse and validate a TOML document
    ///
    /// # Errors
    /// - [`ConfigError::Parse`] on malformed TOML or unknown keys
    /// - [`ConfigError::Invalid`] if a value is out of range
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    ///
    /// # Errors
    /// [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str)
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| ConfigError::io_error(path, e))?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), "loaded view config");
        Ok(config)
    }

    /// Check value ranges
    ///
    /// # Errors
    /// [`ConfigError::Invalid`] naming the offending key
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tolerance = self.scroll.bottom_tolerance;
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "scroll.bottom_tolerance must be a non-negative number, got {tolerance}"
            )));
        }
        Ok(())
    }
}

/// Scroll anchoring settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrollConfig {
    /// Distance from the maximum offset still treated as "at bottom"
    pub bottom_tolerance: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            bottom_tolerance: 10.0,
        }
    }
}

/// Selection settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectionConfig {
    /// Open the newest revision when nothing is open and the collection grows
    pub auto_select_newest: bool,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            auto_select_newest: true,
        }
    }
}

/// Readiness settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReadinessConfig {
    /// What happens to the view mode when streaming finishes
    pub on_ready: ReadyViewPolicy,
}

/// View mode policy applied when a revision becomes ready
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReadyViewPolicy {
    /// Always switch to the preview
    #[default]
    Preview,
    /// Switch to the preview unless the user explicitly picked a mode while streaming
    KeepSelection,
}
