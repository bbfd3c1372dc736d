//! Artifact View
//!
//! Presentation core for streamed, versioned artifacts. Everything here is
//! host-agnostic: the embedding application renders [`PanelSnapshot`]s and
//! reports user actions and scroll events back.
//!
//! # Components
//!
//! - [`ArtifactPanel`]: selection, remounting and command dispatch
//! - [`PresentationShell`]: per-revision state (readiness, files, expand, refresh)
//! - [`ReadinessTracker`]: streaming → ready, switches to the preview once
//! - [`navigate`] / [`navigation_state`]: back/forward across versions of one artifact
//! - [`ScrollAnchor`]: per-session auto-scroll following
//! - [`ViewConfig`]: TOML configuration
//!
//! # Quick Start
//!
//! ```rust
//! use artifact_view::prelude::*;
//! use artifact_model::{ArtifactCollection, ArtifactKind};
//! use std::sync::Arc;
//!
//! let mut collection = ArtifactCollection::new();
//! let index = collection.begin("page", ArtifactKind::Html)?;
//! collection.append_text(index, "<p>hi</p>")?;
//!
//! let mut panel = ArtifactPanel::new(ViewConfig::default(), Arc::new(HeadlessHost::new()));
//! let streaming = panel.sync(collection.clone());
//! assert_eq!(streaming.shell.unwrap().active_mode, ViewMode::Source);
//!
//! collection.mark_ready(index)?;
//! let ready = panel.sync(collection);
//! assert_eq!(ready.shell.unwrap().active_mode, ViewMode::View);
//! # Ok::<(), artifact_model::ArtifactError>(())
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod error;
pub mod host;
pub mod navigator;
pub mod panel;
pub mod readiness;
pub mod scroll;
pub mod shell;

pub use config::{ReadinessConfig, ReadyViewPolicy, ScrollConfig, SelectionConfig, ViewConfig};
pub use error::{ConfigError, HostError, ViewError};
pub use host::{HeadlessHost, Host, PageScroll};
pub use navigator::{
    navigate, navigation_state, position, version_domain, Direction, NavigationState, Selection,
    SelectionChange, SelectionTracker, VersionPosition,
};
pub use panel::{ArtifactPanel, PanelCommand, PanelSnapshot};
pub use readiness::{ReadinessTracker, ReadinessTransition, ViewMode};
pub use scroll::{RegionId, ScrollAnchor, ScrollFlags, ScrollListeners, ScrollMetrics, ScrollOutcome};
pub use shell::{PresentationShell, RemountKey, ShellChanges, ShellSnapshot};

/// Common imports for hosts
pub mod prelude {
    pub use crate::config::{ReadyViewPolicy, ViewConfig};
    pub use crate::error::{HostError, ViewError};
    pub use crate::host::{HeadlessHost, Host, PageScroll};
    pub use crate::navigator::{Direction, NavigationState, Selection};
    pub use crate::panel::{ArtifactPanel, PanelCommand, PanelSnapshot};
    pub use crate::readiness::ViewMode;
    pub use crate::scroll::{RegionId, ScrollMetrics, ScrollOutcome};
    pub use crate::shell::ShellSnapshot;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
