//! Artifact panel
//!
//! Owns the selection, the session's scroll anchor and the mounted shell.
//! The host feeds collection snapshots through [`ArtifactPanel::sync`] and
//! user actions through [`ArtifactPanel::dispatch`]; both return a
//! [`PanelSnapshot`] describing what to render.

use crate::config::ViewConfig;
use crate::error::ViewError;
use crate::host::Host;
use crate::navigator::{
    navigate, navigation_state, Direction, NavigationState, Selection, SelectionChange,
    SelectionTracker,
};
use crate::readiness::ViewMode;
use crate::scroll::{RegionId, ScrollAnchor, ScrollMetrics, ScrollOutcome};
use crate::shell::{PresentationShell, ShellSnapshot};
use artifact_model::{ArtifactCollection, RevisionIndex};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// User actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelCommand {
    /// Switch between preview and source
    SelectMode(ViewMode),
    /// Expand to / collapse from full viewport
    ToggleExpanded,
    /// Restart the preview renderer
    Refresh,
    /// Copy the raw source to the clipboard
    Copy,
    /// Previous version of the open artifact
    Back,
    /// Next version of the open artifact
    Forward,
    /// Open a specific revision
    Open(RevisionIndex),
    /// Close the panel
    Close,
}

/// Everything needed to render the panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelSnapshot {
    pub selection: Selection,
    /// `None` when nothing is open
    pub shell: Option<ShellSnapshot>,
    /// `None` when nothing is open
    pub navigation: Option<NavigationState>,
}

impl PanelSnapshot {
    #[inline]
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.shell.is_some()
    }
}

/// Artifact side panel of one conversation
#[derive(Debug)]
pub struct ArtifactPanel {
    config: ViewConfig,
    host: Arc<dyn Host>,
    anchor: ScrollAnchor,
    collection: ArtifactCollection,
    selection: SelectionTracker,
    shell: Option<PresentationShell>,
}

impl ArtifactPanel {
    /// Panel for a conversation with no artifacts yet
    #[must_use]
    pub fn new(config: ViewConfig, host: Arc<dyn Host>) -> Self {
        Self::with_collection(config, host, ArtifactCollection::new())
    }

    /// Panel for a conversation loaded from history
    ///
    /// Existing revisions count as already seen, so nothing opens by itself
    /// until a new revision arrives.
    #[must_use]
    pub fn with_collection(
        config: ViewConfig,
        host: Arc<dyn Host>,
        collection: ArtifactCollection,
    ) -> Self {
        Self {
            anchor: ScrollAnchor::from_config(&config.scroll),
            selection: SelectionTracker::new(collection.len(), config.selection.auto_select_newest),
            config,
            host,
            collection,
            shell: None,
        }
    }

    /// Collection snapshot currently displayed
    #[inline]
    #[must_use]
    pub fn collection(&self) -> &ArtifactCollection {
        &self.collection
    }

    #[inline]
    #[must_use]
    pub fn selection(&self) -> Selection {
        self.selection.selection()
    }

    /// Scroll context shared by every pane of this session
    #[inline]
    #[must_use]
    pub fn anchor(&self) -> &ScrollAnchor {
        &self.anchor
    }

    /// Mounted shell, if an artifact is open
    #[inline]
    #[must_use]
    pub fn shell(&self) -> Option<&PresentationShell> {
        self.shell.as_ref()
    }

    #[inline]
    pub fn shell_mut(&mut self) -> Option<&mut PresentationShell> {
        self.shell.as_mut()
    }

    /// Ingest the host feed's latest collection
    pub fn sync(&mut self, collection: ArtifactCollection) -> PanelSnapshot {
        self.collection = collection;

        match self.selection.on_collection(&self.collection) {
            SelectionChange::AutoSelected(index) => {
                tracing::info!(%index, "opening newest artifact");
            }
            SelectionChange::Cleared | SelectionChange::Unchanged => {}
        }

        if !self.remount() {
            if let Some(shell) = self.shell.as_mut() {
                if let Some(revision) = self.collection.get(shell.index()) {
                    shell.observe(revision);
                }
            }
        }

        self.snapshot()
    }

    /// Apply a user action
    ///
    /// Actions that do not apply (nothing open, boundary reached, preview
    /// unavailable) are no-ops.
    ///
    /// # Errors
    /// [`ViewError::Host`] if copying to the clipboard fails
    pub fn dispatch(&mut self, command: PanelCommand) -> Result<PanelSnapshot, ViewError> {
        tracing::debug!(?command, "panel command");

        match command {
            PanelCommand::SelectMode(mode) => {
                if let Some(shell) = self.shell.as_mut() {
                    shell.select_mode(mode);
                }
            }
            PanelCommand::ToggleExpanded => {
                if let Some(shell) = self.shell.as_mut() {
                    shell.toggle_expanded();
                }
            }
            PanelCommand::Refresh => {
                if let Some(shell) = self.shell.as_mut() {
                    shell.refresh();
                }
            }
            PanelCommand::Copy => {
                if let Some(shell) = self.shell.as_ref() {
                    shell.copy_source()?;
                }
            }
            PanelCommand::Back => {
                self.step(Direction::Back);
            }
            PanelCommand::Forward => {
                self.step(Direction::Forward);
            }
            PanelCommand::Open(index) => {
                self.open(index);
            }
            PanelCommand::Close => self.close(),
        }

        Ok(self.snapshot())
    }

    /// Open a revision; returns `false` if the collection does not contain it
    pub fn open(&mut self, index: RevisionIndex) -> bool {
        if self.collection.get(index).is_none() {
            tracing::warn!(%index, "cannot open unknown revision");
            return false;
        }
        self.selection.select(Selection::of(index));
        self.remount();
        true
    }

    /// Close the open artifact, if any
    pub fn close(&mut self) {
        self.selection.select(Selection::none());
        self.remount();
    }

    /// Move within the version set; returns the new index, or `None` for a no-op
    pub fn step(&mut self, direction: Direction) -> Option<RevisionIndex> {
        let target = navigate(&self.collection, self.selection(), direction)?;
        self.open(target);
        self.anchor.suppress_next_history_update();
        Some(target)
    }

    /// Start listening to a pane of the open artifact
    pub fn attach_region(&mut self, region: RegionId) -> bool {
        self.shell
            .as_mut()
            .is_some_and(|shell| shell.attach_region(region))
    }

    /// Stop listening to a pane; safe when nothing is attached or open
    pub fn detach_region(&mut self, region: RegionId) -> bool {
        self.shell
            .as_mut()
            .is_some_and(|shell| shell.detach_region(region))
    }

    /// Scroll event from a pane
    pub fn on_scroll(&self, region: RegionId, metrics: ScrollMetrics) -> Option<ScrollOutcome> {
        self.shell.as_ref()?.on_scroll(region, metrics)
    }

    /// Offset to auto-scroll a pane to after new output, if following
    #[must_use]
    pub fn follow_output(&self, metrics: ScrollMetrics) -> Option<f64> {
        self.shell.as_ref()?;
        self.anchor.follow(metrics)
    }

    /// Navigation state of the open artifact
    #[must_use]
    pub fn navigation(&self) -> Option<NavigationState> {
        self.shell.as_ref()?;
        navigation_state(&self.collection, self.selection())
    }

    /// Immutable view of the panel
    #[must_use]
    pub fn snapshot(&self) -> PanelSnapshot {
        PanelSnapshot {
            selection: self.selection(),
            shell: self.shell.as_ref().map(PresentationShell::snapshot),
            navigation: self.navigation(),
        }
    }

    /// Make the mounted shell match the selection; returns whether it changed
    fn remount(&mut self) -> bool {
        let wanted = self
            .selection()
            .index()
            .and_then(|index| self.collection.get(index))
            .cloned();
        let current = self.shell.as_ref().map(PresentationShell::index);
        if wanted.as_ref().map(|rev| rev.index()) == current {
            return false;
        }

        if let Some(mut old) = self.shell.take() {
            old.close();
        }

        if let Some(revision) = wanted {
            self.anchor.reset();
            self.shell = Some(PresentationShell::mount(
                revision,
                self.anchor.clone(),
                Arc::clone(&self.host),
                self.config.readiness.on_ready,
            ));
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HeadlessHost;
    use artifact_model::{ArtifactKind, ArtifactRevision};
    use pretty_assertions::assert_eq;

    fn html(name: &str, index: u64, text: &str, ready: bool) -> ArtifactRevision {
        ArtifactRevision::new(name, index.into(), ArtifactKind::Html, text, ready)
    }

    fn panel() -> ArtifactPanel {
        ArtifactPanel::new(ViewConfig::default(), Arc::new(HeadlessHost::new()))
    }

    #[test]
    fn two_versions_back_navigation() {
        let collection: ArtifactCollection = vec![
            html("A", 0, "<p>1</p>", true),
            html("A", 1, "<p>2</p>", true),
        ]
        .try_into()
        .unwrap();
        let mut panel = panel();
        panel.sync(collection);
        panel.dispatch(PanelCommand::Open(1.into())).unwrap();
        assert_eq!(panel.navigation().unwrap().label(), "Version 2 of 2");

        let snapshot = panel.dispatch(PanelCommand::Back).unwrap();
        assert_eq!(snapshot.selection, Selection::of(0.into()));
        assert_eq!(snapshot.navigation.unwrap().label(), "Version 1 of 2");

        let again = panel.dispatch(PanelCommand::Back).unwrap();
        assert_eq!(again.selection, Selection::of(0.into()));
    }

    #[test]
    fn nothing_open_renders_nothing() {
        let mut panel = ArtifactPanel::new(
            ViewConfig::default().with_auto_select(false),
            Arc::new(HeadlessHost::new()),
        );
        let snapshot = panel.sync(vec![html("A", 0, "", true)].try_into().unwrap());
        assert!(!snapshot.is_open());
        assert!(snapshot.navigation.is_none());
        for command in [
            PanelCommand::Back,
            PanelCommand::Forward,
            PanelCommand::Refresh,
            PanelCommand::Copy,
            PanelCommand::ToggleExpanded,
        ] {
            assert!(!panel.dispatch(command).unwrap().is_open());
        }
    }

    #[test]
    fn auto_opens_newest_and_keeps_focus() {
        let mut panel = panel();
        panel.sync(vec![html("A", 0, "", true)].try_into().unwrap());
        assert_eq!(panel.selection(), Selection::of(0.into()));

        let snapshot = panel.sync(
            vec![html("A", 0, "", true), html("A", 1, "", false)]
                .try_into()
                .unwrap(),
        );
        assert_eq!(snapshot.selection, Selection::of(0.into()));
        assert_eq!(snapshot.navigation.unwrap().label(), "Version 1 of 2");
    }

    #[test]
    fn opening_resets_scroll_anchor() {
        let mut panel = panel();
        panel.sync(
            vec![html("A", 0, "", true), html("B", 1, "", true)]
                .try_into()
                .unwrap(),
        );
        panel.attach_region(RegionId(1));
        panel.on_scroll(RegionId(1), ScrollMetrics::new(0.0, 10.0, 100.0));
        assert!(panel.anchor().user_has_scrolled());

        panel.open(0.into());
        assert!(!panel.anchor().user_has_scrolled());
    }

    #[test]
    fn follow_output_tracks_manual_scroll() {
        let mut panel = panel();
        let metrics = ScrollMetrics::new(0.0, 10.0, 100.0);
        assert_eq!(panel.follow_output(metrics), None);

        panel.sync(vec![html("A", 0, "<p>", false)].try_into().unwrap());
        panel.attach_region(RegionId(1));
        assert_eq!(panel.follow_output(metrics), Some(90.0));
        // echo of the programmatic scroll
        let echo = ScrollMetrics::new(90.0, 10.0, 100.0);
        assert_eq!(panel.on_scroll(RegionId(1), echo), Some(ScrollOutcome::Suppressed));

        assert_eq!(panel.on_scroll(RegionId(1), metrics), Some(ScrollOutcome::Detached));
        assert_eq!(panel.follow_output(metrics), None);

        assert_eq!(panel.on_scroll(RegionId(1), echo), Some(ScrollOutcome::AtBottom));
        assert_eq!(panel.follow_output(echo), Some(90.0));
    }

    #[test]
    fn open_unknown_revision_is_rejected() {
        let mut panel = panel();
        assert!(!panel.open(3.into()));
        assert!(panel.shell().is_none());
    }

    #[test]
    fn navigation_suppresses_next_history_update() {
        let mut panel = panel();
        panel.sync(
            vec![html("A", 0, "", true), html("A", 1, "", true)]
                .try_into()
                .unwrap(),
        );
        assert_eq!(panel.step(Direction::Back), Some(0.into()));
        assert!(panel.anchor().take_history_suppression());
    }
}
