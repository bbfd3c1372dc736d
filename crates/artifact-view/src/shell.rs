//! Presentation shell
//!
//! One [`PresentationShell`] is mounted per displayed revision and dropped
//! when the selection moves (remount semantics: no state survives a switch
//! of revision). It composes the readiness tracker, the file set, the
//! view/source toggle, expand/collapse, refresh, copy and the scroll
//! listeners of its panes.
//!
//! Every mutation can be followed by [`snapshot`](PresentationShell::snapshot);
//! [`ShellSnapshot::diff`] tells the renderer what actually changed.

use crate::config::ReadyViewPolicy;
use crate::error::HostError;
use crate::host::{Host, PageScroll};
use crate::readiness::{ReadinessTracker, ViewMode};
use crate::scroll::{RegionId, ScrollAnchor, ScrollListeners, ScrollMetrics, ScrollOutcome};
use artifact_model::{generate_files, ArtifactKind, ArtifactRevision, ContentHash, FileMap, RevisionIndex};
use serde::Serialize;
use std::sync::Arc;

/// Key handed to the renderer; a new key means "discard and restart"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RemountKey {
    /// Revision being rendered
    pub revision: RevisionIndex,
    /// Bumped by every refresh
    pub generation: u64,
}

/// Immutable view of a shell at one point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShellSnapshot {
    pub name: String,
    pub index: RevisionIndex,
    pub kind: ArtifactKind,
    pub ready: bool,
    /// Pane actually displayed
    pub active_mode: ViewMode,
    /// Whether the "view" option can be chosen
    pub view_enabled: bool,
    /// Whether the refresh control is enabled
    pub refresh_enabled: bool,
    pub expanded: bool,
    pub remount_key: RemountKey,
    /// Renderer input; empty while streaming or for kinds without preview
    pub files: FileMap,
    /// Digest of the displayed source text
    pub digest: ContentHash,
}

/// Fields that differ between two snapshots
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShellChanges {
    /// Renderer input changed
    pub files: bool,
    /// Renderer must restart from scratch
    pub remount: bool,
    /// Displayed pane changed
    pub mode: bool,
    /// Layout changed
    pub expanded: bool,
    /// Source text changed
    pub source: bool,
}

impl ShellChanges {
    /// Whether anything changed at all
    #[must_use]
    pub fn any(&self) -> bool {
        self.files || self.remount || self.mode || self.expanded || self.source
    }
}

impl ShellSnapshot {
    /// Compare with an earlier snapshot
    #[must_use]
    pub fn diff(&self, previous: &Self) -> ShellChanges {
        ShellChanges {
            files: self.files != previous.files,
            remount: self.remount_key != previous.remount_key,
            mode: self.active_mode != previous.active_mode,
            expanded: self.expanded != previous.expanded,
            source: self.digest != previous.digest,
        }
    }
}

/// Per-revision presentation state
#[derive(Debug)]
pub struct PresentationShell {
    revision: ArtifactRevision,
    readiness: ReadinessTracker,
    files: FileMap,
    /// Digest of the text `files` was generated from
    files_digest: Option<ContentHash>,
    expanded: bool,
    generation: u64,
    listeners: ScrollListeners,
    host: Arc<dyn Host>,
    closed: bool,
}

impl PresentationShell {
    /// Mount a shell for `revision`
    ///
    /// A ready revision opens in the preview, a streaming one in the source.
    #[must_use]
    pub fn mount(
        revision: ArtifactRevision,
        anchor: ScrollAnchor,
        host: Arc<dyn Host>,
        policy: ReadyViewPolicy,
    ) -> Self {
        tracing::info!(
            name = revision.name(),
            index = %revision.index(),
            ready = revision.is_ready(),
            "artifact shell mounted"
        );

        let mut shell = Self {
            readiness: ReadinessTracker::new(revision.is_ready(), policy),
            revision,
            files: FileMap::new(),
            files_digest: None,
            expanded: false,
            generation: 0,
            listeners: ScrollListeners::new(anchor),
            host,
            closed: false,
        };
        shell.regenerate_files();
        shell
    }

    /// Revision currently displayed
    #[inline]
    #[must_use]
    pub fn revision(&self) -> &ArtifactRevision {
        &self.revision
    }

    #[inline]
    #[must_use]
    pub fn index(&self) -> RevisionIndex {
        self.revision.index()
    }

    /// Apply the host feed's latest state of this revision
    ///
    /// Readiness is processed first, then the file set is brought in line
    /// with the new text, so a ready snapshot never carries stale files.
    /// Snapshots of other revisions are ignored.
    pub fn observe(&mut self, revision: &ArtifactRevision) -> ShellChanges {
        if revision.index() != self.revision.index() {
            tracing::warn!(
                expected = %self.revision.index(),
                got = %revision.index(),
                "ignoring update for another revision"
            );
            return ShellChanges::default();
        }

        let before = self.snapshot();
        if self.revision.is_ready() && !revision.is_ready() {
            tracing::warn!(index = %revision.index(), "ignoring readiness regression");
        } else {
            self.revision = revision.clone();
        }

        if let Some(transition) = self.readiness.observe(self.revision.is_ready()) {
            tracing::info!(
                index = %self.revision.index(),
                mode = %transition.mode,
                "artifact ready"
            );
        }
        self.regenerate_files();

        self.snapshot().diff(&before)
    }

    /// Pane actually displayed
    #[must_use]
    pub fn active_mode(&self) -> ViewMode {
        self.readiness.active_mode(self.revision.kind().is_renderable())
    }

    /// Whether the "view" option can be chosen
    #[must_use]
    pub fn view_enabled(&self) -> bool {
        self.readiness.is_ready() && self.revision.kind().is_renderable()
    }

    /// Choose a pane; returns whether the displayed pane changed
    pub fn select_mode(&mut self, mode: ViewMode) -> bool {
        if mode == ViewMode::View && !self.view_enabled() {
            tracing::debug!(index = %self.index(), "preview not available yet");
            return false;
        }
        let before = self.active_mode();
        self.readiness.select(mode);
        before != self.active_mode()
    }

    #[inline]
    #[must_use]
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Whether [`close`](Self::close) already ran
    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Toggle the full-viewport layout; returns the new state
    ///
    /// Page scrolling is suspended while expanded. No-op once closed.
    pub fn toggle_expanded(&mut self) -> bool {
        if self.closed {
            tracing::debug!(index = %self.index(), "ignoring expand on closed shell");
            return false;
        }
        self.expanded = !self.expanded;
        self.host.set_page_scroll(if self.expanded {
            PageScroll::Locked
        } else {
            PageScroll::Auto
        });
        self.expanded
    }

    /// Force the renderer to restart with fresh state
    ///
    /// Only meaningful while the preview is shown; returns whether the
    /// remount key changed.
    pub fn refresh(&mut self) -> bool {
        if !self.refresh_enabled() {
            return false;
        }
        self.generation += 1;
        tracing::debug!(index = %self.index(), generation = self.generation, "preview refreshed");
        true
    }

    #[must_use]
    pub fn refresh_enabled(&self) -> bool {
        self.active_mode() == ViewMode::View
    }

    /// Current remount key
    #[inline]
    #[must_use]
    pub fn remount_key(&self) -> RemountKey {
        RemountKey {
            revision: self.revision.index(),
            generation: self.generation,
        }
    }

    /// Renderer input
    #[inline]
    #[must_use]
    pub fn files(&self) -> &FileMap {
        &self.files
    }

    /// Copy the raw source text to the clipboard
    ///
    /// # Errors
    /// [`HostError::Clipboard`] if the host clipboard fails
    pub fn copy_source(&self) -> Result<(), HostError> {
        self.host.write_clipboard(self.revision.text())
    }

    /// Start listening to a scrollable pane; refused once closed
    pub fn attach_region(&mut self, region: RegionId) -> bool {
        if self.closed {
            return false;
        }
        self.listeners.attach(region)
    }

    /// Stop listening to a pane; unknown regions are a no-op
    pub fn detach_region(&mut self, region: RegionId) -> bool {
        self.listeners.detach(region)
    }

    /// Scroll event from one of the panes
    pub fn on_scroll(&self, region: RegionId, metrics: ScrollMetrics) -> Option<ScrollOutcome> {
        self.listeners.dispatch(region, metrics)
    }

    /// Number of attached scroll listeners
    #[inline]
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Tear down: detach listeners and restore page scrolling
    ///
    /// Idempotent; also run on drop.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        let detached = self.listeners.detach_all();
        if self.expanded {
            self.expanded = false;
            self.host.set_page_scroll(PageScroll::Auto);
        }
        tracing::info!(index = %self.index(), detached, "artifact shell closed");
    }

    /// Immutable view of the current state
    #[must_use]
    pub fn snapshot(&self) -> ShellSnapshot {
        ShellSnapshot {
            name: self.revision.name().to_string(),
            index: self.revision.index(),
            kind: self.revision.kind().clone(),
            ready: self.readiness.is_ready(),
            active_mode: self.active_mode(),
            view_enabled: self.view_enabled(),
            refresh_enabled: self.refresh_enabled(),
            expanded: self.expanded,
            remount_key: self.remount_key(),
            files: self.files.clone(),
            digest: self.revision.digest(),
        }
    }

    fn regenerate_files(&mut self) {
        if !self.readiness.is_ready() {
            self.files = FileMap::new();
            self.files_digest = None;
            return;
        }

        let digest = self.revision.digest();
        if self.files_digest == Some(digest) {
            return;
        }
        self.files = generate_files(&self.revision);
        self.files_digest = Some(digest);
        tracing::debug!(
            index = %self.index(),
            digest = %digest.short(),
            files = self.files.len(),
            "file set regenerated"
        );
    }
}

impl Drop for PresentationShell {
    fn drop(&mut self) {
        self.close();
    }
}
