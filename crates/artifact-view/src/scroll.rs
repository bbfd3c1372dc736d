//! Scroll anchoring
//!
//! While an artifact streams, its panes auto-scroll to follow new output.
//! A manual scroll away from the bottom must stick until the user returns to
//! the bottom or a new artifact is opened.
//!
//! [`ScrollAnchor`] is the per-session context shared by every scroll region
//! of one viewer session (clones share state). [`ScrollListeners`] tracks
//! which regions are attached so mount and unmount stay paired.

use crate::config::ScrollConfig;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

/// Geometry of a scroll region at the time of a scroll event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollMetrics {
    /// Current scroll offset (top of the viewport)
    pub offset: f64,
    /// Visible height
    pub viewport: f64,
    /// Total content height
    pub content: f64,
}

impl ScrollMetrics {
    #[inline]
    #[must_use]
    pub fn new(offset: f64, viewport: f64, content: f64) -> Self {
        Self {
            offset,
            viewport,
            content,
        }
    }

    /// Largest reachable offset
    #[inline]
    #[must_use]
    pub fn max_offset(&self) -> f64 {
        (self.content - self.viewport).max(0.0)
    }

    /// Distance between the current offset and the largest reachable one
    ///
    /// Content shorter than the viewport is always at the bottom.
    #[inline]
    #[must_use]
    pub fn distance_from_bottom(&self) -> f64 {
        (self.max_offset() - self.offset).abs()
    }
}

/// Shared anchoring flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollFlags {
    /// The user scrolled away from the bottom; auto-scroll is paused
    pub user_has_scrolled: bool,
    /// The next scroll event comes from a programmatic scroll
    pub skip_next_scroll_event: bool,
    /// The next history-driven scroll should be suppressed
    pub skip_next_history_update: bool,
}

/// How a scroll event was interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollOutcome {
    /// Consumed as the echo of a programmatic scroll
    Suppressed,
    /// Viewport at the bottom; auto-scroll resumes
    AtBottom,
    /// User scrolled away; auto-scroll paused
    Detached,
}

/// Per-session scroll anchoring context
///
/// Cloning yields a handle to the same flags, so nested regions of one
/// session coordinate while separate sessions stay independent.
#[derive(Debug, Clone)]
pub struct ScrollAnchor {
    flags: Arc<Mutex<ScrollFlags>>,
    tolerance: f64,
}

impl Default for ScrollAnchor {
    fn default() -> Self {
        Self::new(ScrollConfig::default().bottom_tolerance)
    }
}

impl ScrollAnchor {
    /// Create context with the given "at bottom" tolerance
    #[must_use]
    pub fn new(tolerance: f64) -> Self {
        Self {
            flags: Arc::new(Mutex::new(ScrollFlags::default())),
            tolerance,
        }
    }

    /// Create context from configuration
    #[inline]
    #[must_use]
    pub fn from_config(config: &ScrollConfig) -> Self {
        Self::new(config.bottom_tolerance)
    }

    /// Current flags
    #[must_use]
    pub fn flags(&self) -> ScrollFlags {
        *self.flags.lock()
    }

    #[must_use]
    pub fn user_has_scrolled(&self) -> bool {
        self.flags.lock().user_has_scrolled
    }

    /// Whether auto-scroll should keep following new output
    #[must_use]
    pub fn should_follow(&self) -> bool {
        !self.user_has_scrolled()
    }

    /// Announce a programmatic scroll; its echo event will be ignored
    pub fn begin_programmatic_scroll(&self) {
        self.flags.lock().skip_next_scroll_event = true;
    }

    /// Suppress the next history-driven scroll
    pub fn suppress_next_history_update(&self) {
        self.flags.lock().skip_next_history_update = true;
    }

    /// Consume the history suppression flag
    ///
    /// Returns `true` if the caller should skip this history update.
    pub fn take_history_suppression(&self) -> bool {
        std::mem::take(&mut self.flags.lock().skip_next_history_update)
    }

    /// Interpret a scroll event
    pub fn on_scroll(&self, metrics: ScrollMetrics) -> ScrollOutcome {
        let mut flags = self.flags.lock();
        if std::mem::take(&mut flags.skip_next_scroll_event) {
            return ScrollOutcome::Suppressed;
        }

        let at_bottom = metrics.distance_from_bottom() <= self.tolerance;
        let was_detached = flags.user_has_scrolled;
        flags.user_has_scrolled = !at_bottom;

        if was_detached != flags.user_has_scrolled {
            tracing::trace!(detached = flags.user_has_scrolled, "scroll anchor changed");
        }
        if at_bottom {
            ScrollOutcome::AtBottom
        } else {
            ScrollOutcome::Detached
        }
    }

    /// Offset to auto-scroll to, if following is active
    ///
    /// Marks the resulting scroll event as programmatic.
    #[must_use]
    pub fn follow(&self, metrics: ScrollMetrics) -> Option<f64> {
        let mut flags = self.flags.lock();
        if flags.user_has_scrolled {
            return None;
        }
        flags.skip_next_scroll_event = true;
        Some(metrics.max_offset())
    }

    /// Back to defaults (new artifact session)
    pub fn reset(&self) {
        *self.flags.lock() = ScrollFlags::default();
    }
}

/// Host-assigned identifier of a scrollable element
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(pub u32);

impl Display for RegionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "region-{}", self.0)
    }
}

/// Scroll listeners attached on behalf of one mounted shell
///
/// Attach and detach are idempotent; detaching an unknown region is a no-op.
#[derive(Debug, Clone)]
pub struct ScrollListeners {
    anchor: ScrollAnchor,
    attached: BTreeSet<RegionId>,
}

impl ScrollListeners {
    /// Listener set bound to a session context
    #[must_use]
    pub fn new(anchor: ScrollAnchor) -> Self {
        Self {
            anchor,
            attached: BTreeSet::new(),
        }
    }

    /// Session context the listeners report to
    #[inline]
    #[must_use]
    pub fn anchor(&self) -> &ScrollAnchor {
        &self.anchor
    }

    /// Returns `false` if the region was already attached
    pub fn attach(&mut self, region: RegionId) -> bool {
        let added = self.attached.insert(region);
        if added {
            tracing::trace!(%region, "scroll listener attached");
        }
        added
    }

    /// Returns `false` if the region was not attached
    pub fn detach(&mut self, region: RegionId) -> bool {
        let removed = self.attached.remove(&region);
        if removed {
            tracing::trace!(%region, "scroll listener detached");
        }
        removed
    }

    /// Detach everything; returns how many listeners were removed
    pub fn detach_all(&mut self) -> usize {
        let count = self.attached.len();
        self.attached.clear();
        count
    }

    #[inline]
    #[must_use]
    pub fn is_attached(&self, region: RegionId) -> bool {
        self.attached.contains(&region)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.attached.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attached.is_empty()
    }

    /// Dispatch a scroll event; events from unattached regions are dropped
    pub fn dispatch(&self, region: RegionId, metrics: ScrollMetrics) -> Option<ScrollOutcome> {
        if !self.is_attached(region) {
            return None;
        }
        Some(self.anchor.on_scroll(metrics))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(offset: f64) -> ScrollMetrics {
        ScrollMetrics::new(offset, 100.0, 500.0)
    }

    #[test]
    fn programmatic_scroll_echo_is_ignored() {
        let anchor = ScrollAnchor::default();
        anchor.begin_programmatic_scroll();
        assert_eq!(anchor.on_scroll(at(0.0)), ScrollOutcome::Suppressed);
        assert!(!anchor.user_has_scrolled());
        assert!(!anchor.flags().skip_next_scroll_event);
    }

    #[test]
    fn manual_scroll_away_detaches() {
        let anchor = ScrollAnchor::default();
        assert_eq!(anchor.on_scroll(at(389.0)), ScrollOutcome::Detached);
        assert!(anchor.user_has_scrolled());
        assert!(!anchor.should_follow());
    }

    #[test]
    fn within_tolerance_counts_as_bottom() {
        let anchor = ScrollAnchor::default();
        anchor.on_scroll(at(0.0));
        assert_eq!(anchor.on_scroll(at(390.0)), ScrollOutcome::AtBottom);
        assert!(!anchor.user_has_scrolled());
    }

    #[test]
    fn short_content_is_always_at_bottom() {
        let anchor = ScrollAnchor::default();
        let short = ScrollMetrics::new(0.0, 100.0, 50.0);
        assert_eq!(short.max_offset(), 0.0);
        assert_eq!(short.distance_from_bottom(), 0.0);
        assert_eq!(anchor.on_scroll(short), ScrollOutcome::AtBottom);
        assert!(!anchor.user_has_scrolled());
    }

    #[test]
    fn follow_respects_user_intent() {
        let anchor = ScrollAnchor::default();
        assert_eq!(anchor.follow(at(0.0)), Some(400.0));
        assert_eq!(anchor.on_scroll(at(400.0)), ScrollOutcome::Suppressed);

        anchor.on_scroll(at(50.0));
        assert_eq!(anchor.follow(at(50.0)), None);
    }

    #[test]
    fn clones_share_state() {
        let anchor = ScrollAnchor::default();
        let nested = anchor.clone();
        nested.on_scroll(at(0.0));
        assert!(anchor.user_has_scrolled());
        anchor.reset();
        assert!(!nested.user_has_scrolled());
    }

    #[test]
    fn separate_sessions_are_independent() {
        let a = ScrollAnchor::default();
        let b = ScrollAnchor::default();
        a.on_scroll(at(0.0));
        assert!(!b.user_has_scrolled());
    }

    #[test]
    fn history_suppression_is_one_shot() {
        let anchor = ScrollAnchor::default();
        assert!(!anchor.take_history_suppression());
        anchor.suppress_next_history_update();
        assert!(anchor.take_history_suppression());
        assert!(!anchor.take_history_suppression());
    }

    #[test]
    fn listeners_are_idempotent() {
        let mut listeners = ScrollListeners::new(ScrollAnchor::default());
        assert!(!listeners.detach(RegionId(1)));
        assert!(listeners.attach(RegionId(1)));
        assert!(!listeners.attach(RegionId(1)));
        assert!(listeners.detach(RegionId(1)));
        assert!(!listeners.detach(RegionId(1)));
        assert_eq!(listeners.detach_all(), 0);
    }

    #[test]
    fn unattached_regions_are_ignored() {
        let mut listeners = ScrollListeners::new(ScrollAnchor::default());
        assert_eq!(listeners.dispatch(RegionId(2), at(0.0)), None);
        listeners.attach(RegionId(2));
        assert_eq!(
            listeners.dispatch(RegionId(2), at(0.0)),
            Some(ScrollOutcome::Detached)
        );
    }
}
