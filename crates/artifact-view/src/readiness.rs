//! Readiness tracking
//!
//! A revision is `Streaming` until the model finishes it, then `Ready` for
//! good. While streaming the preview cannot render, so the active mode is
//! forced to [`ViewMode::Source`]. The first observation of `ready = true`
//! switches to the preview exactly once.

use crate::config::ReadyViewPolicy;
use artifact_model::Readiness;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Which pane the shell shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Sandboxed live preview
    View,
    /// Raw source text
    Source,
}

impl Display for ViewMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::View => "view",
            Self::Source => "source",
        })
    }
}

/// Emitted once, when streaming finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessTransition {
    /// Selected mode after the transition
    pub mode: ViewMode,
}

/// Per-shell readiness flag and mode selection
#[derive(Debug, Clone)]
pub struct ReadinessTracker {
    ready: bool,
    selected: ViewMode,
    chosen_while_streaming: bool,
    policy: ReadyViewPolicy,
}

impl ReadinessTracker {
    /// Start tracking a revision whose current flag is `ready`
    #[must_use]
    pub fn new(ready: bool, policy: ReadyViewPolicy) -> Self {
        Self {
            ready,
            selected: if ready { ViewMode::View } else { ViewMode::Source },
            chosen_while_streaming: false,
            policy,
        }
    }

    /// Local readiness flag
    #[inline]
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> Readiness {
        if self.ready {
            Readiness::Ready
        } else {
            Readiness::Streaming
        }
    }

    /// Mode the user selected (may be overridden by [`active_mode`](Self::active_mode))
    #[inline]
    #[must_use]
    pub fn selected_mode(&self) -> ViewMode {
        self.selected
    }

    /// Feed the revision's current `ready` flag
    ///
    /// Returns the transition the first time `ready` is seen `true`;
    /// every other call is a no-op. A `false` after `true` is ignored.
    pub fn observe(&mut self, ready: bool) -> Option<ReadinessTransition> {
        if !ready || self.ready {
            return None;
        }

        self.ready = true;
        let keep = self.policy == ReadyViewPolicy::KeepSelection && self.chosen_while_streaming;
        if !keep {
            self.selected = ViewMode::View;
        }
        tracing::debug!(mode = %self.selected, "revision became ready");
        Some(ReadinessTransition {
            mode: self.selected,
        })
    }

    /// Record a user mode choice
    ///
    /// Selecting [`ViewMode::View`] while streaming is refused. Returns
    /// whether the selection changed.
    pub fn select(&mut self, mode: ViewMode) -> bool {
        if mode == ViewMode::View && !self.ready {
            return false;
        }
        if !self.ready {
            self.chosen_while_streaming = true;
        }
        let changed = self.selected != mode;
        self.selected = mode;
        changed
    }

    /// Mode actually displayed
    ///
    /// Source whenever the revision is streaming or its kind has no preview.
    #[must_use]
    pub fn active_mode(&self, renderable: bool) -> ViewMode {
        if self.ready && renderable {
            self.selected
        } else {
            ViewMode::Source
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn streaming_forces_source() {
        let tracker = ReadinessTracker::new(false, ReadyViewPolicy::Preview);
        assert_eq!(tracker.active_mode(true), ViewMode::Source);
        assert_eq!(tracker.state(), Readiness::Streaming);
    }

    #[test]
    fn ready_revision_opens_in_preview() {
        let tracker = ReadinessTracker::new(true, ReadyViewPolicy::Preview);
        assert_eq!(tracker.active_mode(true), ViewMode::View);
    }

    #[test]
    fn unrenderable_kind_stays_in_source() {
        let tracker = ReadinessTracker::new(true, ReadyViewPolicy::Preview);
        assert_eq!(tracker.active_mode(false), ViewMode::Source);
    }

    #[test]
    fn false_false_true_true_switches_once() {
        let mut tracker = ReadinessTracker::new(false, ReadyViewPolicy::Preview);
        let transitions: Vec<_> = [false, false, true, true]
            .into_iter()
            .filter_map(|ready| tracker.observe(ready))
            .collect();
        assert_eq!(
            transitions,
            vec![ReadinessTransition {
                mode: ViewMode::View
            }]
        );
    }

    #[test]
    fn view_cannot_be_selected_while_streaming() {
        let mut tracker = ReadinessTracker::new(false, ReadyViewPolicy::Preview);
        assert!(!tracker.select(ViewMode::View));
        assert_eq!(tracker.selected_mode(), ViewMode::Source);
    }

    #[test]
    fn preview_policy_overrides_streaming_choice() {
        let mut tracker = ReadinessTracker::new(false, ReadyViewPolicy::Preview);
        tracker.select(ViewMode::Source);
        tracker.observe(true);
        assert_eq!(tracker.active_mode(true), ViewMode::View);
    }

    #[test]
    fn keep_selection_policy_honours_streaming_choice() {
        let mut tracker = ReadinessTracker::new(false, ReadyViewPolicy::KeepSelection);
        tracker.select(ViewMode::Source);
        let transition = tracker.observe(true).unwrap();
        assert_eq!(transition.mode, ViewMode::Source);
        assert_eq!(tracker.active_mode(true), ViewMode::Source);
    }

    #[test]
    fn keep_selection_without_choice_still_previews() {
        let mut tracker = ReadinessTracker::new(false, ReadyViewPolicy::KeepSelection);
        tracker.observe(true);
        assert_eq!(tracker.active_mode(true), ViewMode::View);
    }

    #[test]
    fn ready_never_reverts() {
        let mut tracker = ReadinessTracker::new(true, ReadyViewPolicy::Preview);
        assert!(tracker.observe(false).is_none());
        assert!(tracker.is_ready());
    }

    proptest! {
        #[test]
        fn prop_at_most_one_transition(flags in proptest::collection::vec(any::<bool>(), 0..32)) {
            let mut tracker = ReadinessTracker::new(false, ReadyViewPolicy::Preview);
            let count = flags.iter().filter_map(|&ready| tracker.observe(ready)).count();
            let expected = usize::from(flags.contains(&true));
            prop_assert_eq!(count, expected);
        }
    }
}
