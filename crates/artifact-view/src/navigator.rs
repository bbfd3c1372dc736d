//! Version navigation
//!
//! The navigation domain of a revision is every revision with the same name,
//! ascending by index. Navigation never fails: moving past either end, or
//! navigating with nothing selected, is a no-op.

use artifact_model::{ArtifactCollection, RevisionIndex};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Currently displayed revision, or none
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection(Option<RevisionIndex>);

impl Selection {
    /// Nothing selected
    #[inline]
    #[must_use]
    pub const fn none() -> Self {
        Self(None)
    }

    /// Select a revision
    #[inline]
    #[must_use]
    pub const fn of(index: RevisionIndex) -> Self {
        Self(Some(index))
    }

    /// Interpret a host-supplied raw index; negative means none selected
    #[must_use]
    pub fn from_raw(raw: i64) -> Self {
        u64::try_from(raw).map_or(Self::none(), |value| Self::of(RevisionIndex::new(value)))
    }

    /// Selected index, if any
    #[inline]
    #[must_use]
    pub const fn index(self) -> Option<RevisionIndex> {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0.is_none()
    }
}

impl From<RevisionIndex> for Selection {
    fn from(index: RevisionIndex) -> Self {
        Self::of(index)
    }
}

/// Navigation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Towards older revisions
    Back,
    /// Towards newer revisions
    Forward,
}

/// 1-based position within a version set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionPosition {
    /// 1-based position of the displayed revision
    pub position: usize,
    /// Size of the version set
    pub total: usize,
}

impl Display for VersionPosition {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Version {} of {}", self.position, self.total)
    }
}

/// Everything the navigation controls need
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    /// Current position
    pub position: VersionPosition,
    /// Back button enabled
    pub can_go_back: bool,
    /// Forward button enabled
    pub can_go_forward: bool,
    /// Indices of the whole version set, ascending
    pub versions: Vec<RevisionIndex>,
}

impl NavigationState {
    /// Label shown between the buttons, e.g. "Version 2 of 5"
    #[must_use]
    pub fn label(&self) -> String {
        self.position.to_string()
    }
}

/// Version set containing `current`, ascending by index
///
/// Empty if `current` is not in the collection.
#[must_use]
pub fn version_domain(collection: &ArtifactCollection, current: RevisionIndex) -> Vec<RevisionIndex> {
    let Some(revision) = collection.get(current) else {
        return Vec::new();
    };
    let mut versions = collection.versions_of(revision.name());
    versions.sort_unstable();
    versions
}

/// Target of a navigation step, or `None` for a no-op
///
/// No-ops: nothing selected, selection unknown to the collection, or the
/// selection already at the boundary in `direction`.
#[must_use]
pub fn navigate(
    collection: &ArtifactCollection,
    selection: Selection,
    direction: Direction,
) -> Option<RevisionIndex> {
    let current = selection.index()?;
    let versions = version_domain(collection, current);
    let pos = versions.iter().position(|&i| i == current)?;

    let target = match direction {
        Direction::Back => pos.checked_sub(1)?,
        Direction::Forward => pos + 1,
    };
    versions.get(target).copied()
}

/// Position of the selection within its version set
#[must_use]
pub fn position(collection: &ArtifactCollection, selection: Selection) -> Option<VersionPosition> {
    navigation_state(collection, selection).map(|state| state.position)
}

/// Full navigation state for the selection, `None` if nothing is open
#[must_use]
pub fn navigation_state(
    collection: &ArtifactCollection,
    selection: Selection,
) -> Option<NavigationState> {
    let current = selection.index()?;
    let versions = version_domain(collection, current);
    let pos = versions.iter().position(|&i| i == current)?;

    Some(NavigationState {
        position: VersionPosition {
            position: pos + 1,
            total: versions.len(),
        },
        can_go_back: pos > 0,
        can_go_forward: pos + 1 < versions.len(),
        versions,
    })
}

/// What a collection update did to the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    /// Selection kept as is
    Unchanged,
    /// Nothing was open and the newest revision was opened
    AutoSelected(RevisionIndex),
    /// The selected revision is gone (a different conversation was loaded)
    Cleared,
}

/// Owns the selection across collection updates
#[derive(Debug, Clone)]
pub struct SelectionTracker {
    selection: Selection,
    seen_len: usize,
    auto_select_newest: bool,
}

impl SelectionTracker {
    /// Start with nothing selected, treating the first `seen_len` revisions as known
    #[must_use]
    pub fn new(seen_len: usize, auto_select_newest: bool) -> Self {
        Self {
            selection: Selection::none(),
            seen_len,
            auto_select_newest,
        }
    }

    #[inline]
    #[must_use]
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Replace the selection
    pub fn select(&mut self, selection: Selection) {
        self.selection = selection;
    }

    /// React to a new collection snapshot
    ///
    /// New revisions never steal focus from an open artifact; they only open
    /// the newest one when nothing is selected.
    pub fn on_collection(&mut self, collection: &ArtifactCollection) -> SelectionChange {
        let grew = collection.len() > self.seen_len;
        self.seen_len = collection.len();

        match self.selection.index() {
            Some(index) if collection.get(index).is_none() => {
                tracing::warn!(%index, "selected revision no longer in collection");
                self.selection = Selection::none();
                SelectionChange::Cleared
            }
            Some(_) => SelectionChange::Unchanged,
            None if grew && self.auto_select_newest => match collection.latest() {
                Some(latest) => {
                    self.selection = Selection::of(latest.index());
                    SelectionChange::AutoSelected(latest.index())
                }
                None => SelectionChange::Unchanged,
            },
            None => SelectionChange::Unchanged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artifact_model::{ArtifactKind, ArtifactRevision};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn collection(names: &[&str]) -> ArtifactCollection {
        let revisions: Vec<_> = names
            .iter()
            .zip(0u64..)
            .map(|(name, i)| ArtifactRevision::new(*name, i.into(), ArtifactKind::Html, "", true))
            .collect();
        revisions.try_into().unwrap()
    }

    #[test]
    fn from_raw_maps_negative_to_none() {
        assert!(Selection::from_raw(-1).is_none());
        assert_eq!(Selection::from_raw(3).index(), Some(RevisionIndex::new(3)));
    }

    #[test]
    fn domain_is_same_name_only() {
        let c = collection(&["A", "B", "A", "B", "A"]);
        assert_eq!(
            version_domain(&c, 2.into()),
            vec![0.into(), 2.into(), 4.into()]
        );
        assert!(version_domain(&c, 9.into()).is_empty());
    }

    #[test]
    fn back_and_forward_skip_other_artifacts() {
        let c = collection(&["A", "B", "A"]);
        assert_eq!(
            navigate(&c, Selection::of(2.into()), Direction::Back),
            Some(0.into())
        );
        assert_eq!(
            navigate(&c, Selection::of(0.into()), Direction::Forward),
            Some(2.into())
        );
    }

    #[test]
    fn boundaries_are_no_ops() {
        let c = collection(&["A", "A"]);
        assert_eq!(navigate(&c, Selection::of(0.into()), Direction::Back), None);
        assert_eq!(navigate(&c, Selection::of(1.into()), Direction::Forward), None);
    }

    #[test]
    fn nothing_selected_is_a_no_op() {
        let c = collection(&["A", "A"]);
        assert_eq!(navigate(&c, Selection::none(), Direction::Back), None);
        assert_eq!(navigation_state(&c, Selection::none()), None);
    }

    #[test]
    fn navigation_state_labels() {
        let c = collection(&["A", "A"]);
        let state = navigation_state(&c, Selection::of(1.into())).unwrap();
        assert_eq!(state.label(), "Version 2 of 2");
        assert!(state.can_go_back);
        assert!(!state.can_go_forward);
    }

    #[test]
    fn auto_selects_newest_when_nothing_open() {
        let mut tracker = SelectionTracker::new(0, true);
        let c = collection(&["A", "B"]);
        assert_eq!(tracker.on_collection(&c), SelectionChange::AutoSelected(1.into()));
        assert_eq!(tracker.selection(), Selection::of(1.into()));
    }

    #[test]
    fn new_revisions_do_not_steal_focus() {
        let mut tracker = SelectionTracker::new(0, true);
        tracker.select(Selection::of(0.into()));
        let c = collection(&["A", "A", "A"]);
        assert_eq!(tracker.on_collection(&c), SelectionChange::Unchanged);
        assert_eq!(tracker.selection(), Selection::of(0.into()));
        assert_eq!(position(&c, tracker.selection()).unwrap().total, 3);
    }

    #[test]
    fn closed_panel_stays_closed_without_growth() {
        let c = collection(&["A"]);
        let mut tracker = SelectionTracker::new(c.len(), true);
        assert_eq!(tracker.on_collection(&c), SelectionChange::Unchanged);
        assert!(tracker.selection().is_none());
    }

    #[test]
    fn auto_select_can_be_disabled() {
        let mut tracker = SelectionTracker::new(0, false);
        assert_eq!(
            tracker.on_collection(&collection(&["A"])),
            SelectionChange::Unchanged
        );
    }

    #[test]
    fn stale_selection_is_cleared() {
        let mut tracker = SelectionTracker::new(0, true);
        tracker.select(Selection::of(7.into()));
        assert_eq!(
            tracker.on_collection(&collection(&["A"])),
            SelectionChange::Cleared
        );
    }

    proptest! {
        #[test]
        fn prop_back_from_last_reaches_first(n in 1usize..20) {
            let names = vec!["A"; n];
            let c = collection(&names);
            let mut selection = Selection::of(RevisionIndex::new(n as u64 - 1));
            for _ in 0..n - 1 {
                let target = navigate(&c, selection, Direction::Back);
                prop_assert!(target.is_some());
                selection = Selection::from(target.unwrap());
            }
            prop_assert_eq!(selection.index(), Some(RevisionIndex::new(0)));
            prop_assert_eq!(navigate(&c, selection, Direction::Back), None);
        }
    }
}
