//! Append-only revision collection
//!
//! [`ArtifactCollection`] holds every revision emitted in a conversation in
//! emission order. It is backed by a persistent vector, so `clone()` is O(1)
//! and yields an immutable snapshot that observers can hold while the host
//! feed keeps appending.
//!
//! # Invariants
//! - indices are unique and strictly increasing
//! - revisions are never removed
//! - `ready` only ever goes from `false` to `true`
//! - text is frozen once a revision is ready

use crate::error::ArtifactError;
use crate::kind::ArtifactKind;
use crate::revision::{ArtifactRevision, RevisionIndex};
use im::Vector;
use serde::{Deserialize, Serialize};

/// Chronological, append-only collection of artifact revisions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ArtifactRevision>", into = "Vec<ArtifactRevision>")]
pub struct ArtifactCollection {
    revisions: Vector<ArtifactRevision>,
}

impl ArtifactCollection {
    /// Create empty collection
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of revisions
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.revisions.len()
    }

    /// Whether no revision has been emitted yet
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.revisions.is_empty()
    }

    /// Iterate revisions in emission order
    pub fn iter(&self) -> impl Iterator<Item = &ArtifactRevision> {
        self.revisions.iter()
    }

    /// Most recently emitted revision
    #[inline]
    #[must_use]
    pub fn latest(&self) -> Option<&ArtifactRevision> {
        self.revisions.back()
    }

    /// Index the next [`begin`](Self::begin) call will allocate
    ///
    /// # Errors
    /// Returns [`ArtifactError::IndexExhausted`] if the last revision holds
    /// `u64::MAX`
    pub fn next_index(&self) -> Result<RevisionIndex, ArtifactError> {
        match self.latest() {
            None => Ok(RevisionIndex::default()),
            Some(last) => last
                .index()
                .next()
                .ok_or(ArtifactError::IndexExhausted { last: last.index() }),
        }
    }

    /// Position of a revision in emission order
    ///
    /// # Performance
    /// O(log n) binary search over the ordered indices
    #[must_use]
    pub fn position_of(&self, index: RevisionIndex) -> Option<usize> {
        self.revisions
            .binary_search_by(|rev| rev.index().cmp(&index))
            .ok()
    }

    /// Revision with the given index
    #[must_use]
    pub fn get(&self, index: RevisionIndex) -> Option<&ArtifactRevision> {
        self.position_of(index).and_then(|pos| self.revisions.get(pos))
    }

    /// Indices of every revision named `name`, ascending
    #[must_use]
    pub fn versions_of(&self, name: &str) -> Vec<RevisionIndex> {
        self.revisions
            .iter()
            .filter(|rev| rev.name() == name)
            .map(ArtifactRevision::index)
            .collect()
    }

    /// Start a new streaming revision and return its index
    ///
    /// # Errors
    /// - [`ArtifactError::EmptyName`] if `name` is blank
    /// - [`ArtifactError::IndexExhausted`] if no index is left
    pub fn begin(
        &mut self,
        name: impl Into<String>,
        kind: ArtifactKind,
    ) -> Result<RevisionIndex, ArtifactError> {
        let index = self.next_index()?;
        self.push(ArtifactRevision::streaming(name, index, kind))?;
        Ok(index)
    }

    /// Append a fully formed revision
    ///
    /// # Errors
    /// - [`ArtifactError::EmptyName`] if the name is blank
    /// - [`ArtifactError::IndexNotIncreasing`] if the index does not follow
    ///   the last revision's index
    pub fn push(&mut self, revision: ArtifactRevision) -> Result<(), ArtifactError> {
        if revision.name().trim().is_empty() {
            return Err(ArtifactError::EmptyName);
        }
        if let Some(last) = self.latest() {
            if revision.index() <= last.index() {
                return Err(ArtifactError::IndexNotIncreasing {
                    index: revision.index(),
                    last: last.index(),
                });
            }
        }

        tracing::debug!(
            name = revision.name(),
            index = %revision.index(),
            kind = %revision.kind(),
            ready = revision.is_ready(),
            "revision appended"
        );
        self.revisions.push_back(revision);
        Ok(())
    }

    /// Append streamed text to a revision
    ///
    /// # Errors
    /// - [`ArtifactError::UnknownRevision`] if no revision has this index
    /// - [`ArtifactError::ReadyRevisionImmutable`] if it is already ready
    pub fn append_text(&mut self, index: RevisionIndex, chunk: &str) -> Result<(), ArtifactError> {
        let revision = self.streaming_mut(index)?;
        revision.push_text(chunk);
        Ok(())
    }

    /// Replace a streaming revision's text wholesale
    ///
    /// # Errors
    /// Same as [`append_text`](Self::append_text)
    pub fn set_text(
        &mut self,
        index: RevisionIndex,
        text: impl Into<String>,
    ) -> Result<(), ArtifactError> {
        let revision = self.streaming_mut(index)?;
        revision.replace_text(text.into());
        Ok(())
    }

    /// Mark a revision as finished streaming
    ///
    /// Idempotent; returns `true` only for the call that flipped the flag.
    ///
    /// # Errors
    /// Returns [`ArtifactError::UnknownRevision`] if no revision has this index
    pub fn mark_ready(&mut self, index: RevisionIndex) -> Result<bool, ArtifactError> {
        let pos = self
            .position_of(index)
            .ok_or(ArtifactError::UnknownRevision(index))?;
        let revision = self
            .revisions
            .get_mut(pos)
            .ok_or(ArtifactError::UnknownRevision(index))?;
        let flipped = revision.set_ready();
        if flipped {
            tracing::debug!(name = revision.name(), %index, "revision ready");
        }
        Ok(flipped)
    }

    fn streaming_mut(
        &mut self,
        index: RevisionIndex,
    ) -> Result<&mut ArtifactRevision, ArtifactError> {
        let pos = self
            .position_of(index)
            .ok_or(ArtifactError::UnknownRevision(index))?;
        let revision = self
            .revisions
            .get_mut(pos)
            .ok_or(ArtifactError::UnknownRevision(index))?;
        if revision.is_ready() {
            return Err(ArtifactError::ReadyRevisionImmutable(index));
        }
        Ok(revision)
    }
}

impl TryFrom<Vec<ArtifactRevision>> for ArtifactCollection {
    type Error = ArtifactError;

    fn try_from(revisions: Vec<ArtifactRevision>) -> Result<Self, Self::Error> {
        let mut collection = Self::new();
        for revision in revisions {
            collection.push(revision)?;
        }
        Ok(collection)
    }
}

impl From<ArtifactCollection> for Vec<ArtifactRevision> {
    fn from(collection: ArtifactCollection) -> Self {
        collection.revisions.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn html(name: &str, index: u64, text: &str) -> ArtifactRevision {
        ArtifactRevision::new(name, index.into(), ArtifactKind::Html, text, true)
    }

    #[test]
    fn begin_allocates_sequential_indices() {
        let mut collection = ArtifactCollection::new();
        let a = collection.begin("A", ArtifactKind::Html).unwrap();
        let b = collection.begin("B", ArtifactKind::React).unwrap();
        assert_eq!(a, RevisionIndex::new(0));
        assert_eq!(b, RevisionIndex::new(1));
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn push_rejects_non_increasing_index() {
        let mut collection = ArtifactCollection::new();
        collection.push(html("A", 5, "")).unwrap();
        let err = collection.push(html("A", 5, "")).unwrap_err();
        assert_eq!(
            err,
            ArtifactError::IndexNotIncreasing {
                index: RevisionIndex::new(5),
                last: RevisionIndex::new(5),
            }
        );
    }

    #[test]
    fn push_rejects_blank_name() {
        let mut collection = ArtifactCollection::new();
        assert_eq!(
            collection.push(html("  ", 0, "")),
            Err(ArtifactError::EmptyName)
        );
    }

    #[test]
    fn text_is_frozen_after_ready() {
        let mut collection = ArtifactCollection::new();
        let index = collection.begin("A", ArtifactKind::Html).unwrap();
        collection.append_text(index, "<htm").unwrap();
        collection.append_text(index, "l>").unwrap();
        assert!(collection.mark_ready(index).unwrap());
        assert!(!collection.mark_ready(index).unwrap());
        assert_eq!(
            collection.append_text(index, "more"),
            Err(ArtifactError::ReadyRevisionImmutable(index))
        );
        assert_eq!(collection.get(index).unwrap().text(), "<html>");
    }

    #[test]
    fn versions_of_filters_by_name() {
        let collection: ArtifactCollection =
            vec![html("A", 0, ""), html("B", 1, ""), html("A", 3, "")]
                .try_into()
                .unwrap();
        assert_eq!(
            collection.versions_of("A"),
            vec![RevisionIndex::new(0), RevisionIndex::new(3)]
        );
        assert!(collection.versions_of("C").is_empty());
    }

    #[test]
    fn lookup_tolerates_gaps() {
        let collection: ArtifactCollection =
            vec![html("A", 2, "x"), html("A", 7, "y")].try_into().unwrap();
        assert_eq!(collection.position_of(7.into()), Some(1));
        assert!(collection.get(3.into()).is_none());
        assert_eq!(collection.next_index(), Ok(RevisionIndex::new(8)));
    }

    #[test]
    fn begin_after_largest_index_is_an_error() {
        let mut collection = ArtifactCollection::new();
        collection.push(html("A", u64::MAX, "last")).unwrap();
        let last = RevisionIndex::new(u64::MAX);

        assert_eq!(
            collection.next_index(),
            Err(ArtifactError::IndexExhausted { last })
        );
        assert_eq!(
            collection.begin("A", ArtifactKind::Html),
            Err(ArtifactError::IndexExhausted { last })
        );
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn clone_is_a_snapshot() {
        let mut collection = ArtifactCollection::new();
        let index = collection.begin("A", ArtifactKind::Html).unwrap();
        let snapshot = collection.clone();
        collection.append_text(index, "changed").unwrap();
        assert_eq!(snapshot.get(index).unwrap().text(), "");
        assert_eq!(collection.get(index).unwrap().text(), "changed");
    }

    #[test]
    fn deserialization_validates_order() {
        let json = r#"[
            {"name":"A","index":1,"type":"html","text":"","ready":true},
            {"name":"A","index":0,"type":"html","text":"","ready":true}
        ]"#;
        assert!(serde_json::from_str::<ArtifactCollection>(json).is_err());
    }
}
