//! Artifact revisions
//!
//! One [`ArtifactRevision`] is one version of a named artifact. Revisions
//! sharing a name form that artifact's version set; the [`RevisionIndex`]
//! orders them and doubles as the renderer's remount key.

use crate::hash::ContentHash;
use crate::kind::ArtifactKind;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Conversation-wide ordinal of a revision
///
/// Unique within a collection and strictly increasing in emission order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RevisionIndex(u64);

impl RevisionIndex {
    /// Wrap a raw ordinal
    #[inline]
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw ordinal
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// The ordinal that follows this one, `None` once `u64` is exhausted
    #[inline]
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }
}

impl Display for RevisionIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RevisionIndex {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Streaming lifecycle of a single revision
///
/// `Streaming -> Ready` is the only transition; `Ready` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Readiness {
    /// Content is still arriving
    Streaming,
    /// The model finished emitting this revision
    Ready,
}

/// One version of a named artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRevision {
    name: String,
    index: RevisionIndex,
    #[serde(rename = "type")]
    kind: ArtifactKind,
    text: String,
    ready: bool,
}

impl ArtifactRevision {
    /// Create a revision with explicit content and readiness
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        index: RevisionIndex,
        kind: ArtifactKind,
        text: impl Into<String>,
        ready: bool,
    ) -> Self {
        Self {
            name: name.into(),
            index,
            kind,
            text: text.into(),
            ready,
        }
    }

    /// Create an empty revision that is still streaming
    #[must_use]
    pub fn streaming(name: impl Into<String>, index: RevisionIndex, kind: ArtifactKind) -> Self {
        Self::new(name, index, kind, String::new(), false)
    }

    /// Artifact name shared by every version
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Conversation-wide ordinal
    #[inline]
    #[must_use]
    pub fn index(&self) -> RevisionIndex {
        self.index
    }

    /// Content kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &ArtifactKind {
        &self.kind
    }

    /// Raw source streamed so far
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether streaming has finished
    #[inline]
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Lifecycle state
    #[inline]
    #[must_use]
    pub fn readiness(&self) -> Readiness {
        if self.ready {
            Readiness::Ready
        } else {
            Readiness::Streaming
        }
    }

    /// Whether `other` belongs to the same version set
    #[inline]
    #[must_use]
    pub fn same_artifact(&self, other: &Self) -> bool {
        self.name == other.name
    }

    /// Digest of the current text
    ///
    /// # Performance
    /// O(n) in the text length
    #[must_use]
    pub fn digest(&self) -> ContentHash {
        ContentHash::of_text(&self.text)
    }

    pub(crate) fn push_text(&mut self, chunk: &str) {
        self.text.push_str(chunk);
    }

    pub(crate) fn replace_text(&mut self, text: String) {
        self.text = text;
    }

    /// Returns `true` if this call performed the transition
    pub(crate) fn set_ready(&mut self) -> bool {
        let changed = !self.ready;
        self.ready = true;
        changed
    }
}
