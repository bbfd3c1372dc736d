//! Error types for the artifact model
//!
//! Raised when a host feed update would break a collection invariant:
//! ordinal ordering, readiness monotonicity or post-ready immutability.

use crate::revision::RevisionIndex;

/// Errors raised by [`crate::ArtifactCollection`] mutations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArtifactError {
    /// Appended revision does not follow the last index
    #[error("revision index {index} does not follow last index {last}")]
    IndexNotIncreasing {
        /// Rejected index
        index: RevisionIndex,
        /// Index of the current last revision
        last: RevisionIndex,
    },

    /// The last revision already holds the largest possible index
    #[error("no revision index left after {last}")]
    IndexExhausted {
        /// Index of the current last revision
        last: RevisionIndex,
    },

    /// No revision carries this index
    #[error("unknown revision: {0}")]
    UnknownRevision(RevisionIndex),

    /// Text edits are refused once a revision is ready
    #[error("revision {0} is ready and can no longer be edited")]
    ReadyRevisionImmutable(RevisionIndex),

    /// Revisions need a non-empty name to form a version set
    #[error("artifact name must not be empty")]
    EmptyName,
}

impl ArtifactError {
    /// Index of the revision the error refers to, if any
    #[must_use]
    pub fn revision(&self) -> Option<RevisionIndex> {
        match self {
            Self::IndexNotIncreasing { index, .. }
            | Self::IndexExhausted { last: index }
            | Self::UnknownRevision(index)
            | Self::ReadyRevisionImmutable(index) => Some(*index),
            Self::EmptyName => None,
        }
    }
}
