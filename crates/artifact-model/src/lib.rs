//! Artifact Model
//!
//! Versioned, streaming-aware artifacts produced by a chat model.
//!
//! # Core Concepts
//!
//! - [`ArtifactRevision`]: one version of a named artifact (HTML, React, Vue, …)
//! - [`ArtifactKind`]: content kind, decides the renderer entry file
//! - [`ArtifactCollection`]: append-only history of every revision in a conversation
//! - [`generate_files`]: revision → renderer [`FileMap`]
//! - [`ContentHash`]: Blake3 digest of a revision's text
//!
//! # Example
//!
//! ```rust
//! use artifact_model::{generate_files, ArtifactCollection, ArtifactKind};
//!
//! let mut collection = ArtifactCollection::new();
//! let index = collection.begin("landing page", ArtifactKind::Html)?;
//! collection.append_text(index, "<html></html>")?;
//! collection.mark_ready(index)?;
//!
//! let files = generate_files(collection.get(index).unwrap());
//! assert_eq!(files.get("/index.html"), Some("<html></html>"));
//! # Ok::<(), artifact_model::ArtifactError>(())
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod collection;
mod error;
mod files;
mod hash;
mod kind;
mod revision;

// Re-exports
pub use collection::ArtifactCollection;
pub use error::ArtifactError;
pub use files::{generate_files, FileMap};
pub use hash::ContentHash;
pub use kind::{ArtifactKind, HTML_ENTRY, REACT_ENTRY, VUE_ENTRY};
pub use revision::{ArtifactRevision, Readiness, RevisionIndex};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
