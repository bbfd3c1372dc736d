//! Artifact Stream
//!
//! Turns a streamed assistant reply into artifact revisions.
//!
//! The model is instructed to emit artifacts as
//! `<x-artifact type="react" name="...">...</x-artifact>` and to reuse the
//! name when it revises one. [`ArtifactStreamParser`] finds those blocks in
//! arbitrarily split chunks; [`ArtifactFeed`] applies them to an
//! [`artifact_model::ArtifactCollection`], which is what the viewer observes.
//!
//! # Example
//!
//! ```rust
//! use artifact_stream::ArtifactFeed;
//!
//! let mut feed = ArtifactFeed::new();
//! feed.push("Here it is: <x-artifact type=\"html\" name=\"Page\"><p>")?;
//! feed.push("hi</p></x-artifact>")?;
//! feed.finish()?;
//!
//! let page = feed.collection().latest().unwrap();
//! assert!(page.is_ready());
//! assert_eq!(page.text(), "<p>hi</p>");
//! # Ok::<(), artifact_stream::StreamError>(())
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod feed;
mod parser;
mod tag;

pub use feed::{ArtifactFeed, FeedUpdate, StreamError};
pub use parser::{ArtifactStreamParser, StreamEvent};
pub use tag::OpeningTag;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
