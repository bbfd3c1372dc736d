//! Host data feed
//!
//! Drives an [`ArtifactCollection`] from a streamed reply: opening a block
//! begins a revision, content appends to it, closing marks it ready.

use crate::parser::{ArtifactStreamParser, StreamEvent};
use artifact_model::{ArtifactCollection, ArtifactError, RevisionIndex};

/// Errors raised while feeding a reply into a collection
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// The collection refused an update
    #[error("artifact update rejected: {0}")]
    Artifact(#[from] ArtifactError),

    /// `push` was called after `finish`
    #[error("reply already finished")]
    Finished,
}

/// What one chunk changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedUpdate {
    /// Prose to show in the chat transcript
    pub prose: String,
    /// Revisions started by this chunk
    pub opened: Vec<RevisionIndex>,
    /// Revisions whose text grew
    pub updated: Vec<RevisionIndex>,
    /// Revisions that became ready
    pub completed: Vec<RevisionIndex>,
    /// Blocks dropped because they had no name
    pub skipped: usize,
}

impl FeedUpdate {
    /// Whether the collection changed
    #[inline]
    #[must_use]
    pub fn touched_artifacts(&self) -> bool {
        !(self.opened.is_empty() && self.updated.is_empty() && self.completed.is_empty())
    }

    fn mark_updated(&mut self, index: RevisionIndex) {
        if !self.updated.contains(&index) {
            self.updated.push(index);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    None,
    Revision(RevisionIndex),
    Discard,
}

/// Feeds one streamed reply into an artifact collection
#[derive(Debug, Clone)]
pub struct ArtifactFeed {
    collection: ArtifactCollection,
    parser: ArtifactStreamParser,
    target: Target,
    finished: bool,
}

impl Default for ArtifactFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl ArtifactFeed {
    /// Feed into a fresh collection
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::resume(ArtifactCollection::new())
    }

    /// Continue a conversation: new revisions are appended after `collection`
    #[must_use]
    pub fn resume(collection: ArtifactCollection) -> Self {
        Self {
            collection,
            parser: ArtifactStreamParser::new(),
            target: Target::None,
            finished: false,
        }
    }

    /// Current collection
    #[inline]
    #[must_use]
    pub fn collection(&self) -> &ArtifactCollection {
        &self.collection
    }

    /// Immutable snapshot of the current collection (O(1))
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> ArtifactCollection {
        self.collection.clone()
    }

    /// Hand back the collection once the reply is done
    #[inline]
    #[must_use]
    pub fn into_collection(self) -> ArtifactCollection {
        self.collection
    }

    /// Apply the next chunk of the reply
    ///
    /// # Errors
    /// - [`StreamError::Finished`] after [`finish`](Self::finish)
    /// - [`StreamError::Artifact`] if the collection rejects an update
    pub fn push(&mut self, chunk: &str) -> Result<FeedUpdate, StreamError> {
        if self.finished {
            return Err(StreamError::Finished);
        }
        let events = self.parser.feed(chunk);
        self.apply(events)
    }

    /// End the reply, closing any unterminated block
    ///
    /// # Errors
    /// Same as [`push`](Self::push)
    pub fn finish(&mut self) -> Result<FeedUpdate, StreamError> {
        if self.finished {
            return Err(StreamError::Finished);
        }
        self.finished = true;
        let events = self.parser.finish();
        self.apply(events)
    }

    fn apply(&mut self, events: Vec<StreamEvent>) -> Result<FeedUpdate, StreamError> {
        let mut update = FeedUpdate::default();

        for event in events {
            match event {
                StreamEvent::Prose(text) => update.prose.push_str(&text),
                StreamEvent::Opened { name, kind } => {
                    if name.is_empty() {
                        tracing::warn!(%kind, "skipping artifact block without a name");
                        update.skipped += 1;
                        self.target = Target::Discard;
                        continue;
                    }
                    let index = self.collection.begin(name, kind)?;
                    update.opened.push(index);
                    self.target = Target::Revision(index);
                }
                StreamEvent::Content(text) => match self.target {
                    Target::Revision(index) => {
                        self.collection.append_text(index, &text)?;
                        update.mark_updated(index);
                    }
                    Target::Discard | Target::None => {}
                },
                StreamEvent::Closed => {
                    if let Target::Revision(index) = self.target {
                        if self.collection.mark_ready(index)? {
                            update.completed.push(index);
                        }
                    }
                    self.target = Target::None;
                }
            }
        }

        Ok(update)
    }
}
