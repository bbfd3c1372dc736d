//! Incremental artifact block parser
//!
//! Splits a streamed assistant reply into prose and artifact content.
//! Chunks may end anywhere, including in the middle of a tag; text that could
//! still become a tag is held back until the next [`feed`](ArtifactStreamParser::feed).

use crate::tag::{partial_suffix_len, tag_end, OpeningTag, CLOSE_TAG, OPEN_PREFIX};
use artifact_model::ArtifactKind;

/// Event produced while parsing a reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Text outside any artifact block
    Prose(String),
    /// An artifact block started
    Opened {
        /// Artifact name (empty if the tag had none)
        name: String,
        /// Declared content kind
        kind: ArtifactKind,
    },
    /// Artifact text inside the current block
    Content(String),
    /// The current block ended
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Prose,
    /// Inside a block; `fresh` until the first content byte was seen
    Block { fresh: bool },
}

/// Streaming parser for `<x-artifact>` blocks
#[derive(Debug, Clone)]
pub struct ArtifactStreamParser {
    pending: String,
    mode: Mode,
}

impl Default for ArtifactStreamParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ArtifactStreamParser {
    /// Create parser positioned outside any block
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: String::new(),
            mode: Mode::Prose,
        }
    }

    /// Whether the parser is inside an artifact block
    #[inline]
    #[must_use]
    pub fn in_block(&self) -> bool {
        matches!(self.mode, Mode::Block { .. })
    }

    /// Consume the next chunk of the reply
    pub fn feed(&mut self, chunk: &str) -> Vec<StreamEvent> {
        self.pending.push_str(chunk);
        let mut events = Vec::new();

        loop {
            let progressed = match self.mode {
                Mode::Prose => self.scan_prose(&mut events),
                Mode::Block { fresh } => self.scan_block(fresh, &mut events),
            };
            if !progressed {
                break;
            }
        }

        events
    }

    /// Flush everything held back at the end of the reply
    ///
    /// An unterminated block is closed.
    pub fn finish(&mut self) -> Vec<StreamEvent> {
        let rest = std::mem::take(&mut self.pending);
        let mut events = Vec::new();

        match self.mode {
            Mode::Prose => {
                if !rest.is_empty() {
                    events.push(StreamEvent::Prose(rest));
                }
            }
            Mode::Block { fresh } => {
                let rest = if fresh { strip_leading_newline(&rest) } else { &rest };
                if !rest.is_empty() {
                    events.push(StreamEvent::Content(rest.to_string()));
                }
                tracing::warn!("reply ended inside an artifact block");
                events.push(StreamEvent::Closed);
            }
        }

        self.mode = Mode::Prose;
        events
    }

    /// Returns `true` if it consumed input and should run again
    fn scan_prose(&mut self, events: &mut Vec<StreamEvent>) -> bool {
        let Some(start) = self.pending.find(OPEN_PREFIX) else {
            let hold = partial_suffix_len(&self.pending, OPEN_PREFIX);
            self.emit_prose(self.pending.len() - hold, events);
            return false;
        };

        let after = start + OPEN_PREFIX.len();
        let next = self.pending[after..].chars().next();
        match next {
            // Need one more byte to tell `<x-artifact ` from `<x-artifactual`
            None => {
                self.emit_prose(start, events);
                return false;
            }
            Some(c) if c != '>' && !c.is_whitespace() => {
                self.emit_prose(after, events);
                return true;
            }
            Some(_) => {}
        }

        let Some(close) = tag_end(&self.pending[after..]) else {
            self.emit_prose(start, events);
            return false;
        };

        self.emit_prose(start, events);
        let attributes_end = OPEN_PREFIX.len() + close;
        let tag = OpeningTag::parse(&self.pending[OPEN_PREFIX.len()..attributes_end]);
        self.pending.drain(..=attributes_end);

        tracing::debug!(name = %tag.name, kind = %tag.kind, "artifact block opened");
        events.push(StreamEvent::Opened {
            name: tag.name,
            kind: tag.kind,
        });
        self.mode = Mode::Block { fresh: true };
        true
    }

    fn scan_block(&mut self, fresh: bool, events: &mut Vec<StreamEvent>) -> bool {
        if fresh {
            // A lone '\r' may still be the start of "\r\n"
            if self.pending.is_empty() || self.pending == "\r" {
                return false;
            }
            let skip = self.pending.len() - strip_leading_newline(&self.pending).len();
            self.pending.drain(..skip);
            self.mode = Mode::Block { fresh: false };
        }

        if let Some(end) = self.pending.find(CLOSE_TAG) {
            self.emit_content(end, events);
            self.pending.drain(..CLOSE_TAG.len());
            tracing::debug!("artifact block closed");
            events.push(StreamEvent::Closed);
            self.mode = Mode::Prose;
            return true;
        }

        let hold = partial_suffix_len(&self.pending, CLOSE_TAG);
        self.emit_content(self.pending.len() - hold, events);
        false
    }

    fn emit_prose(&mut self, upto: usize, events: &mut Vec<StreamEvent>) {
        if upto > 0 {
            let text: String = self.pending.drain(..upto).collect();
            events.push(StreamEvent::Prose(text));
        }
    }

    fn emit_content(&mut self, upto: usize, events: &mut Vec<StreamEvent>) {
        if upto > 0 {
            let text: String = self.pending.drain(..upto).collect();
            events.push(StreamEvent::Content(text));
        }
    }
}

fn strip_leading_newline(text: &str) -> &str {
    text.strip_prefix("\r\n")
        .or_else(|| text.strip_prefix('\n'))
        .unwrap_or(text)
}
