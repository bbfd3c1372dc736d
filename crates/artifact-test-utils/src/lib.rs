//! Testing utilities for the artifact viewer workspace
//!
//! Shared fixtures, a recording host, and chunking helpers for stream tests.

#![allow(missing_docs)]

use artifact_model::{ArtifactCollection, ArtifactKind, ArtifactRevision, RevisionIndex};
use artifact_view::{Host, HostError, PageScroll};
use parking_lot::Mutex;

pub fn revision(name: &str, index: u64, kind: ArtifactKind, text: &str, ready: bool) -> ArtifactRevision {
    ArtifactRevision::new(name, RevisionIndex::new(index), kind, text, ready)
}

pub fn html_revision(name: &str, index: u64, text: &str, ready: bool) -> ArtifactRevision {
    revision(name, index, ArtifactKind::Html, text, ready)
}

/// Ready HTML revisions with consecutive indices, one per name
pub fn collection_of(names: &[&str]) -> ArtifactCollection {
    let revisions: Vec<_> = names
        .iter()
        .zip(0u64..)
        .map(|(name, index)| html_revision(name, index, &format!("<p>{name} {index}</p>"), true))
        .collect();
    revisions.try_into().unwrap()
}

pub fn collection_from(revisions: Vec<ArtifactRevision>) -> ArtifactCollection {
    revisions.try_into().unwrap()
}

/// Split `text` into chunks of at most `size` characters
pub fn chunk_text(text: &str, size: usize) -> Vec<String> {
    let size = size.max(1);
    let chars: Vec<char> = text.chars().collect();
    chars.chunks(size).map(|c| c.iter().collect()).collect()
}

/// Wrap `body` in an artifact block
pub fn artifact_block(kind: &str, name: &str, body: &str) -> String {
    format!("<x-artifact type=\"{kind}\" name=\"{name}\">\n{body}</x-artifact>")
}

/// Host call recorded by [`RecordingHost`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    PageScroll(PageScroll),
    Clipboard(String),
}

/// Host that records every call and can simulate a broken clipboard
#[derive(Debug, Default)]
pub struct RecordingHost {
    calls: Mutex<Vec<HostCall>>,
    clipboard_fails: bool,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_failing_clipboard() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            clipboard_fails: true,
        }
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().clone()
    }

    /// Page scroll state after the last call, `Auto` if never set
    pub fn page_scroll(&self) -> PageScroll {
        self.calls
            .lock()
            .iter()
            .rev()
            .find_map(|call| match call {
                HostCall::PageScroll(state) => Some(*state),
                HostCall::Clipboard(_) => None,
            })
            .unwrap_or_default()
    }

    pub fn copied(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                HostCall::Clipboard(text) => Some(text.clone()),
                HostCall::PageScroll(_) => None,
            })
            .collect()
    }
}

impl Host for RecordingHost {
    fn set_page_scroll(&self, scroll: PageScroll) {
        self.calls.lock().push(HostCall::PageScroll(scroll));
    }

    fn write_clipboard(&self, text: &str) -> Result<(), HostError> {
        if self.clipboard_fails {
            return Err(HostError::Clipboard("permission denied".to_string()));
        }
        self.calls.lock().push(HostCall::Clipboard(text.to_string()));
        Ok(())
    }
}
