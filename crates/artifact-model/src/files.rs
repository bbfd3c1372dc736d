//! File-set generation
//!
//! Maps a revision to the virtual file map a sandbox renderer consumes.
//! Pure: the same revision always yields the same map.

use crate::revision::ArtifactRevision;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Virtual file map handed to the renderer (`path -> content`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileMap(BTreeMap<String, String>);

impl FileMap {
    /// Empty map: nothing to render
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Map with a single entry
    #[must_use]
    pub fn single(path: impl Into<String>, content: impl Into<String>) -> Self {
        let mut files = BTreeMap::new();
        files.insert(path.into(), content.into());
        Self(files)
    }

    /// Content stored at `path`
    #[inline]
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&str> {
        self.0.get(path).map(String::as_str)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate `(path, content)` pairs in path order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(p, c)| (p.as_str(), c.as_str()))
    }
}

/// Build the renderer file map for a revision
///
/// - Streaming revisions yield an empty map.
/// - Renderable kinds yield one entry at the kind's entry path holding the
///   text verbatim.
/// - Other kinds yield an empty map.
#[must_use]
pub fn generate_files(revision: &ArtifactRevision) -> FileMap {
    if !revision.is_ready() {
        return FileMap::new();
    }

    match revision.kind().entry_path() {
        Some(path) => FileMap::single(path, revision.text()),
        None => {
            tracing::debug!(
                kind = %revision.kind(),
                index = %revision.index(),
                "no preview for artifact kind"
            );
            FileMap::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::ArtifactKind;
    use crate::revision::RevisionIndex;
    use proptest::prelude::*;

    fn revision(kind: ArtifactKind, text: &str, ready: bool) -> ArtifactRevision {
        ArtifactRevision::new("a", RevisionIndex::new(0), kind, text, ready)
    }

    #[test]
    fn html_maps_to_index_document() {
        let files = generate_files(&revision(ArtifactKind::Html, "<p>1</p>", true));
        assert_eq!(files.len(), 1);
        assert_eq!(files.get("/index.html"), Some("<p>1</p>"));
    }

    #[test]
    fn react_maps_to_tsx_entry() {
        let files = generate_files(&revision(ArtifactKind::React, "export default () => null", true));
        assert_eq!(files.get("/app.tsx"), Some("export default () => null"));
    }

    #[test]
    fn vue_maps_to_single_file_component() {
        let files = generate_files(&revision(ArtifactKind::Vue, "<template/>", true));
        assert_eq!(files.get("/app.vue"), Some("<template/>"));
    }

    #[test]
    fn unknown_kind_is_empty() {
        let files = generate_files(&revision(ArtifactKind::Other("svg".into()), "<svg/>", true));
        assert!(files.is_empty());
    }

    #[test]
    fn file_map_serializes_as_object() {
        let files = FileMap::single("/index.html", "x");
        assert_eq!(serde_json::to_string(&files).unwrap(), r#"{"/index.html":"x"}"#);
    }

    fn any_kind() -> impl Strategy<Value = ArtifactKind> {
        prop_oneof![
            Just(ArtifactKind::Html),
            Just(ArtifactKind::React),
            Just(ArtifactKind::Vue),
            "[a-z]{1,8}".prop_map(|tag| ArtifactKind::from(tag.as_str())),
        ]
    }

    proptest! {
        #[test]
        fn prop_streaming_revisions_have_no_files(kind in any_kind(), text in ".*") {
            prop_assert!(generate_files(&revision(kind, &text, false)).is_empty());
        }

        #[test]
        fn prop_ready_html_is_verbatim(text in ".*") {
            let files = generate_files(&revision(ArtifactKind::Html, &text, true));
            prop_assert_eq!(files.len(), 1);
            prop_assert_eq!(files.get("/index.html"), Some(text.as_str()));
        }
    }
}
