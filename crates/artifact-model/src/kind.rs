//! Artifact content kinds
//!
//! [`ArtifactKind`] classifies a revision's text and decides which entry file
//! a renderer receives. Unknown tags are preserved as [`ArtifactKind::Other`]
//! so a newer producer never breaks an older viewer.

use std::convert::Infallible;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Entry document for HTML artifacts
pub const HTML_ENTRY: &str = "/index.html";
/// Application entry for React artifacts (TSX component syntax)
pub const REACT_ENTRY: &str = "/app.tsx";
/// Single-file component for Vue artifacts
pub const VUE_ENTRY: &str = "/app.vue";

/// Content kind of an artifact revision
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// Self-contained HTML page
    Html,
    /// React component with a default export
    React,
    /// Vue single-file component
    Vue,
    /// Anything else; never renderable, always shown as source
    Other(String),
}

impl ArtifactKind {
    /// Wire name used in `type="..."` attributes and serialized snapshots
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Html => "html",
            Self::React => "react",
            Self::Vue => "vue",
            Self::Other(tag) => tag,
        }
    }

    /// Renderer entry path for this kind, if it has a preview
    #[inline]
    #[must_use]
    pub fn entry_path(&self) -> Option<&'static str> {
        match self {
            Self::Html => Some(HTML_ENTRY),
            Self::React => Some(REACT_ENTRY),
            Self::Vue => Some(VUE_ENTRY),
            Self::Other(_) => None,
        }
    }

    /// Whether a sandbox preview exists for this kind
    #[inline]
    #[must_use]
    pub fn is_renderable(&self) -> bool {
        self.entry_path().is_some()
    }
}

impl From<&str> for ArtifactKind {
    fn from(tag: &str) -> Self {
        let trimmed = tag.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "html" => Self::Html,
            "react" => Self::React,
            "vue" => Self::Vue,
            _ => Self::Other(trimmed.to_string()),
        }
    }
}

impl FromStr for ArtifactKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl Display for ArtifactKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl serde::Serialize for ArtifactKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for ArtifactKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from(raw.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_tags_case_insensitively() {
        assert_eq!(ArtifactKind::from("HTML"), ArtifactKind::Html);
        assert_eq!(ArtifactKind::from(" react "), ArtifactKind::React);
        assert_eq!("Vue".parse::<ArtifactKind>().unwrap(), ArtifactKind::Vue);
    }

    #[test]
    fn unknown_tag_is_preserved() {
        let kind = ArtifactKind::from("svelte");
        assert_eq!(kind, ArtifactKind::Other("svelte".to_string()));
        assert_eq!(kind.to_string(), "svelte");
        assert!(!kind.is_renderable());
        assert_eq!(kind.entry_path(), None);
    }

    #[test]
    fn entry_paths() {
        assert_eq!(ArtifactKind::Html.entry_path(), Some("/index.html"));
        assert_eq!(ArtifactKind::React.entry_path(), Some("/app.tsx"));
        assert_eq!(ArtifactKind::Vue.entry_path(), Some("/app.vue"));
    }

    #[test]
    fn serde_round_trips_through_wire_name() {
        let json = serde_json::to_string(&ArtifactKind::React).unwrap();
        assert_eq!(json, "\"react\"");
        let kind: ArtifactKind = serde_json::from_str("\"mermaid\"").unwrap();
        assert_eq!(kind, ArtifactKind::Other("mermaid".to_string()));
    }
}
