//! `<x-artifact>` tag grammar
//!
//! The model wraps every artifact as
//! `<x-artifact type="react" name="Todo list">…</x-artifact>`, reusing the
//! same `name` when it updates an earlier artifact.

use artifact_model::ArtifactKind;
use once_cell::sync::Lazy;
use regex::Regex;

/// Literal start of an opening tag
pub(crate) const OPEN_PREFIX: &str = "<x-artifact";
/// Literal closing tag
pub(crate) const CLOSE_TAG: &str = "</x-artifact>";

static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z_][\w-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .unwrap_or_else(|e| unreachable!("attribute pattern is valid: {e}"))
});

/// Attributes carried by an opening tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpeningTag {
    /// Artifact name, empty if the attribute was missing
    pub name: String,
    /// Content kind, `Other("")` if the attribute was missing
    pub kind: ArtifactKind,
}

impl OpeningTag {
    /// Parse the attribute section of an opening tag
    ///
    /// `attributes` is everything between `<x-artifact` and `>`.
    #[must_use]
    pub fn parse(attributes: &str) -> Self {
        let mut name = String::new();
        let mut kind = ArtifactKind::Other(String::new());

        for caps in ATTRIBUTE.captures_iter(attributes) {
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .map_or("", |m| m.as_str());
            match &caps[1] {
                "name" => name = value.trim().to_string(),
                "type" => kind = ArtifactKind::from(value),
                other => tracing::trace!(attribute = other, "ignoring artifact attribute"),
            }
        }

        Self { name, kind }
    }
}

/// Byte offset of the `>` ending an opening tag
///
/// `>` inside a quoted attribute value does not end the tag. `None` until
/// the terminating `>` has arrived.
pub(crate) fn tag_end(attributes: &str) -> Option<usize> {
    let mut quote = None;
    for (i, c) in attributes.char_indices() {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (None, '>') => return Some(i),
            (Some(open), _) if c == open => quote = None,
            _ => {}
        }
    }
    None
}

/// Length of the longest suffix of `text` that is a proper prefix of `tag`
///
/// That suffix may complete into `tag` once the next chunk arrives, so it
/// must be held back.
pub(crate) fn partial_suffix_len(text: &str, tag: &str) -> usize {
    let max = text.len().min(tag.len() - 1);
    (1..=max)
        .rev()
        .find(|&k| text.ends_with(&tag[..k]))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_name_and_type() {
        let tag = OpeningTag::parse(r#" type="react" name="Todo list""#);
        assert_eq!(tag.name, "Todo list");
        assert_eq!(tag.kind, ArtifactKind::React);
    }

    #[test]
    fn accepts_single_quotes_and_any_order() {
        let tag = OpeningTag::parse(" name='Landing' type='HTML'");
        assert_eq!(tag.name, "Landing");
        assert_eq!(tag.kind, ArtifactKind::Html);
    }

    #[test]
    fn missing_attributes_fall_back() {
        let tag = OpeningTag::parse("");
        assert_eq!(tag.name, "");
        assert_eq!(tag.kind, ArtifactKind::Other(String::new()));
    }

    #[test]
    fn tag_end_skips_quoted_angle_brackets() {
        assert_eq!(tag_end(r#" type="html" name="A > B">rest"#), Some(25));
        assert_eq!(tag_end(" name='x>y' type=\"vue\">"), Some(22));
        assert_eq!(tag_end(r#" name="A > B"#), None);
        assert_eq!(tag_end(">"), Some(0));
    }

    #[test]
    fn partial_suffix_detection() {
        assert_eq!(partial_suffix_len("hello <x-art", OPEN_PREFIX), 6);
        assert_eq!(partial_suffix_len("hello <", OPEN_PREFIX), 1);
        assert_eq!(partial_suffix_len("hello", OPEN_PREFIX), 0);
        assert_eq!(partial_suffix_len("}</x-artifact", CLOSE_TAG), 12);
        assert_eq!(partial_suffix_len("", CLOSE_TAG), 0);
    }
}
