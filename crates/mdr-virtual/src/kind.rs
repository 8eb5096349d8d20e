//! Enumerated content kinds.

use std::fmt;

/// Kind of precompiled content a virtual module wraps.
///
/// Each kind owns the query marker that opts an import into virtual resolution
/// and the file extensions the manifest generator collects for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContentKind {
    /// Markdown documents, compiled to HTML.
    Markdown,
}

impl ContentKind {
    /// Every known kind.
    pub const ALL: [Self; 1] = [Self::Markdown];

    /// Query key marking an import as this kind (`?markdown`).
    #[must_use]
    pub fn marker(self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
        }
    }

    /// Default file extensions for this kind, without the leading dot.
    #[must_use]
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Markdown => &["md"],
        }
    }

    /// Look up a kind by its query marker.
    #[must_use]
    pub fn from_marker(marker: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.marker() == marker)
    }

    /// Append this kind's marker to an import path.
    #[must_use]
    pub fn tag(self, path: &str) -> String {
        format!("{path}?{}", self.marker())
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_round_trip() {
        for kind in ContentKind::ALL {
            assert_eq!(ContentKind::from_marker(kind.marker()), Some(kind));
        }
        assert_eq!(ContentKind::from_marker("raw"), None);
    }

    #[test]
    fn test_tag() {
        assert_eq!(
            ContentKind::Markdown.tag("./content/docs/a.md"),
            "./content/docs/a.md?markdown"
        );
    }

    #[test]
    fn test_markdown_extensions() {
        assert_eq!(ContentKind::Markdown.extensions(), &["md"]);
    }
}
