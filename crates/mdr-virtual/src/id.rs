//! Virtual module ids.

use std::fmt;

use crate::error::VirtualError;
use crate::kind::ContentKind;
use crate::specifier::Specifier;

/// Prefix marking an id as virtual so the host skips filesystem resolution.
const VIRTUAL_PREFIX: char = '\0';

/// An import id claimed for virtual resolution.
///
/// Holds the original request (`./content/docs/a.md?markdown`), its base
/// specifier (`./content/docs/a.md`) and the content kind selected by the marker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VirtualId {
    request: String,
    base: String,
    kind: ContentKind,
}

impl VirtualId {
    /// Parse an import request.
    ///
    /// Returns `Ok(None)` if the request carries no known content marker, or is
    /// already an internal id.
    pub fn from_request(id: &str) -> Result<Option<Self>, VirtualError> {
        if id.starts_with(VIRTUAL_PREFIX) {
            return Ok(None);
        }
        let spec = Specifier::parse(id)?;
        Ok(spec.content_kind().map(|kind| Self {
            request: id.to_owned(),
            base: spec.base().to_owned(),
            kind,
        }))
    }

    /// Parse an internal id produced by [`internal`](Self::internal).
    ///
    /// Returns `Ok(None)` for ids without the virtual prefix.
    pub fn from_internal(id: &str) -> Result<Option<Self>, VirtualError> {
        match id.strip_prefix(VIRTUAL_PREFIX) {
            Some(request) => Self::from_request(request),
            None => Ok(None),
        }
    }

    /// Internal id handed back to the host (`\0` + request).
    #[must_use]
    pub fn internal(&self) -> String {
        format!("{VIRTUAL_PREFIX}{}", self.request)
    }

    /// The original import request.
    #[must_use]
    pub fn request(&self) -> &str {
        &self.request
    }

    /// The request with its query removed.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Content kind selected by the marker.
    #[must_use]
    pub fn kind(&self) -> ContentKind {
        self.kind
    }
}

impl fmt::Display for VirtualId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_request_with_marker() {
        let id = VirtualId::from_request("content/x.md?markdown")
            .unwrap()
            .unwrap();

        assert_eq!(id.request(), "content/x.md?markdown");
        assert_eq!(id.base(), "content/x.md");
        assert_eq!(id.kind(), ContentKind::Markdown);
        assert_eq!(id.internal(), "\0content/x.md?markdown");
    }

    #[test]
    fn test_from_request_without_marker() {
        assert_eq!(VirtualId::from_request("content/x.md").unwrap(), None);
    }

    #[test]
    fn test_internal_ids_are_not_claimed_twice() {
        assert_eq!(
            VirtualId::from_request("\0content/x.md?markdown").unwrap(),
            None
        );
    }

    #[test]
    fn test_from_internal() {
        let id = VirtualId::from_internal("\0./a/b.md?markdown")
            .unwrap()
            .unwrap();

        assert_eq!(id.base(), "./a/b.md");
        assert_eq!(id.to_string(), "./a/b.md?markdown");
    }

    #[test]
    fn test_from_internal_requires_prefix() {
        assert_eq!(VirtualId::from_internal("./a/b.md?markdown").unwrap(), None);
    }
}
