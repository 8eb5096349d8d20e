//! Route keys derived from content paths.

use std::fmt;
use std::path::{Component, Path};

use crate::error::ManifestError;

/// URL-path-shaped key of a manifest entry.
///
/// Derived from a file's path relative to the content root: directories are
/// kept, the extension is stripped, separators are always `/`, and the key
/// starts with `/`.
///
/// - `a.md` → `/a`
/// - `guides/setup.md` → `/guides/setup`
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteKey(String);

impl RouteKey {
    /// Derive a route key from a path relative to the content root.
    pub fn from_relative(rel_path: &Path) -> Result<Self, ManifestError> {
        let mut segments = Vec::new();
        for component in rel_path.components() {
            match component {
                Component::Normal(name) => segments.push(
                    name.to_str()
                        .ok_or_else(|| ManifestError::NonUtf8Path(rel_path.to_path_buf()))?,
                ),
                Component::CurDir => {}
                _ => {
                    return Err(ManifestError::InvalidEntry {
                        route: rel_path.display().to_string(),
                        reason: "content path must be relative to the content root".to_owned(),
                    });
                }
            }
        }

        // The last segment loses its extension
        let Some(last) = segments.pop() else {
            return Err(ManifestError::InvalidEntry {
                route: String::new(),
                reason: "empty content path".to_owned(),
            });
        };
        let stem = Path::new(last)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(last);
        segments.push(stem);

        Ok(Self(format!("/{}", segments.join("/"))))
    }

    /// Validate an existing route key string.
    pub fn parse(key: &str) -> Result<Self, ManifestError> {
        let invalid = |reason: &str| ManifestError::InvalidEntry {
            route: key.to_owned(),
            reason: reason.to_owned(),
        };
        if !key.starts_with('/') {
            return Err(invalid("route key must start with '/'"));
        }
        if key.len() > 1 && key.ends_with('/') {
            return Err(invalid("route key must not end with '/'"));
        }
        if key.contains("//") {
            return Err(invalid("route key must not contain empty segments"));
        }
        Ok(Self(key.to_owned()))
    }

    /// The key as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RouteKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
