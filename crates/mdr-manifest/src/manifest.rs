//! Typed manifest and its validating builder.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use mdr_virtual::{ContentKind, Specifier};

use crate::error::ManifestError;
use crate::route::RouteKey;
use crate::scanner::ContentEntry;

/// One route of the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Route key (e.g. `/guides/setup`).
    pub route: RouteKey,
    /// Import specifier relative to the source root, marker included
    /// (e.g. `./content/docs/guides/setup.md?markdown`).
    pub specifier: String,
    /// Content file the entry was built from.
    pub source: PathBuf,
}

impl ManifestEntry {
    /// Build the entry for a scanned content file.
    pub fn from_content(entry: &ContentEntry, kind: ContentKind) -> Result<Self, ManifestError> {
        let route = RouteKey::from_relative(&entry.content_relative)?;
        let specifier = kind.tag(&import_path(&entry.source_relative)?);
        Ok(Self {
            route,
            specifier,
            source: entry.path.clone(),
        })
    }
}

/// `./`-prefixed, `/`-separated import path for a source-relative file.
fn import_path(source_relative: &Path) -> Result<String, ManifestError> {
    let mut path = String::from(".");
    for component in source_relative.components() {
        let name = component
            .as_os_str()
            .to_str()
            .ok_or_else(|| ManifestError::NonUtf8Path(source_relative.to_path_buf()))?;
        path.push('/');
        path.push_str(name);
    }
    Ok(path)
}

/// Mapping from route key to lazily imported content module.
///
/// Entries keep the order they were scanned in (sorted by content-relative
/// path); lookups by route key go through an index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    kind: ContentKind,
    entries: Vec<ManifestEntry>,
    index: HashMap<RouteKey, usize>,
}

impl Manifest {
    /// Content kind every entry imports as.
    #[must_use]
    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    /// Number of routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the manifest has no routes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the entry for a route key.
    #[must_use]
    pub fn get(&self, route: &str) -> Option<&ManifestEntry> {
        self.index
            .get(&RouteKey::parse(route).ok()?)
            .map(|&i| &self.entries[i])
    }

    /// Entries in emission order.
    pub fn iter(&self) -> impl Iterator<Item = &ManifestEntry> {
        self.entries.iter()
    }

    /// Full URL paths of every route when mounted under `prefix`.
    ///
    /// `mounted_routes("/docs")` turns `/intro` into `/docs/intro`. An empty
    /// prefix or `/` leaves keys unchanged.
    #[must_use]
    pub fn mounted_routes(&self, prefix: &str) -> Vec<String> {
        let prefix = prefix.trim_end_matches('/');
        self.entries
            .iter()
            .map(|e| format!("{prefix}{}", e.route))
            .collect()
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = &'a ManifestEntry;
    type IntoIter = std::slice::Iter<'a, ManifestEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Validating builder for [`Manifest`].
///
/// Every entry must have a well-formed route key and a `./`-relative specifier
/// carrying the manifest's content marker. Duplicate route keys are rejected
/// with both source files named.
#[derive(Debug)]
pub struct ManifestBuilder {
    kind: ContentKind,
    entries: Vec<ManifestEntry>,
    index: HashMap<RouteKey, usize>,
}

impl ManifestBuilder {
    /// Create a builder for manifests of `kind`.
    #[must_use]
    pub fn new(kind: ContentKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Build a manifest from scanned content, in scan order.
    pub fn from_content(
        kind: ContentKind,
        content: &[ContentEntry],
    ) -> Result<Manifest, ManifestError> {
        let mut builder = Self::new(kind);
        for entry in content {
            builder.add(ManifestEntry::from_content(entry, kind)?)?;
        }
        Ok(builder.build())
    }

    /// Add an entry after validating it.
    pub fn add(&mut self, entry: ManifestEntry) -> Result<&mut Self, ManifestError> {
        self.validate(&entry)?;

        if let Some(&existing) = self.index.get(&entry.route) {
            return Err(ManifestError::DuplicateRoute {
                route: entry.route.to_string(),
                first: self.entries[existing].source.clone(),
                second: entry.source,
            });
        }

        self.index.insert(entry.route.clone(), self.entries.len());
        self.entries.push(entry);
        Ok(self)
    }

    /// Finish the manifest.
    #[must_use]
    pub fn build(self) -> Manifest {
        Manifest {
            kind: self.kind,
            entries: self.entries,
            index: self.index,
        }
    }

    fn validate(&self, entry: &ManifestEntry) -> Result<(), ManifestError> {
        let invalid = |reason: String| ManifestError::InvalidEntry {
            route: entry.route.to_string(),
            reason,
        };

        RouteKey::parse(entry.route.as_str())?;

        if !entry.specifier.starts_with("./") {
            return Err(invalid(format!(
                "specifier \"{}\" must start with \"./\"",
                entry.specifier
            )));
        }

        let spec = Specifier::parse(&entry.specifier).map_err(|e| invalid(e.to_string()))?;
        if spec.content_kind() != Some(self.kind) {
            return Err(invalid(format!(
                "specifier \"{}\" must carry the ?{} marker",
                entry.specifier,
                self.kind.marker()
            )));
        }

        Ok(())
    }
}
