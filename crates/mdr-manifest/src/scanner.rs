//! Content discovery by filesystem walking.
//!
//! The scanner only finds files; route keys and import specifiers are derived
//! from its results when the manifest is built.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ManifestError;

/// A content file found under the content root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentEntry {
    /// Absolute (or root-joined) file path.
    pub path: PathBuf,
    /// Path relative to the content root (e.g. `guides/setup.md`).
    pub content_relative: PathBuf,
    /// Path relative to the source root (e.g. `content/docs/guides/setup.md`).
    pub source_relative: PathBuf,
    /// File name without extension (e.g. `setup`).
    pub stem: String,
}

/// Recursively lists content files under a content root.
///
/// Directories are traversed but not listed. Hidden entries (names starting
/// with `.`) are skipped, as are files whose extension is not accepted.
#[derive(Debug, Clone)]
pub struct Scanner {
    content_dir: PathBuf,
    source_dir: PathBuf,
    extensions: Vec<String>,
}

impl Scanner {
    /// Create a new scanner.
    ///
    /// # Arguments
    ///
    /// * `content_dir` - Root directory to scan
    /// * `source_dir` - Source root that import specifiers are relative to
    /// * `extensions` - Accepted file extensions, without the leading dot
    #[must_use]
    pub fn new(content_dir: PathBuf, source_dir: PathBuf, extensions: Vec<String>) -> Self {
        Self {
            content_dir,
            source_dir,
            extensions,
        }
    }

    /// The content root.
    #[must_use]
    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    /// Check whether `path` has an accepted content extension.
    #[must_use]
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|accepted| accepted == ext))
    }

    /// Scan the content root, returning entries sorted by content-relative path.
    ///
    /// A missing or unreadable content root (or subdirectory) is an error.
    pub fn scan(&self) -> Result<Vec<ContentEntry>, ManifestError> {
        let mut entries = Vec::new();
        self.scan_directory(&self.content_dir, &mut entries)?;
        // Directory listing order depends on the filesystem
        entries.sort_by(|a, b| a.content_relative.cmp(&b.content_relative));
        Ok(entries)
    }

    fn scan_directory(
        &self,
        dir_path: &Path,
        entries: &mut Vec<ContentEntry>,
    ) -> Result<(), ManifestError> {
        let scan_error = |source| ManifestError::Scan {
            path: dir_path.to_path_buf(),
            source,
        };

        for entry in fs::read_dir(dir_path).map_err(scan_error)? {
            let entry = entry.map_err(scan_error)?;
            let file_type = entry.file_type().map_err(scan_error)?;

            if entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }

            let path = entry.path();
            if file_type.is_dir() {
                self.scan_directory(&path, entries)?;
            } else if file_type.is_file() && self.accepts(&path) {
                entries.push(self.build_entry(path)?);
            }
        }

        Ok(())
    }

    fn build_entry(&self, path: PathBuf) -> Result<ContentEntry, ManifestError> {
        let content_relative = path
            .strip_prefix(&self.content_dir)
            .map_err(|_| ManifestError::OutsideSourceRoot {
                path: path.clone(),
                source_root: self.content_dir.clone(),
            })?
            .to_path_buf();
        let source_relative = path
            .strip_prefix(&self.source_dir)
            .map_err(|_| ManifestError::OutsideSourceRoot {
                path: path.clone(),
                source_root: self.source_dir.clone(),
            })?
            .to_path_buf();
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ManifestError::NonUtf8Path(path.clone()))?
            .to_owned();

        Ok(ContentEntry {
            path,
            content_relative,
            source_relative,
            stem,
        })
    }
}
