//! Per-build state shared with plugin hooks.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Context handed to [`Plugin::build_start`](crate::Plugin::build_start) and
/// [`Plugin::watch_change`](crate::Plugin::watch_change).
///
/// Collects the paths plugins ask the host to watch. Registering a directory
/// makes the host observe changes anywhere below it.
#[derive(Debug, Default)]
pub struct PluginContext {
    watch_files: BTreeSet<PathBuf>,
}

impl PluginContext {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the host to watch a file or directory.
    ///
    /// Registering the same path twice has no effect.
    pub fn add_watch_file(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if self.watch_files.insert(path.clone()) {
            tracing::debug!(path = %path.display(), "Registered watch path");
        }
    }

    /// Paths registered so far, in sorted order.
    pub fn watch_files(&self) -> impl Iterator<Item = &Path> {
        self.watch_files.iter().map(PathBuf::as_path)
    }

    /// Check whether `path` is covered by a registered watch path.
    #[must_use]
    pub fn is_watched(&self, path: &Path) -> bool {
        self.watch_files.iter().any(|w| path.starts_with(w))
    }
}
