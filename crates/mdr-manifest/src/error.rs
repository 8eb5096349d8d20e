//! Manifest error types.

use std::path::PathBuf;

/// Error raised while scanning content or emitting the manifest.
///
/// Every variant is fatal for the current run. A failed run never writes, so
/// the previous manifest stays on disk.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// The content root or one of its directories could not be listed.
    #[error("Failed to scan {}: {source}", path.display())]
    Scan {
        /// Directory that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The generated manifest could not be written.
    #[error("Failed to write manifest {}: {source}", path.display())]
    Write {
        /// Output path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Two content files map to the same route key.
    #[error("Duplicate route \"{route}\": {} and {}", first.display(), second.display())]
    DuplicateRoute {
        /// The colliding route key.
        route: String,
        /// File that claimed the route first.
        first: PathBuf,
        /// File that collided with it.
        second: PathBuf,
    },
    /// A manifest entry doesn't have the expected shape.
    #[error("Invalid manifest entry \"{route}\": {reason}")]
    InvalidEntry {
        /// Route key of the entry.
        route: String,
        /// What was wrong with it.
        reason: String,
    },
    /// A content path can't be expressed as a route or import specifier.
    #[error("Path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),
    /// A content file lies outside the source root.
    #[error("{} is outside the source root {}", path.display(), source_root.display())]
    OutsideSourceRoot {
        /// Content file path.
        path: PathBuf,
        /// Configured source root.
        source_root: PathBuf,
    },
}
