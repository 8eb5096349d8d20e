//! Virtual module error types.

use std::path::PathBuf;

use crate::kind::ContentKind;

/// Error raised while resolving, loading or instantiating a virtual module.
#[derive(Debug, thiserror::Error)]
pub enum VirtualError {
    /// The import id could not be parsed.
    #[error("Malformed specifier \"{id}\": {reason}")]
    MalformedSpecifier {
        /// The offending import id.
        id: String,
        /// What was wrong with it.
        reason: String,
    },
    /// Source content behind a virtual module could not be read.
    #[error("Failed to read content {}: {source}", path.display())]
    Read {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The id names a content kind with no registered compiler.
    #[error("No compiler registered for {0} content")]
    UnregisteredKind(ContentKind),
}
