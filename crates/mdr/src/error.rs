//! CLI error types.

use mdr_config::ConfigError;
use mdr_manifest::ManifestError;
use mdr_plugin::{DriverError, HostError, PluginError};

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Manifest(#[from] ManifestError),

    #[error("{0}")]
    Plugin(#[from] PluginError),

    #[error("{0}")]
    Driver(#[from] DriverError),

    #[error("{0}")]
    Watch(#[from] HostError),

    #[error("No plugin resolved import \"{0}\"")]
    Unresolved(String),
}
