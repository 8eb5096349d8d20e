//! `mdr routes` command implementation.

use std::path::Path;

use clap::Args;
use mdr_config::CliSettings;

use super::{ContentArgs, load_config, manifest_generator};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the routes command.
#[derive(Args)]
pub(crate) struct RoutesArgs {
    #[command(flatten)]
    content: ContentArgs,

    /// URL prefix to mount routes under (overrides config).
    #[arg(short, long)]
    mount: Option<String>,

    /// Print bare route keys with their import specifiers instead.
    #[arg(long)]
    keys: bool,
}

impl RoutesArgs {
    /// Execute the routes command.
    ///
    /// Scans the content root without writing the manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the content root can't be
    /// scanned.
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let output = Output::new();
        let settings = CliSettings {
            mount: self.mount,
            ..self.content.settings()
        };
        let config = load_config(config_path, &settings)?;
        let manifest = manifest_generator(&config).scan()?;

        if self.keys {
            for entry in &manifest {
                output.result(&format!("{}\t{}", entry.route, entry.specifier));
            }
        } else {
            for route in manifest.mounted_routes(&config.routes.mount) {
                output.result(&route);
            }
        }

        if manifest.is_empty() {
            output.warning("No content files found");
        }

        Ok(())
    }
}
