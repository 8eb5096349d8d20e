//! `mdr generate` command implementation.

use std::path::Path;

use clap::Args;

use super::{ContentArgs, load_config, manifest_generator};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the generate command.
#[derive(Args)]
pub(crate) struct GenerateArgs {
    #[command(flatten)]
    content: ContentArgs,
}

impl GenerateArgs {
    /// Execute the generate command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the content root can't be
    /// scanned, or the manifest can't be written.
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let output = Output::new();
        let config = load_config(config_path, &self.content.settings())?;
        let generator = manifest_generator(&config);

        output.info(&format!(
            "Content directory: {}",
            config.content_resolved.content_dir.display()
        ));

        let manifest = generator.scan_and_emit()?;

        if manifest.is_empty() {
            output.warning("No content files found");
        }
        output.success(&format!(
            "Generated {} route(s) in {}",
            manifest.len(),
            config.content_resolved.output.display()
        ));

        Ok(())
    }
}
