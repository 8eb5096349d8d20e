//! `mdr resolve` and `mdr load` command implementations.

use std::path::Path;

use clap::Args;
use mdr_plugin::PluginDriver;

use super::{ContentArgs, display_id, load_config, module_registry};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the resolve command.
#[derive(Args)]
pub(crate) struct ResolveArgs {
    /// Import request, e.g. `./content/docs/intro.md?markdown`.
    id: String,

    #[command(flatten)]
    content: ContentArgs,
}

impl ResolveArgs {
    /// Execute the resolve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the request is malformed, or no
    /// plugin claims it.
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let output = Output::new();
        let driver = content_driver(config_path, self.content)?;

        let id = driver
            .resolve_id(&self.id)?
            .ok_or_else(|| CliError::Unresolved(self.id.clone()))?;
        output.result(&display_id(&id));

        Ok(())
    }
}

/// Arguments for the load command.
#[derive(Args)]
pub(crate) struct LoadArgs {
    /// Import request, e.g. `./content/docs/intro.md?markdown`.
    id: String,

    #[command(flatten)]
    content: ContentArgs,
}

impl LoadArgs {
    /// Execute the load command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the request can't be
    /// resolved and loaded.
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let output = Output::new();
        let driver = content_driver(config_path, self.content)?;

        let module = driver.import(&self.id)?;
        output.highlight(&format!("// {}", display_id(&module.id)));
        output.result_raw(&module.source);

        Ok(())
    }
}

/// Driver with the content module registry for the configured source root.
fn content_driver(
    config_path: Option<&Path>,
    content: ContentArgs,
) -> Result<PluginDriver, CliError> {
    let config = load_config(config_path, &content.settings())?;
    let mut driver = PluginDriver::new();
    driver.register(module_registry(&config));
    Ok(driver)
}
