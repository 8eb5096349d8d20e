//! `mdr watch` command implementation.

use std::path::Path;

use clap::Args;
use mdr_config::CliSettings;
use mdr_plugin::{PluginDriver, WatchHost};

use super::{ContentArgs, load_config, manifest_generator, module_registry};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the watch command.
#[derive(Args)]
pub(crate) struct WatchArgs {
    #[command(flatten)]
    content: ContentArgs,

    /// Quiet period in milliseconds before changes are processed (overrides config).
    #[arg(long)]
    debounce_ms: Option<u64>,
}

impl WatchArgs {
    /// Execute the watch command.
    ///
    /// Generates the manifest once, then regenerates it after every relevant
    /// change until a hook fails or the process is interrupted.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the initial generation fails,
    /// or a later regeneration fails.
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let output = Output::new();
        let settings = CliSettings {
            debounce_ms: self.debounce_ms,
            ..self.content.settings()
        };
        let config = load_config(config_path, &settings)?;

        let mut driver = PluginDriver::new();
        driver.register(manifest_generator(&config));
        driver.register(module_registry(&config));

        let mut host = WatchHost::new(driver).with_debounce(config.watch.debounce());
        host.start()?;

        output.success(&format!(
            "Generated {}",
            config.content_resolved.output.display()
        ));
        output.info(&format!(
            "Watching {} (Ctrl+C to stop)",
            config.content_resolved.content_dir.display()
        ));

        host.watch()?.wait()?;
        Ok(())
    }
}
