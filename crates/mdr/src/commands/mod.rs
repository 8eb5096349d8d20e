//! CLI command implementations.

pub(crate) mod generate;
pub(crate) mod module;
pub(crate) mod routes;
pub(crate) mod watch;

pub(crate) use generate::GenerateArgs;
pub(crate) use module::{LoadArgs, ResolveArgs};
pub(crate) use routes::RoutesArgs;
pub(crate) use watch::WatchArgs;

use std::path::{Path, PathBuf};

use clap::Args;
use mdr_config::{CliSettings, Config};
use mdr_manifest::{GeneratorConfig, ManifestGenerator};
use mdr_virtual::VirtualModuleRegistry;

use crate::error::CliError;

/// Content location overrides shared by every command.
#[derive(Args, Default)]
pub(crate) struct ContentArgs {
    /// Source root; import specifiers are relative to it (overrides config).
    #[arg(long)]
    source_dir: Option<PathBuf>,

    /// Content root to scan (overrides config).
    #[arg(long)]
    content_dir: Option<PathBuf>,

    /// Generated manifest path (overrides config).
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl ContentArgs {
    /// Build CLI settings from the content overrides.
    pub(crate) fn settings(self) -> CliSettings {
        CliSettings {
            source_dir: self.source_dir,
            content_dir: self.content_dir,
            output: self.output,
            ..Default::default()
        }
    }
}

/// Load configuration with CLI overrides applied.
pub(crate) fn load_config(
    config_path: Option<&Path>,
    settings: &CliSettings,
) -> Result<Config, CliError> {
    let config = Config::load(config_path, Some(settings))?;
    if let Some(path) = &config.config_path {
        tracing::info!(path = %path.display(), "Loaded configuration");
    }
    Ok(config)
}

/// Manifest generator for the configured content root.
pub(crate) fn manifest_generator(config: &Config) -> ManifestGenerator {
    let content = &config.content_resolved;
    ManifestGenerator::new(
        GeneratorConfig::new(
            content.source_dir.clone(),
            content.content_dir.clone(),
            content.output.clone(),
        )
        .with_extensions(content.extensions.clone()),
    )
}

/// Virtual module registry rooted at the configured source root.
pub(crate) fn module_registry(config: &Config) -> VirtualModuleRegistry {
    VirtualModuleRegistry::with_defaults(config.content_resolved.source_dir.clone())
}

/// Printable form of a module id. Internal ids start with a NUL byte.
pub(crate) fn display_id(id: &str) -> String {
    id.replace('\0', "\\0")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_display_id_escapes_nul() {
        assert_eq!(
            display_id("\0./content/docs/intro.md?markdown"),
            "\\0./content/docs/intro.md?markdown"
        );
        assert_eq!(display_id("./app.tsx"), "./app.tsx");
    }

    #[test]
    fn test_content_args_settings() {
        let args = ContentArgs {
            content_dir: Some(PathBuf::from("/site/src/pages")),
            ..Default::default()
        };

        let settings = args.settings();

        assert_eq!(settings.content_dir, Some(PathBuf::from("/site/src/pages")));
        assert!(settings.source_dir.is_none());
        assert!(settings.mount.is_none());
    }

    #[test]
    fn test_manifest_generator_uses_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("mdr.toml");
        std::fs::write(
            &config_path,
            "[content]\nextensions = [\"md\", \"markdown\"]\n",
        )
        .unwrap();

        let config = load_config(Some(&config_path), &CliSettings::default()).unwrap();
        let generator = manifest_generator(&config);

        assert_eq!(
            generator.config().content_dir,
            temp_dir.path().join("src/content/docs")
        );
        assert!(generator.is_relevant(Path::new("guide.markdown")));
        assert!(!generator.is_relevant(Path::new("image.png")));
    }
}
