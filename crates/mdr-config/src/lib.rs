//! Configuration management for mdr.
//!
//! Parses `mdr.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Path fields additionally expand a leading `~` to the home directory.
//!
//! Expanded fields:
//! - `content.source_dir`
//! - `content.content_dir`
//! - `content.output`
//! - `routes.mount`

mod expand;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override source root.
    pub source_dir: Option<PathBuf>,
    /// Override content root.
    pub content_dir: Option<PathBuf>,
    /// Override generated manifest path.
    pub output: Option<PathBuf>,
    /// Override route mount prefix.
    pub mount: Option<String>,
    /// Override watch debounce window.
    pub debounce_ms: Option<u64>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mdr.toml";

/// Default source root, relative to the config directory.
const DEFAULT_SOURCE_DIR: &str = "src";
/// Default content root, relative to the source root.
const DEFAULT_CONTENT_DIR: &str = "content/docs";
/// Default manifest file, relative to the source root.
const DEFAULT_OUTPUT: &str = "routes.gen.tsx";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Content configuration (paths are relative strings from TOML).
    content: ContentConfigRaw,
    /// Route listing configuration.
    pub routes: RoutesConfig,
    /// Watch mode configuration.
    pub watch: WatchConfig,

    /// Resolved content configuration (set after loading).
    #[serde(skip)]
    pub content_resolved: ContentConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw content configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ContentConfigRaw {
    source_dir: Option<String>,
    content_dir: Option<String>,
    output: Option<String>,
    extensions: Option<Vec<String>>,
}

/// Resolved content configuration with absolute paths.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ContentConfig {
    /// Source root. Import specifiers in the manifest are relative to it.
    pub source_dir: PathBuf,
    /// Content root scanned for routes.
    pub content_dir: PathBuf,
    /// Generated manifest path.
    pub output: PathBuf,
    /// Content file extensions, without the leading dot.
    pub extensions: Vec<String>,
}

/// Route listing configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RoutesConfig {
    /// URL prefix the content routes are served under.
    pub mount: String,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            mount: "/docs".to_owned(),
        }
    }
}

/// Watch mode configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Quiet period before a burst of file events is processed.
    pub debounce_ms: u64,
}

impl WatchConfig {
    /// Debounce window as a [`Duration`].
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self { debounce_ms: 100 }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`content.source_dir`").
        field: String,
        /// Error message (e.g., "${`SITE_ROOT`} not set").
        message: String,
    },
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mdr.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values. The result is
    /// validated after the overrides are applied.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails, or
    /// the final configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_config(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            let cwd = std::env::current_dir().unwrap_or_default();
            config.apply_cli_settings(settings, &cwd);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    ///
    /// Relative CLI paths resolve against `cwd`. Overriding the source root
    /// also moves the content root and output when the config file left them
    /// at their defaults.
    fn apply_cli_settings(&mut self, settings: &CliSettings, cwd: &Path) {
        if let Some(source_dir) = &settings.source_dir {
            let source_dir = cwd.join(source_dir);
            if self.content.content_dir.is_none() {
                self.content_resolved.content_dir = source_dir.join(DEFAULT_CONTENT_DIR);
            }
            if self.content.output.is_none() {
                self.content_resolved.output = source_dir.join(DEFAULT_OUTPUT);
            }
            self.content_resolved.source_dir = source_dir;
        }
        if let Some(content_dir) = &settings.content_dir {
            self.content_resolved.content_dir = cwd.join(content_dir);
        }
        if let Some(output) = &settings.output {
            self.content_resolved.output = cwd.join(output);
        }
        if let Some(mount) = &settings.mount {
            self.routes.mount.clone_from(mount);
        }
        if let Some(debounce_ms) = settings.debounce_ms {
            self.watch.debounce_ms = debounce_ms;
        }
    }

    /// Search for config file in `start` and its parents.
    fn discover_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        let source_dir = base.join(DEFAULT_SOURCE_DIR);
        Self {
            content: ContentConfigRaw::default(),
            routes: RoutesConfig::default(),
            watch: WatchConfig::default(),
            content_resolved: ContentConfig {
                content_dir: source_dir.join(DEFAULT_CONTENT_DIR),
                output: source_dir.join(DEFAULT_OUTPUT),
                source_dir,
                extensions: default_extensions(),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically by [`Config::load`] after CLI settings are applied.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_content()?;
        self.validate_routes()?;
        Ok(())
    }

    /// Validate content configuration.
    fn validate_content(&self) -> Result<(), ConfigError> {
        let content = &self.content_resolved;

        if content.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "content.extensions cannot be empty".to_owned(),
            ));
        }
        for ext in &content.extensions {
            if ext.is_empty() || ext.starts_with('.') || ext.contains('/') {
                return Err(ConfigError::Validation(format!(
                    "content.extensions entry \"{ext}\" must be a bare extension like \"md\""
                )));
            }
        }

        if !content.content_dir.starts_with(&content.source_dir) {
            return Err(ConfigError::Validation(format!(
                "content.content_dir {} must be inside content.source_dir {}",
                content.content_dir.display(),
                content.source_dir.display()
            )));
        }

        Ok(())
    }

    /// Validate routes configuration.
    fn validate_routes(&self) -> Result<(), ConfigError> {
        if !self.routes.mount.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "routes.mount \"{}\" must start with /",
                self.routes.mount
            )));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        let content = &mut self.content;
        for (value, field) in [
            (&mut content.source_dir, "content.source_dir"),
            (&mut content.content_dir, "content.content_dir"),
            (&mut content.output, "content.output"),
        ] {
            if let Some(raw) = value.as_deref() {
                *value = Some(expand::expand_path(raw, field)?);
            }
        }

        self.routes.mount = expand::expand_env(&self.routes.mount, "routes.mount")?;

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    ///
    /// Content root and output default to locations under the source root, so
    /// moving the source root moves them too.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let source_dir = config_dir.join(
            self.content
                .source_dir
                .as_deref()
                .unwrap_or(DEFAULT_SOURCE_DIR),
        );
        let content_dir = match self.content.content_dir.as_deref() {
            Some(dir) => config_dir.join(dir),
            None => source_dir.join(DEFAULT_CONTENT_DIR),
        };
        let output = match self.content.output.as_deref() {
            Some(file) => config_dir.join(file),
            None => source_dir.join(DEFAULT_OUTPUT),
        };

        self.content_resolved = ContentConfig {
            source_dir,
            content_dir,
            output,
            extensions: self
                .content
                .extensions
                .clone()
                .unwrap_or_else(default_extensions),
        };
    }
}

fn default_extensions() -> Vec<String> {
    vec!["md".to_owned()]
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(toml: &str, config_dir: &Path) -> Config {
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(config_dir);
        config
    }

    fn assert_validation_error(config: &Config, expected: &str) {
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        assert!(
            err.to_string().contains(expected),
            "Expected {expected:?} in {err}"
        );
    }

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/site"));

        assert_eq!(
            config.content_resolved,
            ContentConfig {
                source_dir: PathBuf::from("/site/src"),
                content_dir: PathBuf::from("/site/src/content/docs"),
                output: PathBuf::from("/site/src/routes.gen.tsx"),
                extensions: vec!["md".to_owned()],
            }
        );
        assert_eq!(config.routes.mount, "/docs");
        assert_eq!(config.watch.debounce(), Duration::from_millis(100));
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_validate_default_config_passes() {
        let config = Config::default_with_base(Path::new("/site"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config = parse("", Path::new("/site"));

        assert_eq!(
            config.content_resolved,
            Config::default_with_base(Path::new("/site")).content_resolved
        );
    }

    #[test]
    fn test_resolve_paths() {
        let config = parse(
            r#"
[content]
source_dir = "app"
content_dir = "app/pages"
output = "app/generated/routes.tsx"
extensions = ["md", "markdown"]
"#,
            Path::new("/project"),
        );

        assert_eq!(
            config.content_resolved,
            ContentConfig {
                source_dir: PathBuf::from("/project/app"),
                content_dir: PathBuf::from("/project/app/pages"),
                output: PathBuf::from("/project/app/generated/routes.tsx"),
                extensions: vec!["md".to_owned(), "markdown".to_owned()],
            }
        );
    }

    #[test]
    fn test_defaults_follow_source_dir() {
        let config = parse(
            r#"
[content]
source_dir = "web"
"#,
            Path::new("/project"),
        );

        assert_eq!(
            config.content_resolved.content_dir,
            PathBuf::from("/project/web/content/docs")
        );
        assert_eq!(
            config.content_resolved.output,
            PathBuf::from("/project/web/routes.gen.tsx")
        );
    }

    #[test]
    fn test_parse_routes_and_watch() {
        let config = parse(
            r#"
[routes]
mount = "/handbook"

[watch]
debounce_ms = 250
"#,
            Path::new("/project"),
        );

        assert_eq!(config.routes.mount, "/handbook");
        assert_eq!(config.watch.debounce_ms, 250);
    }

    #[test]
    fn test_validate_empty_extensions() {
        let config = parse(
            r#"
[content]
extensions = []
"#,
            Path::new("/project"),
        );

        assert_validation_error(&config, "content.extensions cannot be empty");
    }

    #[test]
    fn test_validate_extension_with_dot() {
        let config = parse(
            r#"
[content]
extensions = [".md"]
"#,
            Path::new("/project"),
        );

        assert_validation_error(&config, "\".md\"");
    }

    #[test]
    fn test_validate_mount_without_slash() {
        let config = parse(
            r#"
[routes]
mount = "docs"
"#,
            Path::new("/project"),
        );

        assert_validation_error(&config, "routes.mount");
    }

    #[test]
    fn test_validate_content_outside_source() {
        let config = parse(
            r#"
[content]
source_dir = "src"
content_dir = "content"
"#,
            Path::new("/project"),
        );

        assert_validation_error(&config, "must be inside content.source_dir");
    }

    #[test]
    fn test_apply_cli_settings_paths() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            content_dir: Some(PathBuf::from("/test/src/pages")),
            output: Some(PathBuf::from("/test/src/pages.gen.tsx")),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides, Path::new("/work"));

        assert_eq!(
            config.content_resolved.content_dir,
            PathBuf::from("/test/src/pages")
        );
        assert_eq!(
            config.content_resolved.output,
            PathBuf::from("/test/src/pages.gen.tsx")
        );
        assert_eq!(config.content_resolved.source_dir, PathBuf::from("/test/src")); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_mount_and_debounce() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            mount: Some("/guide".to_owned()),
            debounce_ms: Some(20),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides, Path::new("/work"));

        assert_eq!(config.routes.mount, "/guide");
        assert_eq!(config.watch.debounce_ms, 20);
    }

    #[test]
    fn test_apply_cli_settings_source_dir_moves_defaults() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            source_dir: Some(PathBuf::from("app")),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides, Path::new("/work"));

        assert_eq!(
            config.content_resolved,
            ContentConfig {
                source_dir: PathBuf::from("/work/app"),
                content_dir: PathBuf::from("/work/app/content/docs"),
                output: PathBuf::from("/work/app/routes.gen.tsx"),
                extensions: vec!["md".to_owned()],
            }
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_apply_cli_settings_source_dir_keeps_configured_paths() {
        let mut config = parse(
            r#"
[content]
content_dir = "site/pages"
"#,
            Path::new("/project"),
        );
        let overrides = CliSettings {
            source_dir: Some(PathBuf::from("/project/site")),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides, Path::new("/work"));

        assert_eq!(
            config.content_resolved.content_dir,
            PathBuf::from("/project/site/pages")
        );
        assert_eq!(
            config.content_resolved.output,
            PathBuf::from("/project/site/routes.gen.tsx")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_apply_cli_settings_relative_paths() {
        let mut config = Config::default_with_base(Path::new("/work"));
        let overrides = CliSettings {
            content_dir: Some(PathBuf::from("src/guides")),
            output: Some(PathBuf::from("src/guides.gen.tsx")),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides, Path::new("/work"));

        assert_eq!(
            config.content_resolved.content_dir,
            PathBuf::from("/work/src/guides")
        );
        assert_eq!(
            config.content_resolved.output,
            PathBuf::from("/work/src/guides.gen.tsx")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_with_source_dir_override() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "").unwrap();
        let overrides = CliSettings {
            source_dir: Some(temp_dir.path().join("app")),
            ..Default::default()
        };

        let config = Config::load(Some(&path), Some(&overrides)).unwrap();

        assert_eq!(
            config.content_resolved.content_dir,
            temp_dir.path().join("app/content/docs")
        );
        assert_eq!(
            config.content_resolved.output,
            temp_dir.path().join("app/routes.gen.tsx")
        );
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));

        config.apply_cli_settings(&CliSettings::default(), Path::new("/work"));

        assert_eq!(
            config.content_resolved,
            Config::default_with_base(Path::new("/test")).content_resolved
        );
        assert_eq!(config.routes.mount, "/docs");
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: the variable name is unique to this test
        unsafe {
            std::env::set_var("MDR_CONFIG_TEST_SOURCE", "site/src");
        }
        let mut config: Config = toml::from_str(
            r#"
[content]
source_dir = "${MDR_CONFIG_TEST_SOURCE}"
content_dir = "${MDR_CONFIG_TEST_SOURCE}/docs"
"#,
        )
        .unwrap();

        config.expand_env_vars().unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.content_resolved.source_dir,
            PathBuf::from("/project/site/src")
        );
        assert_eq!(
            config.content_resolved.content_dir,
            PathBuf::from("/project/site/src/docs")
        );
        unsafe {
            std::env::remove_var("MDR_CONFIG_TEST_SOURCE");
        }
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        // SAFETY: the variable name is unique to this test
        unsafe {
            std::env::remove_var("MDR_CONFIG_TEST_MISSING");
        }
        let mut config: Config = toml::from_str(
            r#"
[routes]
mount = "${MDR_CONFIG_TEST_MISSING}"
"#,
        )
        .unwrap();

        let err = config.expand_env_vars().unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { ref field, .. } if field == "routes.mount"));
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            r#"
[content]
source_dir = "src"

[routes]
mount = "/kb"
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
        assert_eq!(
            config.content_resolved.content_dir,
            temp_dir.path().join("src/content/docs")
        );
        assert_eq!(config.routes.mount, "/kb");
    }

    #[test]
    fn test_load_validates_after_cli_settings() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "").unwrap();
        let overrides = CliSettings {
            mount: Some("kb".to_owned()),
            ..Default::default()
        };

        let err = Config::load(Some(&path), Some(&overrides)).unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("missing.toml");

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_parse_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[content\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_discover_config_in_parent() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested = temp_dir.path().join("src").join("content");
        std::fs::create_dir_all(&nested).unwrap();
        let path = temp_dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "").unwrap();

        assert_eq!(Config::discover_config(&nested), Some(path));
    }
}
