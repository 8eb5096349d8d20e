//! Scan-and-emit driver and its build hooks.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use mdr_plugin::{ChangeKind, Hook, Plugin, PluginContext, PluginError};
use mdr_virtual::ContentKind;

use crate::emit::render_module;
use crate::error::ManifestError;
use crate::manifest::{Manifest, ManifestBuilder};
use crate::scanner::Scanner;

/// Plugin name reported to the host.
const PLUGIN_NAME: &str = "content-manifest";

/// Paths and options for [`ManifestGenerator`].
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Source root; import specifiers are relative to it.
    pub source_dir: PathBuf,
    /// Content root to scan.
    pub content_dir: PathBuf,
    /// Generated manifest path.
    pub output: PathBuf,
    /// Accepted content extensions, without the leading dot.
    pub extensions: Vec<String>,
    /// Content kind every entry imports as.
    pub kind: ContentKind,
}

impl GeneratorConfig {
    /// Create a markdown config with the kind's default extensions.
    #[must_use]
    pub fn new(source_dir: PathBuf, content_dir: PathBuf, output: PathBuf) -> Self {
        let kind = ContentKind::Markdown;
        Self {
            source_dir,
            content_dir,
            output,
            extensions: kind.extensions().iter().map(|&e| e.to_owned()).collect(),
            kind,
        }
    }

    /// Replace the accepted extensions.
    #[must_use]
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }
}

/// Generates the content manifest.
///
/// Every run rescans the whole content root and rewrites the manifest
/// wholesale. Runs are independent: nothing is cached between them.
pub struct ManifestGenerator {
    config: GeneratorConfig,
    scanner: Scanner,
}

impl ManifestGenerator {
    /// Create a generator.
    #[must_use]
    pub fn new(config: GeneratorConfig) -> Self {
        let scanner = Scanner::new(
            config.content_dir.clone(),
            config.source_dir.clone(),
            config.extensions.clone(),
        );
        Self { config, scanner }
    }

    /// The generator's configuration.
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Scan the content root and build the manifest without writing it.
    pub fn scan(&self) -> Result<Manifest, ManifestError> {
        let content = self.scanner.scan()?;
        ManifestBuilder::from_content(self.config.kind, &content)
    }

    /// Scan the content root and write the generated manifest.
    ///
    /// Returns the manifest that was written. On error nothing is written and
    /// the previous manifest (if any) stays in place.
    pub fn scan_and_emit(&self) -> Result<Manifest, ManifestError> {
        let start = Instant::now();
        let manifest = self.scan()?;
        let text = render_module(&manifest);
        let written = write_if_changed(&self.config.output, &text)?;

        if written {
            tracing::info!(
                routes = manifest.len(),
                output = %self.config.output.display(),
                elapsed_ms = start.elapsed().as_millis(),
                "Generated content manifest"
            );
        } else {
            tracing::debug!(
                output = %self.config.output.display(),
                "Content manifest unchanged"
            );
        }

        Ok(manifest)
    }

    /// Whether a change to `path` requires regenerating the manifest.
    ///
    /// Only the content extension matters; other files are ignored even when
    /// they live in the content tree.
    #[must_use]
    pub fn is_relevant(&self, path: &Path) -> bool {
        self.scanner.accepts(path)
    }
}

/// Write `text` to `path` unless the file already holds exactly that text.
///
/// The text goes to a temporary file next to `path` first and is renamed over
/// it, so readers see either the old or the new manifest, never a partial one.
fn write_if_changed(path: &Path, text: &str) -> Result<bool, ManifestError> {
    if fs::read(path).is_ok_and(|existing| existing == text.as_bytes()) {
        return Ok(false);
    }

    let write_error = |source| ManifestError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(write_error)?;

    let mut file = temp_file_builder()
        .tempfile_in(dir)
        .map_err(write_error)?;
    // Keep the mode of the manifest being replaced
    if let Ok(existing) = fs::metadata(path) {
        file.as_file()
            .set_permissions(existing.permissions())
            .map_err(write_error)?;
    }
    file.write_all(text.as_bytes()).map_err(write_error)?;
    file.persist(path).map_err(|e| write_error(e.error))?;

    Ok(true)
}

/// Temp file builder whose files get the same mode as `fs::write` would give.
///
/// Temp files default to owner-only access, which would leak into the manifest
/// on rename.
fn temp_file_builder() -> tempfile::Builder<'static, 'static> {
    #[cfg_attr(not(unix), allow(unused_mut))]
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // Narrowed by the process umask on open
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    builder
}

impl Plugin for ManifestGenerator {
    fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    fn build_start(&self, ctx: &mut PluginContext) -> Result<(), PluginError> {
        self.scan_and_emit()
            .map_err(|e| PluginError::new(Hook::BuildStart, e))?;
        ctx.add_watch_file(self.config.content_dir.clone());
        Ok(())
    }

    fn watch_change(
        &self,
        _ctx: &mut PluginContext,
        path: &Path,
        kind: ChangeKind,
    ) -> Result<(), PluginError> {
        if !self.is_relevant(path) {
            tracing::trace!(path = %path.display(), "Ignoring non-content change");
            return Ok(());
        }
        tracing::debug!(path = %path.display(), ?kind, "Content changed, regenerating manifest");
        self.scan_and_emit()
            .map_err(|e| PluginError::new(Hook::WatchChange, e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    struct Site {
        _temp_dir: tempfile::TempDir,
        content_dir: PathBuf,
        output: PathBuf,
        generator: ManifestGenerator,
    }

    fn site() -> Site {
        let temp_dir = tempfile::tempdir().unwrap();
        let source_dir = temp_dir.path().join("src");
        let content_dir = source_dir.join("content").join("docs");
        fs::create_dir_all(&content_dir).unwrap();
        let output = source_dir.join("routes.gen.tsx");
        let generator = ManifestGenerator::new(GeneratorConfig::new(
            source_dir,
            content_dir.clone(),
            output.clone(),
        ));
        Site {
            _temp_dir: temp_dir,
            content_dir,
            output,
            generator,
        }
    }

    fn write(site: &Site, rel: &str, content: &str) {
        let path = site.content_dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_generated_keys() {
        let site = site();
        write(&site, "a.md", "# A");
        write(&site, "sub/b.md", "# B");

        let manifest = site.generator.scan_and_emit().unwrap();

        let routes: Vec<_> = manifest.iter().map(|e| e.route.as_str()).collect();
        assert_eq!(routes, vec!["/a", "/sub/b"]);
        let text = fs::read_to_string(&site.output).unwrap();
        assert!(text.contains("\t\"/a\": () => import(\"./content/docs/a.md?markdown\"),\n"));
        assert!(
            text.contains("\t\"/sub/b\": () => import(\"./content/docs/sub/b.md?markdown\"),\n")
        );
    }

    #[test]
    fn test_deterministic_output() {
        let site = site();
        for name in ["zeta.md", "alpha.md", "guides/setup.md", "guides/faq.md"] {
            write(&site, name, "x");
        }

        site.generator.scan_and_emit().unwrap();
        let first = fs::read(&site.output).unwrap();
        fs::remove_file(&site.output).unwrap();
        site.generator.scan_and_emit().unwrap();
        let second = fs::read(&site.output).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_scan_does_not_write() {
        let site = site();
        write(&site, "a.md", "# A");

        let manifest = site.generator.scan().unwrap();

        assert_eq!(manifest.len(), 1);
        assert!(!site.output.exists());
    }

    #[test]
    fn test_missing_content_root_keeps_previous_manifest() {
        let site = site();
        write(&site, "a.md", "# A");
        site.generator.scan_and_emit().unwrap();
        let before = fs::read_to_string(&site.output).unwrap();

        fs::remove_dir_all(&site.content_dir).unwrap();
        let err = site.generator.scan_and_emit().unwrap_err();

        assert!(matches!(err, ManifestError::Scan { .. }));
        assert_eq!(fs::read_to_string(&site.output).unwrap(), before);
    }

    #[test]
    fn test_duplicate_routes_fail_fast() {
        let site = site();
        write(&site, "a.md", "# A");
        write(&site, "a.markdown", "# A again");
        let generator = ManifestGenerator::new(
            site.generator
                .config()
                .clone()
                .with_extensions(vec!["md".to_owned(), "markdown".to_owned()]),
        );

        let err = generator.scan_and_emit().unwrap_err();

        assert!(matches!(err, ManifestError::DuplicateRoute { ref route, .. } if route == "/a"));
        assert!(!site.output.exists());
    }

    #[test]
    fn test_unchanged_manifest_not_rewritten() {
        let site = site();
        write(&site, "a.md", "# A");

        assert!(write_if_changed(&site.output, "one").unwrap());
        assert!(!write_if_changed(&site.output, "one").unwrap());
        assert!(write_if_changed(&site.output, "two").unwrap());
        assert_eq!(fs::read_to_string(&site.output).unwrap(), "two");
    }

    #[test]
    fn test_write_error() {
        let site = site();
        // A directory where the output file should go
        fs::create_dir_all(site.output.join("blocked")).unwrap();

        let err = write_if_changed(&site.output, "text").unwrap_err();

        assert!(matches!(err, ManifestError::Write { .. }));
        assert!(site.output.join("blocked").is_dir());
        // The temp file is cleaned up when the rename fails
        let mut names: Vec<_> = fs::read_dir(site.output.parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        names.sort();
        assert_eq!(names, vec!["content", "routes.gen.tsx"]);
    }

    #[cfg(unix)]
    fn mode(path: &Path) -> u32 {
        use std::os::unix::fs::PermissionsExt;
        fs::metadata(path).unwrap().permissions().mode() & 0o777
    }

    #[cfg(unix)]
    #[test]
    fn test_regeneration_keeps_manifest_mode() {
        use std::os::unix::fs::PermissionsExt;

        let site = site();
        write(&site, "a.md", "# A");
        fs::write(&site.output, "stale").unwrap();
        fs::set_permissions(&site.output, fs::Permissions::from_mode(0o640)).unwrap();

        site.generator.scan_and_emit().unwrap();

        assert!(fs::read_to_string(&site.output).unwrap().contains("\"/a\""));
        assert_eq!(mode(&site.output), 0o640);
    }

    #[cfg(unix)]
    #[test]
    fn test_new_manifest_gets_default_file_mode() {
        let site = site();
        write(&site, "a.md", "# A");
        let sibling = site.output.with_file_name("plain.txt");
        fs::write(&sibling, "x").unwrap();

        site.generator.scan_and_emit().unwrap();

        assert_eq!(mode(&site.output), mode(&sibling));
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_write_keeps_previous_manifest() {
        use std::os::unix::fs::PermissionsExt;

        let site = site();
        write(&site, "a.md", "# A");
        site.generator.scan_and_emit().unwrap();
        let before = fs::read(&site.output).unwrap();
        let dir = site.output.parent().unwrap().to_path_buf();
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o555)).unwrap();

        // Privileged users ignore directory permissions
        let enforced = fs::write(dir.join("check"), "").is_err();
        let result = write_if_changed(&site.output, "different text");
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o755)).unwrap();

        if enforced {
            assert!(matches!(result, Err(ManifestError::Write { .. })));
            assert_eq!(fs::read(&site.output).unwrap(), before);
        }
    }

    #[test]
    fn test_build_start_registers_content_dir() {
        let site = site();
        write(&site, "intro.md", "# Intro");
        let mut ctx = PluginContext::new();

        site.generator.build_start(&mut ctx).unwrap();

        assert!(site.output.exists());
        let watched: Vec<_> = ctx.watch_files().collect();
        assert_eq!(watched, vec![site.content_dir.as_path()]);
    }

    #[test]
    fn test_build_start_failure_is_fatal() {
        let site = site();
        fs::remove_dir_all(&site.content_dir).unwrap();
        let mut ctx = PluginContext::new();

        let err = site.generator.build_start(&mut ctx).unwrap_err();

        assert_eq!(err.hook, Hook::BuildStart);
        assert!(err.downcast_source::<ManifestError>().is_some());
        assert_eq!(ctx.watch_files().count(), 0);
    }

    #[test]
    fn test_watch_change_filters_by_extension() {
        let site = site();
        write(&site, "guide.md", "# Guide");
        let mut ctx = PluginContext::new();

        site.generator
            .watch_change(
                &mut ctx,
                &site.content_dir.join("image.png"),
                ChangeKind::Created,
            )
            .unwrap();
        assert!(!site.output.exists());

        site.generator
            .watch_change(
                &mut ctx,
                &site.content_dir.join("guide.md"),
                ChangeKind::Modified,
            )
            .unwrap();
        assert!(site.output.exists());
    }

    #[test]
    fn test_watch_change_picks_up_new_files() {
        let site = site();
        write(&site, "a.md", "# A");
        let mut ctx = PluginContext::new();
        site.generator.build_start(&mut ctx).unwrap();

        write(&site, "b.md", "# B");
        site.generator
            .watch_change(&mut ctx, &site.content_dir.join("b.md"), ChangeKind::Created)
            .unwrap();

        let text = fs::read_to_string(&site.output).unwrap();
        assert!(text.contains("\"/b\""));
    }

    #[test]
    fn test_removed_file_dropped_from_manifest() {
        let site = site();
        write(&site, "a.md", "# A");
        write(&site, "b.md", "# B");
        let mut ctx = PluginContext::new();
        site.generator.build_start(&mut ctx).unwrap();

        fs::remove_file(site.content_dir.join("b.md")).unwrap();
        site.generator
            .watch_change(&mut ctx, &site.content_dir.join("b.md"), ChangeKind::Removed)
            .unwrap();

        let text = fs::read_to_string(&site.output).unwrap();
        assert!(!text.contains("\"/b\""));
        assert!(text.contains("\"/a\""));
    }
}
