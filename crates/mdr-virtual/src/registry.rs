//! Typed registry of virtual content modules.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use mdr_plugin::{Hook, Plugin, PluginError};

use crate::compiler::{ContentCompiler, MarkdownCompiler};
use crate::component::Component;
use crate::error::VirtualError;
use crate::id::VirtualId;
use crate::kind::ContentKind;
use crate::template::component_source;

/// Plugin name reported to the host.
const PLUGIN_NAME: &str = "content-entrypoint";

/// Registry of content kinds that resolve to virtual component modules.
///
/// Only kinds with a registered [`ContentCompiler`] are claimed; ids carrying
/// any other marker are left to the host. Relative base specifiers are resolved
/// against the source root, the directory the generated manifest imports from.
pub struct VirtualModuleRegistry {
    source_root: PathBuf,
    compilers: HashMap<ContentKind, Box<dyn ContentCompiler>>,
}

impl VirtualModuleRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new(source_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            compilers: HashMap::new(),
        }
    }

    /// Create a registry with the default compiler for every kind.
    #[must_use]
    pub fn with_defaults(source_root: impl Into<PathBuf>) -> Self {
        let mut registry = Self::new(source_root);
        registry.register(ContentKind::Markdown, MarkdownCompiler::new());
        registry
    }

    /// Register (or replace) the compiler for `kind`.
    pub fn register(&mut self, kind: ContentKind, compiler: impl ContentCompiler + 'static) {
        self.compilers.insert(kind, Box::new(compiler));
    }

    /// Check whether `kind` has a compiler.
    #[must_use]
    pub fn is_registered(&self, kind: ContentKind) -> bool {
        self.compilers.contains_key(&kind)
    }

    /// Claim an import request.
    ///
    /// Returns the internal id if the request carries the marker of a
    /// registered kind, `None` otherwise.
    pub fn resolve(&self, id: &str) -> Result<Option<String>, VirtualError> {
        Ok(VirtualId::from_request(id)?
            .filter(|vid| self.is_registered(vid.kind()))
            .map(|vid| vid.internal()))
    }

    /// Synthesize component module source for an internal id.
    ///
    /// Returns `None` for ids this registry did not claim.
    pub fn synthesize(&self, id: &str) -> Result<Option<String>, VirtualError> {
        let Some(vid) = self.claimed(id)? else {
            return Ok(None);
        };
        tracing::debug!(id = %vid, kind = %vid.kind(), "Synthesizing content module");
        Ok(Some(component_source(vid.base())))
    }

    /// Build the component for an internal id in-process.
    ///
    /// Reads the base file relative to the source root and compiles it with the
    /// kind's compiler. Returns `None` for ids this registry did not claim.
    pub fn instantiate(&self, id: &str) -> Result<Option<Component>, VirtualError> {
        let Some(vid) = VirtualId::from_internal(id)? else {
            return Ok(None);
        };
        let compiler = self
            .compilers
            .get(&vid.kind())
            .ok_or(VirtualError::UnregisteredKind(vid.kind()))?;

        let path = self.content_path(vid.base());
        let source = fs::read_to_string(&path).map_err(|source| VirtualError::Read {
            path: path.clone(),
            source,
        })?;

        Ok(Some(Component::new(compiler.compile(&source))))
    }

    /// Map a base specifier to a file path.
    ///
    /// Absolute paths are used as-is; relative ones are joined to the source root.
    #[must_use]
    pub fn content_path(&self, base: &str) -> PathBuf {
        let path = Path::new(base);
        if path.is_absolute() {
            return path.to_path_buf();
        }
        let relative = base.strip_prefix("./").unwrap_or(base);
        self.source_root.join(relative)
    }

    /// Parse an internal id and keep it only if its kind is registered.
    fn claimed(&self, id: &str) -> Result<Option<VirtualId>, VirtualError> {
        Ok(VirtualId::from_internal(id)?.filter(|vid| self.is_registered(vid.kind())))
    }
}

impl Plugin for VirtualModuleRegistry {
    fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    fn resolve_id(&self, id: &str) -> Result<Option<String>, PluginError> {
        self.resolve(id)
            .map_err(|e| PluginError::new(Hook::ResolveId, e))
    }

    fn load(&self, id: &str) -> Result<Option<String>, PluginError> {
        self.synthesize(id).map_err(|e| PluginError::new(Hook::Load, e))
    }
}
