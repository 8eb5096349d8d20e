//! Sequential hook runner over an ordered list of plugins.

use std::path::Path;

use crate::context::PluginContext;
use crate::error::PluginError;
use crate::plugin::{ChangeKind, Plugin};

/// Error returned by [`PluginDriver::import`].
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// A plugin hook failed.
    #[error(transparent)]
    Plugin(#[from] PluginError),
    /// No plugin claimed the import id.
    #[error("No plugin resolved import \"{0}\"")]
    Unresolved(String),
    /// The id was resolved but no plugin supplied its source.
    #[error("No plugin loaded module \"{0}\"")]
    NotLoaded(String),
}

/// Module produced by [`PluginDriver::import`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadedModule {
    /// Internal id returned by `resolve_id`.
    pub id: String,
    /// Module source text returned by `load`.
    pub source: String,
}

/// Runs hooks across registered plugins in registration order.
///
/// `build_start` and `watch_change` run on every plugin and stop at the first
/// error. `resolve_id` and `load` return the first non-`None` result.
#[derive(Default)]
pub struct PluginDriver {
    plugins: Vec<Box<dyn Plugin>>,
}

impl PluginDriver {
    /// Create a driver with no plugins.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a plugin. Earlier plugins take precedence in `resolve_id`/`load`.
    pub fn register(&mut self, plugin: impl Plugin + 'static) {
        self.plugins.push(Box::new(plugin));
    }

    /// Names of registered plugins, in order.
    pub fn plugin_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.plugins.iter().map(|p| p.name())
    }

    /// Run `build_start` on every plugin.
    pub fn build_start(&self, ctx: &mut PluginContext) -> Result<(), PluginError> {
        for plugin in &self.plugins {
            plugin.build_start(ctx).map_err(tag(plugin.as_ref()))?;
        }
        Ok(())
    }

    /// Run `watch_change` on every plugin.
    pub fn watch_change(
        &self,
        ctx: &mut PluginContext,
        path: &Path,
        kind: ChangeKind,
    ) -> Result<(), PluginError> {
        for plugin in &self.plugins {
            plugin
                .watch_change(ctx, path, kind)
                .map_err(tag(plugin.as_ref()))?;
        }
        Ok(())
    }

    /// Return the first internal id any plugin resolves `id` to.
    pub fn resolve_id(&self, id: &str) -> Result<Option<String>, PluginError> {
        for plugin in &self.plugins {
            if let Some(resolved) = plugin.resolve_id(id).map_err(tag(plugin.as_ref()))? {
                tracing::trace!(plugin = plugin.name(), %id, %resolved, "Resolved import");
                return Ok(Some(resolved));
            }
        }
        Ok(None)
    }

    /// Return the first module source any plugin loads for `id`.
    pub fn load(&self, id: &str) -> Result<Option<String>, PluginError> {
        for plugin in &self.plugins {
            if let Some(source) = plugin.load(id).map_err(tag(plugin.as_ref()))? {
                return Ok(Some(source));
            }
        }
        Ok(None)
    }

    /// Resolve and load `specifier` the way the host does for a dynamic import.
    ///
    /// Ids that no plugin claims would fall through to filesystem resolution in a
    /// real host; here they are reported as [`DriverError::Unresolved`].
    pub fn import(&self, specifier: &str) -> Result<LoadedModule, DriverError> {
        let id = self
            .resolve_id(specifier)?
            .ok_or_else(|| DriverError::Unresolved(specifier.to_owned()))?;
        let source = self
            .load(&id)?
            .ok_or_else(|| DriverError::NotLoaded(specifier.to_owned()))?;
        Ok(LoadedModule { id, source })
    }
}

/// Attach the plugin name to an error unless the plugin already did.
fn tag(plugin: &dyn Plugin) -> impl FnOnce(PluginError) -> PluginError {
    let name = plugin.name();
    move |err| {
        if err.plugin.is_some() {
            err
        } else {
            err.with_plugin(name)
        }
    }
}
