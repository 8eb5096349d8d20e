//! The [`Plugin`] trait consumed by the host pipeline.

use std::path::Path;

use crate::context::PluginContext;
use crate::error::PluginError;

/// Kind of file-system change passed to [`Plugin::watch_change`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeKind {
    /// File was created.
    Created,
    /// File was modified.
    Modified,
    /// File was removed.
    Removed,
}

/// Build-time plugin driven by the host pipeline.
///
/// Every hook has a default "no opinion" implementation, so a plugin only
/// implements the hooks it cares about. Returning `Ok(None)` from
/// [`resolve_id`](Self::resolve_id) or [`load`](Self::load) lets the next plugin
/// (or the host's own filesystem resolution) handle the id.
///
/// Errors are fatal: the host halts the build and surfaces them to the operator.
pub trait Plugin: Send + Sync {
    /// Plugin name used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Called once when the build starts.
    fn build_start(&self, _ctx: &mut PluginContext) -> Result<(), PluginError> {
        Ok(())
    }

    /// Called for every file-system change observed by the host.
    ///
    /// `path` is the absolute path of the changed file.
    fn watch_change(
        &self,
        _ctx: &mut PluginContext,
        _path: &Path,
        _kind: ChangeKind,
    ) -> Result<(), PluginError> {
        Ok(())
    }

    /// Claim an import id, returning the internal id to use for [`load`](Self::load).
    fn resolve_id(&self, _id: &str) -> Result<Option<String>, PluginError> {
        Ok(None)
    }

    /// Supply module source text for an internal id.
    fn load(&self, _id: &str) -> Result<Option<String>, PluginError> {
        Ok(None)
    }
}
