//! Plugin error type.
//!
//! [`PluginError`] carries the failing plugin and hook alongside the
//! plugin-specific source error, so the host can report where a build failed
//! without knowing every plugin's error type.

/// Hook that produced an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hook {
    /// [`Plugin::build_start`](crate::Plugin::build_start).
    BuildStart,
    /// [`Plugin::watch_change`](crate::Plugin::watch_change).
    WatchChange,
    /// [`Plugin::resolve_id`](crate::Plugin::resolve_id).
    ResolveId,
    /// [`Plugin::load`](crate::Plugin::load).
    Load,
}

impl Hook {
    /// Hook name as it appears in messages.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BuildStart => "buildStart",
            Self::WatchChange => "watchChange",
            Self::ResolveId => "resolveId",
            Self::Load => "load",
        }
    }
}

impl std::fmt::Display for Hook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fatal error raised by a plugin hook.
#[derive(Debug)]
pub struct PluginError {
    /// Hook that failed.
    pub hook: Hook,
    /// Name of the failing plugin (set by the driver if the plugin didn't).
    pub plugin: Option<&'static str>,
    source: Box<dyn std::error::Error + Send + Sync>,
}

impl PluginError {
    /// Create a new error for `hook` wrapping `source`.
    #[must_use]
    pub fn new(hook: Hook, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self {
            hook,
            plugin: None,
            source: Box::new(source),
        }
    }

    /// Attach the plugin name.
    #[must_use]
    pub fn with_plugin(mut self, plugin: &'static str) -> Self {
        self.plugin = Some(plugin);
        self
    }

    /// Downcast the source error to a concrete type.
    #[must_use]
    pub fn downcast_source<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.source.downcast_ref()
    }
}

impl std::fmt::Display for PluginError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[plugin] hook: message"
        if let Some(plugin) = self.plugin {
            write!(f, "[{plugin}] ")?;
        }
        write!(f, "{}: {}", self.hook, self.source)
    }
}

impl std::error::Error for PluginError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}
