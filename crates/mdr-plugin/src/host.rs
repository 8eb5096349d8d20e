//! Watch-mode host.
//!
//! [`WatchHost`] plays the role of the asset pipeline in development: it runs
//! `build_start`, watches every path plugins register, and forwards debounced
//! file-system changes to `watch_change`.
//!
//! All hooks run on a single drain thread, one change at a time, so two
//! `watch_change` calls never overlap. A failing hook stops the host and the
//! error is returned from [`WatchSession::wait`].

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::{Arc, mpsc};
use std::thread::JoinHandle;
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};

use crate::context::PluginContext;
use crate::debouncer::{DebouncedEvent, EventDebouncer};
use crate::driver::PluginDriver;
use crate::error::PluginError;
use crate::plugin::ChangeKind;

/// Default debounce duration in milliseconds.
const DEFAULT_DEBOUNCE_MS: u64 = 100;

/// How often the drain thread checks for shutdown and ready events.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Error stopping the watch host.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// A plugin hook failed.
    #[error(transparent)]
    Plugin(#[from] PluginError),
    /// The native file watcher failed.
    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),
    /// The drain thread panicked.
    #[error("Watch thread panicked")]
    Panicked,
}

/// Convert a `notify::EventKind` to a [`ChangeKind`].
///
/// Returns `None` for event kinds that don't change content (e.g. Access).
fn change_kind(kind: notify::EventKind) -> Option<ChangeKind> {
    match kind {
        notify::EventKind::Create(_) => Some(ChangeKind::Created),
        notify::EventKind::Modify(_) => Some(ChangeKind::Modified),
        notify::EventKind::Remove(_) => Some(ChangeKind::Removed),
        _ => None,
    }
}

/// Development host driving plugins from file-system events.
pub struct WatchHost {
    driver: PluginDriver,
    ctx: PluginContext,
    debounce: Duration,
}

impl WatchHost {
    /// Create a host around a configured driver.
    #[must_use]
    pub fn new(driver: PluginDriver) -> Self {
        Self {
            driver,
            ctx: PluginContext::new(),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
        }
    }

    /// Set the debounce duration.
    #[must_use]
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// The plugin driver.
    #[must_use]
    pub fn driver(&self) -> &PluginDriver {
        &self.driver
    }

    /// The plugin context (watch registrations so far).
    #[must_use]
    pub fn context(&self) -> &PluginContext {
        &self.ctx
    }

    /// Run `build_start` on every plugin.
    pub fn start(&mut self) -> Result<(), PluginError> {
        self.driver.build_start(&mut self.ctx)?;
        tracing::info!(
            plugins = ?self.driver.plugin_names().collect::<Vec<_>>(),
            "Build started"
        );
        Ok(())
    }

    /// Start watching registered paths on a background thread.
    ///
    /// Call [`start`](Self::start) first so plugins can register their paths.
    pub fn watch(self) -> Result<WatchSession, HostError> {
        let (shutdown_tx, shutdown_rx) = mpsc::channel();
        let debouncer = Arc::new(EventDebouncer::new(self.debounce));

        let watcher_debouncer = Arc::clone(&debouncer);
        let mut watcher =
            notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
                record_event(&watcher_debouncer, res);
            })?;

        let mut watched = BTreeSet::new();
        sync_watches(&mut watcher, &self.ctx, &mut watched)?;

        let Self {
            driver, mut ctx, ..
        } = self;

        let thread = std::thread::spawn(move || -> Result<(), HostError> {
            loop {
                match shutdown_rx.recv_timeout(POLL_INTERVAL) {
                    Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => return Ok(()),
                    Err(mpsc::RecvTimeoutError::Timeout) => {}
                }

                let events = debouncer.drain_ready();
                if events.is_empty() {
                    continue;
                }

                dispatch(&driver, &mut ctx, &events)?;
                // Hooks may have registered new paths
                sync_watches(&mut watcher, &ctx, &mut watched)?;
            }
        });

        Ok(WatchSession {
            handle: WatchHandle::new(shutdown_tx),
            thread,
        })
    }
}

/// Feed one watcher callback result into the debouncer.
///
/// Watcher errors don't stop the host; they are logged and the event is dropped.
fn record_event(debouncer: &EventDebouncer, res: Result<notify::Event, notify::Error>) {
    let event = match res {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(error = %e, paths = ?e.paths, "File watcher error");
            return;
        }
    };
    let Some(kind) = change_kind(event.kind) else {
        return;
    };
    for path in event.paths {
        debouncer.record(path, kind);
    }
}

/// Start watching paths registered in `ctx` that aren't watched yet.
fn sync_watches(
    watcher: &mut RecommendedWatcher,
    ctx: &PluginContext,
    watched: &mut BTreeSet<PathBuf>,
) -> Result<(), notify::Error> {
    for path in ctx.watch_files() {
        if watched.contains(path) {
            continue;
        }
        watcher.watch(path, RecursiveMode::Recursive)?;
        tracing::info!(path = %path.display(), "Watching");
        watched.insert(path.to_path_buf());
    }
    Ok(())
}

/// Forward debounced events to `watch_change`, one at a time.
fn dispatch(
    driver: &PluginDriver,
    ctx: &mut PluginContext,
    events: &[DebouncedEvent],
) -> Result<(), PluginError> {
    for event in events {
        tracing::debug!(path = %event.path.display(), kind = ?event.kind, "File changed");
        driver
            .watch_change(ctx, &event.path, event.kind)
            .inspect_err(|e| tracing::error!(error = %e, "Watch hook failed, stopping"))?;
    }
    Ok(())
}

/// Running watch loop.
pub struct WatchSession {
    handle: WatchHandle,
    thread: JoinHandle<Result<(), HostError>>,
}

impl WatchSession {
    /// Block until the watch loop ends (a hook failed or the watcher broke).
    pub fn wait(self) -> Result<(), HostError> {
        let Self { handle, thread } = self;
        let result = thread.join().map_err(|_| HostError::Panicked)?;
        drop(handle);
        result
    }

    /// Stop watching and wait for the drain thread to exit.
    pub fn stop(self) -> Result<(), HostError> {
        let Self { handle, thread } = self;
        handle.stop();
        thread.join().map_err(|_| HostError::Panicked)?
    }
}

/// Handle to stop watching for changes.
///
/// Uses RAII pattern - dropping the handle stops watching automatically.
/// Signals shutdown by dropping the internal channel sender.
pub struct WatchHandle {
    _shutdown: Option<mpsc::Sender<()>>,
}

impl WatchHandle {
    fn new(shutdown: mpsc::Sender<()>) -> Self {
        Self {
            _shutdown: Some(shutdown),
        }
    }

    /// Stop watching immediately (consumes the handle).
    pub fn stop(mut self) {
        self._shutdown.take();
    }
}
