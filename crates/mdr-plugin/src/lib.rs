//! Build hook contract for mdr.
//!
//! A host asset pipeline drives mdr through a small, fixed set of hooks:
//!
//! - [`Plugin::build_start`] once when the build starts
//! - [`Plugin::watch_change`] for every file-system change the host observes
//! - [`Plugin::resolve_id`] to claim an import id before filesystem resolution
//! - [`Plugin::load`] to supply module source for a claimed id
//!
//! Hooks can register directories for watching through
//! [`PluginContext::add_watch_file`]. The [`PluginDriver`] runs hooks across an
//! ordered list of plugins, and [`WatchHost`] turns native file-system events into
//! `watch_change` calls.
//!
//! # Example
//!
//! ```ignore
//! use mdr_plugin::{PluginDriver, WatchHost};
//!
//! let mut driver = PluginDriver::new();
//! driver.register(generator);
//! driver.register(registry);
//!
//! let mut host = WatchHost::new(driver);
//! host.start()?;
//! let session = host.watch()?;
//! session.wait()?;
//! ```

mod context;
mod debouncer;
mod driver;
mod error;
mod host;
mod plugin;

pub use context::PluginContext;
pub use driver::{DriverError, LoadedModule, PluginDriver};
pub use error::{Hook, PluginError};
pub use host::{HostError, WatchHandle, WatchHost, WatchSession};
pub use plugin::{ChangeKind, Plugin};
