//! Virtual content modules for mdr.
//!
//! Import ids carrying a content-type marker (e.g. `./content/docs/intro.md?markdown`)
//! have no backing file. [`VirtualModuleRegistry`] claims them during resolution,
//! tags them with a `\0` prefix so the host skips filesystem resolution, and
//! synthesizes a component module wrapping the compiled content on load.
//!
//! # Architecture
//!
//! - [`ContentKind`]: enumerated content types and their markers
//! - [`Specifier`]: permissive `base?query` parsing
//! - [`VirtualId`]: a claimed id, parsed once into base specifier and kind
//! - [`ContentCompiler`]: the upstream "compiled content" capability
//! - [`Component`]: in-process counterpart of the synthesized module
//!
//! # Example
//!
//! ```ignore
//! use mdr_virtual::{RenderContext, VirtualModuleRegistry};
//!
//! let registry = VirtualModuleRegistry::with_defaults("src");
//! let id = registry.resolve("./content/docs/intro.md?markdown")?.unwrap();
//! let source = registry.synthesize(&id)?.unwrap();
//! let component = registry.instantiate(&id)?.unwrap();
//! let rendered = component.render(&RenderContext::Client);
//! ```

mod compiler;
mod component;
mod error;
mod id;
mod kind;
mod registry;
mod specifier;
mod template;

pub use compiler::{ContentCompiler, MarkdownCompiler};
pub use component::{Component, Element, RenderContext, Rendered};
pub use error::VirtualError;
pub use id::VirtualId;
pub use kind::ContentKind;
pub use registry::VirtualModuleRegistry;
pub use specifier::Specifier;
pub use template::component_source;
