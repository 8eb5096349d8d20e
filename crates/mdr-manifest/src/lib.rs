//! Content manifest generator for mdr.
//!
//! Scans a content directory of markdown documents and emits a generated source
//! module mapping each route key to a lazy import of the document:
//!
//! ```text
//! // @ts-nocheck
//! // DO NOT MODIFY THIS FILE. It's generated by mdr!
//!
//! export const manifest = {
//! 	"/guides/setup": () => import("./content/docs/guides/setup.md?markdown"),
//! } satisfies Record<string, () => Promise<unknown>>;
//! ```
//!
//! The `?markdown` marker routes each import through the virtual content modules
//! of `mdr-virtual`.
//!
//! [`ManifestGenerator`] implements the [`Plugin`](mdr_plugin::Plugin) hooks: it
//! regenerates the manifest at build start and whenever a content file changes.
//! Each run also returns the typed [`Manifest`], so in-process consumers don't
//! need to read the generated file back.

mod emit;
mod error;
mod generator;
mod manifest;
mod route;
mod scanner;

pub use emit::{GENERATED_HEADER, render_module};
pub use error::ManifestError;
pub use generator::{GeneratorConfig, ManifestGenerator};
pub use manifest::{Manifest, ManifestBuilder, ManifestEntry};
pub use route::RouteKey;
pub use scanner::{ContentEntry, Scanner};
