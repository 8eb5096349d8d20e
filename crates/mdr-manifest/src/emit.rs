//! Manifest source emission.

use std::fmt::Write;

use crate::manifest::Manifest;

/// Header written at the top of every generated manifest.
pub const GENERATED_HEADER: &str =
    "// @ts-nocheck\n// DO NOT MODIFY THIS FILE. It's generated by mdr!\n";

/// Render the generated manifest module.
///
/// The module exports one object literal mapping each route key to a
/// zero-argument dynamic-import factory, checked against the factory shape
/// with `satisfies`. Output depends only on the manifest, so equal manifests
/// render byte-identical text.
#[must_use]
pub fn render_module(manifest: &Manifest) -> String {
    let mut out = String::with_capacity(128 + manifest.len() * 96);
    out.push_str(GENERATED_HEADER);
    out.push_str("\nexport const manifest = {\n");
    for entry in manifest {
        let _ = writeln!(
            out,
            "\t{}: () => import({}),",
            js_string(entry.route.as_str()),
            js_string(&entry.specifier)
        );
    }
    out.push_str("} satisfies Record<string, () => Promise<unknown>>;\n");
    out
}

/// Quote `value` as a JavaScript string literal.
fn js_string(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}
