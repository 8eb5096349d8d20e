//! Source text of synthesized content modules.

/// Build the component module for a content import.
///
/// `base` is the import path with the content marker removed; the upstream
/// compiler serves `compiledContent` from it. The default export takes no
/// arguments and branches on `import.meta.env.SSR`:
///
/// - server: `<div data-hk=…>` + compiled HTML, via `ssr` and `ssrHydrationKey`
/// - client: a detached `div` with the compiled HTML as `innerHTML`
#[must_use]
pub fn component_source(base: &str) -> String {
    // JSON string literals are valid JavaScript string literals
    let base = serde_json::Value::from(base).to_string();
    format!(
        r#"import {{ compiledContent }} from {base};
import {{ ssr, ssrHydrationKey }} from "solid-js/web";

export default function Component() {{
	if (import.meta.env.SSR) {{
		return ssr(["<div", ">", "</div>"], ssrHydrationKey(), compiledContent());
	}}

	const child = document.createElement("div");
	child.innerHTML = compiledContent();
	return child;
}}
"#
    )
}
