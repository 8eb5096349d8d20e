//! In-process component model.
//!
//! Mirrors the two branches of the synthesized module: server rendering yields
//! an HTML fragment, client rendering yields a detached element to mount.

/// Rendering context supplied by the host runtime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderContext {
    /// Server-side rendering. The key identifies the node for hydration.
    Server {
        /// Hydration key written as `data-hk` on the wrapper element.
        hydration_key: String,
    },
    /// Client-side rendering.
    Client,
}

/// Detached element produced by the client branch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    /// Tag name.
    pub tag: &'static str,
    /// Content assigned as `innerHTML`.
    pub inner_html: String,
}

impl Element {
    /// Serialize the element with its content.
    #[must_use]
    pub fn outer_html(&self) -> String {
        format!("<{tag}>{}</{tag}>", self.inner_html, tag = self.tag)
    }
}

/// Output of [`Component::render`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rendered {
    /// Server-rendered HTML.
    Fragment(String),
    /// Element for the client to mount.
    Element(Element),
}

/// Default export of a content module: a zero-argument component around
/// compiled HTML.
///
/// The content is opaque to the UI framework. Both branches wrap it in a `div`
/// so the server markup and the client element have the same shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Component {
    html: String,
}

/// Tag of the wrapper element in both branches.
const WRAPPER_TAG: &str = "div";

impl Component {
    /// Wrap compiled HTML.
    #[must_use]
    pub fn new(html: String) -> Self {
        Self { html }
    }

    /// The compiled content accessor.
    #[must_use]
    pub fn compiled_content(&self) -> &str {
        &self.html
    }

    /// Render for the given context.
    #[must_use]
    pub fn render(&self, ctx: &RenderContext) -> Rendered {
        match ctx {
            RenderContext::Server { hydration_key } => Rendered::Fragment(format!(
                "<{WRAPPER_TAG} data-hk=\"{}\">{}</{WRAPPER_TAG}>",
                escape_attr(hydration_key),
                self.html
            )),
            RenderContext::Client => Rendered::Element(Element {
                tag: WRAPPER_TAG,
                inner_html: self.html.clone(),
            }),
        }
    }
}

/// Escape a string for use inside a double-quoted attribute.
fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
