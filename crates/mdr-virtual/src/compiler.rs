//! The "compiled content" capability.
//!
//! Turning markdown into HTML belongs to an upstream collaborator; virtual
//! modules only wrap its output. [`ContentCompiler`] is that seam, and
//! [`MarkdownCompiler`] is the default pulldown-cmark implementation.

use pulldown_cmark::{Options, Parser, html};

/// Compiles content source into an HTML string.
pub trait ContentCompiler: Send + Sync {
    /// Compile `source` to HTML.
    fn compile(&self, source: &str) -> String;
}

/// CommonMark + GFM compiler backed by pulldown-cmark.
///
/// YAML front matter (`---` blocks at the top) is parsed and dropped from the
/// output.
pub struct MarkdownCompiler {
    options: Options,
}

impl MarkdownCompiler {
    /// Create a compiler with tables, footnotes, strikethrough, task lists and
    /// front matter support enabled.
    #[must_use]
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_YAML_STYLE_METADATA_BLOCKS);
        Self { options }
    }
}

impl Default for MarkdownCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentCompiler for MarkdownCompiler {
    fn compile(&self, source: &str) -> String {
        let parser = Parser::new_ext(source, self.options);
        let mut out = String::with_capacity(source.len() * 3 / 2);
        html::push_html(&mut out, parser);
        out
    }
}
