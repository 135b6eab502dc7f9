//! Markdown recipe parser using markdown-rs (wooorm/markdown-rs).
//!
//! Metadata is read from the raw lines before rendering: the renderer never
//! sees `;tags:` lines, and the title is the first `# ` heading as written.

use markdown::{Options, to_html_with_options};

use crate::{Document, ParseError, Parser};

/// Line prefix that introduces a recipe's tag list.
pub const TAGS_PREFIX: &str = ";tags: ";

/// Markdown parser implementation.
///
/// Uses `markdown-rs` with GFM options for the body.
pub struct MarkdownParser {
    options: Options,
}

impl MarkdownParser {
    /// Creates a new Markdown parser with default options.
    pub fn new() -> Self {
        Self {
            options: Self::default_options(),
        }
    }

    /// Gets default render options (GFM).
    fn default_options() -> Options {
        Options::gfm()
    }

    /// Renders a Markdown fragment that carries no recipe metadata, such as
    /// the site's index introduction.
    pub fn render_fragment(&self, name: &str, source: &str) -> Result<String, ParseError> {
        to_html_with_options(source, &self.options)
            .map_err(|message| ParseError::invalid_source(name, message.to_string()))
    }
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for MarkdownParser {
    fn name(&self) -> &str {
        "markdown"
    }

    fn extensions(&self) -> &[&str] {
        &["md"]
    }

    fn parse(&self, slug: &str, source: &str) -> Result<Document, ParseError> {
        let mut title = None;
        let mut tags: Vec<String> = Vec::new();
        let mut body = String::with_capacity(source.len());

        for line in source.lines() {
            if let Some(list) = line.strip_prefix(TAGS_PREFIX) {
                for tag in list.split_whitespace() {
                    if !tags.iter().any(|existing| existing == tag) {
                        tags.push(tag.to_string());
                    }
                }
                continue;
            }

            if title.is_none()
                && let Some(heading) = line.strip_prefix("# ")
                && !heading.trim().is_empty()
            {
                title = Some(heading.trim().to_string());
            }

            body.push_str(line);
            body.push('\n');
        }

        let html = self.render_fragment(slug, &body)?;

        Ok(Document::new(slug, title, tags, html))
    }
}
