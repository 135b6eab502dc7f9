//! Parsed recipe document.

/// A recipe after parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// File stem of the source.
    pub slug: String,

    /// Text of the first level-one heading, if any.
    pub title: Option<String>,

    /// Tags from `;tags:` lines, in document order, without duplicates.
    pub tags: Vec<String>,

    /// Rendered HTML body (tag lines removed).
    pub html: String,
}

impl Document {
    /// Creates a document.
    pub fn new(
        slug: impl Into<String>,
        title: Option<String>,
        tags: Vec<String>,
        html: impl Into<String>,
    ) -> Self {
        Self {
            slug: slug.into(),
            title,
            tags,
            html: html.into(),
        }
    }

    /// Returns the title, falling back to the slug.
    pub fn title_or_slug(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.slug)
    }
}
