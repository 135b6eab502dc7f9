//! Parser trait definition.

use crate::{Document, ParseError};

/// Trait for turning a source file into a [`Document`].
///
/// # Example
///
/// ```rust,ignore
/// use potluck_parser::{Document, ParseError, Parser};
///
/// struct PlainParser;
///
/// impl Parser for PlainParser {
///     fn name(&self) -> &str {
///         "plain"
///     }
///
///     fn extensions(&self) -> &[&str] {
///         &["txt"]
///     }
///
///     fn parse(&self, slug: &str, source: &str) -> Result<Document, ParseError> {
///         Ok(Document::new(slug, None, Vec::new(), format!("<pre>{}</pre>", source)))
///     }
/// }
/// ```
pub trait Parser {
    /// Returns the name of this parser.
    fn name(&self) -> &str;

    /// Returns the file extensions this parser handles.
    ///
    /// Extensions should not include the leading dot (e.g., `["md", "markdown"]`).
    fn extensions(&self) -> &[&str];

    /// Parses `source`, the content of the file named by `slug`.
    fn parse(&self, slug: &str, source: &str) -> Result<Document, ParseError>;

    /// Returns true if this parser can handle the given file extension.
    fn can_parse(&self, extension: &str) -> bool {
        self.extensions()
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }
}
