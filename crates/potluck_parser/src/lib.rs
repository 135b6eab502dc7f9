//! # potluck_parser
//!
//! Parser layer for Potluck recipe documents.
//!
//! This crate provides:
//! - A `Parser` trait for document formats
//! - The built-in Markdown parser using `markdown-rs`
//! - The `Document` type handed to the site builder
//!
//! ## Document conventions
//!
//! - The first `# ` heading is the recipe title.
//! - Lines starting with `;tags: ` list space-separated tags and are removed
//!   from the rendered body.
//!
//! ## Example
//!
//! ```rust,ignore
//! use potluck_parser::{MarkdownParser, Parser};
//!
//! let parser = MarkdownParser::new();
//! let source = "# Pancakes\n;tags: breakfast sweet\n\nMix and fry.";
//!
//! let document = parser.parse("pancakes", source).unwrap();
//! assert_eq!(document.title.as_deref(), Some("Pancakes"));
//! ```

mod document;
mod error;
mod markdown;
mod traits;

pub use document::Document;
pub use error::ParseError;
pub use markdown::{MarkdownParser, TAGS_PREFIX};
pub use traits::Parser;
