//! Parse error types.

use thiserror::Error;

/// Errors that can occur while parsing a recipe.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The source text could not be rendered.
    #[error("Invalid source in {slug}: {message}")]
    InvalidSource {
        /// Slug of the offending document.
        slug: String,
        /// Error message from the renderer.
        message: String,
    },

    /// An internal parser error occurred.
    #[error("Internal parser error: {0}")]
    Internal(String),
}

impl ParseError {
    /// Creates a new invalid source error.
    pub fn invalid_source(slug: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSource {
            slug: slug.into(),
            message: message.into(),
        }
    }

    /// Creates a new internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}
