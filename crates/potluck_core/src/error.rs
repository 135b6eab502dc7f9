//! Site builder error types.

use std::path::Path;

use thiserror::Error;

/// Errors raised by the ordered indexes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IndexError {
    /// The index arena is full.
    #[error("{index} index is full ({capacity} entries); raise the configured limit")]
    CapacityExceeded {
        /// Which index overflowed.
        index: &'static str,
        /// Configured capacity.
        capacity: usize,
    },
}

/// Errors that can occur while building a site.
#[derive(Debug, Error)]
pub enum SiteError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O error.
    #[error("File error: {0}")]
    File(String),

    /// Document parse error.
    #[error("Parse error: {0}")]
    Parse(#[from] potluck_parser::ParseError),

    /// Cache error.
    #[error("Cache error: {0}")]
    Cache(#[from] potluck_cache::CacheError),

    /// Index error.
    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    /// Revision metadata lookup failed.
    #[error("Metadata error for {path}: {message}")]
    Metadata {
        /// Source file the lookup was for.
        path: String,
        /// Failure description.
        message: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SiteError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a file error.
    pub fn file(message: impl Into<String>) -> Self {
        Self::File(message.into())
    }

    /// Creates a file error for `path` carrying the OS error text.
    pub fn io_at(path: &Path, error: std::io::Error) -> Self {
        Self::File(format!("{}: {}", path.display(), error))
    }

    /// Creates a metadata error.
    pub fn metadata(path: &Path, message: impl Into<String>) -> Self {
        Self::Metadata {
            path: path.display().to_string(),
            message: message.into(),
        }
    }
}
