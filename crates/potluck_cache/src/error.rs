//! Cache error types.

use thiserror::Error;

/// Errors that can occur in the cache system.
///
/// Every variant is fatal for a build: the run aborts before the cache file
/// is rewritten.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Failed to read or create the cache file.
    #[error("Failed to read cache: {0}")]
    ReadError(String),

    /// Failed to write the cache file.
    #[error("Failed to write cache: {0}")]
    WriteError(String),

    /// Cache file does not follow the record grammar.
    #[error("Corrupted cache: {0}")]
    Corrupted(String),

    /// The arena is full.
    #[error("Cache capacity exceeded: more than {capacity} entries (raise `max_items`)")]
    CapacityExceeded {
        /// Configured arena capacity.
        capacity: usize,
    },

    /// An update targeted a slot holding a different slug.
    #[error("Tried to update a cache entry with a non-matching slug: {cached} != {incoming}")]
    SlugMismatch {
        /// Slug found at the cursor.
        cached: String,
        /// Slug of the incoming entry.
        incoming: String,
    },

    /// A mutation was attempted without a matching cursor step.
    #[error("Cache cursor out of sync: {0}")]
    Desynchronized(String),
}

impl CacheError {
    /// Creates a read error.
    pub fn read(message: impl Into<String>) -> Self {
        Self::ReadError(message.into())
    }

    /// Creates a write error.
    pub fn write(message: impl Into<String>) -> Self {
        Self::WriteError(message.into())
    }

    /// Creates a corrupted cache error.
    pub fn corrupted(message: impl Into<String>) -> Self {
        Self::Corrupted(message.into())
    }

    /// Creates a desynchronized cursor error.
    pub fn desynchronized(message: impl Into<String>) -> Self {
        Self::Desynchronized(message.into())
    }
}
