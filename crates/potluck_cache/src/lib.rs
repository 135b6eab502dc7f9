//! # potluck_cache
//!
//! Persistent build cache for Potluck.
//!
//! The cache remembers, per recipe slug, the source modification time and the
//! revision metadata (author, added and modified dates) that is expensive to
//! recompute. It is designed to be walked in lock-step with the sorted source
//! listing:
//!
//! 1. **Load once**: the whole file is parsed into a fixed-capacity arena.
//! 2. **Walk once**: [`CacheStore::cursor`] is called exactly once per scanned
//!    slug, in ascending order, so no lookup table is ever built.
//! 3. **Mutate in place**: new slugs are shift-inserted at the cursor, stale
//!    slots are overwritten, modified slots are updated.
//! 4. **Write once**: [`CacheStore::persist`] rewrites the file at the end of
//!    the run. An aborted run leaves the previous file untouched.
//!
//! ## Storage
//!
//! The file is plain text, one seven-line block per entry (see [`format`]).

mod entry;
mod error;
pub mod format;
mod store;

pub use entry::CacheEntry;
pub use error::CacheError;
pub use store::CacheStore;
