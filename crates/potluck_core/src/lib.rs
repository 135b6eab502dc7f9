//! # potluck_core
//!
//! Incremental site builder for Potluck.
//!
//! This crate provides:
//! - The `SiteBuilder` orchestrator
//! - Configuration loading
//! - Source discovery in collation order
//! - Single-pass reconciliation of sources against the build cache
//! - Ordered tag and title indexes, pagination and alphabet navigation
//! - HTML, RSS and Atom rendering
//!
//! ## Example
//!
//! ```rust,ignore
//! use potluck_core::{SiteBuilder, SiteConfig};
//!
//! let config = SiteConfig::from_file(".potluck.jsonc")?;
//! let report = SiteBuilder::new(config).build()?;
//!
//! println!("{} recipes, {} new", report.items, report.new);
//! ```

mod builder;
mod config;
pub mod dates;
mod error;
pub mod index;
pub mod metadata;
pub mod pagination;
pub mod render;
pub mod scanner;
pub mod sync;

pub use builder::{BuildReport, ItemOutcome, SiteBuilder};
pub use config::SiteConfig;
pub use error::{IndexError, SiteError};
pub use index::{OrderedIndex, TagIndex, TitleEntry, TitleIndex};
pub use metadata::{GitMetadataProvider, MetadataProvider, NoHistory, Revision};
pub use pagination::{LetterMarker, Page, Pagination};
pub use scanner::{SourceItem, SourceScanner};
pub use sync::{Classification, Reconciled, SyncMerge};

pub use potluck_cache::{CacheEntry, CacheStore};
pub use potluck_parser::Document;
