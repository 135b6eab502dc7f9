//! Source directory listing.
//!
//! Recipes live one level deep in the source directory. The listing is
//! sorted with the same collation the cache and indexes use, which is what
//! lets the cache be reconciled in a single forward pass.

use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use potluck_cache::format::is_storable_slug;
use potluck_text::collate;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::SiteError;

/// One source file found by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceItem {
    /// File stem, used as the cache key and output name.
    pub slug: String,
    /// Full path of the source file.
    pub path: PathBuf,
    /// Modification time in seconds since the Unix epoch.
    pub mtime: i64,
}

/// Lists recipe sources in collation order.
#[derive(Debug, Clone)]
pub struct SourceScanner {
    root: PathBuf,
    extensions: Vec<String>,
    include_hidden: bool,
    follow_links: bool,
}

impl SourceScanner {
    /// Creates a scanner for Markdown files directly under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: vec!["md".to_string()],
            include_hidden: false,
            follow_links: false,
        }
    }

    /// Replaces the accepted file extensions (without the leading dot).
    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Enables or disables hidden file inclusion.
    pub fn include_hidden(mut self, yes: bool) -> Self {
        self.include_hidden = yes;
        self
    }

    /// Sets whether to follow symbolic links.
    pub fn follow_links(mut self, yes: bool) -> Self {
        self.follow_links = yes;
        self
    }

    /// Returns the scanned directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lists the sources, ascending by slug.
    ///
    /// An unreadable directory or file is an error; nothing is skipped
    /// silently except hidden entries and foreign extensions.
    pub fn scan(&self) -> Result<Vec<SourceItem>, SiteError> {
        let mut items = Vec::new();

        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(self.follow_links);

        for entry in walker {
            let entry = entry.map_err(|e| {
                SiteError::file(format!(
                    "Failed to read source directory {}: {}",
                    self.root.display(),
                    e
                ))
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if !self.include_hidden && name.starts_with('.') {
                continue;
            }

            let path = entry.path();
            let Some(slug) = self.slug_of(path) else {
                debug!("Skipping {}", path.display());
                continue;
            };
            if !is_storable_slug(&slug) {
                warn!(
                    "Skipping {}: a file name containing ':' or a line break cannot be cached",
                    path.display()
                );
                continue;
            }

            let metadata = entry.metadata().map_err(|e| {
                SiteError::file(format!("Failed to stat {}: {}", path.display(), e))
            })?;
            let modified = metadata.modified().map_err(|e| SiteError::io_at(path, e))?;
            let mtime = match modified.duration_since(UNIX_EPOCH) {
                Ok(elapsed) => elapsed.as_secs() as i64,
                Err(before) => -(before.duration().as_secs() as i64),
            };

            items.push(SourceItem {
                slug,
                path: path.to_path_buf(),
                mtime,
            });
        }

        items.sort_by(|a, b| collate(&a.slug, &b.slug));

        info!(
            "Found {} sources in {}",
            items.len(),
            self.root.display()
        );
        Ok(items)
    }

    fn slug_of(&self, path: &Path) -> Option<String> {
        let extension = path.extension()?.to_str()?;
        if !self
            .extensions
            .iter()
            .any(|accepted| accepted.eq_ignore_ascii_case(extension))
        {
            return None;
        }
        let stem = path.file_stem()?.to_str()?;
        (!stem.is_empty()).then(|| stem.to_string())
    }
}
