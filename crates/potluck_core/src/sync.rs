//! Single-pass reconciliation of scanned sources against the cache.
//!
//! Sources arrive in ascending slug order and the cache is kept in the same
//! order, so each source needs exactly one look at the cache cursor to decide
//! whether its metadata can be reused.

use potluck_cache::{CacheEntry, CacheStore};
use potluck_parser::Document;
use serde::Serialize;
use tracing::{debug, warn};

use crate::metadata::MetadataProvider;
use crate::scanner::SourceItem;
use crate::{SiteError, dates};

/// What the cache knew about a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Cached, unchanged, output present.
    Hit,
    /// Cached and unchanged, but the output page is missing.
    StaleMiss,
    /// Cached, but the source changed since.
    Modified,
    /// Not cached.
    New,
}

impl Classification {
    /// Returns true when the recipe page has to be (re)written.
    pub fn writes_output(self) -> bool {
        self != Classification::Hit
    }

    /// Short lowercase label.
    pub fn label(self) -> &'static str {
        match self {
            Classification::Hit => "hit",
            Classification::StaleMiss => "stale",
            Classification::Modified => "modified",
            Classification::New => "new",
        }
    }
}

/// Outcome of reconciling one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    /// Branch taken.
    pub classification: Classification,
    /// Metadata to render with; identical to what the cache now holds.
    pub entry: CacheEntry,
}

/// Drives a [`CacheStore`] through one run.
pub struct SyncMerge<'a> {
    store: &'a mut CacheStore,
    provider: &'a dyn MetadataProvider,
    default_author: &'a str,
}

impl<'a> SyncMerge<'a> {
    /// Creates a merge over `store`, asking `provider` for new metadata.
    pub fn new(
        store: &'a mut CacheStore,
        provider: &'a dyn MetadataProvider,
        default_author: &'a str,
    ) -> Self {
        Self {
            store,
            provider,
            default_author,
        }
    }

    /// Reconciles the next scanned source.
    ///
    /// Must be called once per source, in scan order. `output_exists` tells
    /// whether the recipe page from a previous run is still on disk.
    pub fn reconcile(
        &mut self,
        item: &SourceItem,
        document: &Document,
        output_exists: bool,
    ) -> Result<Reconciled, SiteError> {
        let cached = self
            .store
            .cursor(&item.slug)
            .filter(|candidate| candidate.slug == item.slug)
            .cloned();

        let reconciled = match cached {
            Some(entry) if entry.is_fresh(item.mtime) => {
                let classification = if output_exists {
                    Classification::Hit
                } else {
                    Classification::StaleMiss
                };
                Reconciled {
                    classification,
                    entry,
                }
            }
            Some(previous) => {
                let entry = self.refresh(item, document, previous)?;
                Reconciled {
                    classification: Classification::Modified,
                    entry: self.store.update_at(entry)?.clone(),
                }
            }
            None => {
                let entry = self.describe(item, document)?;
                Reconciled {
                    classification: Classification::New,
                    entry: self.store.insert_at(entry)?.clone(),
                }
            }
        };

        debug!(
            "{}: {} (cache position {})",
            item.slug,
            reconciled.classification.label(),
            self.store.position()
        );
        Ok(reconciled)
    }

    /// Returns the cache read position.
    pub fn position(&self) -> usize {
        self.store.position()
    }

    /// Metadata for a changed source: fresh title, tags and modified date,
    /// everything else kept.
    fn refresh(
        &self,
        item: &SourceItem,
        document: &Document,
        previous: CacheEntry,
    ) -> Result<CacheEntry, SiteError> {
        let modified = self
            .provider
            .modified(&item.path)?
            .unwrap_or_else(|| previous.added.clone());

        Ok(CacheEntry {
            mtime: item.mtime,
            title: document.title_or_slug().to_string(),
            tags: document.tags.clone(),
            modified,
            ..previous
        })
    }

    /// Metadata for a source the cache has never seen.
    fn describe(&self, item: &SourceItem, document: &Document) -> Result<CacheEntry, SiteError> {
        let revision = self.provider.revision(&item.path)?;

        let added = match revision.added {
            Some(date) if !date.is_empty() && !date.contains(char::is_whitespace) => date,
            Some(date) => {
                warn!(
                    "Ignoring added date {:?} for {}; using the file time",
                    date,
                    item.path.display()
                );
                dates::from_epoch(item.mtime)
            }
            None => dates::from_epoch(item.mtime),
        };
        let modified = revision
            .modified
            .filter(|date| !date.is_empty())
            .unwrap_or_else(|| added.clone());
        let author = revision
            .author
            .filter(|author| !author.trim().is_empty())
            .unwrap_or_else(|| self.default_author.to_string());
        let published = dates::to_rfc2822(&added).unwrap_or_else(|| added.clone());

        Ok(CacheEntry {
            author,
            added,
            modified,
            published,
            ..CacheEntry::new(
                item.slug.clone(),
                item.mtime,
                document.title_or_slug(),
                document.tags.clone(),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{NoHistory, Revision};
    use pretty_assertions::assert_eq;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    struct FixedHistory;

    impl MetadataProvider for FixedHistory {
        fn revision(&self, _source: &Path) -> Result<Revision, SiteError> {
            Ok(Revision {
                author: Some("Jane".to_string()),
                added: Some("2021-03-14T10:11:12+01:00".to_string()),
                modified: None,
            })
        }

        fn modified(&self, _source: &Path) -> Result<Option<String>, SiteError> {
            Ok(Some("2022-01-10T08:00:00Z".to_string()))
        }
    }

    fn item(slug: &str, mtime: i64) -> SourceItem {
        SourceItem {
            slug: slug.to_string(),
            path: PathBuf::from(format!("src/{slug}.md")),
            mtime,
        }
    }

    fn document(slug: &str, title: &str, tags: &[&str]) -> Document {
        Document::new(
            slug,
            Some(title.to_string()),
            tags.iter().map(|t| t.to_string()).collect(),
            "<p>body</p>",
        )
    }

    #[test]
    fn test_new_entry_takes_history() {
        let dir = tempdir().unwrap();
        let mut store = CacheStore::empty(dir.path().join("cache"), 4);
        let mut merge = SyncMerge::new(&mut store, &FixedHistory, "Anonymous");

        let result = merge
            .reconcile(&item("soup", 100), &document("soup", "Soup", &["hot"]), false)
            .unwrap();

        assert_eq!(result.classification, Classification::New);
        assert_eq!(result.entry.author, "Jane");
        assert_eq!(result.entry.added, "2021-03-14T10:11:12+01:00");
        assert_eq!(result.entry.modified, result.entry.added);
        assert_eq!(result.entry.published, "Sun, 14 Mar 2021 10:11:12 +0100");
        assert_eq!(store.entries(), &[result.entry]);
    }

    #[test]
    fn test_new_entry_without_history_uses_defaults() {
        let dir = tempdir().unwrap();
        let mut store = CacheStore::empty(dir.path().join("cache"), 4);
        let mut merge = SyncMerge::new(&mut store, &NoHistory, "Anonymous");

        let result = merge
            .reconcile(
                &item("soup", 1_610_236_800),
                &Document::new("soup", None, vec![], ""),
                true,
            )
            .unwrap();

        assert_eq!(result.entry.title, "soup");
        assert_eq!(result.entry.author, "Anonymous");
        assert_eq!(result.entry.added, "2021-01-10T00:00:00Z");
        assert_eq!(result.entry.modified, "2021-01-10T00:00:00Z");
        assert_eq!(result.entry.published, "Sun, 10 Jan 2021 00:00:00 +0000");
    }

    /// Persists `store` and loads it back with a fresh cursor.
    fn reopen(store: CacheStore) -> CacheStore {
        let path = store.path().to_path_buf();
        let capacity = store.capacity();
        store.persist().unwrap();
        CacheStore::load(path, capacity).unwrap()
    }

    #[test]
    fn test_hit_and_stale_miss_reuse_cache() {
        let dir = tempdir().unwrap();
        let mut store = CacheStore::empty(dir.path().join("cache"), 4);
        SyncMerge::new(&mut store, &FixedHistory, "Anonymous")
            .reconcile(&item("soup", 100), &document("soup", "Soup", &[]), false)
            .unwrap();
        let cached = store.entries()[0].clone();
        let renamed = document("soup", "Renamed", &["x"]);

        let mut store = reopen(store);
        let hit = SyncMerge::new(&mut store, &NoHistory, "Nobody")
            .reconcile(&item("soup", 100), &renamed, true)
            .unwrap();
        assert_eq!(hit.classification, Classification::Hit);
        assert_eq!(hit.entry, cached);

        let mut store = reopen(store);
        let stale = SyncMerge::new(&mut store, &NoHistory, "Nobody")
            .reconcile(&item("soup", 100), &renamed, false)
            .unwrap();
        assert_eq!(stale.classification, Classification::StaleMiss);
        assert_eq!(stale.entry, cached);
        assert_eq!(store.entries(), &[cached]);
    }

    #[test]
    fn test_modified_refreshes_date_title_and_tags() {
        let dir = tempdir().unwrap();
        let mut store = CacheStore::empty(dir.path().join("cache"), 4);
        SyncMerge::new(&mut store, &FixedHistory, "Anonymous")
            .reconcile(&item("soup", 100), &document("soup", "Soup", &["hot"]), true)
            .unwrap();
        let original = store.entries()[0].clone();

        let mut store = reopen(store);
        let result = SyncMerge::new(&mut store, &FixedHistory, "Nobody")
            .reconcile(
                &item("soup", 200),
                &document("soup", "Hot soup", &["hot", "quick"]),
                true,
            )
            .unwrap();

        assert_eq!(result.classification, Classification::Modified);
        assert_eq!(result.entry.mtime, 200);
        assert_eq!(result.entry.title, "Hot soup");
        assert_eq!(result.entry.tags, vec!["hot", "quick"]);
        assert_eq!(result.entry.modified, "2022-01-10T08:00:00Z");
        assert_eq!(result.entry.author, original.author);
        assert_eq!(result.entry.added, original.added);
        assert_eq!(result.entry.published, original.published);
        assert_eq!(store.entries(), &[result.entry]);
    }

    #[test]
    fn test_modified_without_history_falls_back_to_added() {
        let dir = tempdir().unwrap();
        let mut store = CacheStore::empty(dir.path().join("cache"), 4);
        SyncMerge::new(&mut store, &FixedHistory, "Anonymous")
            .reconcile(&item("soup", 100), &document("soup", "Soup", &[]), true)
            .unwrap();

        let mut store = reopen(store);
        let result = SyncMerge::new(&mut store, &NoHistory, "Anonymous")
            .reconcile(&item("soup", 101), &document("soup", "Soup", &[]), true)
            .unwrap();

        assert_eq!(result.entry.modified, "2021-03-14T10:11:12+01:00");
    }

    #[test]
    fn test_classification_writes_output() {
        assert!(!Classification::Hit.writes_output());
        assert!(Classification::StaleMiss.writes_output());
        assert!(Classification::Modified.writes_output());
        assert!(Classification::New.writes_output());
    }
}
