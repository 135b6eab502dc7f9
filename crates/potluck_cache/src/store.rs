//! Fixed-capacity cache arena walked in lock-step with the source listing.

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use potluck_text::{collate, is_ascending};
use tracing::{debug, info};

use crate::{CacheEntry, CacheError, format};

/// The build cache for one run.
///
/// Entries `[0, len)` are kept strictly ascending by slug under
/// [`collate`]. The read position only moves forward.
pub struct CacheStore {
    /// Backing file, rewritten by [`CacheStore::persist`].
    path: PathBuf,
    /// Arena; never grows past `capacity`.
    entries: Vec<CacheEntry>,
    /// Maximum number of entries.
    capacity: usize,
    /// Index of the next entry the cursor will read.
    position: usize,
    /// Slot yielded by the last cursor step and the slug it was taken for.
    /// Cleared after a mutation.
    slot: Option<(usize, String)>,
}

impl CacheStore {
    /// Loads the cache at `path`, creating an empty file when none exists.
    pub fn load(path: impl Into<PathBuf>, capacity: usize) -> Result<Self, CacheError> {
        let path = path.into();

        if !path.exists() {
            fs::write(&path, "").map_err(|e| {
                CacheError::read(format!("failed to create {}: {}", path.display(), e))
            })?;
            debug!("Created empty cache file at {}", path.display());
            return Ok(Self::empty(path, capacity));
        }

        let content = fs::read_to_string(&path)
            .map_err(|e| CacheError::read(format!("{}: {}", path.display(), e)))?;
        let entries = format::parse(&content, &path.display().to_string())?;

        if entries.len() > capacity {
            return Err(CacheError::CapacityExceeded { capacity });
        }

        let slugs: Vec<&str> = entries.iter().map(|entry| entry.slug.as_str()).collect();
        if !is_ascending(&slugs) {
            return Err(CacheError::corrupted(format!(
                "{}: entries are not in ascending slug order",
                path.display()
            )));
        }

        info!("Loaded {} cache entries", entries.len());
        Ok(Self::from_entries(path, entries, capacity))
    }

    /// Creates a store that ignores any existing file.
    ///
    /// The file at `path` is still overwritten by [`CacheStore::persist`].
    pub fn empty(path: impl Into<PathBuf>, capacity: usize) -> Self {
        Self::from_entries(path.into(), Vec::new(), capacity)
    }

    fn from_entries(path: PathBuf, mut entries: Vec<CacheEntry>, capacity: usize) -> Self {
        entries.reserve_exact(capacity.saturating_sub(entries.len()));
        Self {
            path,
            entries,
            capacity,
            position: 0,
            slot: None,
        }
    }

    /// Advances past the next live entry and returns it, or `None` once the
    /// arena is exhausted.
    ///
    /// Must be called exactly once per scanned slug, in ascending order. The
    /// read position never moves backwards, but one call may move it by more
    /// than one slot.
    ///
    /// An entry is stepped over when it collates before `slug` and the entry
    /// after it does not collate after `slug`. With a cache holding `apple`,
    /// `banana` and `cherry` and a scan of `apple` and `cherry` (the banana
    /// source was deleted), the call for `cherry` skips `banana` and yields
    /// `cherry`, so `cherry` is reused instead of being inserted twice.
    /// Skipped entries are left in place. The returned candidate is `slug`
    /// itself, the entry `slug` must be inserted before, or a single entry
    /// collating before `slug` that [`CacheStore::insert_at`] may overwrite.
    pub fn cursor(&mut self, slug: &str) -> Option<&CacheEntry> {
        let mut index = self.position;
        while index + 1 < self.entries.len()
            && collate(&self.entries[index].slug, slug) == Ordering::Less
            && collate(&self.entries[index + 1].slug, slug) != Ordering::Greater
        {
            debug!("Skipping stale cache entry: {}", self.entries[index].slug);
            index += 1;
        }

        self.slot = Some((index, slug.to_string()));

        if index < self.entries.len() {
            self.position = index + 1;
            Some(&self.entries[index])
        } else {
            self.position = self.entries.len();
            None
        }
    }

    /// Inserts a new entry at the slot yielded by the last cursor step.
    ///
    /// When the blocked entry collates before the new slug it is stale and is
    /// overwritten. Otherwise the blocked entry and everything after it shift
    /// one slot later.
    pub fn insert_at(&mut self, entry: CacheEntry) -> Result<&CacheEntry, CacheError> {
        let index = self.take_slot(&entry.slug)?;

        if let Some(blocked) = self.entries.get(index)
            && collate(&entry.slug, &blocked.slug) == Ordering::Greater
        {
            debug!("Overwriting stale cache entry {} with {}", blocked.slug, entry.slug);
            self.entries[index] = entry;
            return Ok(&self.entries[index]);
        }

        if self.entries.len() >= self.capacity {
            return Err(CacheError::CapacityExceeded {
                capacity: self.capacity,
            });
        }

        self.entries.insert(index, entry);
        self.position = index + 1;
        Ok(&self.entries[index])
    }

    /// Overwrites the entry at the slot yielded by the last cursor step.
    pub fn update_at(&mut self, entry: CacheEntry) -> Result<&CacheEntry, CacheError> {
        let index = self.take_slot(&entry.slug)?;

        let Some(current) = self.entries.get(index) else {
            return Err(CacheError::desynchronized(format!(
                "no cached entry at the cursor to update with {}",
                entry.slug
            )));
        };
        if current.slug != entry.slug {
            return Err(CacheError::SlugMismatch {
                cached: current.slug.clone(),
                incoming: entry.slug,
            });
        }

        self.entries[index] = entry;
        Ok(&self.entries[index])
    }

    /// Rewrites the backing file with every entry, in order, and releases the
    /// arena. Returns the number of entries written.
    pub fn persist(self) -> Result<usize, CacheError> {
        for entry in &self.entries {
            format::check(entry).map_err(|problem| {
                CacheError::write(format!("{}: {}", self.path.display(), problem))
            })?;
        }

        fs::write(&self.path, format::render(&self.entries))
            .map_err(|e| CacheError::write(format!("{}: {}", self.path.display(), e)))?;

        info!(
            "Saved {} cache entries to {}",
            self.entries.len(),
            self.path.display()
        );

        Ok(self.entries.len())
    }

    /// Returns the valid entries in order.
    pub fn entries(&self) -> &[CacheEntry] {
        &self.entries
    }

    /// Returns the read position.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns the arena capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the number of valid entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn take_slot(&mut self, slug: &str) -> Result<usize, CacheError> {
        match self.slot.take() {
            Some((index, scanned)) if scanned == slug => Ok(index),
            Some((_, scanned)) => Err(CacheError::desynchronized(format!(
                "cursor was advanced for {} but the mutation is for {}",
                scanned, slug
            ))),
            None => Err(CacheError::desynchronized(format!(
                "no cursor step precedes the mutation for {}",
                slug
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn entry(slug: &str) -> CacheEntry {
        CacheEntry {
            slug: slug.to_string(),
            mtime: 100,
            title: slug.to_uppercase(),
            tags: vec!["tag".to_string()],
            author: "Jane".to_string(),
            added: "2021-01-01T00:00:00+00:00".to_string(),
            modified: "2021-01-01T00:00:00+00:00".to_string(),
            published: "Fri, 01 Jan 2021 00:00:00 +0000".to_string(),
        }
    }

    fn store_with(dir: &TempDir, slugs: &[&str], capacity: usize) -> CacheStore {
        let entries = slugs.iter().map(|slug| entry(slug)).collect();
        CacheStore::from_entries(dir.path().join("cache"), entries, capacity)
    }

    fn slugs(store: &CacheStore) -> Vec<&str> {
        store.entries().iter().map(|e| e.slug.as_str()).collect()
    }

    #[test]
    fn test_load_creates_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".buildcache");

        let store = CacheStore::load(&path, 10).unwrap();

        assert!(store.is_empty());
        assert!(path.exists());
    }

    #[test]
    fn test_load_fails_for_unwritable_location() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing-dir").join(".buildcache");

        let err = CacheStore::load(&path, 10).err().unwrap();
        assert!(matches!(err, CacheError::ReadError(_)));
    }

    #[test]
    fn test_load_rejects_unordered_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".buildcache");
        fs::write(&path, format::render(&[entry("cherry"), entry("apple")])).unwrap();

        let err = CacheStore::load(&path, 10).err().unwrap();
        assert!(matches!(err, CacheError::Corrupted(_)));
    }

    #[test]
    fn test_load_rejects_more_entries_than_capacity() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".buildcache");
        fs::write(&path, format::render(&[entry("apple"), entry("banana")])).unwrap();

        let err = CacheStore::load(&path, 1).err().unwrap();
        assert!(matches!(err, CacheError::CapacityExceeded { capacity: 1 }));
    }

    #[test]
    fn test_cursor_walks_forward_and_ends() {
        let dir = TempDir::new().unwrap();
        let mut store = store_with(&dir, &["apple", "banana"], 10);

        assert_eq!(store.cursor("apple").map(|e| e.slug.clone()), Some("apple".to_string()));
        assert_eq!(store.cursor("banana").map(|e| e.slug.clone()), Some("banana".to_string()));
        assert!(store.cursor("cherry").is_none());
        assert_eq!(store.position(), 2);
    }

    #[test]
    fn test_insert_shifts_later_entries() {
        let dir = TempDir::new().unwrap();
        let mut store = store_with(&dir, &["apple", "cherry"], 10);

        store.cursor("apple");
        let candidate = store.cursor("banana").map(|e| e.slug.clone());
        assert_eq!(candidate.as_deref(), Some("cherry"));
        store.insert_at(entry("banana")).unwrap();

        assert_eq!(slugs(&store), vec!["apple", "banana", "cherry"]);
        assert_eq!(store.cursor("cherry").map(|e| e.slug.clone()), Some("cherry".to_string()));
    }

    #[test]
    fn test_insert_after_exhaustion_appends() {
        let dir = TempDir::new().unwrap();
        let mut store = store_with(&dir, &["apple"], 10);

        store.cursor("apple");
        assert!(store.cursor("banana").is_none());
        store.insert_at(entry("banana")).unwrap();
        assert!(store.cursor("cherry").is_none());
        store.insert_at(entry("cherry")).unwrap();

        assert_eq!(slugs(&store), vec!["apple", "banana", "cherry"]);
        assert_eq!(store.position(), 3);
    }

    #[test]
    fn test_insert_overwrites_stale_blocked_entry() {
        let dir = TempDir::new().unwrap();
        let mut store = store_with(&dir, &["apple", "banana", "cherry"], 10);

        store.cursor("apple");
        let candidate = store.cursor("blueberry").map(|e| e.slug.clone());
        assert_eq!(candidate.as_deref(), Some("banana"));
        store.insert_at(entry("blueberry")).unwrap();

        assert_eq!(slugs(&store), vec!["apple", "blueberry", "cherry"]);
    }

    #[test]
    fn test_cursor_steps_over_deleted_entries() {
        let dir = TempDir::new().unwrap();
        let mut store = store_with(&dir, &["apple", "banana", "blueberry", "cherry"], 10);

        store.cursor("apple");
        assert_eq!(store.position(), 1);
        let candidate = store.cursor("cherry").map(|e| e.slug.clone());

        assert_eq!(candidate.as_deref(), Some("cherry"));
        assert_eq!(store.position(), 4);
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_insert_beyond_capacity_fails() {
        let dir = TempDir::new().unwrap();
        let mut store = store_with(&dir, &["apple"], 1);

        store.cursor("apple");
        store.cursor("banana");
        let err = store.insert_at(entry("banana")).unwrap_err();

        assert!(matches!(err, CacheError::CapacityExceeded { capacity: 1 }));
    }

    #[test]
    fn test_overwrite_at_capacity_succeeds() {
        let dir = TempDir::new().unwrap();
        let mut store = store_with(&dir, &["apple", "banana"], 2);

        store.cursor("apple");
        store.cursor("blueberry");
        store.insert_at(entry("blueberry")).unwrap();

        assert_eq!(slugs(&store), vec!["apple", "blueberry"]);
    }

    #[test]
    fn test_update_replaces_matching_entry() {
        let dir = TempDir::new().unwrap();
        let mut store = store_with(&dir, &["apple"], 10);

        store.cursor("apple");
        let mut updated = entry("apple");
        updated.mtime = 200;
        store.update_at(updated).unwrap();

        assert_eq!(store.entries()[0].mtime, 200);
    }

    #[test]
    fn test_update_with_mismatched_slug_fails() {
        let dir = TempDir::new().unwrap();
        let mut store = store_with(&dir, &["apple", "cherry"], 10);

        store.cursor("apple");
        store.cursor("banana");
        let err = store.update_at(entry("banana")).unwrap_err();

        match err {
            CacheError::SlugMismatch { cached, incoming } => {
                assert_eq!(cached, "cherry");
                assert_eq!(incoming, "banana");
            }
            other => panic!("Expected SlugMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_mutation_without_cursor_fails() {
        let dir = TempDir::new().unwrap();
        let mut store = store_with(&dir, &["apple"], 10);

        let err = store.update_at(entry("apple")).unwrap_err();
        assert!(matches!(err, CacheError::Desynchronized(_)));
    }

    #[test]
    fn test_mutation_for_other_slug_fails() {
        let dir = TempDir::new().unwrap();
        let mut store = store_with(&dir, &["apple"], 10);

        store.cursor("apple");
        let err = store.insert_at(entry("banana")).unwrap_err();
        assert!(matches!(err, CacheError::Desynchronized(_)));
    }

    #[test]
    fn test_persist_then_load_restores_entries() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".buildcache");
        let store = store_with(&dir, &["apple", "banana"], 10);
        let expected = store.entries().to_vec();

        let store = CacheStore::from_entries(path.clone(), expected.clone(), 10);
        assert_eq!(store.persist().unwrap(), 2);

        let reloaded = CacheStore::load(&path, 10).unwrap();
        assert_eq!(reloaded.entries(), expected.as_slice());
    }

    #[test]
    fn test_persist_truncates_previous_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".buildcache");
        fs::write(&path, format::render(&[entry("apple"), entry("banana")])).unwrap();

        let store = CacheStore::empty(&path, 10);
        store.persist().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_persist_rejects_incomplete_entry() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".buildcache");
        let incomplete = CacheEntry::new("apple", 1, "Apple", vec![]);

        let store = CacheStore::from_entries(path.clone(), vec![incomplete], 10);
        let err = store.persist().unwrap_err();

        assert!(matches!(err, CacheError::WriteError(_)));
        assert!(!path.exists());
    }
}
