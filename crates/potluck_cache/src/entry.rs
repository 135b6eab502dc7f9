//! Cache entry types.

/// Everything remembered about one recipe between runs.
///
/// Date fields are opaque strings to the cache; only the renderer interprets
/// them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Source file stem, unique across the cache.
    pub slug: String,

    /// Source modification time in seconds since the Unix epoch.
    pub mtime: i64,

    /// Recipe title.
    pub title: String,

    /// Recipe tags in document order.
    pub tags: Vec<String>,

    /// Author of the first revision.
    pub author: String,

    /// Date the recipe was added (no whitespace allowed).
    pub added: String,

    /// Date the recipe was last modified.
    pub modified: String,

    /// The added date in RFC 2822 form, as published in feeds.
    pub published: String,
}

impl CacheEntry {
    /// Creates an entry with empty revision metadata.
    pub fn new(
        slug: impl Into<String>,
        mtime: i64,
        title: impl Into<String>,
        tags: Vec<String>,
    ) -> Self {
        Self {
            slug: slug.into(),
            mtime,
            title: title.into(),
            tags,
            author: String::new(),
            added: String::new(),
            modified: String::new(),
            published: String::new(),
        }
    }

    /// Returns true when the cached mtime matches the source file.
    pub fn is_fresh(&self, mtime: i64) -> bool {
        self.mtime == mtime
    }

    /// Tags joined the way they are persisted.
    pub fn tags_line(&self) -> String {
        self.tags.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_entry_new_has_empty_metadata() {
        let entry = CacheEntry::new("pancakes", 1_700_000_000, "Pancakes", vec![]);

        assert_eq!(entry.slug, "pancakes");
        assert!(entry.author.is_empty());
        assert!(entry.added.is_empty());
        assert!(entry.modified.is_empty());
        assert!(entry.published.is_empty());
    }

    #[test]
    fn test_cache_entry_is_fresh() {
        let entry = CacheEntry::new("pancakes", 1_700_000_000, "Pancakes", vec![]);

        assert!(entry.is_fresh(1_700_000_000));
        assert!(!entry.is_fresh(1_700_000_001));
    }

    #[test]
    fn test_tags_line() {
        let entry = CacheEntry::new(
            "pancakes",
            0,
            "Pancakes",
            vec!["breakfast".to_string(), "sweet".to_string()],
        );

        assert_eq!(entry.tags_line(), "breakfast sweet");
    }
}
