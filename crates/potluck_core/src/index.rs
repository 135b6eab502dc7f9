//! Alphabetically ordered, arena-backed indexes.
//!
//! Nodes are appended to a fixed-capacity arena in arrival order. A separate
//! chain of successor indices threads them in collation order, so inserting
//! never moves a node and traversal never sorts.

use std::cmp::Ordering;

use potluck_text::collate;

use crate::IndexError;

/// A value that can be ordered in an [`OrderedIndex`].
pub trait IndexKey {
    /// Key compared with [`collate`].
    fn key(&self) -> &str;
}

#[derive(Debug, Clone)]
struct IndexNode<T> {
    payload: T,
    next: Option<usize>,
}

/// Singly linked list over a fixed-capacity arena.
///
/// Equal keys keep arrival order.
#[derive(Debug, Clone)]
pub struct OrderedIndex<T> {
    name: &'static str,
    nodes: Vec<IndexNode<T>>,
    head: Option<usize>,
    capacity: usize,
}

impl<T: IndexKey> OrderedIndex<T> {
    /// Creates an empty index holding at most `capacity` nodes.
    ///
    /// `name` labels capacity errors.
    pub fn with_capacity(name: &'static str, capacity: usize) -> Self {
        Self {
            name,
            nodes: Vec::with_capacity(capacity),
            head: None,
            capacity,
        }
    }

    /// Appends `payload` to the arena and links it after every node whose
    /// key does not collate after its own. Returns the arena slot.
    pub fn insert(&mut self, payload: T) -> Result<usize, IndexError> {
        if self.nodes.len() >= self.capacity {
            return Err(IndexError::CapacityExceeded {
                index: self.name,
                capacity: self.capacity,
            });
        }

        let mut prev = None;
        let mut cursor = self.head;
        while let Some(index) = cursor {
            if collate(self.nodes[index].payload.key(), payload.key()) == Ordering::Greater {
                break;
            }
            prev = Some(index);
            cursor = self.nodes[index].next;
        }

        let slot = self.nodes.len();
        self.nodes.push(IndexNode {
            payload,
            next: cursor,
        });
        match prev {
            Some(index) => self.nodes[index].next = Some(slot),
            None => self.head = Some(slot),
        }

        Ok(slot)
    }

    /// Returns true if any arena slot holds `key` exactly.
    pub fn contains_key(&self, key: &str) -> bool {
        self.nodes.iter().any(|node| node.payload.key() == key)
    }

    /// Iterates in collation order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            nodes: &self.nodes,
            cursor: self.head,
        }
    }

    /// Iterates in arrival order.
    pub fn arena(&self) -> impl Iterator<Item = &T> {
        self.nodes.iter().map(|node| &node.payload)
    }

    /// Returns the node stored in arena `slot`.
    pub fn get(&self, slot: usize) -> Option<&T> {
        self.nodes.get(slot).map(|node| &node.payload)
    }

    /// Returns the number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the arena capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<'a, T: IndexKey> IntoIterator for &'a OrderedIndex<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator following the successor chain.
pub struct Iter<'a, T> {
    nodes: &'a [IndexNode<T>],
    cursor: Option<usize>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = &self.nodes[self.cursor?];
        self.cursor = node.next;
        Some(&node.payload)
    }
}

/// A tag name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag(pub String);

impl Tag {
    /// Tag name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl IndexKey for Tag {
    fn key(&self) -> &str {
        &self.0
    }
}

/// Distinct tags across the site, ordered by name.
#[derive(Debug, Clone)]
pub struct TagIndex {
    inner: OrderedIndex<Tag>,
}

impl TagIndex {
    /// Creates an empty tag index.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: OrderedIndex::with_capacity("tag", capacity),
        }
    }

    /// Adds `name` unless it is already present. Returns whether it was added.
    pub fn insert(&mut self, name: &str) -> Result<bool, IndexError> {
        if self.inner.contains_key(name) {
            return Ok(false);
        }
        self.inner.insert(Tag(name.to_string()))?;
        Ok(true)
    }

    /// Adds every tag in `names`.
    pub fn insert_all<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), IndexError> {
        for name in names {
            self.insert(name.as_ref())?;
        }
        Ok(())
    }

    /// Iterates tag names in collation order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.inner.iter().map(Tag::name)
    }

    /// Returns the number of distinct tags.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if there are no tags.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// One recipe as listed on index and tag pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleEntry {
    /// Display title.
    pub title: String,
    /// Source slug.
    pub slug: String,
    /// Relative link to the recipe page.
    pub url: String,
    /// Recipe tags.
    pub tags: Vec<String>,
}

impl TitleEntry {
    /// Creates an entry linking to `./<slug>.html`.
    pub fn new(title: impl Into<String>, slug: impl Into<String>, tags: Vec<String>) -> Self {
        let slug = slug.into();
        Self {
            title: title.into(),
            url: format!("./{}.html", slug),
            slug,
            tags,
        }
    }

    /// Returns true if the recipe carries `tag`.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

impl IndexKey for TitleEntry {
    fn key(&self) -> &str {
        &self.title
    }
}

/// Every recipe, ordered by title. Duplicate titles are kept.
#[derive(Debug, Clone)]
pub struct TitleIndex {
    inner: OrderedIndex<TitleEntry>,
}

impl TitleIndex {
    /// Creates an empty title index.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: OrderedIndex::with_capacity("title", capacity),
        }
    }

    /// Adds a recipe.
    pub fn insert(&mut self, entry: TitleEntry) -> Result<(), IndexError> {
        self.inner.insert(entry)?;
        Ok(())
    }

    /// Iterates recipes in title order.
    pub fn iter(&self) -> impl Iterator<Item = &TitleEntry> {
        self.inner.iter()
    }

    /// Iterates recipes carrying `tag`, in title order.
    pub fn tagged<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a TitleEntry> + 'a {
        self.inner.iter().filter(move |entry| entry.has_tag(tag))
    }

    /// Returns the number of recipes.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if there are no recipes.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
