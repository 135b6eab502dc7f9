//! Site output: recipe pages, tag pages, paginated index pages and feeds.

mod feed;
mod html;

use std::fs;
use std::path::{Path, PathBuf};

use potluck_cache::CacheEntry;
use tracing::{debug, info};

use crate::index::{TagIndex, TitleEntry, TitleIndex};
use crate::pagination::Pagination;
use crate::{SiteConfig, SiteError};

pub use feed::{Feed, FeedItem};

/// RSS feed file name.
pub const RSS_FILE: &str = "rss.xml";

/// Atom feed file name.
pub const ATOM_FILE: &str = "atom.xml";

/// Escapes text for HTML and XML.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// File name of index page `number` (1-based).
pub fn page_file(number: usize) -> String {
    if number <= 1 {
        "index.html".to_string()
    } else {
        format!("page-{}.html", number)
    }
}

/// File name of the page listing recipes tagged `tag`.
pub fn tag_file(tag: &str) -> String {
    let name: String = tag
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("@{}.html", name)
}

/// Writes generated files into the output directory.
pub struct SiteRenderer<'a> {
    config: &'a SiteConfig,
    output_dir: PathBuf,
}

impl<'a> SiteRenderer<'a> {
    /// Creates a renderer writing into `output_dir`.
    pub fn new(config: &'a SiteConfig, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            output_dir: output_dir.into(),
        }
    }

    /// Returns the output directory.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path of the page for `slug`.
    pub fn recipe_path(&self, slug: &str) -> PathBuf {
        self.output_dir.join(format!("{}.html", slug))
    }

    /// Writes the page of one recipe.
    pub fn write_recipe(&self, entry: &CacheEntry, body: &str) -> Result<PathBuf, SiteError> {
        let page = html::recipe_page(self.config, entry, body);
        let path = self.recipe_path(&entry.slug);
        write(&path, &page)?;
        info!("Generated {}", path.display());
        Ok(path)
    }

    /// Writes every index page. Returns the number of pages written.
    ///
    /// An empty site still gets an `index.html`.
    pub fn write_index(
        &self,
        tags: &TagIndex,
        titles: &TitleIndex,
        pagination: &Pagination,
        intro: Option<&str>,
    ) -> Result<usize, SiteError> {
        let listing: Vec<&TitleEntry> = titles.iter().collect();
        let context = html::IndexContext {
            tags,
            listing: &listing,
            pagination,
            intro,
        };

        if pagination.pages().is_empty() {
            let path = self.output_dir.join(page_file(1));
            write(&path, &html::index_page(self.config, &context, None))?;
            info!("Generated {}", path.display());
            return Ok(1);
        }

        for page in pagination.pages() {
            let path = self.output_dir.join(page_file(page.number));
            write(&path, &html::index_page(self.config, &context, Some(page)))?;
            info!("Generated {}", path.display());
        }

        Ok(pagination.page_count())
    }

    /// Writes one page per tag. Returns the number of pages written.
    pub fn write_tag_pages(&self, tags: &TagIndex, titles: &TitleIndex) -> Result<usize, SiteError> {
        let mut written = 0;
        for tag in tags.iter() {
            let listing: Vec<&TitleEntry> = titles.tagged(tag).collect();
            let path = self.output_dir.join(tag_file(tag));
            write(&path, &html::tag_page(self.config, tag, &listing))?;
            debug!("Generated {} ({} recipes)", path.display(), listing.len());
            written += 1;
        }
        info!("Generated {} tag pages", written);
        Ok(written)
    }

    /// Writes the RSS and Atom feeds.
    pub fn write_feeds(&self, feed: &Feed) -> Result<(), SiteError> {
        let rss = self.output_dir.join(RSS_FILE);
        write(&rss, &feed.rss(self.config))?;

        let atom = self.output_dir.join(ATOM_FILE);
        write(&atom, &feed.atom(self.config))?;

        info!("Generated feeds with {} entries", feed.len());
        Ok(())
    }
}

fn write(path: &Path, content: &str) -> Result<(), SiteError> {
    fs::write(path, content).map_err(|e| SiteError::io_at(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::num::NonZeroUsize;
    use tempfile::tempdir;

    #[rstest]
    #[case("Mac & cheese", "Mac &amp; cheese")]
    #[case("<b>\"Tom's\"</b>", "&lt;b&gt;&quot;Tom&apos;s&quot;&lt;/b&gt;")]
    #[case("plain", "plain")]
    fn test_escape(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(escape(input), expected);
    }

    #[rstest]
    #[case(1, "index.html")]
    #[case(2, "page-2.html")]
    #[case(12, "page-12.html")]
    fn test_page_file(#[case] number: usize, #[case] expected: &str) {
        assert_eq!(page_file(number), expected);
    }

    #[test]
    fn test_tag_file() {
        assert_eq!(tag_file("breakfast"), "@breakfast.html");
        assert_eq!(tag_file("sweet/sour"), "@sweet_sour.html");
    }

    fn site() -> (TagIndex, TitleIndex) {
        let mut tags = TagIndex::with_capacity(10);
        let mut titles = TitleIndex::with_capacity(10);
        for (title, slug, recipe_tags) in [
            ("Pancakes", "pancakes", vec!["breakfast", "sweet"]),
            ("Chili", "chili", vec!["spicy"]),
            ("Waffles", "waffles", vec!["breakfast"]),
        ] {
            let recipe_tags: Vec<String> = recipe_tags.into_iter().map(String::from).collect();
            tags.insert_all(&recipe_tags).unwrap();
            titles
                .insert(TitleEntry::new(title, slug, recipe_tags))
                .unwrap();
        }
        (tags, titles)
    }

    #[test]
    fn test_write_index_pages() {
        let dir = tempdir().unwrap();
        let config = SiteConfig::new();
        let renderer = SiteRenderer::new(&config, dir.path());
        let (tags, titles) = site();
        let pagination = Pagination::build(
            titles.iter().map(|t| t.title.as_str()),
            NonZeroUsize::new(2).unwrap(),
        );

        let written = renderer
            .write_index(&tags, &titles, &pagination, Some("<p>Welcome</p>"))
            .unwrap();

        assert_eq!(written, 2);
        let first = fs::read_to_string(dir.path().join("index.html")).unwrap();
        let second = fs::read_to_string(dir.path().join("page-2.html")).unwrap();
        assert!(first.contains("./chili.html"));
        assert!(first.contains("./pancakes.html"));
        assert!(!first.contains("./waffles.html"));
        assert!(second.contains("./waffles.html"));
        assert!(first.contains("<p>Welcome</p>"));
        assert!(first.contains("@breakfast.html"));
        assert!(first.contains("href=\"page-2.html#letter-W\""));
    }

    #[test]
    fn test_write_index_for_empty_site() {
        let dir = tempdir().unwrap();
        let config = SiteConfig::new();
        let renderer = SiteRenderer::new(&config, dir.path());
        let tags = TagIndex::with_capacity(1);
        let titles = TitleIndex::with_capacity(1);
        let pagination = Pagination::build(std::iter::empty(), NonZeroUsize::new(5).unwrap());

        let written = renderer.write_index(&tags, &titles, &pagination, None).unwrap();

        assert_eq!(written, 1);
        assert!(dir.path().join("index.html").exists());
    }

    #[test]
    fn test_write_tag_pages() {
        let dir = tempdir().unwrap();
        let config = SiteConfig::new();
        let renderer = SiteRenderer::new(&config, dir.path());
        let (tags, titles) = site();

        let written = renderer.write_tag_pages(&tags, &titles).unwrap();

        assert_eq!(written, 3);
        let breakfast = fs::read_to_string(dir.path().join("@breakfast.html")).unwrap();
        assert!(breakfast.contains("./pancakes.html"));
        assert!(breakfast.contains("./waffles.html"));
        assert!(!breakfast.contains("./chili.html"));
        let pancakes = breakfast.find("./pancakes.html").unwrap();
        let waffles = breakfast.find("./waffles.html").unwrap();
        assert!(pancakes < waffles);
    }

    #[test]
    fn test_write_recipe() {
        let dir = tempdir().unwrap();
        let config = SiteConfig::new();
        let renderer = SiteRenderer::new(&config, dir.path());
        let entry = CacheEntry {
            author: "Jane".to_string(),
            added: "2021-03-04T10:11:12+01:00".to_string(),
            modified: "2022-01-10T08:00:00Z".to_string(),
            published: "Thu, 4 Mar 2021 10:11:12 +0100".to_string(),
            ..CacheEntry::new("soup", 1, "Soup & bread", vec!["hot".to_string()])
        };

        let path = renderer.write_recipe(&entry, "<h1>Soup</h1>\n").unwrap();

        assert_eq!(path, dir.path().join("soup.html"));
        let page = fs::read_to_string(path).unwrap();
        assert!(page.contains("<title>Soup &amp; bread – Based Cooking</title>"));
        assert!(page.contains("<h1>Soup</h1>"));
        assert!(page.contains("<a href=\"@hot.html\">hot</a>"));
        assert!(page.contains(
            "Recipe posted on: 2021-03-04, last edited on: 2022-01-10, written by: Jane"
        ));
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let config = SiteConfig::new();
        let renderer = SiteRenderer::new(&config, dir.path().join("missing"));
        let entry = CacheEntry::new("soup", 1, "Soup", vec![]);

        let err = renderer.write_recipe(&entry, "").unwrap_err();

        assert!(err.to_string().contains("soup.html"));
    }
}
