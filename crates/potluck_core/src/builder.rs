//! Site build orchestration.

use std::fs;
use std::num::NonZeroUsize;
use std::time::Instant;

use potluck_cache::CacheStore;
use potluck_parser::{MarkdownParser, Parser};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::index::{TagIndex, TitleEntry, TitleIndex};
use crate::metadata::{GitMetadataProvider, MetadataProvider, NoHistory};
use crate::pagination::Pagination;
use crate::render::{Feed, FeedItem, SiteRenderer};
use crate::scanner::SourceScanner;
use crate::sync::{Classification, SyncMerge};
use crate::{SiteConfig, SiteError};

/// How one source was handled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemOutcome {
    /// Source slug.
    pub slug: String,
    /// Cache classification.
    pub classification: Classification,
}

/// Summary of a finished build.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BuildReport {
    /// Sources processed.
    pub items: usize,
    /// Sources reused from the cache with their page untouched.
    pub hits: usize,
    /// Sources reused from the cache whose page had to be rewritten.
    pub stale_misses: usize,
    /// Sources whose modification time changed.
    pub modified: usize,
    /// Sources not found in the cache.
    pub new: usize,
    /// Recipe pages written.
    pub recipe_pages: usize,
    /// Distinct tags.
    pub tags: usize,
    /// Index pages written.
    pub index_pages: usize,
    /// Entries in the persisted cache, stale ones included.
    pub cache_entries: usize,
    /// Wall-clock build time in milliseconds.
    pub elapsed_ms: f64,
    /// Per-source outcomes, in scan order.
    pub outcomes: Vec<ItemOutcome>,
}

impl BuildReport {
    fn record(&mut self, slug: &str, classification: Classification) {
        self.items += 1;
        match classification {
            Classification::Hit => self.hits += 1,
            Classification::StaleMiss => self.stale_misses += 1,
            Classification::Modified => self.modified += 1,
            Classification::New => self.new += 1,
        }
        if classification.writes_output() {
            self.recipe_pages += 1;
        }
        self.outcomes.push(ItemOutcome {
            slug: slug.to_string(),
            classification,
        });
    }

    /// Returns the classification recorded for `slug`.
    pub fn classification_of(&self, slug: &str) -> Option<Classification> {
        self.outcomes
            .iter()
            .find(|outcome| outcome.slug == slug)
            .map(|outcome| outcome.classification)
    }

    /// Total files generated, feeds included.
    pub fn pages_written(&self) -> usize {
        self.recipe_pages + self.tags + self.index_pages + 2
    }
}

/// Builds a site from its configuration.
pub struct SiteBuilder {
    config: SiteConfig,
    parser: MarkdownParser,
    provider: Box<dyn MetadataProvider>,
    clean: bool,
}

impl SiteBuilder {
    /// Creates a builder. Revision metadata comes from git unless the
    /// configuration disables it.
    pub fn new(config: SiteConfig) -> Self {
        let provider: Box<dyn MetadataProvider> = if config.git {
            Box::new(GitMetadataProvider::new())
        } else {
            Box::new(NoHistory)
        };

        Self {
            config,
            parser: MarkdownParser::new(),
            provider,
            clean: false,
        }
    }

    /// Replaces the metadata provider.
    pub fn with_provider(mut self, provider: impl MetadataProvider + 'static) -> Self {
        self.provider = Box::new(provider);
        self
    }

    /// Ignores the existing cache when set.
    pub fn clean(mut self, yes: bool) -> Self {
        self.clean = yes;
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Runs one build.
    ///
    /// The cache file is rewritten only after every page has been written,
    /// so a failed build leaves the previous cache in place.
    pub fn build(&self) -> Result<BuildReport, SiteError> {
        let start = Instant::now();
        let config = &self.config;
        config.validate()?;
        let page_size = NonZeroUsize::new(config.page_size)
            .ok_or_else(|| SiteError::config("page_size must be greater than zero"))?;

        let source_dir = config.source_path();
        let output_dir = config.output_path();
        let cache_path = config.cache_path();

        fs::create_dir_all(&output_dir).map_err(|e| SiteError::io_at(&output_dir, e))?;

        let mut store = if self.clean {
            info!("Clean build: ignoring {}", cache_path.display());
            CacheStore::empty(&cache_path, config.max_items)
        } else {
            CacheStore::load(&cache_path, config.max_items)?
        };

        debug!(
            "Reading sources with the {} parser ({})",
            self.parser.name(),
            self.parser.extensions().join(", ")
        );
        let sources = SourceScanner::new(&source_dir)
            .extensions(self.parser.extensions().iter().copied())
            .scan()?;

        let renderer = SiteRenderer::new(config, &output_dir);
        let mut tags = TagIndex::with_capacity(config.max_tags);
        let mut titles = TitleIndex::with_capacity(config.max_items);
        let mut feed = Feed::new();
        let mut report = BuildReport::default();

        {
            let mut merge = SyncMerge::new(&mut store, self.provider.as_ref(), &config.default_author);

            for item in &sources {
                let source = fs::read_to_string(&item.path)
                    .map_err(|e| SiteError::io_at(&item.path, e))?;
                let document = self.parser.parse(&item.slug, &source)?;

                if document.title.is_none() {
                    warn!("{} has no title (a line starting with \"# \")", item.path.display());
                }
                if document.tags.is_empty() {
                    warn!("{} has no tags line", item.path.display());
                }

                let output_exists = renderer.recipe_path(&item.slug).exists();
                let reconciled = merge.reconcile(item, &document, output_exists)?;

                if reconciled.classification.writes_output() {
                    renderer.write_recipe(&reconciled.entry, &document.html)?;
                } else {
                    debug!("Using cached page for {}", item.slug);
                }

                tags.insert_all(&reconciled.entry.tags)?;
                titles.insert(TitleEntry::new(
                    reconciled.entry.title.clone(),
                    reconciled.entry.slug.clone(),
                    reconciled.entry.tags.clone(),
                ))?;
                feed.push(FeedItem::new(&reconciled.entry, &document.html));
                report.record(&item.slug, reconciled.classification);
            }
        }

        let pagination = Pagination::build(titles.iter().map(|entry| entry.title.as_str()), page_size);
        let intro = self.render_intro()?;

        renderer.write_feeds(&feed)?;
        report.index_pages = renderer.write_index(&tags, &titles, &pagination, intro.as_deref())?;
        renderer.write_tag_pages(&tags, &titles)?;
        report.tags = tags.len();

        report.cache_entries = store.persist()?;
        report.elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        info!(
            "Generated {} pages in {:.1} milliseconds",
            report.pages_written(),
            report.elapsed_ms
        );
        Ok(report)
    }

    /// Renders the configured index introduction, if the file exists.
    fn render_intro(&self) -> Result<Option<String>, SiteError> {
        let Some(path) = self.config.index_markdown_path() else {
            return Ok(None);
        };
        if !path.is_file() {
            debug!("No index introduction at {}", path.display());
            return Ok(None);
        }

        let source = fs::read_to_string(&path).map_err(|e| SiteError::io_at(&path, e))?;
        let html = self
            .parser
            .render_fragment(&path.display().to_string(), &source)?;
        Ok(Some(html))
    }
}
