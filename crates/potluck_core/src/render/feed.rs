//! RSS 2.0 and Atom feeds.

use std::fmt::Write;

use chrono::DateTime;
use potluck_cache::CacheEntry;

use super::escape;
use crate::{SiteConfig, dates};

/// One recipe as published in the feeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    /// Recipe slug.
    pub slug: String,
    /// Recipe title.
    pub title: String,
    /// Author.
    pub author: String,
    /// Added date, ISO 8601.
    pub added: String,
    /// Modified date, ISO 8601.
    pub modified: String,
    /// Added date, RFC 2822.
    pub published: String,
    /// Tags.
    pub tags: Vec<String>,
    /// Rendered body.
    pub html: String,
}

impl FeedItem {
    /// Builds an item from reconciled metadata and the rendered body.
    pub fn new(entry: &CacheEntry, html: &str) -> Self {
        Self {
            slug: entry.slug.clone(),
            title: entry.title.clone(),
            author: entry.author.clone(),
            added: entry.added.clone(),
            modified: entry.modified.clone(),
            published: entry.published.clone(),
            tags: entry.tags.clone(),
            html: html.to_string(),
        }
    }
}

/// Feed entries in scan order.
#[derive(Debug, Clone, Default)]
pub struct Feed {
    items: Vec<FeedItem>,
}

impl Feed {
    /// Creates an empty feed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry.
    pub fn push(&mut self, item: FeedItem) {
        self.items.push(item);
    }

    /// Returns the entries.
    pub fn items(&self) -> &[FeedItem] {
        &self.items
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the feed has no entries.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Renders the RSS 2.0 document.
    pub fn rss(&self, config: &SiteConfig) -> String {
        let mut out = String::with_capacity(1024 + self.items.len() * 2048);

        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        out.push_str("<rss version=\"2.0\">\n<channel>\n");
        let _ = writeln!(out, "\t<title>{}</title>", escape(&config.title));
        let _ = writeln!(out, "\t<link>{}</link>", escape(&config.url_root));
        let _ = writeln!(out, "\t<description>{}</description>", escape(&config.description));
        let _ = writeln!(out, "\t<category>{}</category>", escape(&config.category));

        for item in &self.items {
            out.push_str("\t<item>\n");
            let _ = writeln!(out, "\t\t<title>{}</title>", escape(&item.title));
            let _ = writeln!(out, "\t\t<link>{}</link>", escape(&item_url(config, &item.slug)));
            let _ = writeln!(out, "\t\t<guid>{}</guid>", escape(&item.slug));
            let _ = writeln!(out, "\t\t<author>{}</author>", escape(&item.author));
            let _ = writeln!(out, "\t\t<pubDate>{}</pubDate>", escape(&item.published));
            if !item.tags.is_empty() {
                let _ = writeln!(
                    out,
                    "\t\t<category>{}</category>",
                    escape(&item.tags.join(" "))
                );
            }
            let _ = writeln!(
                out,
                "\t\t<description>\n\t\t\t{}\n\t\t</description>",
                cdata(&item.html)
            );
            out.push_str("\t</item>\n");
        }

        out.push_str("</channel>\n</rss>\n");
        out
    }

    /// Renders the Atom document.
    pub fn atom(&self, config: &SiteConfig) -> String {
        let mut out = String::with_capacity(1024 + self.items.len() * 2048);
        let updated = self
            .latest_update()
            .unwrap_or_else(|| dates::from_epoch(0));

        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        out.push_str("<feed xmlns=\"http://www.w3.org/2005/Atom\">\n");
        let _ = writeln!(out, "\t<title>{}</title>", escape(&config.title));
        let _ = writeln!(out, "\t<subtitle>{}</subtitle>", escape(&config.description));
        let _ = writeln!(out, "\t<link href=\"{}\"/>", escape(&config.url_root));
        let _ = writeln!(out, "\t<id>{}</id>", escape(&config.url_root));
        let _ = writeln!(out, "\t<updated>{}</updated>", escape(&updated));

        for item in &self.items {
            let url = escape(&item_url(config, &item.slug));
            out.push_str("\t<entry>\n");
            let _ = writeln!(out, "\t\t<title>{}</title>", escape(&item.title));
            let _ = writeln!(out, "\t\t<link href=\"{}\"/>", url);
            let _ = writeln!(out, "\t\t<id>{}</id>", url);
            let _ = writeln!(out, "\t\t<published>{}</published>", escape(&dates::to_atom(&item.added)));
            let _ = writeln!(out, "\t\t<updated>{}</updated>", escape(&dates::to_atom(&item.modified)));
            let _ = writeln!(out, "\t\t<author><name>{}</name></author>", escape(&item.author));
            for tag in &item.tags {
                let _ = writeln!(out, "\t\t<category term=\"{}\"/>", escape(tag));
            }
            let _ = writeln!(
                out,
                "\t\t<content type=\"html\">{}</content>",
                cdata(&item.html)
            );
            out.push_str("\t</entry>\n");
        }

        out.push_str("</feed>\n");
        out
    }

    /// Newest modified date across the entries, in Atom form.
    fn latest_update(&self) -> Option<String> {
        self.items
            .iter()
            .filter_map(|item| DateTime::parse_from_rfc3339(&item.modified).ok())
            .max()
            .map(|latest| dates::to_atom(&latest.to_rfc3339()))
    }
}

/// Absolute URL of a recipe page.
fn item_url(config: &SiteConfig, slug: &str) -> String {
    format!("{}/{}.html", config.url_root.trim_end_matches('/'), slug)
}

/// Wraps `text` in CDATA sections, splitting any embedded terminator.
fn cdata(text: &str) -> String {
    format!("<![CDATA[{}]]>", text.replace("]]>", "]]]]><![CDATA[>"))
}
