//! HTML page templates.

use std::fmt::Write;

use potluck_cache::CacheEntry;

use super::{escape, page_file, tag_file};
use crate::dates;
use crate::index::{TagIndex, TitleEntry};
use crate::pagination::{LetterMarker, Page, Pagination};
use crate::SiteConfig;

const FAVICON: &str = "data:image/svg+xml,\
<svg xmlns=%22http://www.w3.org/2000/svg%22 viewBox=%220 0 100 100%22>\
<text y=%221em%22 font-size=%2280%22>🍲</text></svg>";

/// Everything an index page draws from.
pub(super) struct IndexContext<'a> {
    pub tags: &'a TagIndex,
    pub listing: &'a [&'a TitleEntry],
    pub pagination: &'a Pagination,
    pub intro: Option<&'a str>,
}

fn head(out: &mut String, title: &str, description: &str) {
    let _ = write!(
        out,
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         \t<meta charset=\"UTF-8\">\n\
         \t<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         \t<title>{}</title>\n\
         \t<meta name=\"description\" content=\"{}\">\n\
         \t<link rel=\"icon\" href=\"{}\">\n\
         \t<link rel=\"stylesheet\" href=\"./style.css\">\n\
         </head>\n\
         <body>\n",
        escape(title),
        escape(description),
        FAVICON
    );
}

fn banner(out: &mut String, title: &str) {
    let _ = write!(
        out,
        "\t<div class=\"banner\">\n\
         \t\t<h1>🍲 {} 🍳</h1>\n\
         \t\t<hr />\n\
         \t</div>\n",
        escape(title)
    );
}

fn footer(out: &mut String) {
    out.push_str(
        "\t<footer>\n\
         \t\t<hr />\n\
         \t\t<a href=\".\">homepage</a>\n\
         \t\t<a href=\"./rss.xml\">RSS</a>\n\
         \t\t<a href=\"./atom.xml\">atom</a>\n\
         \t\t<br />\n\
         \t\t<p>All site content is in the Public Domain.</p>\n\
         \t</footer>\n\
         </body>\n\
         </html>\n",
    );
}

fn tag_links<'t>(out: &mut String, tags: impl Iterator<Item = &'t str>) {
    let links: Vec<String> = tags
        .map(|tag| {
            format!(
                "\t\t<a href=\"{}\">{}</a>",
                escape(&tag_file(tag)),
                escape(tag)
            )
        })
        .collect();
    out.push_str(&links.join(", \n"));
}

/// Anchor id of the first title under `letter`.
fn letter_anchor(letter: char) -> String {
    if letter.is_ascii_alphabetic() {
        format!("letter-{}", letter)
    } else {
        "letter-num".to_string()
    }
}

fn letter_nav(out: &mut String, markers: &[LetterMarker]) {
    if markers.is_empty() {
        return;
    }
    out.push_str("\t<nav class=\"letters\">\n");
    for marker in markers {
        let _ = writeln!(
            out,
            "\t\t<a href=\"{}#{}\">{}</a>",
            page_file(marker.page),
            letter_anchor(marker.letter),
            marker.letter
        );
    }
    out.push_str("\t</nav>\n");
}

fn page_nav(out: &mut String, pagination: &Pagination, current: usize) {
    if pagination.page_count() < 2 {
        return;
    }
    out.push_str("\t<nav class=\"pages\">\n");
    for page in pagination.pages() {
        if page.number == current {
            let _ = writeln!(out, "\t\t<b>{}</b>", page.number);
        } else {
            let _ = writeln!(
                out,
                "\t\t<a href=\"{}\">{}</a>",
                page_file(page.number),
                page.number
            );
        }
    }
    out.push_str("\t</nav>\n");
}

fn list_entry(out: &mut String, entry: &TitleEntry, anchor: Option<char>) {
    match anchor {
        Some(letter) => {
            let _ = writeln!(out, "\t\t<li id=\"{}\">", letter_anchor(letter));
        }
        None => out.push_str("\t\t<li>\n"),
    }
    let _ = write!(
        out,
        "\t\t\t<a href=\"{}\">{}</a>\n\t\t</li>\n",
        escape(&entry.url),
        escape(&entry.title)
    );
}

/// Page of one recipe.
pub(super) fn recipe_page(config: &SiteConfig, entry: &CacheEntry, body: &str) -> String {
    let mut out = String::with_capacity(body.len() + 2048);

    head(
        &mut out,
        &format!("{} – {}", entry.title, config.title),
        &config.description,
    );
    out.push_str("\t<main>\n");
    out.push_str(body);
    out.push_str("\t<p><i>Recipe tags:\n");
    tag_links(&mut out, entry.tags.iter().map(String::as_str));
    out.push_str("\n\t</i></p>\n\t</main>\n");
    let _ = writeln!(
        out,
        "\t<p><i>Recipe posted on: {}, last edited on: {}, written by: {}</i></p>",
        escape(&dates::display(&entry.added)),
        escape(&dates::display(&entry.modified)),
        escape(&entry.author)
    );
    footer(&mut out);

    out
}

/// One index page; `page` is `None` for a site without recipes.
pub(super) fn index_page(config: &SiteConfig, context: &IndexContext<'_>, page: Option<&Page>) -> String {
    let mut out = String::with_capacity(4096);

    head(&mut out, &config.title, &config.description);
    banner(&mut out, &config.title);
    let _ = write!(out, "\t<p>{}</p>\n\t<p><i>Tags:\n", escape(&config.description));
    tag_links(&mut out, context.tags.iter());
    out.push_str("\n\t</i></p>\n");

    letter_nav(&mut out, context.pagination.markers());
    out.push_str("\t<h2>Recipes</h2>\n\t<ul id=\"artlist\">\n");
    if let Some(page) = page {
        for position in page.range.clone() {
            let anchor = page
                .markers
                .iter()
                .find(|marker| marker.position == position)
                .map(|marker| marker.letter);
            list_entry(&mut out, context.listing[position], anchor);
        }
    }
    out.push_str("\t</ul>\n");
    page_nav(&mut out, context.pagination, page.map_or(1, |page| page.number));

    if let Some(intro) = context.intro {
        out.push_str(intro);
    }
    footer(&mut out);

    out
}

/// Listing of the recipes carrying `tag`.
pub(super) fn tag_page(config: &SiteConfig, tag: &str, listing: &[&TitleEntry]) -> String {
    let mut out = String::with_capacity(2048);

    head(
        &mut out,
        &format!("Recipes tagged {} – {}", tag, config.title),
        &config.description,
    );
    banner(&mut out, &config.title);
    let _ = writeln!(
        out,
        "\t<p><i>Filtering recipes tagged: <b>{}</b>",
        escape(tag)
    );
    out.push_str("\t</i></p>\n\t<h2>Recipes</h2>\n\t<ul id=\"artlist\">\n");
    for entry in listing {
        list_entry(&mut out, entry, None);
    }
    out.push_str("\t</ul>\n");
    footer(&mut out);

    out
}
