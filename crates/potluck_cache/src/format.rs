//! Plain-text cache file format.
//!
//! ```text
//! <slug>:
//! \t<modified-epoch>
//! \t<title>
//! \t<space separated tags>
//! \t<author>
//! \t<added-date> <modified-date>
//! \t<rfc2822 added-date>
//! ```
//!
//! The block repeats for every entry. A block carries eight fields (the date
//! line holds two). A block that stops early because the file ends is treated
//! as the end of the stream; a block that stops early anywhere else is
//! corruption.

use std::iter::Peekable;

use tracing::warn;

use crate::{CacheEntry, CacheError};

/// Number of fields in one cache block.
pub const FIELDS_PER_ENTRY: usize = 8;

/// How far a block got before it stopped parsing.
enum Incomplete {
    /// The file ended after this many fields.
    Truncated(usize),
    /// A line was present but did not match the grammar after this many fields.
    Malformed(usize),
}

/// Parses every entry in `content`.
///
/// `origin` names the file in error messages.
pub fn parse(content: &str, origin: &str) -> Result<Vec<CacheEntry>, CacheError> {
    let mut lines = content.lines().peekable();
    let mut entries = Vec::new();

    while let Some(header) = next_non_blank(&mut lines) {
        let number = entries.len() + 1;
        match parse_block(header, &mut lines) {
            Ok(entry) => entries.push(entry),
            Err(Incomplete::Truncated(fields)) => {
                warn!(
                    "Cache file {} ends inside entry number {} ({} of {} fields), ignoring it",
                    origin, number, fields, FIELDS_PER_ENTRY
                );
                break;
            }
            Err(Incomplete::Malformed(fields)) => {
                return Err(CacheError::corrupted(format!(
                    "{}: missing {} fields in entry number {}",
                    origin,
                    FIELDS_PER_ENTRY - fields,
                    number
                )));
            }
        }
    }

    Ok(entries)
}

/// Serializes entries in order.
pub fn render(entries: &[CacheEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        out.push_str(&entry.slug);
        out.push_str(":\n\t");
        out.push_str(&entry.mtime.to_string());
        out.push_str("\n\t");
        out.push_str(&entry.title);
        out.push_str("\n\t");
        out.push_str(&entry.tags_line());
        out.push_str("\n\t");
        out.push_str(&entry.author);
        out.push_str("\n\t");
        out.push_str(&entry.added);
        out.push(' ');
        out.push_str(&entry.modified);
        out.push_str("\n\t");
        out.push_str(&entry.published);
        out.push('\n');
    }
    out
}

/// Returns true when `slug` fits on a block header line.
///
/// Spaces are allowed; a colon or a line break would end the header early.
pub fn is_storable_slug(slug: &str) -> bool {
    !slug.trim().is_empty() && !slug.contains([':', '\n', '\r'])
}

/// Checks that an entry would parse back after [`render`].
pub fn check(entry: &CacheEntry) -> Result<(), String> {
    if !is_storable_slug(&entry.slug) {
        return Err(format!("slug {:?} cannot be stored", entry.slug));
    }
    if entry.added.is_empty() || entry.added.contains(char::is_whitespace) {
        return Err(format!("added date {:?} must be one word", entry.added));
    }

    let single_line = [
        ("title", &entry.title),
        ("author", &entry.author),
        ("modified date", &entry.modified),
        ("published date", &entry.published),
    ];
    for (name, value) in single_line {
        if value.trim().is_empty() || value.contains('\n') {
            return Err(format!("{} {:?} must be a non-empty single line", name, value));
        }
    }

    Ok(())
}

fn next_non_blank<'a, I>(lines: &mut Peekable<I>) -> Option<&'a str>
where
    I: Iterator<Item = &'a str>,
{
    lines.by_ref().find(|line| !line.trim().is_empty())
}

fn parse_block<'a, I>(header: &'a str, lines: &mut Peekable<I>) -> Result<CacheEntry, Incomplete>
where
    I: Iterator<Item = &'a str>,
{
    let slug = match header.strip_suffix(':') {
        Some(slug) if is_storable_slug(slug) => slug,
        _ if lines.peek().is_none() => return Err(Incomplete::Truncated(0)),
        _ => return Err(Incomplete::Malformed(0)),
    };

    let mtime = field(lines, 1)?
        .trim()
        .parse::<i64>()
        .map_err(|_| Incomplete::Malformed(1))?;
    let title = non_empty(field(lines, 2)?, 2)?;
    let tags = field(lines, 3)?;
    let author = non_empty(field(lines, 4)?, 4)?;

    let dates = field(lines, 5)?;
    let (added, modified) = match dates.split_once(' ') {
        Some((added, modified)) if !added.is_empty() && !modified.trim().is_empty() => {
            (added, modified)
        }
        _ if dates.trim().is_empty() => return Err(Incomplete::Malformed(5)),
        _ => return Err(Incomplete::Malformed(6)),
    };

    let published = non_empty(field(lines, 7)?, 7)?;

    Ok(CacheEntry {
        slug: slug.to_string(),
        mtime,
        title: title.to_string(),
        tags: tags.split_whitespace().map(str::to_string).collect(),
        author: author.to_string(),
        added: added.to_string(),
        modified: modified.to_string(),
        published: published.to_string(),
    })
}

/// Reads the next tab-prefixed line; `parsed` is the field count so far.
fn field<'a, I>(lines: &mut Peekable<I>, parsed: usize) -> Result<&'a str, Incomplete>
where
    I: Iterator<Item = &'a str>,
{
    match lines.next() {
        None => Err(Incomplete::Truncated(parsed)),
        Some(line) => line.strip_prefix('\t').ok_or(Incomplete::Malformed(parsed)),
    }
}

fn non_empty(value: &str, parsed: usize) -> Result<&str, Incomplete> {
    if value.trim().is_empty() {
        Err(Incomplete::Malformed(parsed))
    } else {
        Ok(value)
    }
}
