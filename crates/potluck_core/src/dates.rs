//! Date conversions between history, the cache and rendered pages.
//!
//! Dates travel as ISO 8601 strings. Anything that fails to parse is shown
//! verbatim rather than rejected.

use chrono::{DateTime, SecondsFormat, Utc};

/// Page date format (`%F`).
pub const PAGE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Formats epoch seconds as an ISO 8601 UTC timestamp.
pub fn from_epoch(seconds: i64) -> String {
    DateTime::<Utc>::from_timestamp(seconds, 0)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Converts an ISO 8601 date to RFC 2822, as used by RSS `pubDate`.
pub fn to_rfc2822(date: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(date)
        .ok()
        .map(|parsed| parsed.to_rfc2822())
}

/// Formats an ISO 8601 date for display on a page.
pub fn display(date: &str) -> String {
    match DateTime::parse_from_rfc3339(date) {
        Ok(parsed) => parsed.format(PAGE_DATE_FORMAT).to_string(),
        Err(_) => date.to_string(),
    }
}

/// Normalizes an ISO 8601 date for Atom, falling back to the input.
pub fn to_atom(date: &str) -> String {
    match DateTime::parse_from_rfc3339(date) {
        Ok(parsed) => parsed.to_rfc3339_opts(SecondsFormat::Secs, true),
        Err(_) => date.to_string(),
    }
}
