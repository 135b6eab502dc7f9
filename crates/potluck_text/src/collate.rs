//! Locale-style string collation.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Compares two strings in alphabetical-listing order.
///
/// Three levels are compared in turn:
///
/// 1. base letters, ignoring accents and case (`"creme" == "Crème"`),
/// 2. accents, with the unaccented form first (`"creme" < "crème"`),
/// 3. raw code points, so only identical strings compare equal.
///
/// The last level keeps the order total, which the cache merge relies on:
/// two distinct slugs never collate as equal.
pub fn collate(a: &str, b: &str) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }

    if a.is_ascii() && b.is_ascii() {
        return a
            .bytes()
            .map(|c| c.to_ascii_lowercase())
            .cmp(b.bytes().map(|c| c.to_ascii_lowercase()))
            .then_with(|| a.cmp(b));
    }

    primary(a)
        .cmp(primary(b))
        .then_with(|| secondary(a).cmp(secondary(b)))
        .then_with(|| a.cmp(b))
}

/// Returns true when `items` is strictly ascending under [`collate`].
pub fn is_ascending<S: AsRef<str>>(items: &[S]) -> bool {
    items
        .windows(2)
        .all(|pair| collate(pair[0].as_ref(), pair[1].as_ref()) == Ordering::Less)
}

fn primary(text: &str) -> impl Iterator<Item = char> + '_ {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

fn secondary(text: &str) -> impl Iterator<Item = char> + '_ {
    text.nfd().flat_map(char::to_lowercase)
}
