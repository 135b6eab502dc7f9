//! Diacritic folding.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;
use unicode_segmentation::UnicodeSegmentation;

/// Class used for titles that do not start with a letter.
pub const NON_LETTER_CLASS: char = '#';

/// Returns the primary sort key of `text`: canonical decomposition with all
/// combining marks removed, lowercased.
///
/// `"Crème"` and `"creme"` share the key `"creme"`.
pub fn fold_key(text: &str) -> String {
    if text.is_ascii() {
        return text.to_ascii_lowercase();
    }

    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Returns the plain uppercase letter a title is filed under.
///
/// The first grapheme cluster is decomposed and stripped of marks, so `"Ä"`
/// files under `'A'`. A handful of letters without a decomposition are mapped
/// by hand. Anything else (digits, punctuation, scripts without a Latin
/// base letter) falls into [`NON_LETTER_CLASS`].
pub fn alphabetic_class(text: &str) -> char {
    let Some(first) = text.trim_start().graphemes(true).next() else {
        return NON_LETTER_CLASS;
    };

    let Some(base) = first.nfd().find(|c| !is_combining_mark(*c)) else {
        return NON_LETTER_CLASS;
    };

    if base.is_ascii_alphabetic() {
        return base.to_ascii_uppercase();
    }

    match base {
        'ß' | 'ẞ' => 'S',
        'æ' | 'Æ' => 'A',
        'ø' | 'Ø' | 'œ' | 'Œ' => 'O',
        'đ' | 'Đ' | 'ð' | 'Ð' => 'D',
        'ł' | 'Ł' => 'L',
        'þ' | 'Þ' => 'T',
        'ı' => 'I',
        _ => NON_LETTER_CLASS,
    }
}
