//! Index pagination and alphabet navigation.

use std::num::NonZeroUsize;
use std::ops::Range;

use potluck_text::alphabetic_class;
use serde::Serialize;

/// Where a new initial letter starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LetterMarker {
    /// Folded initial letter, or `#` for titles that do not start with one.
    pub letter: char,
    /// 1-based page the letter starts on.
    pub page: usize,
    /// Position of the first title with this letter in the whole listing.
    pub position: usize,
}

/// One page of the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// 1-based page number.
    pub number: usize,
    /// Positions of the titles listed on this page.
    pub range: Range<usize>,
    /// Letter markers that fall on this page.
    pub markers: Vec<LetterMarker>,
}

/// Pages and letter markers for an ordered title listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    page_size: NonZeroUsize,
    pages: Vec<Page>,
    markers: Vec<LetterMarker>,
}

impl Pagination {
    /// Splits `titles` (already in display order) into pages of
    /// `page_size`, the last one possibly shorter, and records a marker at
    /// the first title and wherever the folded initial letter changes.
    pub fn build<'a, I>(titles: I, page_size: NonZeroUsize) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let size = page_size.get();
        let mut markers = Vec::new();
        let mut count = 0;
        let mut previous = None;

        for (position, title) in titles.into_iter().enumerate() {
            let letter = alphabetic_class(title);
            if previous != Some(letter) {
                markers.push(LetterMarker {
                    letter,
                    page: position / size + 1,
                    position,
                });
                previous = Some(letter);
            }
            count = position + 1;
        }

        let pages = (0..count.div_ceil(size))
            .map(|index| {
                let start = index * size;
                let number = index + 1;
                Page {
                    number,
                    range: start..count.min(start + size),
                    markers: markers
                        .iter()
                        .copied()
                        .filter(|marker| marker.page == number)
                        .collect(),
                }
            })
            .collect();

        Self {
            page_size,
            pages,
            markers,
        }
    }

    /// Returns the number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Returns the pages in order.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Returns every letter marker in listing order.
    pub fn markers(&self) -> &[LetterMarker] {
        &self.markers
    }

    /// Returns the configured page size.
    pub fn page_size(&self) -> usize {
        self.page_size.get()
    }

    /// Returns the page that lists `position`.
    pub fn page_of(&self, position: usize) -> usize {
        position / self.page_size.get() + 1
    }
}
