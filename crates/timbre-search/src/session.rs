//! Per-user paging through a ranked result.
//!
//! A [`BrowseSession`] remembers which query it last saw and how far into
//! that query's results the user has paged. Each user gets their own
//! session; nothing here is shared between users.

use crate::query::Query;

/// Songs shown per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 6;

/// Paging state for one user.
#[derive(Debug, Clone, PartialEq)]
pub struct BrowseSession {
    page_size: usize,
    start: usize,
    last_query: Option<Query>,
}

impl BrowseSession {
    /// A session showing `page_size` songs at a time (at least one).
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            start: 0,
            last_query: None,
        }
    }

    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Index of the first song on the current page.
    #[must_use]
    pub const fn start(&self) -> usize {
        self.start
    }

    /// Zero-based number of the current page.
    #[must_use]
    pub const fn page_number(&self) -> usize {
        self.start / self.page_size
    }

    #[must_use]
    pub const fn last_query(&self) -> Option<&Query> {
        self.last_query.as_ref()
    }

    /// Record the query about to be shown.
    ///
    /// Returns `true` and rewinds to the first page when any parameter
    /// differs from the previously observed query.
    pub fn observe(&mut self, query: &Query) -> bool {
        if self.last_query.as_ref() == Some(query) {
            return false;
        }
        self.last_query = Some(query.clone());
        self.start = 0;
        true
    }

    /// Move to the next page of a result holding `total` songs.
    ///
    /// Advances only while the current page is not already past the end, so
    /// repeated calls settle one page beyond the last song.
    pub fn recommend_more(&mut self, total: usize) {
        if self.start < total {
            self.start += self.page_size;
        }
    }

    /// Move to the page numbered `page` (zero-based).
    pub fn jump_to_page(&mut self, page: usize) {
        self.start = page.saturating_mul(self.page_size);
    }

    /// Whether every song of a `total`-song result has been shown.
    #[must_use]
    pub const fn is_exhausted(&self, total: usize) -> bool {
        self.start >= total
    }

    /// The slice of `items` visible on the current page.
    #[must_use]
    pub fn current_page<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        if self.start >= items.len() {
            return &[];
        }
        let end = (self.start + self.page_size).min(items.len());
        &items[self.start..end]
    }
}

impl Default for BrowseSession {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}
