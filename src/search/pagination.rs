//! Pagination Cursor
//!
//! Tracks which page of the current view is being revealed. The cursor never
//! looks at the records themselves, only at the view length, so "load more"
//! never re-runs filtering or sorting.

/// Page size used by the tour grid
pub const DEFAULT_PAGE_SIZE: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    offset: usize,
    page_size: usize,
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Cursor {
    /// A zero page size is bumped to one so the cursor always makes progress
    pub fn new(page_size: usize) -> Self {
        Self {
            offset: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Back to the first page; call whenever the view is recomputed
    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// The current page of `view`. Does not move the cursor.
    pub fn reveal<'a, T>(&self, view: &'a [T]) -> &'a [T] {
        let start = self.offset.min(view.len());
        let end = self.offset.saturating_add(self.page_size).min(view.len());
        &view[start..end]
    }

    /// Move to the next page, never past the end of the view
    pub fn advance(&mut self, view_len: usize) {
        self.offset = self.offset.saturating_add(self.page_size).min(view_len);
    }

    /// Nothing left to reveal at the current offset
    pub fn is_exhausted(&self, view_len: usize) -> bool {
        self.offset >= view_len
    }

    /// Another page exists after the current one ("load more" stays visible)
    pub fn has_more(&self, view_len: usize) -> bool {
        self.offset.saturating_add(self.page_size) < view_len
    }

    /// Number of records on screen once the current page is shown
    pub fn revealed_count(&self, view_len: usize) -> usize {
        self.offset.saturating_add(self.page_size).min(view_len)
    }
}
