//! Core page-index newtype

/// Logical page position. 0-indexed, dense and contiguous over
/// `[0, number_of_pages)`.
///
/// Indices shift on insert/delete/move exactly as positions in a dense
/// sequence would; the registry owns that arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PageIndex(usize);

impl PageIndex {
    /// Create a new PageIndex from a raw 0-based value.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the raw 0-based index value.
    pub fn get(&self) -> usize {
        self.0
    }

    /// Get the next page index.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Get the previous page index, saturating at 0.
    pub fn prev(&self) -> Self {
        Self(self.0.saturating_sub(1))
    }

    /// Whether this index addresses an existing page given `page_count`.
    pub fn in_bounds(&self, page_count: usize) -> bool {
        self.0 < page_count
    }

    /// Clamp to the last valid index for `page_count`.
    ///
    /// Returns index 0 when `page_count` is 0; callers treat an empty
    /// collection's current page as 0 by convention.
    pub fn clamped(&self, page_count: usize) -> Self {
        Self(self.0.min(page_count.saturating_sub(1)))
    }
}

impl From<usize> for PageIndex {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl std::fmt::Display for PageIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
