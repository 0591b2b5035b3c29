//! Error types for structural page operations.

use crate::types::PageIndex;
use thiserror::Error;

/// Rejection of a structural request before any state is touched.
///
/// A rejected request has no side effects: the registry is not mutated, no
/// events fire, and the request's completion callback is not invoked (the
/// error return takes its place).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PageError {
    /// A caller-supplied index does not address an existing page.
    ///
    /// Insert validates against the post-mutation count; delete, move,
    /// reload and navigate validate against the pre-mutation count.
    #[error("page index {index} out of range for {count} pages")]
    OutOfRange {
        /// The offending index.
        index: PageIndex,
        /// The page count the index was validated against.
        count: usize,
    },
}
