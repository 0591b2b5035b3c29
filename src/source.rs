//! Content provider contract.
//!
//! The controller never owns its source: hosts keep the source alive in an
//! `Rc` and hand the controller a `Weak`. A source that has been dropped
//! reads as zero pages on the next structural operation, so a vanished
//! collaborator unloads the world instead of faulting.

use crate::types::PageIndex;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Tag grouping interchangeable content units in the reuse pool.
///
/// Units retired from different indices with the same id may be handed back
/// for any index carrying that id. The engine never looks inside a unit;
/// the id is the only typing it sees.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReuseId(String);

impl ReuseId {
    /// Create a reuse id from any string-like tag.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw tag.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ReuseId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ReuseId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ReuseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Supplies the page count and builds content units on demand.
///
/// `page_at` receives a recycled unit from the pool when one is available
/// under the index's reuse id; the source may refit and return it, or drop
/// it and build fresh. Returning `None` declares an explicit gap: no unit
/// is bound and the index is retried on the next reconcile.
pub trait PageSource<U> {
    /// Number of pages currently in the collection.
    fn page_count(&self) -> usize;

    /// Produce the unit for `index`, optionally refitting `recycled`.
    fn page_at(&mut self, index: PageIndex, recycled: Option<U>) -> Option<U>;

    /// Reuse id for `index`, or `None` for the anonymous pool bucket.
    fn reuse_id(&self, index: PageIndex) -> Option<ReuseId> {
        let _ = index;
        None
    }
}

/// Shared handle to a page source, held by the host.
pub type SharedSource<U> = Rc<RefCell<dyn PageSource<U>>>;

/// Non-owning handle to a page source, held by the controller.
pub type WeakSource<U> = Weak<RefCell<dyn PageSource<U>>>;
