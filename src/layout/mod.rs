//! Layout strategy contract and built-in strategies.
//!
//! A layouter is a pure function from collection state to geometry: given
//! the page count, the viewport and what is currently loaded, it decides
//! where every interesting page sits, how large the scrollable content is,
//! and which indices must be kept loaded. The engine uses the returned
//! frames verbatim; it never assumes anything about their arrangement.

mod linear;
mod stacked;

pub use linear::LinearLayouter;
pub use stacked::StackedLayouter;

use crate::geometry::{Rect, Size};
use crate::types::PageIndex;
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

/// Scroll direction for the built-in layouters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    /// Pages advance left to right.
    #[default]
    Horizontal,
    /// Pages advance top to bottom.
    Vertical,
}

/// Collection state handed to a layouter.
#[derive(Debug, Clone)]
pub struct LayoutQuery<'a> {
    /// Number of pages in the collection.
    pub page_count: usize,
    /// The viewport's visible rectangle: origin is the current offset,
    /// size is the viewport bounds.
    pub viewport: Rect,
    /// Indices currently loaded.
    pub loaded: &'a BTreeSet<PageIndex>,
    /// Page the collection is navigating toward, when a navigation or
    /// focused layouter swap is in flight.
    pub focus: Option<PageIndex>,
}

/// Geometry answer from a layouter.
#[derive(Debug, Clone, Default)]
pub struct LayoutPlan {
    /// Indices that must be loaded for this geometry. Every required index
    /// must have a frame in `frames`.
    pub required: BTreeSet<PageIndex>,
    /// Frame per page, in content coordinates.
    pub frames: BTreeMap<PageIndex, Rect>,
    /// Total scrollable extent.
    pub content_size: Size,
}

impl LayoutPlan {
    /// A plan with nothing required and no content.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Drop contract-violating parts of the plan: required indices outside
    /// `[0, page_count)`, required indices without a frame, and frames for
    /// out-of-range indices. Violations are logged, not surfaced; a
    /// layouter bug should degrade the window, not take down the host.
    pub(crate) fn sanitized(mut self, page_count: usize) -> Self {
        self.required.retain(|index| {
            let in_bounds = index.in_bounds(page_count);
            if !in_bounds {
                warn!(%index, page_count, "layouter required an out-of-range index");
            }
            in_bounds
        });
        self.frames.retain(|index, _| index.in_bounds(page_count));
        let framed: Vec<PageIndex> = self
            .required
            .iter()
            .filter(|index| !self.frames.contains_key(index))
            .copied()
            .collect();
        for index in framed {
            warn!(%index, "layouter required an index without a frame");
            self.required.remove(&index);
        }
        self
    }
}

/// Pluggable layout strategy.
pub trait Layouter {
    /// Compute geometry for the given collection state.
    fn plan(&self, query: &LayoutQuery<'_>) -> LayoutPlan;
}
