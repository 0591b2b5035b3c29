//! Contiguous one-page-per-viewport layout.

use super::{Axis, LayoutPlan, LayoutQuery, Layouter};
use crate::geometry::{Rect, Size};
use crate::types::PageIndex;
use std::collections::BTreeSet;

/// Lays pages edge to edge along one axis, each sized to the viewport.
///
/// The required set is the pages intersecting the viewport, inflated by
/// `overscan` pages on each side so neighbors are warm before they scroll
/// in. An optional gap separates consecutive pages.
#[derive(Debug, Clone, Copy)]
pub struct LinearLayouter {
    axis: Axis,
    spacing: f32,
    overscan: usize,
}

impl LinearLayouter {
    /// A layouter along `axis` with no spacing and one page of overscan.
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            spacing: 0.0,
            overscan: 1,
        }
    }

    /// Set the gap between consecutive pages.
    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing.max(0.0);
        self
    }

    /// Set how many off-screen pages to keep loaded on each side.
    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    fn extent(&self, viewport: &Rect) -> f32 {
        match self.axis {
            Axis::Horizontal => viewport.width,
            Axis::Vertical => viewport.height,
        }
    }

    fn frame_for(&self, index: PageIndex, viewport: &Rect) -> Rect {
        let stride = self.extent(viewport) + self.spacing;
        let position = index.get() as f32 * stride;
        match self.axis {
            Axis::Horizontal => Rect::new(position, 0.0, viewport.width, viewport.height),
            Axis::Vertical => Rect::new(0.0, position, viewport.width, viewport.height),
        }
    }
}

impl Layouter for LinearLayouter {
    fn plan(&self, query: &LayoutQuery<'_>) -> LayoutPlan {
        if query.page_count == 0 {
            return LayoutPlan::empty();
        }
        let extent = self.extent(&query.viewport);
        let stride = extent + self.spacing;
        let (viewport_min, viewport_max) = match self.axis {
            Axis::Horizontal => (query.viewport.x, query.viewport.max_x()),
            Axis::Vertical => (query.viewport.y, query.viewport.max_y()),
        };

        // First page whose far edge passes the viewport start, last page
        // whose near edge is short of the viewport end.
        let (first, last) = if stride > 0.0 {
            let first = ((viewport_min - extent) / stride).floor() as isize + 1;
            let last = (viewport_max / stride).ceil() as isize - 1;
            (first, last)
        } else {
            (0, query.page_count as isize - 1)
        };
        let first = (first - self.overscan as isize).max(0) as usize;
        let last = (last + self.overscan as isize).max(0) as usize;
        let last = last.min(query.page_count - 1);

        let mut required: BTreeSet<PageIndex> = (first..=last).map(PageIndex::new).collect();
        if let Some(focus) = query.focus {
            if focus.in_bounds(query.page_count) {
                required.insert(focus);
            }
        }

        let frames = required
            .iter()
            .map(|&index| (index, self.frame_for(index, &query.viewport)))
            .collect();

        let along = query.page_count as f32 * extent
            + (query.page_count - 1) as f32 * self.spacing;
        let content_size = match self.axis {
            Axis::Horizontal => Size::new(along, query.viewport.height),
            Axis::Vertical => Size::new(query.viewport.width, along),
        };

        LayoutPlan {
            required,
            frames,
            content_size,
        }
    }
}
