//! Overlapping card-stack layout.

use super::{LayoutPlan, LayoutQuery, Layouter};
use crate::geometry::{Rect, Size};
use crate::types::PageIndex;
use std::collections::BTreeSet;

/// Stacks viewport-sized pages with a small downward peek per index.
///
/// Page `i` sits at `y = i * peek`, so each page shows a `peek`-tall strip
/// above the page in front of it and the last page sits fully in front.
/// Deliberately overlap-heavy: this is the layouter that exercises the
/// occlusion rule (higher index in front).
#[derive(Debug, Clone, Copy)]
pub struct StackedLayouter {
    peek: f32,
    depth: usize,
}

impl StackedLayouter {
    /// A stack revealing a `peek`-tall strip of each buried page.
    pub fn new(peek: f32) -> Self {
        Self {
            peek: peek.max(1.0),
            depth: 8,
        }
    }

    /// Cap how many stacked pages stay loaded at once. When more pages
    /// intersect the viewport than `depth`, the front-most win.
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth.max(1);
        self
    }

    fn frame_for(&self, index: PageIndex, viewport: &Rect) -> Rect {
        Rect::new(
            0.0,
            index.get() as f32 * self.peek,
            viewport.width,
            viewport.height,
        )
    }
}

impl Layouter for StackedLayouter {
    fn plan(&self, query: &LayoutQuery<'_>) -> LayoutPlan {
        if query.page_count == 0 {
            return LayoutPlan::empty();
        }
        let extent = query.viewport.height;
        let (viewport_min, viewport_max) = (query.viewport.y, query.viewport.max_y());

        let first = ((viewport_min - extent) / self.peek).floor() as isize + 1;
        let last = (viewport_max / self.peek).ceil() as isize - 1;
        let first = first.max(0) as usize;
        let last = (last.max(0) as usize).min(query.page_count - 1);

        // Front-most pages win when the stack is deeper than the cap.
        let first = if last + 1 >= self.depth {
            first.max(last + 1 - self.depth)
        } else {
            first
        };

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

        let content_size = Size::new(
            query.viewport.width,
            (query.page_count - 1) as f32 * self.peek + extent,
        );

        LayoutPlan {
            required,
            frames,
            content_size,
        }
    }
}
