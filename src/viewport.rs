//! Scroll viewport state.
//!
//! The viewport is the single source of truth for the scroll offset. It
//! knows nothing about pages; the controller decides when offset changes
//! trigger relayout or notifications.

use crate::geometry::{Point, Rect, Size};

/// Offset, bounds and content size of the scrollable surface.
///
/// The offset is always kept inside `[0, content_size - bounds]` per axis;
/// content smaller than the bounds pins the offset to 0 on that axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    offset: Point,
    bounds: Size,
    content_size: Size,
}

impl Viewport {
    /// Create a viewport with the given bounds, zero offset and no content.
    pub fn new(bounds: Size) -> Self {
        Self {
            offset: Point::default(),
            bounds,
            content_size: Size::default(),
        }
    }

    /// Current scroll offset.
    pub fn offset(&self) -> Point {
        self.offset
    }

    /// Size of the visible window.
    pub fn bounds(&self) -> Size {
        self.bounds
    }

    /// Total scrollable extent.
    pub fn content_size(&self) -> Size {
        self.content_size
    }

    /// The largest admissible offset for the current geometry.
    pub fn max_offset(&self) -> Point {
        Point::new(
            (self.content_size.width - self.bounds.width).max(0.0),
            (self.content_size.height - self.bounds.height).max(0.0),
        )
    }

    /// `target` confined to the admissible offset range.
    pub fn clamp(&self, target: Point) -> Point {
        let max = self.max_offset();
        Point::new(target.x.clamp(0.0, max.x), target.y.clamp(0.0, max.y))
    }

    /// Apply `target` (clamped). Returns `true` when the offset moved.
    pub fn set_offset(&mut self, target: Point) -> bool {
        let clamped = self.clamp(target);
        let moved = clamped != self.offset;
        self.offset = clamped;
        moved
    }

    /// Resize the visible window, re-confining the offset.
    pub fn set_bounds(&mut self, bounds: Size) {
        self.bounds = bounds;
        self.offset = self.clamp(self.offset);
    }

    /// Update the scrollable extent, re-confining the offset.
    pub fn set_content_size(&mut self, content_size: Size) {
        self.content_size = content_size;
        self.offset = self.clamp(self.offset);
    }

    /// The region of content currently inside the window.
    pub fn visible_rect(&self) -> Rect {
        Rect::from_origin_size(self.offset, self.bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        let mut v = Viewport::new(Size::new(100.0, 50.0));
        v.set_content_size(Size::new(500.0, 50.0));
        v
    }

    #[test]
    fn offset_within_range_is_kept() {
        let mut v = viewport();
        assert!(v.set_offset(Point::new(150.0, 0.0)));
        assert_eq!(v.offset(), Point::new(150.0, 0.0));
    }

    #[test]
    fn offset_beyond_content_clamps_to_max() {
        let mut v = viewport();
        v.set_offset(Point::new(900.0, 0.0));
        assert_eq!(v.offset(), Point::new(400.0, 0.0));
    }

    #[test]
    fn negative_offset_clamps_to_zero() {
        let mut v = viewport();
        v.set_offset(Point::new(-20.0, -5.0));
        assert_eq!(v.offset(), Point::new(0.0, 0.0));
    }

    #[test]
    fn content_smaller_than_bounds_pins_to_zero() {
        let mut v = Viewport::new(Size::new(100.0, 50.0));
        v.set_content_size(Size::new(40.0, 20.0));
        v.set_offset(Point::new(30.0, 10.0));
        assert_eq!(v.offset(), Point::new(0.0, 0.0));
    }

    #[test]
    fn set_offset_reports_whether_it_moved() {
        let mut v = viewport();
        assert!(v.set_offset(Point::new(10.0, 0.0)));
        assert!(!v.set_offset(Point::new(10.0, 0.0)));
        // A clamped repeat of an out-of-range target is not a move either.
        v.set_offset(Point::new(900.0, 0.0));
        assert!(!v.set_offset(Point::new(1000.0, 0.0)));
    }

    #[test]
    fn shrinking_content_re_confines_offset() {
        let mut v = viewport();
        v.set_offset(Point::new(400.0, 0.0));
        v.set_content_size(Size::new(200.0, 50.0));
        assert_eq!(v.offset(), Point::new(100.0, 0.0));
    }

    #[test]
    fn growing_bounds_re_confines_offset() {
        let mut v = viewport();
        v.set_offset(Point::new(400.0, 0.0));
        v.set_bounds(Size::new(300.0, 50.0));
        assert_eq!(v.offset(), Point::new(200.0, 0.0));
    }

    #[test]
    fn visible_rect_tracks_offset_and_bounds() {
        let mut v = viewport();
        v.set_offset(Point::new(120.0, 0.0));
        assert_eq!(v.visible_rect(), Rect::new(120.0, 0.0, 100.0, 50.0));
    }
}
