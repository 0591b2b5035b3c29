//! Content-coordinate geometry.
//!
//! Frames and offsets live in a continuous f32 coordinate space supplied by
//! the layout strategy; the host decides how that space maps onto real
//! output (pixels, terminal cells). Rectangles are axis-aligned.

/// A point in content coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Point {
    /// Create a point.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Linear interpolation from `self` toward `other` at `t` in [0, 1].
    pub fn lerp(&self, other: Point, t: f32) -> Point {
        Point::new(lerp(self.x, other.x, t), lerp(self.y, other.y, t))
    }
}

/// A width/height pair in content coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Size {
    /// Create a size.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle in content coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Rect {
    /// Create a rectangle from its left/top edges and extents.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from an origin point and a size.
    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// The left/top corner.
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// The width/height pair.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Right edge (exclusive).
    pub fn max_x(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    pub fn max_y(&self) -> f32 {
        self.y + self.height
    }

    /// Geometric center.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Area. Degenerate rectangles (non-positive extent) report 0.
    pub fn area(&self) -> f32 {
        if self.width <= 0.0 || self.height <= 0.0 {
            0.0
        } else {
            self.width * self.height
        }
    }

    /// Whether the rectangle encloses no area.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Overlapping region with `other`, or `None` when disjoint or when
    /// either rectangle is empty.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let max_x = self.max_x().min(other.max_x());
        let max_y = self.max_y().min(other.max_y());
        if x < max_x && y < max_y {
            Some(Rect::new(x, y, max_x - x, max_y - y))
        } else {
            None
        }
    }

    /// Whether `other` overlaps this rectangle over a positive area.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.intersection(other).is_some()
    }

    /// Componentwise linear interpolation toward `other` at `t` in [0, 1].
    pub fn lerp(&self, other: Rect, t: f32) -> Rect {
        Rect::new(
            lerp(self.x, other.x, t),
            lerp(self.y, other.y, t),
            lerp(self.width, other.width, t),
            lerp(self.height, other.height, t),
        )
    }
}

/// Scalar linear interpolation: `a` at `t == 0`, `b` at `t == 1`.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
