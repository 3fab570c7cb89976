//! Integer screen geometry.

/// A position in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    /// X coordinate in pixels.
    pub x: i32,
    /// Y coordinate in pixels.
    pub y: i32,
}

impl Point {
    /// Create a new point.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// This point expressed relative to `origin`.
    #[inline]
    #[must_use]
    pub const fn relative_to(self, origin: Self) -> Self {
        Self::new(
            self.x.saturating_sub(origin.x),
            self.y.saturating_sub(origin.y),
        )
    }
}

/// An extent in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// Create a new size.
    #[inline]
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of pixels covered.
    #[inline]
    #[must_use]
    pub const fn area(self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// A rectangular region of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// X coordinate in pixels.
    pub x: i32,
    /// Y coordinate in pixels.
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A rectangle at `origin` covering `size`.
    #[inline]
    #[must_use]
    pub const fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// The top-left corner.
    #[inline]
    #[must_use]
    pub const fn origin(self) -> Point {
        Point::new(self.x, self.y)
    }

    /// The extent.
    #[inline]
    #[must_use]
    pub const fn size(self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Whether the rectangle covers no pixels.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Exclusive right edge.
    #[inline]
    #[must_use]
    pub fn right(self) -> i32 {
        self.x
            .saturating_add(i32::try_from(self.width).unwrap_or(i32::MAX))
    }

    /// Exclusive bottom edge.
    #[inline]
    #[must_use]
    pub fn bottom(self) -> i32 {
        self.y
            .saturating_add(i32::try_from(self.height).unwrap_or(i32::MAX))
    }

    /// Check if this rectangle intersects another.
    #[must_use]
    pub fn intersects(self, other: Self) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// The overlapping part of two rectangles, if any.
    #[must_use]
    pub fn intersection(self, other: Self) -> Option<Self> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= x || bottom <= y {
            return None;
        }
        Some(Self::new(
            x,
            y,
            u32::try_from(right.saturating_sub(x)).unwrap_or(0),
            u32::try_from(bottom.saturating_sub(y)).unwrap_or(0),
        ))
    }

    /// Clip this rectangle to a surface of `bounds` anchored at the origin.
    ///
    /// Negative origins and overflow past the surface edges are cut off.
    #[inline]
    #[must_use]
    pub fn clamp_to(self, bounds: Size) -> Option<Self> {
        self.intersection(Self::from_origin_size(Point::default(), bounds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test that clamping clips negative origins and overflow.
    ///
    /// # Panics
    /// Panics if the clamped rectangle differs.
    #[test]
    fn clamp_clips_both_edges() {
        let bounds = Size::new(800, 600);
        assert_eq!(
            Rect::new(-10, -20, 100, 100).clamp_to(bounds),
            Some(Rect::new(0, 0, 90, 80))
        );
        assert_eq!(
            Rect::new(750, 550, 100, 100).clamp_to(bounds),
            Some(Rect::new(750, 550, 50, 50))
        );
        assert_eq!(Rect::new(900, 0, 10, 10).clamp_to(bounds), None);
    }

    /// Test intersection checks, including touching edges.
    ///
    /// # Panics
    /// Panics if adjacent rectangles are reported as intersecting.
    #[test]
    fn intersects_excludes_touching() {
        let first = Rect::new(0, 0, 10, 10);
        assert!(first.intersects(Rect::new(5, 5, 10, 10)));
        assert!(!first.intersects(Rect::new(10, 0, 10, 10)));
        assert!(!first.intersects(Rect::new(0, 0, 0, 10)));
    }

    /// Test intersections of rectangles reaching the ends of the coordinate range.
    ///
    /// # Panics
    /// Panics if the extent is wrong or the arithmetic overflows.
    #[test]
    fn intersection_at_extreme_extents() {
        let wide = Rect::new(-10, 0, u32::MAX, 1);
        assert_eq!(
            wide.intersection(wide),
            Some(Rect::new(-10, 0, i32::MAX.unsigned_abs(), 1))
        );
        let far_left = Rect::new(i32::MIN, i32::MIN, u32::MAX, u32::MAX);
        assert_eq!(far_left.intersection(Rect::new(0, 0, 10, 10)), None);
        assert_eq!(
            far_left.intersection(Rect::new(-5, -5, 10, 10)),
            Some(Rect::new(-5, -5, 4, 4))
        );
    }
}
