//! Core domain types and operations
//!
//! Pure geometry in screen pixels. Nothing here knows about Win32; the
//! platform layer converts to and from `RECT`/`POINT` at the boundary.

/// A screen coordinate (top-left of the window when used as a position)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns this point shifted by the given delta
    ///
    /// Saturates instead of overflowing at the edges of `i32`.
    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }
}

/// Width and height in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Returns true if both dimensions are strictly positive
    pub fn is_positive(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Rectangle in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    /// Creates a new rectangle
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle with the given top-left corner and size
    pub fn from_origin(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Rectangle covering a screen of the given size, anchored at (0, 0)
    pub fn screen(size: Size) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    /// Returns the right edge coordinate
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    /// Returns the bottom edge coordinate
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }

    /// Returns the intersection of two rectangles, or None if they don't intersect
    ///
    /// Rectangles that only share an edge do not intersect.
    ///
    /// # Arguments
    /// * `other` - Rectangle to intersect with
    ///
    /// # Returns
    /// Overlapping area, or None when there is no common pixel
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if left < right && top < bottom {
            Some(Rect::new(left, top, right - left, bottom - top))
        } else {
            None
        }
    }

    /// Returns true if the rectangles share at least one pixel
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.intersection(other).is_some()
    }

    /// Top-left position that centers `size` inside this rectangle
    ///
    /// Odd leftovers round toward the top-left. A `size` larger than the
    /// rectangle gives a negative offset.
    pub fn centered(&self, size: Size) -> Point {
        Point::new(
            self.x + (self.w - size.width) / 2,
            self.y + (self.h - size.height) / 2,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_basic_properties() {
        let rect = Rect::new(10, 20, 100, 50);
        assert_eq!(rect.right(), 110);
        assert_eq!(rect.bottom(), 70);
        assert_eq!(rect.origin(), Point::new(10, 20));
        assert_eq!(rect.size(), Size::new(100, 50));
    }

    #[test]
    fn rect_intersection() {
        let rect1 = Rect::new(0, 0, 20, 20);
        let rect2 = Rect::new(10, 10, 20, 20);
        assert_eq!(rect1.intersection(&rect2), Some(Rect::new(10, 10, 10, 10)));

        // No intersection
        let rect3 = Rect::new(30, 30, 10, 10);
        assert!(rect1.intersection(&rect3).is_none());
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let screen = Rect::screen(Size::new(1920, 1080));
        assert!(!screen.overlaps(&Rect::new(1920, 0, 600, 450)));
        assert!(screen.overlaps(&Rect::new(1919, 0, 600, 450)));
        assert!(!screen.overlaps(&Rect::new(-600, 0, 600, 450)));
        assert!(!screen.overlaps(&Rect::new(0, 1080, 600, 450)));
    }

    #[test]
    fn centering() {
        let screen = Rect::screen(Size::new(1920, 1080));
        assert_eq!(screen.centered(Size::new(600, 450)), Point::new(660, 315));
        assert_eq!(screen.centered(Size::new(400, 300)), Point::new(760, 390));
    }

    #[test]
    fn point_offset_saturates() {
        assert_eq!(Point::new(1, 2).offset(5, -5), Point::new(6, -3));
        assert_eq!(Point::new(i32::MAX, 0).offset(1, 0).x, i32::MAX);
    }
}
