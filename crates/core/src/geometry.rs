//! Page-space geometry: points, axis-aligned rectangles, distances.
//!
//! Coordinates follow the page convention of the word/drawing sources:
//! origin at the top-left, y growing downwards, so `y0` is the top edge.

/// A 2D point (x, y).
pub type Point = (f64, f64);

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: Point, b: Point) -> f64 {
    (a.0 - b.0).hypot(a.1 - b.1)
}

/// An axis-aligned rectangle with `x0 <= x1` and `y0 <= y1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    /// Build a rectangle, normalizing swapped corners.
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Vertical midpoint.
    pub fn y_center(&self) -> f64 {
        (self.y0 + self.y1) / 2.0
    }

    /// True when the closed rectangles share at least one point.
    ///
    /// Degenerate rectangles (the bounding box of a single horizontal or
    /// vertical stroke) still intersect anything they touch.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x0 <= other.x1 && other.x0 <= self.x1 && self.y0 <= other.y1 && other.y0 <= self.y1
    }

    /// The overlapping region, or `None` when the rectangles are disjoint.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }
        Some(Rect {
            x0: self.x0.max(other.x0),
            y0: self.y0.max(other.y0),
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
        })
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_normalizes_corners() {
        let r = Rect::new(10.0, 20.0, 0.0, 5.0);
        assert_eq!(r, Rect::new(0.0, 5.0, 10.0, 20.0));
        assert_eq!(r.width(), 10.0);
        assert_eq!(r.height(), 15.0);
    }

    #[test]
    fn intersection_and_union() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 20.0, 8.0);
        let overlap = a.intersection(&b).unwrap();
        assert_eq!(overlap, Rect::new(5.0, 5.0, 10.0, 8.0));
        assert_eq!(overlap.area(), 15.0);
        assert_eq!(a.union(&b), Rect::new(0.0, 0.0, 20.0, 10.0));
    }

    #[test]
    fn disjoint_rects_have_no_intersection() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(11.0, 0.0, 20.0, 10.0);
        assert!(!a.intersects(&b));
        assert!(a.intersection(&b).is_none());
    }

    #[test]
    fn degenerate_rect_intersects_region() {
        let stroke = Rect::new(5.0, 50.0, 95.0, 50.0);
        let region = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(stroke.intersects(&region));
        assert_eq!(stroke.intersection(&region).unwrap().area(), 0.0);
    }

    #[test]
    fn distance_is_euclidean() {
        assert_eq!(distance((0.0, 0.0), (3.0, 4.0)), 5.0);
    }
}
