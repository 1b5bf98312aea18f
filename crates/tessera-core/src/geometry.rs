//! Integer rectangle geometry used for window bounds and overlap detection.
//!
//! # Semantics
//!
//! - Rectangles are half-open: a rectangle covers `[x, x + width)` by
//!   `[y, y + height)`.
//! - Two rectangles that only touch along an edge do **not** intersect.
//! - The degenerate rectangle `{0, 0, 0, 0}` stands for "no intersection".
//!
//! # Example
//!
//! ```rust
//! use tessera_core::geometry::Rect;
//!
//! let a = Rect::new(0, 0, 10, 10);
//! let b = Rect::new(5, 5, 10, 10);
//!
//! assert!(a.intersects(&b));
//! assert_eq!(a.intersection(&b), Rect::new(5, 5, 5, 5));
//!
//! // Sharing an edge is not an overlap
//! assert!(!a.intersects(&Rect::new(10, 0, 10, 10)));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Axis-aligned rectangle in pixel units.
///
/// # Invariants
///
/// A "real" rectangle has `width >= 0` and `height >= 0`. Nothing stops a
/// caller from building a negative one. [`Rect::area`] and
/// [`Rect::intersection`] treat such rectangles as covering no pixels, but
/// [`Rect::intersects`] is the plain edge comparison: a zero-size rectangle
/// strictly inside another one does intersect it.
///
/// Edges are computed in `i64`, so rectangles reaching past `i32::MAX` never
/// overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// The degenerate rectangle returned when two rectangles do not overlap.
    pub const EMPTY: Rect = Rect {
        x: 0,
        y: 0,
        width: 0,
        height: 0,
    };

    /// Create a new rectangle
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge
    pub const fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    /// Exclusive bottom edge
    pub const fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    /// Top-left corner as `(x, y)`
    pub const fn origin(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Covered area in pixels, zero for degenerate rectangles.
    pub fn area(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            self.width as i64 * self.height as i64
        }
    }

    /// True when the rectangle covers no pixels.
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Strict overlap test.
    ///
    /// Returns true iff
    /// `a.x < b.x + b.width && a.x + a.width > b.x && a.y < b.y + b.height && a.y + a.height > b.y`.
    /// Edges that merely touch yield `false`. The test is symmetric.
    ///
    /// # Performance
    ///
    /// O(1), four integer comparisons
    pub const fn intersects(&self, other: &Rect) -> bool {
        (self.x as i64) < other.right()
            && self.right() > other.x as i64
            && (self.y as i64) < other.bottom()
            && self.bottom() > other.y as i64
    }

    /// Compute the overlapping region of two rectangles.
    ///
    /// # Returns
    ///
    /// * `{left, top, right - left, bottom - top}` when the rectangles overlap
    /// * [`Rect::EMPTY`] otherwise
    pub fn intersection(&self, other: &Rect) -> Rect {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if (left as i64) < right && (top as i64) < bottom {
            Rect::new(
                left,
                top,
                clamp_extent(right - left as i64),
                clamp_extent(bottom - top as i64),
            )
        } else {
            Rect::EMPTY
        }
    }

    /// Smallest rectangle containing both inputs.
    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.x.min(other.x);
        let top = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(
            left,
            top,
            clamp_extent(right - left as i64),
            clamp_extent(bottom - top as i64),
        )
    }

    /// True when the point lies inside the half-open rectangle.
    pub const fn contains_point(&self, px: i32, py: i32) -> bool {
        px >= self.x && (px as i64) < self.right() && py >= self.y && (py as i64) < self.bottom()
    }

    /// Return a copy moved to a new origin
    pub const fn with_origin(self, x: i32, y: i32) -> Rect {
        Rect::new(x, y, self.width, self.height)
    }

    /// Return a copy with a new size
    pub const fn with_size(self, width: i32, height: i32) -> Rect {
        Rect::new(self.x, self.y, width, height)
    }
}

/// Union extents of far-apart rectangles may not fit an `i32`.
fn clamp_extent(extent: i64) -> i32 {
    extent.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}+{}+{}",
            self.width, self.height, self.x, self.y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_touching_edges_do_not_intersect() {
        let a = Rect::new(0, 0, 10, 10);
        assert!(!a.intersects(&Rect::new(10, 0, 10, 10)));
        assert!(!a.intersects(&Rect::new(0, 10, 10, 10)));
        assert!(!a.intersects(&Rect::new(10, 10, 10, 10)));
    }

    #[test]
    fn test_overlap() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 10, 10);
        assert!(a.intersects(&b));
        assert_eq!(a.intersection(&b), Rect::new(5, 5, 5, 5));
    }

    #[test]
    fn test_disjoint_is_degenerate() {
        let a = Rect::new(0, 0, 5, 5);
        let b = Rect::new(10, 10, 5, 5);
        assert_eq!(a.intersection(&b), Rect::EMPTY);
        assert!(a.intersection(&b).is_empty());
    }

    #[test]
    fn test_symmetry() {
        let rects = [
            Rect::new(0, 0, 10, 10),
            Rect::new(5, 5, 10, 10),
            Rect::new(10, 0, 10, 10),
            Rect::new(-5, -5, 3, 3),
            Rect::new(2, 2, 0, 4),
            Rect::new(300, 200, 400, 300),
        ];
        for a in &rects {
            for b in &rects {
                assert_eq!(a.intersects(b), b.intersects(a), "{} vs {}", a, b);
                assert_eq!(a.intersection(b), b.intersection(a));
            }
        }
    }

    #[test]
    fn test_containment() {
        let outer = Rect::new(0, 0, 100, 100);
        let inner = Rect::new(10, 20, 30, 40);
        assert_eq!(outer.intersection(&inner), inner);
        assert_eq!(outer.union(&inner), outer);
    }

    #[test]
    fn test_zero_sized_inside_intersects_without_area() {
        let a = Rect::new(0, 0, 10, 10);
        let dot = Rect::new(5, 5, 0, 0);
        assert!(a.intersects(&dot));
        assert!(dot.intersects(&a));
        assert_eq!(a.intersection(&dot), Rect::EMPTY);
        assert_eq!(dot.area(), 0);
    }

    #[test]
    fn test_edges_near_i32_max_do_not_overflow() {
        let far = Rect::new(i32::MAX - 100, 0, 400, 300);
        let near = Rect::new(i32::MAX - 200, 100, 150, 50);
        assert_eq!(far.right(), i32::MAX as i64 + 300);
        assert!(far.intersects(&near));
        assert_eq!(
            far.intersection(&near),
            Rect::new(i32::MAX - 100, 100, 50, 50)
        );
        assert!(far.contains_point(i32::MAX, 10));

        let wide = Rect::new(i32::MIN, 0, 10, 10).union(&far);
        assert_eq!(wide.x, i32::MIN);
        assert_eq!(wide.width, i32::MAX);
    }

    #[test]
    fn test_union_bounds_both() {
        let a = Rect::new(300, 200, 100, 100);
        let b = Rect::new(350, 150, 100, 100);
        assert_eq!(a.union(&b), Rect::new(300, 150, 150, 150));
    }
}
