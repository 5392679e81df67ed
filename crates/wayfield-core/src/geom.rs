//! Geometry primitives: [`Point`] and [`Size`].

use std::fmt;
use std::ops::{Add, Mul, Sub};

// ---------------------------------------------------------------------------
// Point
// ---------------------------------------------------------------------------

/// A 2D integer point. X grows right, Y grows down (screen coordinates).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Origin (0, 0).
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Create a new point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Return a point shifted by (dx, dy).
    #[inline]
    pub const fn shift(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// The four cardinal neighbours (up, right, down, left).
    #[inline]
    pub fn neighbors_4(self) -> [Point; 4] {
        [
            Self::new(self.x, self.y - 1),
            Self::new(self.x + 1, self.y),
            Self::new(self.x, self.y + 1),
            Self::new(self.x - 1, self.y),
        ]
    }

    /// All eight neighbours (cardinal + diagonal), clockwise from up.
    #[inline]
    pub fn neighbors_8(self) -> [Point; 8] {
        [
            Self::new(self.x, self.y - 1),
            Self::new(self.x + 1, self.y - 1),
            Self::new(self.x + 1, self.y),
            Self::new(self.x + 1, self.y + 1),
            Self::new(self.x, self.y + 1),
            Self::new(self.x - 1, self.y + 1),
            Self::new(self.x - 1, self.y),
            Self::new(self.x - 1, self.y - 1),
        ]
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.y.cmp(&other.y).then(self.x.cmp(&other.x))
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add for Point {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<i32> for Point {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: i32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

// ---------------------------------------------------------------------------
// Size
// ---------------------------------------------------------------------------

/// Dimensions of a rectangular grid anchored at the origin.
///
/// `Size` is the shared coordinate model of the whole engine: it maps
/// `(x, y)` positions to flat row-major indexes and back. Every precomputed
/// structure stores the `Size` it was generated for, and flat indexes are
/// only meaningful relative to that size.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Total number of tiles.
    #[inline]
    pub fn len(self) -> usize {
        if self.is_empty() {
            return 0;
        }
        (self.width as usize) * (self.height as usize)
    }

    /// Whether the grid has zero or negative area.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Whether `p` lies within `[0, width) × [0, height)`.
    #[inline]
    pub fn contains(self, p: Point) -> bool {
        p.x >= 0 && p.x < self.width && p.y >= 0 && p.y < self.height
    }

    /// Convert a point to a flat row-major index. `None` if out of bounds.
    #[inline]
    pub fn index(self, p: Point) -> Option<usize> {
        if !self.contains(p) {
            return None;
        }
        Some((p.y as usize) * (self.width as usize) + p.x as usize)
    }

    /// Convert an in-bounds point to a flat index without the bounds check.
    ///
    /// The caller must guarantee `self.contains(p)`; this is checked in
    /// debug builds only.
    #[inline]
    pub fn index_unchecked(self, p: Point) -> usize {
        debug_assert!(self.contains(p), "point {p} out of bounds for {self}");
        (p.y as usize) * (self.width as usize) + p.x as usize
    }

    /// Convert a flat index back to a point. Inverse of [`index`](Self::index)
    /// for all in-range indexes.
    #[inline]
    pub fn point(self, idx: usize) -> Point {
        debug_assert!(idx < self.len(), "index {idx} out of bounds for {self}");
        let w = self.width as usize;
        Point::new((idx % w) as i32, (idx / w) as i32)
    }

    /// Clamp a point to the nearest in-bounds position. An empty size has
    /// no in-bounds position, so everything clamps to the origin.
    #[inline]
    pub fn clamp(self, p: Point) -> Point {
        Point::new(
            p.x.clamp(0, (self.width - 1).max(0)),
            p.y.clamp(0, (self.height - 1).max(0)),
        )
    }

    /// Euclidean magnitude of the (width, height) vector.
    ///
    /// Used as the default ray length for visibility queries, since no ray
    /// inside the grid can be longer.
    #[inline]
    pub fn diagonal(self) -> f32 {
        let w = self.width as f32;
        let h = self.height as f32;
        (w * w + h * h).sqrt()
    }

    /// Row-major iterator over every point in the grid.
    #[inline]
    pub fn iter(self) -> SizeIter {
        SizeIter {
            size: self,
            cur: Point::ZERO,
        }
    }
}

impl IntoIterator for Size {
    type Item = Point;
    type IntoIter = SizeIter;
    #[inline]
    fn into_iter(self) -> SizeIter {
        self.iter()
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Row-major iterator over the points of a [`Size`].
#[derive(Clone, Debug)]
pub struct SizeIter {
    size: Size,
    cur: Point,
}

impl Iterator for SizeIter {
    type Item = Point;

    #[inline]
    fn next(&mut self) -> Option<Point> {
        if self.size.is_empty() || self.cur.y >= self.size.height {
            return None;
        }
        let p = self.cur;
        self.cur.x += 1;
        if self.cur.x >= self.size.width {
            self.cur.x = 0;
            self.cur.y += 1;
        }
        Some(p)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.size.is_empty() || self.cur.y >= self.size.height {
            return (0, Some(0));
        }
        let w = self.size.width as usize;
        let remaining_in_row = (self.size.width - self.cur.x) as usize;
        let remaining_rows = (self.size.height - self.cur.y - 1) as usize;
        let total = remaining_in_row + remaining_rows * w;
        (total, Some(total))
    }
}

impl ExactSizeIterator for SizeIter {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_arithmetic() {
        let a = Point::new(1, 2);
        let b = Point::new(3, 4);
        assert_eq!(a + b, Point::new(4, 6));
        assert_eq!(b - a, Point::new(2, 2));
        assert_eq!(a * 3, Point::new(3, 6));
        assert_eq!(a.shift(-1, 1), Point::new(0, 3));
    }

    #[test]
    fn size_contains() {
        let s = Size::new(3, 2);
        assert!(s.contains(Point::new(0, 0)));
        assert!(s.contains(Point::new(2, 1)));
        assert!(!s.contains(Point::new(3, 0)));
        assert!(!s.contains(Point::new(0, 2)));
        assert!(!s.contains(Point::new(-1, 0)));
    }

    #[test]
    fn index_point_inverse() {
        let s = Size::new(7, 5);
        for p in s.iter() {
            let i = s.index(p).unwrap();
            assert_eq!(s.point(i), p);
            assert_eq!(s.index_unchecked(p), i);
        }
        assert_eq!(s.index(Point::new(7, 0)), None);
        assert_eq!(s.index(Point::new(0, -1)), None);
    }

    #[test]
    fn clamp_snaps_to_bounds() {
        let s = Size::new(4, 4);
        assert_eq!(s.clamp(Point::new(-3, 2)), Point::new(0, 2));
        assert_eq!(s.clamp(Point::new(9, 9)), Point::new(3, 3));
        assert_eq!(s.clamp(Point::new(1, 1)), Point::new(1, 1));
    }

    #[test]
    fn clamp_on_empty_size_is_origin() {
        assert_eq!(Size::new(0, 0).clamp(Point::new(5, -2)), Point::ZERO);
        assert_eq!(Size::new(3, 0).clamp(Point::new(1, 7)), Point::new(1, 0));
    }

    #[test]
    fn iter_row_major() {
        let s = Size::new(3, 2);
        let pts: Vec<_> = s.iter().collect();
        assert_eq!(pts.len(), 6);
        assert_eq!(pts[0], Point::new(0, 0));
        assert_eq!(pts[2], Point::new(2, 0));
        assert_eq!(pts[3], Point::new(0, 1));
        assert_eq!(pts[5], Point::new(2, 1));
    }

    #[test]
    fn empty_size() {
        let s = Size::new(0, 5);
        assert!(s.is_empty());
        assert_eq!(s.len(), 0);
        assert_eq!(s.iter().count(), 0);
    }

    #[test]
    fn diagonal_magnitude() {
        let s = Size::new(3, 4);
        assert!((s.diagonal() - 5.0).abs() < 1e-6);
    }
}
