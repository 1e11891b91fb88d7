//! Foundation geometry types and rounding helpers.
//!
//! Everything the rasterizers take as input is integer geometry: points,
//! sizes, rectangles and line segments. Floating point only appears for
//! triangle vertices, gradient geometry and scale factors.

use core::ops::{Add, Neg, Sub};

// ============================================================================
// Rounding and conversion functions
// ============================================================================

/// Floor toward negative infinity.
#[inline]
pub fn ifloor(v: f64) -> i32 {
    let i = v as i32;
    i - (i as f64 > v) as i32
}

/// Index into a repeating range of length `n`, correct for negative `v`.
#[inline]
pub fn wrap(v: i32, n: i32) -> i32 {
    v.rem_euclid(n)
}

// ============================================================================
// IntPoint / Point
// ============================================================================

/// A pixel coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct IntPoint {
    pub x: i32,
    pub y: i32,
}

impl IntPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for IntPoint {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for IntPoint {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for IntPoint {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl From<(i32, i32)> for IntPoint {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// A floating point coordinate, used for triangle vertices and gradient
/// geometry.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<IntPoint> for Point {
    fn from(p: IntPoint) -> Self {
        Self::new(p.x as f64, p.y as f64)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

// ============================================================================
// IntSize / Scale
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IntSize {
    pub w: i32,
    pub h: i32,
}

impl IntSize {
    pub const fn new(w: i32, h: i32) -> Self {
        Self { w, h }
    }

    pub fn area(&self) -> i64 {
        self.w as i64 * self.h as i64
    }

    pub fn transposed(&self) -> Self {
        Self::new(self.h, self.w)
    }
}

/// Independent horizontal and vertical scale factors. A negative factor
/// means "scale by the magnitude, then flip along that axis".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub x: f64,
    pub y: f64,
}

impl Scale {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub const fn uniform(s: f64) -> Self {
        Self { x: s, y: s }
    }

    pub fn abs(&self) -> Self {
        Self::new(self.x.abs(), self.y.abs())
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::uniform(1.0)
    }
}

// ============================================================================
// IntRect
// ============================================================================

/// An integer rectangle given by its top-left corner and size.
///
/// `right()` and `bottom()` are inclusive: a 1x1 rectangle at (3,4) has
/// `right() == 3` and `bottom() == 4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IntRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl IntRect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// The rectangle spanning two corner points, both included.
    pub fn from_corners(p0: IntPoint, p1: IntPoint) -> Self {
        let x0 = p0.x.min(p1.x);
        let y0 = p0.y.min(p1.y);
        let x1 = p0.x.max(p1.x);
        let y1 = p0.y.max(p1.y);
        Self::new(x0, y0, span_len(x0, x1), span_len(y0, y1))
    }

    pub fn from_size(size: IntSize) -> Self {
        Self::new(0, 0, size.w, size.h)
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.x
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.y
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.w.saturating_sub(1))
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.h.saturating_sub(1))
    }

    pub fn top_left(&self) -> IntPoint {
        IntPoint::new(self.left(), self.top())
    }

    pub fn top_right(&self) -> IntPoint {
        IntPoint::new(self.right(), self.top())
    }

    pub fn bottom_left(&self) -> IntPoint {
        IntPoint::new(self.left(), self.bottom())
    }

    pub fn bottom_right(&self) -> IntPoint {
        IntPoint::new(self.right(), self.bottom())
    }

    pub fn size(&self) -> IntSize {
        IntSize::new(self.w, self.h)
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    pub fn contains(&self, p: IntPoint) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    /// True if `other` lies entirely within this rectangle.
    pub fn contains_rect(&self, other: &IntRect) -> bool {
        !other.is_empty()
            && other.left() >= self.left()
            && other.top() >= self.top()
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Grow by `d` on every side.
    pub fn inflated(&self, d: i32) -> Self {
        let grow = d.saturating_mul(2);
        Self::new(
            self.x.saturating_sub(d),
            self.y.saturating_sub(d),
            self.w.saturating_add(grow),
            self.h.saturating_add(grow),
        )
    }

    /// Shrink by `d` on every side.
    pub fn deflated(&self, d: i32) -> Self {
        self.inflated(d.saturating_neg())
    }

    /// The four corners in clockwise order starting at the top-left.
    pub fn corners(&self) -> [IntPoint; 4] {
        [
            self.top_left(),
            self.top_right(),
            self.bottom_right(),
            self.bottom_left(),
        ]
    }

    /// Overlap of two rectangles, or `None` if they are disjoint.
    pub fn intersection(&self, other: &IntRect) -> Option<IntRect> {
        let x0 = self.left().max(other.left());
        let y0 = self.top().max(other.top());
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        if x1 < x0 || y1 < y0 {
            return None;
        }
        Some(IntRect::new(x0, y0, span_len(x0, x1), span_len(y0, y1)))
    }
}

/// Pixel count of the inclusive range `a..=b`, saturating at `i32::MAX`.
fn span_len(a: i32, b: i32) -> i32 {
    (b as i64 - a as i64 + 1).min(i32::MAX as i64) as i32
}

// ============================================================================
// IntLineSegment
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IntLineSegment {
    pub p0: IntPoint,
    pub p1: IntPoint,
}

impl IntLineSegment {
    pub const fn new(p0: IntPoint, p1: IntPoint) -> Self {
        Self { p0, p1 }
    }

    pub fn bounding_rect(&self) -> IntRect {
        IntRect::from_corners(self.p0, self.p1)
    }
}

// ============================================================================
// Bounding rectangles
// ============================================================================

/// Smallest rectangle containing all points. An empty slice yields an
/// empty rectangle at the origin.
pub fn bounding_rect(points: &[IntPoint]) -> IntRect {
    let Some(first) = points.first() else {
        return IntRect::default();
    };
    let (mut x0, mut y0, mut x1, mut y1) = (first.x, first.y, first.x, first.y);
    for p in &points[1..] {
        x0 = x0.min(p.x);
        y0 = y0.min(p.y);
        x1 = x1.max(p.x);
        y1 = y1.max(p.y);
    }
    IntRect::from_corners(IntPoint::new(x0, y0), IntPoint::new(x1, y1))
}

/// Bounding rectangle of floating point vertices, floored to pixel
/// coordinates.
pub fn bounding_rect_f(points: &[Point]) -> IntRect {
    let Some(first) = points.first() else {
        return IntRect::default();
    };
    let (mut x0, mut y0, mut x1, mut y1) = (first.x, first.y, first.x, first.y);
    for p in &points[1..] {
        x0 = x0.min(p.x);
        y0 = y0.min(p.y);
        x1 = x1.max(p.x);
        y1 = y1.max(p.y);
    }
    IntRect::from_corners(
        IntPoint::new(ifloor(x0), ifloor(y0)),
        IntPoint::new(ifloor(x1), ifloor(y1)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ifloor() {
        assert_eq!(ifloor(-0.5), -1);
        assert_eq!(ifloor(-2.0), -2);
        assert_eq!(ifloor(1.9), 1);
    }

    #[test]
    fn test_wrap_negative() {
        assert_eq!(wrap(5, 4), 1);
        assert_eq!(wrap(-1, 4), 3);
        assert_eq!(wrap(-4, 4), 0);
        assert_eq!(wrap(-5, 4), 3);
    }

    #[test]
    fn test_rect_inclusive_edges() {
        let r = IntRect::new(3, 4, 1, 1);
        assert_eq!(r.right(), 3);
        assert_eq!(r.bottom(), 4);
        assert!(r.contains(IntPoint::new(3, 4)));
        assert!(!r.contains(IntPoint::new(4, 4)));
    }

    #[test]
    fn test_from_corners_unordered() {
        let r = IntRect::from_corners(IntPoint::new(5, 1), IntPoint::new(2, 3));
        assert_eq!(r, IntRect::new(2, 1, 4, 3));
    }

    #[test]
    fn test_intersection() {
        let a = IntRect::new(0, 0, 10, 10);
        let b = IntRect::new(5, -5, 10, 10);
        assert_eq!(a.intersection(&b), Some(IntRect::new(5, 0, 5, 5)));
        assert_eq!(a.intersection(&IntRect::new(10, 0, 2, 2)), None);
    }

    #[test]
    fn test_contains_rect() {
        let outer = IntRect::new(0, 0, 4, 4);
        assert!(outer.contains_rect(&IntRect::new(1, 1, 3, 3)));
        assert!(!outer.contains_rect(&IntRect::new(1, 1, 4, 3)));
        assert!(!outer.contains_rect(&IntRect::new(-1, 0, 2, 2)));
    }

    #[test]
    fn test_bounding_rect() {
        let pts = [
            IntPoint::new(3, 7),
            IntPoint::new(-2, 4),
            IntPoint::new(5, 5),
        ];
        assert_eq!(bounding_rect(&pts), IntRect::new(-2, 4, 8, 4));
        assert!(bounding_rect(&[]).is_empty());
    }

    #[test]
    fn test_inflate_deflate() {
        let r = IntRect::new(2, 2, 4, 4);
        assert_eq!(r.inflated(1), IntRect::new(1, 1, 6, 6));
        assert_eq!(r.deflated(1), IntRect::new(3, 3, 2, 2));
    }

    #[test]
    fn test_extreme_coordinates_saturate() {
        let r = IntRect::from_corners(IntPoint::new(i32::MIN, -5), IntPoint::new(i32::MAX, 5));
        assert_eq!((r.x, r.w, r.h), (i32::MIN, i32::MAX, 11));
        assert_eq!(r.bottom(), 5);
        let big = IntRect::new(i32::MAX - 2, 0, 10, 10);
        assert_eq!(big.right(), i32::MAX);
        assert_eq!(big.inflated(i32::MAX).w, i32::MAX);
        let clip = IntRect::new(0, 0, 10, 10);
        let huge = IntRect::new(-300_000, -300_000, 600_001, 600_001);
        assert_eq!(huge.intersection(&clip), Some(clip));
    }
}
