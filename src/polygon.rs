//! Polygon and triangle rasterizer, polygon outlines and rectangles.
//!
//! Polygons are filled scanline by scanline with the even-odd rule. A row
//! `y` crosses an edge when `y` lies in the half-open range `(y_min, y_max]`
//! of that edge, so shared vertices are counted once and horizontal edges
//! never. A pixel `x` is inside when an odd number of the row's
//! intersections lie at or right of it. Intersections are truncated toward
//! zero, which makes the covered area the pixels with `x_left < x <= x_right`
//! and `y_top < y <= y_bottom`, the same half-open convention on both axes.

use log::debug;

use crate::basics::{bounding_rect, bounding_rect_f, ifloor, IntLineSegment, IntPoint, IntRect, Point};
use crate::bitmap::Bitmap;
use crate::color::Color;
use crate::color_source::{dispatch_paint, hline, vline, ColorSource, FromColor};
use crate::error::Result;
use crate::line::{draw_line_with, line_circle, LineStyle};
use crate::paint::{BorderSettings, LineCap, Paint};

// ============================================================================
// Public entry points
// ============================================================================

/// Fill a polygon with the even-odd rule. The polygon is closed implicitly.
pub fn fill_polygon(bmp: &mut Bitmap, points: &[IntPoint], paint: &Paint) -> Result<()> {
    dispatch_paint!(paint, bounding_rect(points), bmp.rect(), |src| {
        fill_polygon_with(bmp, &src, points);
    });
    Ok(())
}

/// Fill the triangle `p0 p1 p2`, sampling rows and columns at pixel centers.
pub fn fill_triangle(bmp: &mut Bitmap, p0: Point, p1: Point, p2: Point, paint: &Paint) -> Result<()> {
    dispatch_paint!(paint, bounding_rect_f(&[p0, p1, p2]), bmp.rect(), |src| {
        fill_triangle_with(bmp, &src, p0, p1, p2);
    });
    Ok(())
}

pub fn fill_triangle_color(bmp: &mut Bitmap, p0: Point, p1: Point, p2: Point, color: Color) {
    fill_triangle_with(bmp, &FromColor::new(color), p0, p1, p2);
}

/// Stroke the closed outline through `points`.
///
/// A gradient paint is rendered over the points' bounding rectangle grown by
/// the border width.
pub fn draw_polygon(bmp: &mut Bitmap, points: &[IntPoint], s: &BorderSettings) -> Result<()> {
    let rect = bounding_rect(points).inflated(s.width);
    dispatch_paint!(&s.paint, rect, bmp.rect(), |src| {
        draw_polygon_with(bmp, &src, points, s.width, s.dashed);
    });
    Ok(())
}

/// Draw a rectangle border, `width` pixels thick, inside `r`.
pub fn draw_rect(bmp: &mut Bitmap, r: &IntRect, s: &BorderSettings) -> Result<()> {
    dispatch_paint!(&s.paint, *r, bmp.rect(), |src| {
        draw_rect_with(bmp, &src, r, s.width, s.dashed);
    });
    Ok(())
}

pub fn fill_rect(bmp: &mut Bitmap, r: &IntRect, paint: &Paint) -> Result<()> {
    dispatch_paint!(paint, *r, bmp.rect(), |src| {
        fill_rect_with(bmp, &src, r);
    });
    Ok(())
}

pub fn fill_rect_color(bmp: &mut Bitmap, r: &IntRect, color: Color) {
    fill_rect_with(bmp, &FromColor::new(color), r);
}

/// Fill `r` with `bg` (if any), then draw the border `fg` (if any) over it.
///
/// A dashed border is drawn along lines through the border's middle, so the
/// rectangle is first shrunk by half the border width to keep the dashes
/// inside `r`.
pub fn rect(
    bmp: &mut Bitmap,
    r: &IntRect,
    fg: Option<&BorderSettings>,
    bg: Option<&Paint>,
) -> Result<()> {
    let r = match fg {
        Some(s) if s.dashed => r.deflated(s.width / 2),
        _ => *r,
    };
    if let Some(paint) = bg {
        fill_rect(bmp, &r, paint)?;
    }
    if let Some(s) = fg {
        draw_rect(bmp, &r, s)?;
    }
    Ok(())
}

// ============================================================================
// Polygon fill
// ============================================================================

/// Row intersections of the closed polygon through `points`, sorted.
fn row_crossings(points: &[IntPoint], y: i32, out: &mut Vec<i32>) {
    out.clear();
    let n = points.len();
    for i in 0..n {
        let (mut a, mut b) = (points[i], points[(i + 1) % n]);
        if a.x > b.x {
            core::mem::swap(&mut a, &mut b);
        }
        if !((a.y < y && y <= b.y) || (b.y < y && y <= a.y)) {
            continue;
        }
        if a.x == b.x {
            out.push(a.x);
            continue;
        }
        let k = (b.y - a.y) as f64 / (b.x - a.x) as f64;
        let m = a.y as f64 - k * a.x as f64;
        out.push(((y as f64 - m) / k) as i32);
    }
    out.sort_unstable();
}

pub fn fill_polygon_with<S: ColorSource>(bmp: &mut Bitmap, src: &S, points: &[IntPoint]) {
    if points.is_empty() {
        return;
    }
    let r = bounding_rect(points);
    let (x_min, x_max) = (r.left().max(0), r.right().min(bmp.width() - 1));
    let mut crossings = Vec::new();
    for y in r.top().max(0)..=r.bottom().min(bmp.height() - 1) {
        row_crossings(points, y, &mut crossings);
        if crossings.is_empty() {
            continue;
        }
        let mut j = 0;
        for x in x_min..=x_max {
            while j < crossings.len() && crossings[j] < x {
                j += 1;
            }
            if (crossings.len() - j) % 2 == 1 {
                src.apply(bmp, x, y);
            }
        }
    }
}

// ============================================================================
// Triangle fill
// ============================================================================

#[inline]
fn span_f<S: ColorSource>(bmp: &mut Bitmap, src: &S, x0: f64, x1: f64, y: f64) {
    hline(bmp, src, ifloor(x0 + 0.5), ifloor(x1 + 0.5), ifloor(y + 0.5));
}

/// Slope dx/dy of the edge `a -> b`, zero for horizontal edges.
#[inline]
fn inverse_slope(a: Point, b: Point) -> f64 {
    if b.y - a.y > 0.0 {
        (b.x - a.x) / (b.y - a.y)
    } else {
        0.0
    }
}

pub fn fill_triangle_with<S: ColorSource>(bmp: &mut Bitmap, src: &S, p0: Point, p1: Point, p2: Point) {
    let mut v = [p0, p1, p2];
    v.sort_by(|a, b| a.y.total_cmp(&b.y));
    let [a, b, c] = v;

    let ab = inverse_slope(a, b);
    let ac = inverse_slope(a, c);
    let bc = inverse_slope(b, c);

    let mut y = a.y;
    let mut left = a.x;
    let mut right = a.x;

    // The long edge a->c bounds one side for the whole triangle; the other
    // side switches from a->b to b->c at the middle vertex.
    let (upper, lower) = if ab > ac { ((ac, ab), (ac, bc)) } else { ((ab, ac), (bc, ac)) };
    while y < b.y {
        span_f(bmp, src, left, right, y);
        y += 1.0;
        left += upper.0;
        right += upper.1;
    }
    if ab > ac {
        right = b.x;
    } else {
        left = b.x;
    }
    while y < c.y {
        span_f(bmp, src, left, right, y);
        y += 1.0;
        left += lower.0;
        right += lower.1;
    }
}

// ============================================================================
// Outlines and rectangles
// ============================================================================

pub fn draw_polygon_with<S: ColorSource>(
    bmp: &mut Bitmap,
    src: &S,
    points: &[IntPoint],
    width: i32,
    dashed: bool,
) {
    let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
        return;
    };
    if points.len() == 1 {
        debug!("polygon outline with a single point");
        line_circle(bmp, src, first, width);
        return;
    }
    let butt = LineStyle::new(width, dashed, LineCap::Butt);
    for pair in points.windows(2) {
        draw_line_with(bmp, src, &IntLineSegment::new(pair[0], pair[1]), butt);
        line_circle(bmp, src, pair[1], width);
    }
    draw_line_with(bmp, src, &IntLineSegment::new(last, first), butt);
    line_circle(bmp, src, first, width);
}

pub fn draw_rect_with<S: ColorSource>(
    bmp: &mut Bitmap,
    src: &S,
    r: &IntRect,
    width: i32,
    dashed: bool,
) {
    if dashed {
        draw_polygon_with(bmp, src, &r.corners(), width, true);
        return;
    }
    for i in 0..width.max(1) {
        hline(bmp, src, r.left(), r.right(), r.top() + i);
        hline(bmp, src, r.left(), r.right(), r.bottom() - i);
        vline(bmp, src, r.top(), r.bottom(), r.left() + i);
        vline(bmp, src, r.top(), r.bottom(), r.right() - i);
    }
}

pub fn fill_rect_with<S: ColorSource>(bmp: &mut Bitmap, src: &S, r: &IntRect) {
    let Some(r) = r.intersection(&bmp.rect()) else {
        return;
    };
    for y in r.top()..=r.bottom() {
        hline(bmp, src, r.left(), r.right(), y);
    }
}
