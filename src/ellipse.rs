//! Two-region midpoint ellipses: outlines, wide outlines and fills.
//!
//! The ellipse inscribed in a rectangle has radii `w / 2` and `h / 2`
//! (floored) around `(x + a, y + b)`. For even dimensions the lower and
//! right halves are pulled in by one pixel so the result stays inside the
//! rectangle and symmetric about its center.

use std::collections::BTreeMap;

use crate::basics::{IntLineSegment, IntRect};
use crate::bitmap::Bitmap;
use crate::color::Color;
use crate::color_source::{dispatch_paint, hline, vline, ColorSource, FromColor};
use crate::error::Result;
use crate::line::{draw_line_with, LineStyle};
use crate::paint::{BorderSettings, LineCap, Paint};

// ============================================================================
// Public entry points
// ============================================================================

/// Outline the ellipse inscribed in `r`.
pub fn draw_ellipse(bmp: &mut Bitmap, r: &IntRect, s: &BorderSettings) -> Result<()> {
    dispatch_paint!(&s.paint, *r, bmp.rect(), |src| {
        draw_ellipse_with(bmp, &src, r, s.width, s.dashed);
    });
    Ok(())
}

/// Fill the ellipse inscribed in `r`.
pub fn fill_ellipse(bmp: &mut Bitmap, r: &IntRect, paint: &Paint) -> Result<()> {
    dispatch_paint!(paint, *r, bmp.rect(), |src| {
        fill_ellipse_with(bmp, &src, r);
    });
    Ok(())
}

pub fn fill_ellipse_color(bmp: &mut Bitmap, r: &IntRect, color: Color) {
    fill_ellipse_with(bmp, &FromColor::new(color), r);
}

// ============================================================================
// Midpoint stepping
// ============================================================================

/// Center and radii of the ellipse inscribed in `r`.
#[derive(Debug, Clone, Copy)]
struct Geometry {
    x0: i32,
    y0: i32,
    a: i32,
    b: i32,
    x_offset: i32,
    y_offset: i32,
}

impl Geometry {
    fn new(r: &IntRect) -> Self {
        let a = r.w.div_euclid(2);
        let b = r.h.div_euclid(2);
        Self {
            x0: r.x + a,
            y0: r.y + b,
            a,
            b,
            x_offset: (r.w % 2 == 0) as i32,
            y_offset: (r.h % 2 == 0) as i32,
        }
    }
}

/// Walk one quadrant of the ellipse with radii `a`, `b`, calling
/// `visit(x, y, first)` for each step: first the region where x advances
/// every step (`first == true`), then the region where y does. Both radii
/// must be positive.
fn midpoint_quadrant(a: i32, b: i32, mut visit: impl FnMut(i32, i32, bool)) {
    // Decision terms grow with the cube of the radii.
    let (a, b) = (a as i64, b as i64);
    let a2 = 2 * a * a;
    let b2 = 2 * b * b;

    let mut error = a * a * b;
    let mut x = 0;
    let mut y = b;
    let mut stop_y = 0;
    let mut stop_x = a2 * b;
    while stop_y <= stop_x {
        visit(x as i32, y as i32, true);
        x += 1;
        error -= b2 * (x - 1);
        stop_y += b2;
        if error <= 0 {
            error += a2 * (y - 1);
            y -= 1;
            stop_x -= a2;
        }
    }

    error = b * b * a;
    x = a;
    y = 0;
    stop_y = b2 * a;
    stop_x = 0;
    while stop_y >= stop_x {
        visit(x as i32, y as i32, false);
        y += 1;
        error -= a2 * (y - 1);
        stop_x += a2;
        if error < 0 {
            error += b2 * (x - 1);
            x -= 1;
            stop_y -= b2;
        }
    }
}

/// Left x of the ellipse contour for each row it touches. Empty when either
/// radius is not positive.
fn ellipse_points(x0: i32, y0: i32, a: i32, b: i32) -> BTreeMap<i32, i32> {
    let mut points = BTreeMap::new();
    if a <= 0 || b <= 0 {
        return points;
    }
    midpoint_quadrant(a, b, |x, y, _| {
        points.insert(y0 + y, x0 - x);
        points.insert(y0 - y, x0 - x);
    });
    points
}

// ============================================================================
// Generic rasterizers
// ============================================================================

pub fn draw_ellipse_with<S: ColorSource>(
    bmp: &mut Bitmap,
    src: &S,
    r: &IntRect,
    width: i32,
    dashed: bool,
) {
    if width > 1 {
        draw_wide_ellipse(bmp, src, r, width);
        return;
    }

    let g = Geometry::new(r);
    if g.a == 0 || g.b == 0 {
        let side = if g.a == 0 {
            IntLineSegment::new(r.top_left(), r.bottom_left())
        } else {
            IntLineSegment::new(r.top_left(), r.top_right())
        };
        draw_line_with(bmp, src, &side, LineStyle::new(1, dashed, LineCap::Butt));
        return;
    }

    let mut on = false;
    let mut steps = 0;
    midpoint_quadrant(g.a, g.b, |x, y, _| {
        if steps == 0 {
            on = !dashed || !on;
        }
        steps = (steps + 1) % 2;
        if on {
            src.apply(bmp, g.x0 + x - g.x_offset, g.y0 + y - g.y_offset);
            src.apply(bmp, g.x0 - x, g.y0 + y - g.y_offset);
            src.apply(bmp, g.x0 - x, g.y0 - y);
            src.apply(bmp, g.x0 + x - g.x_offset, g.y0 - y);
        }
    });
}

/// Stroke of `width` pixels: per row, the span between the outer contour and
/// the inner contour (radii reduced by `width`) on each side. Rows the inner
/// contour does not reach are filled across.
fn draw_wide_ellipse<S: ColorSource>(bmp: &mut Bitmap, src: &S, r: &IntRect, width: i32) {
    let g = Geometry::new(r);
    if g.a == 0 || g.b == 0 {
        let side = if g.a == 0 {
            IntLineSegment::new(r.top_left(), r.bottom_left())
        } else {
            IntLineSegment::new(r.top_left(), r.top_right())
        };
        draw_line_with(bmp, src, &side, LineStyle::new(width, false, LineCap::Butt));
        return;
    }

    let inner = ellipse_points(g.x0, g.y0, g.a - width, g.b - width);
    for (&y, &x) in &inner {
        src.apply(bmp, x, y);
    }

    let rows = |bmp: &mut Bitmap, x: i32, y: i32| {
        let right = g.x0 + x - g.x_offset;
        for (key, row) in [(g.y0 + y, g.y0 + y - g.y_offset), (g.y0 - y, g.y0 - y)] {
            match inner.get(&key) {
                Some(&x1) => {
                    hline(bmp, src, g.x0 - x, x1, row);
                    let d = x1 - (g.x0 - x);
                    hline(bmp, src, right - d, right, row);
                }
                None => hline(bmp, src, g.x0 - x, right, row),
            }
        }
    };

    midpoint_quadrant(g.a, g.b, |x, y, first| {
        if first {
            src.apply(bmp, g.x0 + x - g.x_offset, g.y0 + y - g.y_offset);
        }
        rows(bmp, x, y);
    });
}

pub fn fill_ellipse_with<S: ColorSource>(bmp: &mut Bitmap, src: &S, r: &IntRect) {
    let g = Geometry::new(r);
    if g.a == 0 {
        vline(bmp, src, r.top(), r.bottom(), r.left());
        return;
    }
    if g.b == 0 {
        hline(bmp, src, r.left(), r.right(), r.top());
        return;
    }

    midpoint_quadrant(g.a, g.b, |x, y, _| {
        let right = g.x0 + x - g.x_offset;
        hline(bmp, src, g.x0 - x, right, g.y0 + y - g.y_offset);
        if y != 0 {
            hline(bmp, src, g.x0 - x, right, g.y0 - y);
        }
    });
}
