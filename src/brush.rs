//! 8-bit stencils and stencil blending.
//!
//! A [`Brush`] holds one coverage value per pixel. Blending a brush with a
//! paint mixes the paint into the bitmap weighted by that coverage.
//! Stroking walks a brush along a Bresenham path instead, painting every
//! pixel it covers once.

use log::trace;

use crate::basics::{bounding_rect, IntLineSegment, IntPoint, IntRect, IntSize};
use crate::bitmap::Bitmap;
use crate::color::{mix_channel, Color};
use crate::color_source::{dispatch_paint, ColorSource};
use crate::compositing::blend;
use crate::error::{BitmapError, Result};
use crate::line::walk_line;
use crate::paint::Paint;

/// Coverage stencil, 0 is untouched and 255 is full strength.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Brush {
    width: i32,
    height: i32,
    data: Vec<u8>,
}

impl Brush {
    /// An all-zero brush.
    pub fn new(width: i32, height: i32) -> Result<Self> {
        if width <= 0 || height <= 0 {
            return Err(BitmapError::InvalidSize { width, height });
        }
        let len = IntSize::new(width, height).area() as usize;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| BitmapError::Allocation {
                width,
                height,
                bytes: len,
            })?;
        data.resize(len, 0);
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn size(&self) -> IntSize {
        IntSize::new(self.width, self.height)
    }

    /// Coverage at `(x, y)`, zero outside the brush.
    pub fn get(&self, x: i32, y: i32) -> u8 {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return 0;
        }
        self.data[(y * self.width + x) as usize]
    }

    /// Set the coverage at `(x, y)`. Writes outside the brush are ignored.
    pub fn set(&mut self, x: i32, y: i32, value: u8) {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return;
        }
        self.data[(y * self.width + x) as usize] = value;
    }
}

/// A filled circle of diameter `w` on a `w x w` brush, traced with the
/// midpoint circle algorithm. Diameters of 1 or less give a single pixel.
pub fn circle_brush(w: i32) -> Result<Brush> {
    if w <= 1 {
        let mut b = Brush::new(1, 1)?;
        b.set(0, 0, 255);
        return Ok(b);
    }
    let mut b = Brush::new(w, w)?;
    let r = w / 2;
    // Even diameters have no center pixel; the lower and right halves are
    // shifted in by one.
    let ofs = if w % 2 == 0 { 1 } else { 0 };
    let (cx, cy) = (r, r);

    // Mirrored rows `dy` above and below the center, `len` to each side.
    let span = |b: &mut Brush, dy: i32, len: i32| {
        for i in 0..=len {
            b.set(cx + i - ofs, cy + dy - ofs, 255);
            b.set(cx - i, cy + dy - ofs, 255);
            b.set(cx + i - ofs, cy - dy, 255);
            b.set(cx - i, cy - dy, 255);
        }
    };

    b.set(cx, cy + r - ofs, 255);
    b.set(cx, cy - r, 255);
    b.set(cx + r - ofs, cy, 255);
    b.set(cx - r, cy, 255);

    let mut f = 1 - r;
    let mut dd_x = 1;
    let mut dd_y = -2 * r;
    let (mut x, mut y) = (0, r);
    while x <= y {
        if f >= 0 {
            y -= 1;
            dd_y += 2;
            f += dd_y;
        }
        x += 1;
        dd_x += 2;
        f += dd_x;
        span(&mut b, y, x);
        span(&mut b, x, y);
    }
    for i in 0..r {
        b.set(cx - i, cy, 255);
        b.set(cx + i - ofs, cy, 255);
    }
    Ok(b)
}

// ============================================================================
// Stencil blending
// ============================================================================

/// Blend `paint` into `bmp` through `brush`, whose top-left corner is placed
/// at `top_left`.
///
/// A color is mixed into all four channels by the coverage. Patterns and
/// gradients are first sampled into a stroke bitmap whose alpha is the
/// sample's alpha scaled by the coverage, which is then blended onto `bmp`.
/// Gradients are rendered over the brush's rectangle.
pub fn blend_stencil(bmp: &mut Bitmap, brush: &Brush, top_left: IntPoint, paint: &Paint) -> Result<()> {
    if let Paint::Color(c) = paint {
        blend_stencil_color(bmp, brush, top_left, *c);
        return Ok(());
    }
    let rect = IntRect::new(top_left.x, top_left.y, brush.width, brush.height);
    dispatch_paint!(paint, rect, bmp.rect(), |src| {
        blend_stencil_with(bmp, brush, top_left, &src)?;
    });
    Ok(())
}

pub fn blend_stencil_color(bmp: &mut Bitmap, brush: &Brush, top_left: IntPoint, c: Color) {
    let placed = IntRect::new(top_left.x, top_left.y, brush.width, brush.height);
    let Some(r) = placed.intersection(&bmp.rect()) else {
        return;
    };
    for y in r.top()..=r.bottom() {
        for x in r.left()..=r.right() {
            let alpha = brush.get(x - top_left.x, y - top_left.y);
            let d = bmp.pixel_raw(x, y);
            bmp.put_raw(
                x,
                y,
                Color::new(
                    mix_channel(c.r, d.r, alpha),
                    mix_channel(c.g, d.g, alpha),
                    mix_channel(c.b, d.b, alpha),
                    mix_channel(c.a, d.a, alpha),
                ),
            );
        }
    }
}

fn blend_stencil_with<S: ColorSource>(
    bmp: &mut Bitmap,
    brush: &Brush,
    top_left: IntPoint,
    src: &S,
) -> Result<()> {
    let mut stroke = Bitmap::new(brush.size())?;
    for y in 0..brush.height {
        for x in 0..brush.width {
            let c = src.sample(x + top_left.x, y + top_left.y);
            let a = Color::multiply(c.a, brush.get(x, y));
            stroke.put_raw(x, y, c.with_alpha(a));
        }
    }
    blend(&stroke, bmp, top_left);
    Ok(())
}

// ============================================================================
// Strokes
// ============================================================================

/// Brush coverage above this marks a pixel as part of a stroke.
pub const STROKE_THRESHOLD: u8 = 10;

/// Stroke the segment `p0 p1` with `brush`, centered on each pixel of the
/// segment's thin Bresenham path.
pub fn stroke(bmp: &mut Bitmap, p0: IntPoint, p1: IntPoint, brush: &Brush, paint: &Paint) -> Result<()> {
    stroke_polyline(bmp, &[p0, p1], brush, paint)
}

/// Stroke connected segments with `brush`. A single point stamps the brush
/// once; no points leave the bitmap unchanged.
///
/// Every pixel the brush covers by more than [`STROKE_THRESHOLD`] is painted
/// exactly once, so translucent patterns and gradients do not darken where
/// stamps overlap. Colors are written, patterns and gradients blended, and
/// gradients are laid out over the stroke's bounding rectangle.
pub fn stroke_polyline(bmp: &mut Bitmap, points: &[IntPoint], brush: &Brush, paint: &Paint) -> Result<()> {
    let Some(&first) = points.first() else {
        return Ok(());
    };
    let center = IntPoint::new(brush.width / 2, brush.height / 2);
    let reach = brush.width.max(brush.height);
    let bounds = bmp.rect().inflated(reach);
    let Some(area) = bounding_rect(points).inflated(reach).intersection(&bmp.rect()) else {
        return Ok(());
    };

    let mut mask = Brush::new(bmp.width(), bmp.height())?;
    let mut stamp = |p: IntPoint, _: i64| {
        let at = IntPoint::new(p.x.saturating_sub(center.x), p.y.saturating_sub(center.y));
        stamp_brush(&mut mask, brush, at);
    };
    if points.len() == 1 {
        walk_line(&IntLineSegment::new(first, first), &bounds, &mut stamp);
    }
    for pair in points.windows(2) {
        walk_line(&IntLineSegment::new(pair[0], pair[1]), &bounds, &mut stamp);
    }

    let rect = bounding_rect(points).inflated(reach);
    dispatch_paint!(paint, rect, bmp.rect(), |src| {
        for y in area.top()..=area.bottom() {
            for x in area.left()..=area.right() {
                if mask.get(x, y) != 0 {
                    src.apply(bmp, x, y);
                }
            }
        }
    });
    trace!("stroked {} points with a {}x{} brush", points.len(), brush.width, brush.height);
    Ok(())
}

/// Mark the pixels `brush` covers when its top-left corner is at `at`.
fn stamp_brush(mask: &mut Brush, brush: &Brush, at: IntPoint) {
    for y in 0..brush.height {
        for x in 0..brush.width {
            if brush.get(x, y) > STROKE_THRESHOLD {
                mask.set(at.x.saturating_add(x), at.y.saturating_add(y), 255);
            }
        }
    }
}
