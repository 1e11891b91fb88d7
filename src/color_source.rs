//! Per-pixel color functions for each kind of [`Paint`].
//!
//! Every shape rasterizer is written once against [`ColorSource`] and
//! instantiated per source type. The paint variant is matched once per
//! drawing call by [`dispatch_paint!`], never per pixel.
//!
//! [`Paint`]: crate::paint::Paint

use crate::basics::{IntPoint, IntRect, IntSize};
use crate::bitmap::Bitmap;
use crate::color::Color;
use crate::error::Result;
use crate::gradient_render::gradient_window;
use crate::paint::{Gradient, Pattern};

// ============================================================================
// ColorSource trait
// ============================================================================

pub trait ColorSource {
    /// The color this source provides at `(x, y)`.
    fn sample(&self, x: i32, y: i32) -> Color;

    /// Write this source's color into `dst` at `(x, y)`. Coordinates outside
    /// `dst` are ignored.
    fn apply(&self, dst: &mut Bitmap, x: i32, y: i32);
}

// ============================================================================
// FromColor
// ============================================================================

/// A constant color, written without blending.
#[derive(Debug, Clone, Copy)]
pub struct FromColor {
    color: Color,
}

impl FromColor {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl ColorSource for FromColor {
    #[inline]
    fn sample(&self, _x: i32, _y: i32) -> Color {
        self.color
    }

    #[inline]
    fn apply(&self, dst: &mut Bitmap, x: i32, y: i32) {
        dst.put_pixel_xy(x, y, self.color);
    }
}

// ============================================================================
// FromPattern
// ============================================================================

/// A tiled bitmap, sampled at `(x, y) + anchor` with toroidal wrap and
/// alpha blended onto the destination.
#[derive(Debug, Clone, Copy)]
pub struct FromPattern<'a> {
    bitmap: &'a Bitmap,
    offset: IntPoint,
}

impl<'a> FromPattern<'a> {
    pub fn new(pattern: &'a Pattern) -> Self {
        Self {
            bitmap: &pattern.bitmap,
            offset: pattern.anchor,
        }
    }
}

impl ColorSource for FromPattern<'_> {
    #[inline]
    fn sample(&self, x: i32, y: i32) -> Color {
        self.bitmap
            .color_modulo(IntPoint::new(x + self.offset.x, y + self.offset.y))
    }

    #[inline]
    fn apply(&self, dst: &mut Bitmap, x: i32, y: i32) {
        dst.blend_pixel_xy(x, y, self.sample(x, y));
    }
}

// ============================================================================
// FromGradient
// ============================================================================

/// A gradient laid out over the bounding rectangle of the operation and
/// pre-rendered where that rectangle meets the clip area.
///
/// Samples outside the rendered window wrap around it, so callers only
/// sample inside the clip area.
#[derive(Debug, Clone)]
pub struct FromGradient {
    bitmap: Bitmap,
    offset: IntPoint,
}

impl FromGradient {
    /// Lay `gradient` out over `rect` and render the part inside `clip`.
    /// Empty rectangles are widened to 1x1.
    pub fn new(gradient: &Gradient, rect: IntRect, clip: IntRect) -> Result<Self> {
        let size = IntSize::new(rect.w.max(1), rect.h.max(1));
        let full = IntRect::new(rect.x, rect.y, size.w, size.h);
        let visible = full
            .intersection(&clip)
            .unwrap_or(IntRect::new(rect.x, rect.y, 1, 1));
        let window = IntRect::new(
            visible.x.saturating_sub(rect.x),
            visible.y.saturating_sub(rect.y),
            visible.w,
            visible.h,
        );
        Ok(Self {
            bitmap: gradient_window(gradient, size, window)?,
            offset: IntPoint::new(visible.x.wrapping_neg(), visible.y.wrapping_neg()),
        })
    }
}

impl ColorSource for FromGradient {
    #[inline]
    fn sample(&self, x: i32, y: i32) -> Color {
        self.bitmap
            .color_modulo(IntPoint::new(x + self.offset.x, y + self.offset.y))
    }

    #[inline]
    fn apply(&self, dst: &mut Bitmap, x: i32, y: i32) {
        dst.blend_pixel_xy(x, y, self.sample(x, y));
    }
}

// ============================================================================
// Spans
// ============================================================================

/// Apply `src` to row `y` from `x0` to `x1` inclusive, in either order,
/// clipped to the bitmap.
#[inline]
pub fn hline<S: ColorSource>(bmp: &mut Bitmap, src: &S, x0: i32, x1: i32, y: i32) {
    let (x0, x1) = if x0 > x1 { (x1, x0) } else { (x0, x1) };
    if y < 0 || y >= bmp.height() {
        return;
    }
    for x in x0.max(0)..=x1.min(bmp.width() - 1) {
        src.apply(bmp, x, y);
    }
}

/// Apply `src` to column `x` from `y0` to `y1` inclusive, clipped.
#[inline]
pub fn vline<S: ColorSource>(bmp: &mut Bitmap, src: &S, y0: i32, y1: i32, x: i32) {
    let (y0, y1) = if y0 > y1 { (y1, y0) } else { (y0, y1) };
    if x < 0 || x >= bmp.width() {
        return;
    }
    for y in y0.max(0)..=y1.min(bmp.height() - 1) {
        src.apply(bmp, x, y);
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// Resolve a `&Paint` into a [`ColorSource`] bound to `$src` and run `$body`
/// once for that concrete source type.
///
/// `$rect` is the area a gradient is laid out over and `$clip` the area it
/// is rendered for, normally the target bitmap's rectangle. Must be used
/// inside a function returning [`Result`], since rendering a gradient
/// allocates.
macro_rules! dispatch_paint {
    ($paint:expr, $rect:expr, $clip:expr, |$src:ident| $body:block) => {
        match $paint {
            $crate::paint::Paint::Color(c) => {
                let $src = $crate::color_source::FromColor::new(*c);
                $body
            }
            $crate::paint::Paint::Pattern(p) => {
                let $src = $crate::color_source::FromPattern::new(p);
                $body
            }
            $crate::paint::Paint::Gradient(g) => {
                let $src = $crate::color_source::FromGradient::new(g, $rect, $clip)?;
                $body
            }
        }
    };
}

pub(crate) use dispatch_paint;
