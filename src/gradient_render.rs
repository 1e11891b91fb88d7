//! Gradient rendering into a bitmap.
//!
//! A gradient shape function maps a pixel center to a parameter `t`; the
//! [`GradientLut`] maps `t` to a color. Rendering happens once per drawing
//! operation, so the per-pixel cost during rasterization is a lookup into
//! the pre-rendered bitmap. Only the window of the gradient that can reach
//! the target is rendered, so off-canvas geometry costs nothing extra.

use log::trace;

use crate::basics::{IntPoint, IntRect, IntSize};
use crate::bitmap::Bitmap;
use crate::error::Result;
use crate::gradient_lut::GradientLut;
use crate::paint::{Gradient, LinearGradient, RadialGradient};

// ============================================================================
// GradientFunction trait
// ============================================================================

/// Maps a point in the target rectangle to the gradient parameter. Values
/// outside [0, 1] are clamped by the lookup table.
pub trait GradientFunction {
    fn calculate(&self, x: f64, y: f64) -> f64;
}

// ============================================================================
// Linear
// ============================================================================

/// Projection onto the gradient direction, normalized so the rectangle's
/// extreme corners map to 0 and 1.
pub struct GradientLinear {
    dx: f64,
    dy: f64,
    min: f64,
    range: f64,
}

impl GradientLinear {
    pub fn new(g: &LinearGradient, size: IntSize) -> Self {
        let (dy, dx) = g.angle.sin_cos();
        let (w, h) = (size.w as f64, size.h as f64);
        let proj = [0.0, w * dx, h * dy, w * dx + h * dy];
        let min = proj.iter().copied().fold(f64::INFINITY, f64::min);
        let max = proj.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Self {
            dx,
            dy,
            min,
            range: max - min,
        }
    }
}

impl GradientFunction for GradientLinear {
    #[inline]
    fn calculate(&self, x: f64, y: f64) -> f64 {
        if self.range <= f64::EPSILON {
            return 0.0;
        }
        (x * self.dx + y * self.dy - self.min) / self.range
    }
}

// ============================================================================
// Radial
// ============================================================================

/// Normalized elliptical distance from the center.
pub struct GradientRadial {
    cx: f64,
    cy: f64,
    rx: f64,
    ry: f64,
}

impl GradientRadial {
    pub fn new(g: &RadialGradient, size: IntSize) -> Self {
        let (w, h) = (size.w as f64, size.h as f64);
        Self {
            cx: g.center.x * w,
            cy: g.center.y * h,
            rx: g.radii.x * w,
            ry: g.radii.y * h,
        }
    }
}

impl GradientFunction for GradientRadial {
    #[inline]
    fn calculate(&self, x: f64, y: f64) -> f64 {
        if self.rx <= 0.0 || self.ry <= 0.0 {
            return 1.0;
        }
        let nx = (x - self.cx) / self.rx;
        let ny = (y - self.cy) / self.ry;
        (nx * nx + ny * ny).sqrt()
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Evaluate `shape` at every pixel center of `dst`, where pixel (0, 0) of
/// `dst` sits at `origin` in the shape's coordinates.
pub fn render_with<F: GradientFunction>(dst: &mut Bitmap, shape: &F, lut: &GradientLut, origin: IntPoint) {
    let (ox, oy) = (origin.x as f64 + 0.5, origin.y as f64 + 0.5);
    for y in 0..dst.height() {
        for x in 0..dst.width() {
            let t = shape.calculate(x as f64 + ox, y as f64 + oy);
            dst.put_raw(x, y, lut.at(t));
        }
    }
}

/// Render a gradient into a new bitmap of the given size.
pub fn gradient_bitmap(g: &Gradient, size: IntSize) -> Result<Bitmap> {
    gradient_window(g, size, IntRect::from_size(size))
}

/// Render the part `window` of a gradient laid out over a rectangle of
/// `size`. `window` is in that rectangle's coordinates and may extend past
/// it; the result has the window's size.
pub fn gradient_window(g: &Gradient, size: IntSize, window: IntRect) -> Result<Bitmap> {
    let mut bmp = Bitmap::new(window.size())?;
    let lut = GradientLut::new(g.stops());
    let origin = window.top_left();
    match g {
        Gradient::Linear(lin) => render_with(&mut bmp, &GradientLinear::new(lin, size), &lut, origin),
        Gradient::Radial(rad) => render_with(&mut bmp, &GradientRadial::new(rad, size), &lut, origin),
    }
    trace!(
        "rendered {}x{} window at ({}, {}) of a {}x{} gradient",
        window.w,
        window.h,
        window.x,
        window.y,
        size.w,
        size.h
    );
    Ok(bmp)
}
