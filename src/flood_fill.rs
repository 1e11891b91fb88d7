//! Span flood fill and boundary fill.
//!
//! Both fills walk whole horizontal runs from each seed. Below and above a
//! filled run only the first pixel of each matching stretch is pushed onto
//! an explicit stack, so the stack grows with the number of spans rather
//! than with the filled area or with recursion depth.
//!
//! Filling with a pattern or gradient cannot use the fill color itself to
//! mark visited pixels, since sampled colors may equal the target. Those
//! variants paint a tracer color into the live bitmap and write the sampled
//! colors into a copy, which then replaces the bitmap.

use log::trace;

use crate::basics::IntPoint;
use crate::bitmap::Bitmap;
use crate::color::Color;
use crate::color_source::{ColorSource, FromColor, FromGradient, FromPattern};
use crate::error::Result;
use crate::paint::Paint;

// ============================================================================
// Public entry points
// ============================================================================

/// Fill the 4-connected region of pixels matching the color at `seed`.
///
/// Returns an error if `seed` is outside the bitmap. A gradient paint is
/// rendered over the whole bitmap.
pub fn flood_fill(bmp: &mut Bitmap, seed: IntPoint, paint: &Paint) -> Result<()> {
    match paint {
        Paint::Color(c) => flood_fill_color(bmp, seed, *c),
        Paint::Pattern(p) => flood_fill_sampled(bmp, seed, &FromPattern::new(p)),
        Paint::Gradient(g) => {
            let src = FromGradient::new(g, bmp.rect(), bmp.rect())?;
            flood_fill_sampled(bmp, seed, &src)
        }
    }
}

/// Solid color flood fill. A no-op when the region already has `fill`.
pub fn flood_fill_color(bmp: &mut Bitmap, seed: IntPoint, fill: Color) -> Result<()> {
    let target = bmp.get_pixel(seed)?;
    if target == fill {
        return Ok(());
    }
    let stats = span_fill(bmp, seed, target, fill, |_, _| {});
    trace!(
        "flood fill at ({}, {}): {} spans, stack peak {}",
        seed.x,
        seed.y,
        stats.spans,
        stats.peak_stack
    );
    Ok(())
}

/// Flood fill writing the colors of `src`, sampled at each filled pixel.
pub fn flood_fill_sampled<S: ColorSource>(bmp: &mut Bitmap, seed: IntPoint, src: &S) -> Result<()> {
    let target = bmp.get_pixel(seed)?;
    let tracer = if target == Color::BLACK {
        Color::WHITE
    } else {
        Color::BLACK
    };
    let mut filled = bmp.clone();
    let stats = span_fill(bmp, seed, target, tracer, |x, y| {
        filled.put_raw(x, y, src.sample(x, y));
    });
    trace!("sampled flood fill at ({}, {}): {} spans", seed.x, seed.y, stats.spans);
    *bmp = filled;
    Ok(())
}

/// Fill outward from `seed` until pixels of `boundary` are met. Unlike
/// [`flood_fill`] the region may contain any colors except the boundary.
///
/// A seed on the boundary color leaves the bitmap unchanged.
pub fn boundary_fill(bmp: &mut Bitmap, seed: IntPoint, paint: &Paint, boundary: Color) -> Result<()> {
    match paint {
        Paint::Color(c) => boundary_fill_with(bmp, seed, &FromColor::new(*c), boundary),
        Paint::Pattern(p) => boundary_fill_with(bmp, seed, &FromPattern::new(p), boundary),
        Paint::Gradient(g) => {
            let src = FromGradient::new(g, bmp.rect(), bmp.rect())?;
            boundary_fill_with(bmp, seed, &src, boundary)
        }
    }
}

// ============================================================================
// Span walks
// ============================================================================

/// Counters from one span walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct FillStats {
    spans: usize,
    peak_stack: usize,
}

/// Push one seed on row `y` for every stretch of `x0..=x1` where `open`
/// holds.
fn queue_runs(stack: &mut Vec<IntPoint>, x0: i32, x1: i32, y: i32, open: impl Fn(i32) -> bool) {
    let mut queued = false;
    for x in x0..=x1 {
        if !open(x) {
            queued = false;
        } else if !queued {
            stack.push(IntPoint::new(x, y));
            queued = true;
        }
    }
}

/// Replace the region of `target` pixels connected to `seed` with
/// `replacement`, calling `visit` for every pixel replaced. `replacement`
/// must differ from `target`.
fn span_fill(
    bmp: &mut Bitmap,
    seed: IntPoint,
    target: Color,
    replacement: Color,
    mut visit: impl FnMut(i32, i32),
) -> FillStats {
    let (w, h) = (bmp.width(), bmp.height());
    let mut stack = vec![seed];
    let mut stats = FillStats::default();

    while let Some(p) = stack.pop() {
        if bmp.pixel_raw(p.x, p.y) != target {
            continue;
        }
        stats.spans += 1;
        let mut x0 = p.x;
        while x0 > 0 && bmp.pixel_raw(x0 - 1, p.y) == target {
            x0 -= 1;
        }
        let mut x1 = p.x;
        while x1 + 1 < w && bmp.pixel_raw(x1 + 1, p.y) == target {
            x1 += 1;
        }
        for x in x0..=x1 {
            bmp.put_raw(x, p.y, replacement);
            visit(x, p.y);
        }
        let current: &Bitmap = bmp;
        for y in [p.y - 1, p.y + 1] {
            if (0..h).contains(&y) {
                queue_runs(&mut stack, x0, x1, y, |x| current.pixel_raw(x, y) == target);
            }
        }
        stats.peak_stack = stats.peak_stack.max(stack.len());
    }
    stats
}

fn boundary_fill_with<S: ColorSource>(
    bmp: &mut Bitmap,
    seed: IntPoint,
    src: &S,
    boundary: Color,
) -> Result<()> {
    if bmp.get_pixel(seed)? == boundary {
        return Ok(());
    }
    let (w, h) = (bmp.width(), bmp.height());
    let current: &Bitmap = bmp;
    let mut used = vec![false; w as usize * h as usize];
    let index = |x: i32, y: i32| y as usize * w as usize + x as usize;
    let open = |used: &[bool], x: i32, y: i32| {
        !used[index(x, y)] && current.pixel_raw(x, y) != boundary
    };

    let mut filled = current.clone();
    let mut pixels = 0usize;
    let mut stack = vec![seed];
    while let Some(p) = stack.pop() {
        if !open(&used, p.x, p.y) {
            continue;
        }
        let mut x0 = p.x;
        while x0 > 0 && open(&used, x0 - 1, p.y) {
            x0 -= 1;
        }
        let mut x1 = p.x;
        while x1 + 1 < w && open(&used, x1 + 1, p.y) {
            x1 += 1;
        }
        for x in x0..=x1 {
            used[index(x, p.y)] = true;
            filled.put_raw(x, p.y, src.sample(x, p.y));
        }
        pixels += (x1 - x0 + 1) as usize;
        for y in [p.y - 1, p.y + 1] {
            if (0..h).contains(&y) {
                queue_runs(&mut stack, x0, x1, y, |x| open(&used, x, y));
            }
        }
    }
    trace!("boundary fill at ({}, {}): {} pixels", seed.x, seed.y, pixels);
    *bmp = filled;
    Ok(())
}
