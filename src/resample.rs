//! Resampling: nearest-neighbor and bilinear scaling, flips and rotation.
//!
//! Every operation returns a new bitmap and leaves the source untouched.
//! Output sizes are clamped to at least 1x1. A negative scale factor scales
//! by its magnitude and then mirrors along that axis.

use log::debug;

use crate::basics::{IntRect, IntSize, Scale};
use crate::bitmap::Bitmap;
use crate::color::Color;
use crate::error::{BitmapError, Result};

/// Resampling filter used by [`scale`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleQuality {
    #[default]
    Nearest,
    Bilinear,
}

pub fn scale(src: &Bitmap, s: Scale, quality: ScaleQuality) -> Result<Bitmap> {
    match quality {
        ScaleQuality::Nearest => scale_nearest(src, s),
        ScaleQuality::Bilinear => scale_bilinear(src, s),
    }
}

fn require_pixels(src: &Bitmap) -> Result<()> {
    if src.is_ok() {
        Ok(())
    } else {
        Err(BitmapError::InvalidArgument(
            "cannot resample an empty bitmap".into(),
        ))
    }
}

/// Size of `size` scaled by `|s|`, truncated, at least 1x1.
fn scaled_size(size: IntSize, s: Scale) -> IntSize {
    let s = s.abs();
    IntSize::new(
        ((size.w as f64 * s.x) as i32).max(1),
        ((size.h as f64 * s.y) as i32).max(1),
    )
}

/// Mirror `bmp` along the axes whose scale factor is negative.
fn apply_sign(bmp: Bitmap, s: Scale) -> Result<Bitmap> {
    let bmp = if s.x < 0.0 { flip_horizontal(&bmp)? } else { bmp };
    if s.y < 0.0 {
        flip_vertical(&bmp)
    } else {
        Ok(bmp)
    }
}

// ============================================================================
// Nearest neighbor
// ============================================================================

/// Nearest-neighbor scaling with 16.16 fixed-point source stepping.
pub fn scale_nearest(src: &Bitmap, s: Scale) -> Result<Bitmap> {
    require_pixels(src)?;
    let size = scaled_size(src.size(), s);
    let mut dst = Bitmap::new(size)?;

    let x_ratio = ((src.width() as i64) << 16) / size.w as i64 + 1;
    let y_ratio = ((src.height() as i64) << 16) / size.h as i64 + 1;
    let (max_x, max_y) = (src.width() as i64 - 1, src.height() as i64 - 1);
    for y in 0..size.h {
        let sy = ((y as i64 * y_ratio) >> 16).min(max_y) as i32;
        for x in 0..size.w {
            let sx = ((x as i64 * x_ratio) >> 16).min(max_x) as i32;
            dst.put_raw(x, y, src.pixel_raw(sx, sy));
        }
    }
    apply_sign(dst, s)
}

/// Enlarge by a whole factor, each source pixel becoming a
/// `factor x factor` block.
pub fn scale_nearest_int(src: &Bitmap, factor: i32) -> Result<Bitmap> {
    require_pixels(src)?;
    if factor < 1 {
        return Err(BitmapError::InvalidArgument(format!(
            "scale factor must be at least 1, got {}",
            factor
        )));
    }
    let size = IntSize::new(
        src.width().saturating_mul(factor),
        src.height().saturating_mul(factor),
    );
    let mut dst = Bitmap::new(size)?;
    for y in 0..size.h {
        for x in 0..size.w {
            dst.put_raw(x, y, src.pixel_raw(x / factor, y / factor));
        }
    }
    Ok(dst)
}

// ============================================================================
// Bilinear
// ============================================================================

/// Weighted mix of the 2x2 neighborhood whose top-left is `(x, y)`.
/// Neighbors past the right or bottom edge repeat the edge pixel.
#[inline]
fn bilinear_at(src: &Bitmap, x: i32, y: i32, dx: f64, dy: f64, bias: f64) -> Color {
    let x1 = (x + 1).min(src.width() - 1);
    let y1 = (y + 1).min(src.height() - 1);
    let a = src.pixel_raw(x, y);
    let b = src.pixel_raw(x1, y);
    let c = src.pixel_raw(x, y1);
    let d = src.pixel_raw(x1, y1);

    let wa = (1.0 - dx) * (1.0 - dy);
    let wb = dx * (1.0 - dy);
    let wc = (1.0 - dx) * dy;
    let wd = dx * dy;
    let mix = |ca: u8, cb: u8, cc: u8, cd: u8| {
        (ca as f64 * wa + cb as f64 * wb + cc as f64 * wc + cd as f64 * wd + bias) as u8
    };
    Color::new(
        mix(a.r, b.r, c.r, d.r),
        mix(a.g, b.g, c.g, d.g),
        mix(a.b, b.b, c.b, d.b),
        mix(a.a, b.a, c.a, d.a),
    )
}

/// Bilinear scaling. A scale that keeps the size returns a copy, mirrored
/// for negative factors.
pub fn scale_bilinear(src: &Bitmap, s: Scale) -> Result<Bitmap> {
    require_pixels(src)?;
    let size = scaled_size(src.size(), s);
    if size == src.size() {
        debug!("bilinear scale keeps size {}x{}, copying", size.w, size.h);
        return apply_sign(src.clone(), s);
    }

    let mut dst = Bitmap::new(size)?;
    let x_ratio = (src.width() - 1) as f64 / size.w as f64;
    let y_ratio = (src.height() - 1) as f64 / size.h as f64;
    for y in 0..size.h {
        let fy = y_ratio * y as f64;
        let sy = fy as i32;
        for x in 0..size.w {
            let fx = x_ratio * x as f64;
            let sx = fx as i32;
            let c = bilinear_at(src, sx, sy, fx - sx as f64, fy - sy as f64, 0.5);
            dst.put_raw(x, y, c);
        }
    }
    apply_sign(dst, s)
}

/// Bilinear resample of the region `r` of `src` by the positive factors in
/// `s`. The result is `r`'s size times `s`, rounded, at least 1x1.
pub fn scaled_subbitmap(src: &Bitmap, s: Scale, r: &IntRect) -> Result<Bitmap> {
    src.check_inside(r)?;
    if !(s.x > 0.0 && s.y > 0.0 && s.x.is_finite() && s.y.is_finite()) {
        return Err(BitmapError::InvalidArgument(format!(
            "sub-bitmap scale must be positive, got {}x{}",
            s.x, s.y
        )));
    }
    let size = IntSize::new(
        ((r.w as f64 * s.x).round() as i32).max(1),
        ((r.h as f64 * s.y).round() as i32).max(1),
    );
    let mut dst = Bitmap::new(size)?;
    let (x_ratio, y_ratio) = (1.0 / s.x, 1.0 / s.y);
    let (max_x, max_y) = (src.width() - 1, src.height() - 1);
    for y in 0..size.h {
        let fy = y_ratio * y as f64 + r.y as f64;
        let sy = (fy as i32).min(max_y);
        for x in 0..size.w {
            let fx = x_ratio * x as f64 + r.x as f64;
            let sx = (fx as i32).min(max_x);
            let c = bilinear_at(src, sx, sy, fx - sx as f64, fy - sy as f64, 0.0);
            dst.put_raw(x, y, c);
        }
    }
    Ok(dst)
}

// ============================================================================
// Flips and rotation
// ============================================================================

/// Mirror left to right.
pub fn flip_horizontal(src: &Bitmap) -> Result<Bitmap> {
    let mut dst = Bitmap::new(src.size())?;
    let w = src.width();
    for y in 0..src.height() {
        for x in 0..w {
            dst.put_raw(w - 1 - x, y, src.pixel_raw(x, y));
        }
    }
    Ok(dst)
}

/// Mirror top to bottom.
pub fn flip_vertical(src: &Bitmap) -> Result<Bitmap> {
    let mut dst = Bitmap::new(src.size())?;
    let h = src.height();
    for y in 0..h {
        dst.row_mut(h - 1 - y).copy_from_slice(src.row(y));
    }
    Ok(dst)
}

/// Rotate a quarter turn clockwise. The result has the source's size
/// transposed.
pub fn rotate_90cw(src: &Bitmap) -> Result<Bitmap> {
    let mut dst = Bitmap::new(src.size().transposed())?;
    let dst_w = dst.width();
    for y in 0..src.height() {
        for x in 0..src.width() {
            dst.put_raw(dst_w - 1 - y, x, src.pixel_raw(x, y));
        }
    }
    Ok(dst)
}

/// Snap values within rounding noise of an integer onto it, so exact
/// quarter turns do not grow the output by a pixel.
fn snap(v: f64) -> f64 {
    let r = v.round();
    if (v - r).abs() < 1e-9 {
        r
    } else {
        v
    }
}

fn min_max(v: &[f64; 4]) -> (f64, f64) {
    v.iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| (lo.min(x), hi.max(x)))
}

/// Rotate by `angle` radians, clockwise on screen, about the top-left
/// corner.
///
/// The result is the bounding box of the rotated source. Each destination
/// pixel center is rotated back into the source and takes the pixel it
/// lands in; pixels landing outside the source are `background`.
pub fn rotate(src: &Bitmap, angle: f64, background: Color) -> Result<Bitmap> {
    require_pixels(src)?;
    if !angle.is_finite() {
        return Err(BitmapError::InvalidArgument(format!(
            "rotation angle must be finite, got {}",
            angle
        )));
    }
    let (sin, cos) = angle.sin_cos();
    let (w, h) = (src.width() as f64, src.height() as f64);
    let xs = [0.0, w * cos, w * cos - h * sin, -h * sin].map(snap);
    let ys = [0.0, w * sin, w * sin + h * cos, h * cos].map(snap);
    let (x_min, x_max) = min_max(&xs);
    let (y_min, y_max) = min_max(&ys);
    let (ox, oy) = (x_min.floor(), y_min.floor());
    let size = IntSize::new(
        ((x_max.ceil() - ox) as i32).max(1),
        ((y_max.ceil() - oy) as i32).max(1),
    );

    let mut dst = Bitmap::with_color(size, background)?;
    for y in 0..size.h {
        let dy = y as f64 + oy + 0.5;
        for x in 0..size.w {
            let dx = x as f64 + ox + 0.5;
            let sx = (dx * cos + dy * sin).floor();
            let sy = (dy * cos - dx * sin).floor();
            if sx >= 0.0 && sy >= 0.0 && sx < w && sy < h {
                dst.put_raw(x, y, src.pixel_raw(sx as i32, sy as i32));
            }
        }
    }
    debug!(
        "rotated {}x{} by {:.4} rad into {}x{}",
        src.width(),
        src.height(),
        angle,
        size.w,
        size.h
    );
    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basics::IntPoint;

    fn px(b: &Bitmap, x: i32, y: i32) -> Color {
        b.get_pixel(IntPoint::new(x, y)).unwrap()
    }

    fn grey(v: u8) -> Color {
        Color::rgb(v, v, v)
    }

    /// Each pixel gets a distinct color derived from its position.
    fn numbered(w: i32, h: i32) -> Bitmap {
        let mut b = Bitmap::new(IntSize::new(w, h)).unwrap();
        for y in 0..h {
            for x in 0..w {
                b.put_pixel(IntPoint::new(x, y), Color::new(x as u8 * 10, y as u8 * 10, 7, 255));
            }
        }
        b
    }

    #[test]
    fn test_identity() {
        let src = numbered(5, 3);
        assert_eq!(scale_nearest(&src, Scale::uniform(1.0)).unwrap(), src);
        assert_eq!(scale_bilinear(&src, Scale::uniform(1.0)).unwrap(), src);
        assert_eq!(scale(&src, Scale::default(), ScaleQuality::Bilinear).unwrap(), src);
    }

    #[test]
    fn test_nearest_doubles_into_blocks() {
        let src = numbered(2, 2);
        let dst = scale_nearest(&src, Scale::uniform(2.0)).unwrap();
        assert_eq!(dst.size(), IntSize::new(4, 4));
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(px(&dst, x, y), px(&src, x / 2, y / 2));
            }
        }
        assert_eq!(scale_nearest_int(&src, 2).unwrap(), dst);
    }

    #[test]
    fn test_nearest_halves_by_skipping() {
        let src = numbered(4, 4);
        let dst = scale_nearest(&src, Scale::uniform(0.5)).unwrap();
        assert_eq!(dst.size(), IntSize::new(2, 2));
        assert_eq!(px(&dst, 1, 1), px(&src, 2, 2));
    }

    #[test]
    fn test_nearest_large_upscale_stays_inside() {
        let src = numbered(1, 1);
        let dst = scale_nearest(&src, Scale::new(1000.0, 1.0)).unwrap();
        assert_eq!(dst.size(), IntSize::new(1000, 1));
        assert!(dst.pixels().all(|c| c == px(&src, 0, 0)));
    }

    #[test]
    fn test_min_size() {
        let src = numbered(10, 10);
        let dst = scale_nearest(&src, Scale::uniform(0.01)).unwrap();
        assert_eq!(dst.size(), IntSize::new(1, 1));
        let dst = scale_bilinear(&src, Scale::new(0.0, 0.5)).unwrap();
        assert_eq!(dst.size(), IntSize::new(1, 5));
    }

    #[test]
    fn test_negative_scale_flips() {
        let src = numbered(3, 2);
        assert_eq!(
            scale_nearest(&src, Scale::new(-1.0, 1.0)).unwrap(),
            flip_horizontal(&src).unwrap()
        );
        assert_eq!(
            scale_bilinear(&src, Scale::new(1.0, -1.0)).unwrap(),
            flip_vertical(&src).unwrap()
        );
        let up = scale_nearest(&src, Scale::new(-2.0, -2.0)).unwrap();
        assert_eq!(px(&up, 0, 0), px(&src, 2, 1));
    }

    #[test]
    fn test_bilinear_ramp() {
        let mut src = Bitmap::with_color(IntSize::new(2, 1), Color::BLACK).unwrap();
        src.put_pixel(IntPoint::new(1, 0), Color::WHITE);
        let dst = scale_bilinear(&src, Scale::new(2.0, 1.0)).unwrap();
        let reds: Vec<u8> = dst.pixels().map(|c| c.r).collect();
        assert_eq!(reds, vec![0, 64, 128, 191]);
        assert!(dst.pixels().all(|c| c.a == 255));
    }

    #[test]
    fn test_bilinear_stays_within_neighbors() {
        let mut src = Bitmap::new(IntSize::new(2, 2)).unwrap();
        src.put_pixel(IntPoint::new(0, 0), grey(10));
        src.put_pixel(IntPoint::new(1, 0), grey(200));
        src.put_pixel(IntPoint::new(0, 1), grey(90));
        src.put_pixel(IntPoint::new(1, 1), grey(255));
        let dst = scale_bilinear(&src, Scale::new(3.7, 2.3)).unwrap();
        for c in dst.pixels() {
            assert!((10..=255).contains(&c.r), "{:?}", c);
        }
    }

    #[test]
    fn test_empty_source_is_error() {
        let empty = Bitmap::default();
        assert!(scale_nearest(&empty, Scale::uniform(2.0)).is_err());
        assert!(scale_bilinear(&empty, Scale::uniform(2.0)).is_err());
        assert!(scale_nearest_int(&numbered(2, 2), 0).is_err());
    }

    #[test]
    fn test_scaled_subbitmap() {
        let src = numbered(6, 6);
        let r = IntRect::new(1, 2, 3, 2);
        assert_eq!(
            scaled_subbitmap(&src, Scale::uniform(1.0), &r).unwrap(),
            src.subbitmap(&r).unwrap()
        );
        let big = scaled_subbitmap(&src, Scale::uniform(2.0), &r).unwrap();
        assert_eq!(big.size(), IntSize::new(6, 4));
        assert_eq!(px(&big, 0, 0), px(&src, 1, 2));
        assert_eq!(px(&big, 2, 2), px(&src, 2, 3));
        // Halfway between columns 1 and 2.
        assert_eq!(px(&big, 1, 0).r, 15);

        assert!(scaled_subbitmap(&src, Scale::uniform(1.0), &IntRect::new(4, 4, 3, 3)).is_err());
        assert!(scaled_subbitmap(&src, Scale::uniform(-1.0), &r).is_err());
    }

    #[test]
    fn test_flips() {
        let src = numbered(3, 2);
        let h = flip_horizontal(&src).unwrap();
        assert_eq!(px(&h, 0, 1), px(&src, 2, 1));
        let v = flip_vertical(&src).unwrap();
        assert_eq!(px(&v, 2, 0), px(&src, 2, 1));
        assert_eq!(flip_horizontal(&h).unwrap(), src);
    }

    #[test]
    fn test_rotate_90cw() {
        let src = numbered(3, 2);
        let dst = rotate_90cw(&src).unwrap();
        assert_eq!(dst.size(), IntSize::new(2, 3));
        // The left column becomes the top row, read bottom to top.
        assert_eq!(px(&dst, 0, 0), px(&src, 0, 1));
        assert_eq!(px(&dst, 1, 0), px(&src, 0, 0));
        assert_eq!(px(&dst, 1, 2), px(&src, 2, 0));
        let full = rotate_90cw(&rotate_90cw(&rotate_90cw(&dst).unwrap()).unwrap()).unwrap();
        assert_eq!(full, src);
    }

    #[test]
    fn test_rotate_quarter_turns() {
        use std::f64::consts::{FRAC_PI_2, PI};
        let src = numbered(3, 2);
        assert_eq!(rotate(&src, 0.0, Color::BLACK).unwrap(), src);
        let quarter = rotate_90cw(&src).unwrap();
        assert_eq!(rotate(&src, FRAC_PI_2, Color::BLACK).unwrap(), quarter);
        let half = flip_vertical(&flip_horizontal(&src).unwrap()).unwrap();
        assert_eq!(rotate(&src, PI, Color::BLACK).unwrap(), half);
        let back = rotate_90cw(&rotate_90cw(&quarter).unwrap()).unwrap();
        assert_eq!(rotate(&src, -FRAC_PI_2, Color::BLACK).unwrap(), back);
    }

    #[test]
    fn test_rotate_diagonal_fills_background() {
        let bg = Color::rgb(1, 2, 3);
        let src = numbered(10, 10);
        let dst = rotate(&src, std::f64::consts::FRAC_PI_4, bg).unwrap();
        assert_eq!(dst.size(), IntSize::new(16, 15));
        assert_eq!(px(&dst, 0, 0), bg);
        assert_eq!(px(&dst, 15, 14), bg);
        assert_eq!(px(&dst, 8, 7), px(&src, 5, 4));
        assert_eq!(dst.pixels().filter(|&c| c == bg).count(), 135);
    }

    #[test]
    fn test_rotate_rejects_bad_input() {
        assert!(rotate(&Bitmap::default(), 1.0, Color::WHITE).is_err());
        assert!(rotate(&numbered(2, 2), f64::NAN, Color::WHITE).is_err());
    }
}
