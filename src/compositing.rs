//! Bitmap onto bitmap compositing.
//!
//! Every operation places `src` with its top-left corner at `top_left` in
//! `dst` and touches only the overlap of the two; no overlap is a no-op.

use crate::basics::{IntPoint, IntRect};
use crate::bitmap::Bitmap;
use crate::color::{mix_channel, Color};
use crate::error::Result;

const BPP: usize = 4;

/// The part of `src` that lands inside `dst`, in `src` coordinates.
fn overlap(src: &Bitmap, dst: &Bitmap, top_left: IntPoint) -> Option<IntRect> {
    let dst_in_src = IntRect::new(-top_left.x, -top_left.y, dst.width(), dst.height());
    src.rect().intersection(&dst_in_src)
}

/// Visit every overlapping pixel pair as `(src color, dst x, dst y)`.
fn for_each_overlap(
    src: &Bitmap,
    dst: &mut Bitmap,
    top_left: IntPoint,
    mut f: impl FnMut(&mut Bitmap, Color, i32, i32),
) {
    let Some(r) = overlap(src, dst, top_left) else {
        return;
    };
    for y in r.top()..=r.bottom() {
        for x in r.left()..=r.right() {
            f(dst, src.pixel_raw(x, y), x + top_left.x, y + top_left.y);
        }
    }
}

/// Source over destination for one pixel: color channels mixed by the
/// source alpha, result opaque.
#[inline]
fn composite(dst: &mut Bitmap, c: Color, x: i32, y: i32) {
    let d = dst.pixel_raw(x, y);
    dst.put_raw(
        x,
        y,
        Color::new(
            mix_channel(c.r, d.r, c.a),
            mix_channel(c.g, d.g, c.a),
            mix_channel(c.b, d.b, c.a),
            Color::BASE_MASK as u8,
        ),
    );
}

// ============================================================================
// Copy
// ============================================================================

/// Copy the overlapping pixels verbatim, alpha included.
pub fn blit(src: &Bitmap, dst: &mut Bitmap, top_left: IntPoint) {
    let Some(r) = overlap(src, dst, top_left) else {
        return;
    };
    let from = r.left() as usize * BPP;
    let to = (r.right() + 1) as usize * BPP;
    let dst_x = (r.left() + top_left.x) as usize * BPP;
    for y in r.top()..=r.bottom() {
        let src_row = &src.row(y)[from..to];
        dst.row_mut(y + top_left.y)[dst_x..dst_x + src_row.len()].copy_from_slice(src_row);
    }
}

/// Like [`blit`], skipping source pixels exactly equal to `mask`.
pub fn blit_masked(src: &Bitmap, dst: &mut Bitmap, mask: Color, top_left: IntPoint) {
    for_each_overlap(src, dst, top_left, |dst, c, x, y| {
        if c != mask {
            dst.put_raw(x, y, c);
        }
    });
}

// ============================================================================
// Blend
// ============================================================================

/// Alpha-composite `src` onto `dst`: `dst = (src * a + dst * (255 - a)) / 255`
/// per color channel, leaving blended pixels opaque.
///
/// Fully transparent source pixels leave the destination untouched, alpha
/// included.
pub fn blend(src: &Bitmap, dst: &mut Bitmap, top_left: IntPoint) {
    for_each_overlap(src, dst, top_left, |dst, c, x, y| {
        if !c.is_transparent() {
            composite(dst, c, x, y);
        }
    });
}

/// Like [`blend`], skipping source pixels exactly equal to `mask`.
pub fn blend_masked(src: &Bitmap, dst: &mut Bitmap, mask: Color, top_left: IntPoint) {
    for_each_overlap(src, dst, top_left, |dst, c, x, y| {
        if !c.is_transparent() && c != mask {
            composite(dst, c, x, y);
        }
    });
}

/// A copy of `src` flattened onto a background of `color`.
pub fn alpha_blended(src: &Bitmap, color: Color) -> Result<Bitmap> {
    let mut dst = Bitmap::with_color(src.size(), color)?;
    blend(src, &mut dst, IntPoint::new(0, 0));
    Ok(dst)
}
