//! Whole-bitmap color operations: replacement, erasing, palette queries.

use std::collections::{BTreeSet, HashSet};

use crate::bitmap::Bitmap;
use crate::color::Color;
use crate::color_source::{dispatch_paint, ColorSource};
use crate::error::Result;
use crate::paint::Paint;

/// Overwrite every pixel for which `pred` holds with the sample of `src`.
fn replace_where<S: ColorSource>(bmp: &mut Bitmap, src: &S, pred: impl Fn(Color) -> bool) {
    for y in 0..bmp.height() {
        for x in 0..bmp.width() {
            if pred(bmp.pixel_raw(x, y)) {
                let c = src.sample(x, y);
                bmp.put_raw(x, y, c);
            }
        }
    }
}

/// Replace every pixel exactly equal to `old` with `paint`. Pattern and
/// gradient samples are written as is, without blending.
pub fn replace_color(bmp: &mut Bitmap, old: Color, paint: &Paint) -> Result<()> {
    let rect = bmp.rect();
    dispatch_paint!(paint, rect, rect, |src| {
        replace_where(bmp, &src, |c| c == old);
    });
    Ok(())
}

/// Replace every pixel that is not `keep` with `paint`.
pub fn erase_but(bmp: &mut Bitmap, keep: Color, paint: &Paint) -> Result<()> {
    let rect = bmp.rect();
    dispatch_paint!(paint, rect, rect, |src| {
        replace_where(bmp, &src, |c| c != keep);
    });
    Ok(())
}

/// The distinct colors of the bitmap, sorted by channel (r, g, b, a).
pub fn palette(bmp: &Bitmap) -> Vec<Color> {
    bmp.pixels().collect::<BTreeSet<_>>().into_iter().collect()
}

/// Number of distinct colors.
pub fn count_colors(bmp: &Bitmap) -> usize {
    bmp.pixels().collect::<HashSet<_>>().len()
}

/// Set the alpha channel of every pixel, keeping the color channels.
pub fn set_alpha(bmp: &mut Bitmap, a: u8) {
    for y in 0..bmp.height() {
        for x in 0..bmp.width() {
            let c = bmp.pixel_raw(x, y);
            bmp.put_raw(x, y, c.with_alpha(a));
        }
    }
}

/// True when every pixel has the same color. The null bitmap is blank.
pub fn is_blank(bmp: &Bitmap) -> bool {
    let mut pixels = bmp.pixels();
    match pixels.next() {
        Some(first) => pixels.all(|c| c == first),
        None => true,
    }
}
