//! Pixel comparison helpers for bitmap-raster output.
//!
//! Provides bitmap comparison, diff image generation and image file I/O
//! through the library's codecs.

use std::fs;
use std::path::Path;

use anyhow::{bail, ensure, Context, Result};
use bitmap_raster::basics::{IntPoint, IntSize};
use bitmap_raster::bitmap::Bitmap;
use bitmap_raster::codec_bmp;
use bitmap_raster::color::Color;
use bitmap_raster::compositing::blit;

pub mod scenes;

// ============================================================================
// Comparison Result
// ============================================================================

/// Information about a single pixel difference.
#[derive(Debug, Clone)]
pub struct DiffInfo {
    pub x: i32,
    pub y: i32,
    pub pixel_a: Color,
    pub pixel_b: Color,
}

/// Result of comparing two bitmaps.
#[derive(Debug, Clone)]
pub struct CompareResult {
    /// True if every pixel in both bitmaps is identical.
    pub identical: bool,
    pub total_pixels: u64,
    /// Number of pixels that differ by at least 1 in any channel.
    pub different_pixels: u64,
    /// Maximum absolute difference across any single channel of any pixel.
    pub max_channel_diff: u8,
    /// Mean absolute difference across the differing channels.
    pub mean_channel_diff: f64,
    /// The first differing pixel in row-major order.
    pub first_diff: Option<DiffInfo>,
    /// Channel difference counts (index = abs diff).
    pub diff_histogram: [u64; 256],
}

impl std::fmt::Display for CompareResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.identical {
            return write!(f, "IDENTICAL: {} pixels match", self.total_pixels);
        }
        write!(
            f,
            "DIFFERENT: {}/{} pixels differ ({:.2}%), max_diff={}, mean_diff={:.4}",
            self.different_pixels,
            self.total_pixels,
            self.different_pixels as f64 / self.total_pixels as f64 * 100.0,
            self.max_channel_diff,
            self.mean_channel_diff,
        )?;
        if let Some(ref d) = self.first_diff {
            write!(
                f,
                "\n  First diff at ({}, {}): A={:?} B={:?}",
                d.x, d.y, d.pixel_a, d.pixel_b
            )?;
        }
        Ok(())
    }
}

fn channels(c: Color) -> [u8; 4] {
    [c.r, c.g, c.b, c.a]
}

fn ensure_same_size(a: &Bitmap, b: &Bitmap) -> Result<()> {
    ensure!(
        a.size() == b.size(),
        "size mismatch: {}x{} vs {}x{}",
        a.width(),
        a.height(),
        b.width(),
        b.height()
    );
    Ok(())
}

// ============================================================================
// Comparison
// ============================================================================

/// Compare two bitmaps pixel by pixel. They must have the same size.
pub fn compare_bitmaps(a: &Bitmap, b: &Bitmap) -> Result<CompareResult> {
    ensure_same_size(a, b)?;

    let mut different_pixels = 0u64;
    let mut max_channel_diff = 0u8;
    let mut diff_sum = 0u64;
    let mut diff_channels = 0u64;
    let mut first_diff = None;
    let mut diff_histogram = [0u64; 256];

    for y in 0..a.height() {
        for x in 0..a.width() {
            let p = IntPoint::new(x, y);
            let (pa, pb) = (a.get_pixel(p)?, b.get_pixel(p)?);
            if pa == pb {
                continue;
            }
            different_pixels += 1;
            for (ca, cb) in channels(pa).into_iter().zip(channels(pb)) {
                let d = ca.abs_diff(cb);
                if d > 0 {
                    max_channel_diff = max_channel_diff.max(d);
                    diff_sum += d as u64;
                    diff_channels += 1;
                    diff_histogram[d as usize] += 1;
                }
            }
            if first_diff.is_none() {
                first_diff = Some(DiffInfo {
                    x,
                    y,
                    pixel_a: pa,
                    pixel_b: pb,
                });
            }
        }
    }

    Ok(CompareResult {
        identical: different_pixels == 0,
        total_pixels: a.size().area() as u64,
        different_pixels,
        max_channel_diff,
        mean_channel_diff: if diff_channels > 0 {
            diff_sum as f64 / diff_channels as f64
        } else {
            0.0
        },
        first_diff,
        diff_histogram,
    })
}

/// Visual diff: identical pixels are dark gray, differing pixels red with
/// brightness proportional to the largest color channel difference (x10).
pub fn diff_image(a: &Bitmap, b: &Bitmap) -> Result<Bitmap> {
    ensure_same_size(a, b)?;
    let mut diff = Bitmap::with_color(a.size(), Color::rgb(40, 40, 40))?;
    for y in 0..a.height() {
        for x in 0..a.width() {
            let p = IntPoint::new(x, y);
            let (pa, pb) = (channels(a.get_pixel(p)?), channels(b.get_pixel(p)?));
            let max_diff = (0..3).map(|c| pa[c].abs_diff(pb[c])).max().unwrap_or(0);
            if max_diff > 0 {
                let v = (max_diff as u16 * 10).min(255) as u8;
                diff.put_pixel(p, Color::rgb(v, 0, 0));
            }
        }
    }
    Ok(diff)
}

/// Side-by-side image: `[A | diff | B]`.
pub fn side_by_side(a: &Bitmap, b: &Bitmap) -> Result<Bitmap> {
    let diff = diff_image(a, b)?;
    let w = a.width();
    let mut out = Bitmap::new(IntSize::new(w * 3, a.height()))?;
    blit(a, &mut out, IntPoint::new(0, 0));
    blit(&diff, &mut out, IntPoint::new(w, 0));
    blit(b, &mut out, IntPoint::new(w * 2, 0));
    Ok(out)
}

// ============================================================================
// Image file I/O
// ============================================================================

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Load an image, choosing the codec by file extension.
pub fn load_image(path: &Path) -> Result<Bitmap> {
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let bmp = match extension(path).as_deref() {
        Some("bmp") => codec_bmp::decode(&data)?,
        #[cfg(feature = "png")]
        Some("png") => bitmap_raster::codec_png::decode(&data)?,
        _ => bail!("unsupported image format: {}", path.display()),
    };
    log::debug!("loaded {} ({}x{})", path.display(), bmp.width(), bmp.height());
    Ok(bmp)
}

/// Save an image, choosing the codec by file extension.
pub fn save_image(path: &Path, bmp: &Bitmap) -> Result<()> {
    let data = match extension(path).as_deref() {
        Some("bmp") => codec_bmp::encode(bmp)?,
        #[cfg(feature = "png")]
        Some("png") => bitmap_raster::codec_png::encode(bmp)?,
        _ => bail!("unsupported image format: {}", path.display()),
    };
    fs::write(path, data).with_context(|| format!("writing {}", path.display()))
}
