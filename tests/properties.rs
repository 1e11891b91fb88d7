//! Behavioural properties of the rasterizers checked through the public API.

use bitmap_raster::basics::{IntLineSegment, IntPoint, IntRect, IntSize, Scale};
use bitmap_raster::bitmap::Bitmap;
use bitmap_raster::color::Color;
use bitmap_raster::compositing::blend;
use bitmap_raster::ellipse::{draw_ellipse, fill_ellipse_color};
use bitmap_raster::flood_fill::flood_fill;
use bitmap_raster::line::draw_line;
use bitmap_raster::paint::{BorderSettings, LineSettings, Paint, Pattern};
use bitmap_raster::polygon::fill_polygon;
use bitmap_raster::resample::{scale_bilinear, scale_nearest};

const RED: Color = Color::rgb(255, 0, 0);
const BLUE: Color = Color::rgb(0, 0, 255);

fn px(b: &Bitmap, x: i32, y: i32) -> Color {
    b.get_pixel(IntPoint::new(x, y)).unwrap()
}

/// Deterministic noise so the resampling checks see varied channels.
fn noisy(w: i32, h: i32) -> Bitmap {
    let mut b = Bitmap::new(IntSize::new(w, h)).unwrap();
    let mut state: u32 = 0x2545_f491;
    for y in 0..h {
        for x in 0..w {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let [r, g, bl, a] = state.to_le_bytes();
            b.put_pixel(IntPoint::new(x, y), Color::new(r, g, bl, a));
        }
    }
    b
}

// ============================================================================
// Pixel access
// ============================================================================

#[test]
fn test_put_get_round_trip() {
    let mut b = Bitmap::with_color(IntSize::new(7, 5), Color::WHITE).unwrap();
    for y in 0..5 {
        for x in 0..7 {
            let c = Color::new(x as u8 * 30, y as u8 * 50, (x * y) as u8, 255 - x as u8);
            b.put_pixel(IntPoint::new(x, y), c);
            assert_eq!(px(&b, x, y), c);
        }
    }
}

// ============================================================================
// Lines
// ============================================================================

#[test]
fn test_degenerate_line_sets_one_pixel() {
    let mut b = Bitmap::with_color(IntSize::new(9, 9), Color::WHITE).unwrap();
    let p = IntPoint::new(4, 6);
    draw_line(&mut b, &IntLineSegment::new(p, p), &LineSettings::new(Color::BLACK, 1)).unwrap();
    assert_eq!(b.pixels().filter(|&c| c == Color::BLACK).count(), 1);
    assert_eq!(px(&b, 4, 6), Color::BLACK);
}

#[test]
fn test_horizontal_line_on_white() {
    let mut b = Bitmap::with_color(IntSize::new(4, 4), Color::WHITE).unwrap();
    let line = IntLineSegment::new(IntPoint::new(0, 0), IntPoint::new(3, 0));
    draw_line(&mut b, &line, &LineSettings::new(Color::BLACK, 1)).unwrap();
    for y in 0..4 {
        for x in 0..4 {
            let want = if y == 0 { Color::BLACK } else { Color::WHITE };
            assert_eq!(px(&b, x, y), want, "({}, {})", x, y);
        }
    }
}

// ============================================================================
// Resampling
// ============================================================================

#[test]
fn test_scale_identity() {
    let src = noisy(13, 6);
    assert_eq!(scale_nearest(&src, Scale::uniform(1.0)).unwrap(), src);
    assert_eq!(scale_bilinear(&src, Scale::uniform(1.0)).unwrap(), src);
}

#[test]
fn test_bilinear_output_within_neighbors() {
    let src = noisy(7, 5);
    let dst = scale_bilinear(&src, Scale::new(2.5, 1.7)).unwrap();
    assert_ne!(dst.size(), src.size());

    let x_ratio = (src.width() - 1) as f64 / dst.width() as f64;
    let y_ratio = (src.height() - 1) as f64 / dst.height() as f64;
    let channels = |c: Color| [c.r, c.g, c.b, c.a];
    for y in 0..dst.height() {
        let sy = (y_ratio * y as f64) as i32;
        for x in 0..dst.width() {
            let sx = (x_ratio * x as f64) as i32;
            let neighbors: Vec<[u8; 4]> = [(sx, sy), (sx + 1, sy), (sx, sy + 1), (sx + 1, sy + 1)]
                .iter()
                .map(|&(nx, ny)| {
                    channels(px(&src, nx.min(src.width() - 1), ny.min(src.height() - 1)))
                })
                .collect();
            let out = channels(px(&dst, x, y));
            for i in 0..4 {
                let lo = neighbors.iter().map(|n| n[i]).min().unwrap();
                let hi = neighbors.iter().map(|n| n[i]).max().unwrap();
                assert!(
                    (lo..=hi).contains(&out[i]),
                    "({}, {}) channel {}: {} not in {}..={}",
                    x,
                    y,
                    i,
                    out[i],
                    lo,
                    hi
                );
            }
        }
    }
}

// ============================================================================
// Ellipses and polygons
// ============================================================================

#[test]
fn test_filled_ellipse_mirror_symmetric() {
    for r in [IntRect::new(3, 2, 13, 9), IntRect::new(1, 1, 12, 8)] {
        let mut b = Bitmap::with_color(IntSize::new(18, 12), Color::WHITE).unwrap();
        fill_ellipse_color(&mut b, &r, Color::BLACK);
        for y in r.top()..=r.bottom() {
            for x in r.left()..=r.right() {
                let here = px(&b, x, y);
                assert_eq!(here, px(&b, r.left() + r.right() - x, y), "{:?} ({}, {})", r, x, y);
                assert_eq!(here, px(&b, x, r.top() + r.bottom() - y), "{:?} ({}, {})", r, x, y);
            }
        }
    }
}

#[test]
fn test_polygon_even_odd_convex_and_concave() {
    let fill = Paint::Color(Color::BLACK);

    let mut b = Bitmap::with_color(IntSize::new(30, 30), Color::WHITE).unwrap();
    let diamond: Vec<IntPoint> = [(10, 0), (20, 10), (10, 20), (0, 10)]
        .iter()
        .map(|&p| p.into())
        .collect();
    fill_polygon(&mut b, &diamond, &fill).unwrap();
    for (x, y) in [(10, 10), (6, 10), (14, 10), (10, 4), (10, 16)] {
        assert_eq!(px(&b, x, y), Color::BLACK, "inside ({}, {})", x, y);
    }
    for (x, y) in [(2, 2), (18, 18), (25, 10), (10, 25)] {
        assert_eq!(px(&b, x, y), Color::WHITE, "outside ({}, {})", x, y);
    }

    let mut b = Bitmap::with_color(IntSize::new(16, 16), Color::WHITE).unwrap();
    let ell: Vec<IntPoint> = [(0, 0), (10, 0), (10, 4), (4, 4), (4, 10), (0, 10)]
        .iter()
        .map(|&p| p.into())
        .collect();
    fill_polygon(&mut b, &ell, &fill).unwrap();
    for (x, y) in [(2, 2), (8, 2), (2, 8)] {
        assert_eq!(px(&b, x, y), Color::BLACK, "inside ({}, {})", x, y);
    }
    for (x, y) in [(7, 7), (12, 2), (2, 12), (9, 9)] {
        assert_eq!(px(&b, x, y), Color::WHITE, "outside ({}, {})", x, y);
    }
}

// ============================================================================
// Flood fill
// ============================================================================

#[test]
fn test_uniform_flood_fill() {
    let mut b = Bitmap::with_color(IntSize::new(10, 10), RED).unwrap();
    flood_fill(&mut b, IntPoint::new(5, 5), &BLUE.into()).unwrap();
    assert!(b.pixels().all(|c| c == BLUE));
}

#[test]
fn test_flood_fill_idempotent() {
    let mut b = Bitmap::with_color(IntSize::new(24, 20), Color::WHITE).unwrap();
    draw_ellipse(&mut b, &IntRect::new(2, 2, 18, 14), &BorderSettings::new(Color::BLACK, 1)).unwrap();

    let mut tile = Bitmap::with_color(IntSize::new(2, 2), RED).unwrap();
    tile.put_pixel(IntPoint::new(1, 1), BLUE);
    for paint in [Paint::Color(BLUE), Pattern::new(tile).into()] {
        let mut once = b.clone();
        flood_fill(&mut once, IntPoint::new(11, 9), &paint).unwrap();
        assert_ne!(once, b);
        let mut twice = once.clone();
        flood_fill(&mut twice, IntPoint::new(11, 9), &paint).unwrap();
        assert_eq!(twice, once);
    }

    // Filling with the color already there changes nothing.
    let mut same = b.clone();
    flood_fill(&mut same, IntPoint::new(11, 9), &Color::WHITE.into()).unwrap();
    assert_eq!(same, b);
}

// ============================================================================
// Compositing
// ============================================================================

#[test]
fn test_blend_transparent_source_keeps_destination() {
    let src = Bitmap::with_color(IntSize::new(2, 2), Color::new(200, 10, 30, 0)).unwrap();
    let before = Bitmap::with_color(IntSize::new(2, 2), Color::new(1, 2, 3, 77)).unwrap();
    let mut dst = before.clone();
    blend(&src, &mut dst, IntPoint::new(0, 0));
    assert_eq!(dst, before);
}
