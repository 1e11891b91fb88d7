//! Named reference scenes rendered with bitmap-raster.
//!
//! Each scene exercises one family of rasterizers so that a regression
//! shows up as a localized difference against a saved reference image.

use anyhow::Result;
use bitmap_raster::basics::{IntLineSegment, IntPoint, IntRect, IntSize, Point, Scale};
use bitmap_raster::bitmap::Bitmap;
use bitmap_raster::brush::{blend_stencil, circle_brush, stroke_polyline};
use bitmap_raster::color::{Color, ColorStop};
use bitmap_raster::compositing::{alpha_blended, blend, blit, blit_masked};
use bitmap_raster::ellipse::{draw_ellipse, fill_ellipse};
use bitmap_raster::flood_fill::{boundary_fill, flood_fill};
use bitmap_raster::line::{draw_line, draw_polyline};
use bitmap_raster::paint::{
    BorderSettings, LineCap, LineSettings, LinearGradient, Paint, Pattern, RadialGradient,
};
use bitmap_raster::polygon::{draw_polygon, fill_polygon, fill_triangle, rect};
use bitmap_raster::resample::{rotate, rotate_90cw, scale, ScaleQuality};

const RED: Color = Color::rgb(220, 40, 40);
const GREEN: Color = Color::rgb(40, 170, 60);
const BLUE: Color = Color::rgb(40, 60, 220);

/// Render a named scene. Returns `Ok(None)` for an unknown name.
pub fn render_scene(name: &str, width: i32, height: i32) -> Result<Option<Bitmap>> {
    let mut bmp = Bitmap::with_color(IntSize::new(width, height), Color::WHITE)?;
    match name {
        "lines" => lines(&mut bmp)?,
        "ellipses" => ellipses(&mut bmp)?,
        "polygons" => polygons(&mut bmp)?,
        "fills" => fills(&mut bmp)?,
        "compositing" => compositing(&mut bmp)?,
        "resample" => bmp = resample(&bmp)?,
        _ => return Ok(None),
    }
    Ok(Some(bmp))
}

/// All scene names accepted by [`render_scene`].
pub fn available_scenes() -> &'static [&'static str] {
    &["lines", "ellipses", "polygons", "fills", "compositing", "resample"]
}

fn sunset() -> Vec<ColorStop> {
    vec![
        ColorStop::new(0.0, Color::rgb(255, 200, 0)),
        ColorStop::new(0.5, RED),
        ColorStop::new(1.0, Color::rgb(60, 0, 90)),
    ]
}

fn checker(a: Color, b: Color) -> Result<Pattern> {
    let mut tile = Bitmap::with_color(IntSize::new(8, 8), a)?;
    for y in 0..8 {
        for x in 0..8 {
            if (x / 4 + y / 4) % 2 == 1 {
                tile.put_pixel(IntPoint::new(x, y), b);
            }
        }
    }
    Ok(Pattern::new(tile))
}

// ============================================================================
// Scenes
// ============================================================================

/// A fan of lines of growing width, alternating dashes and caps.
fn lines(bmp: &mut Bitmap) -> Result<()> {
    let (w, h) = (bmp.width(), bmp.height());
    let center = IntPoint::new(w / 2, h / 2);
    let radius = w.min(h) as f64 * 0.45;
    for i in 0..16 {
        let angle = i as f64 * std::f64::consts::PI / 8.0;
        let end = IntPoint::new(
            center.x + (radius * angle.cos()) as i32,
            center.y + (radius * angle.sin()) as i32,
        );
        let cap = if i % 2 == 0 { LineCap::Round } else { LineCap::Butt };
        let s = LineSettings::new(Color::BLACK, 1 + i / 3)
            .with_dashes(i % 4 == 3)
            .with_cap(cap);
        draw_line(bmp, &IntLineSegment::new(center, end), &s)?;
    }
    let zigzag: Vec<IntPoint> = (0..8).map(|i| IntPoint::new(10 + i * w / 9, 10 + (i % 2) * 20)).collect();
    draw_polyline(bmp, &zigzag, &LineSettings::new(BLUE, 5).with_cap(LineCap::Round))?;
    Ok(())
}

/// Thin, wide and dashed outlines plus color and gradient fills.
fn ellipses(bmp: &mut Bitmap) -> Result<()> {
    let (w, h) = (bmp.width(), bmp.height());
    let (cw, ch) = (w / 3, h / 2);
    let radial: Paint = RadialGradient::new(Point::new(0.5, 0.5), Point::new(0.5, 0.5), sunset()).into();
    let cells = [
        (Some(BorderSettings::new(Color::BLACK, 1)), None),
        (Some(BorderSettings::new(BLUE, 7)), None),
        (Some(BorderSettings::new(RED, 1).with_dashes(true)), None),
        (None, Some(Paint::Color(GREEN))),
        (None, Some(radial)),
        (Some(BorderSettings::new(Color::BLACK, 3)), Some(Paint::from(checker(Color::WHITE, BLUE)?))),
    ];
    for (i, (border, fill)) in cells.iter().enumerate() {
        let i = i as i32;
        let r = IntRect::new((i % 3) * cw + 4, (i / 3) * ch + 4, cw - 8, ch - 8);
        if let Some(fill) = fill {
            fill_ellipse(bmp, &r, fill)?;
        }
        if let Some(border) = border {
            draw_ellipse(bmp, &r, border)?;
        }
    }
    Ok(())
}

/// A concave star, a gradient triangle, a polygon outline and bordered rectangles.
fn polygons(bmp: &mut Bitmap) -> Result<()> {
    let (w, h) = (bmp.width(), bmp.height());
    let star: Vec<IntPoint> = (0..10)
        .map(|i| {
            let angle = i as f64 * std::f64::consts::PI / 5.0 - std::f64::consts::FRAC_PI_2;
            let radius = (if i % 2 == 0 { 0.22 } else { 0.09 }) * w.min(h) as f64;
            IntPoint::new(
                w / 4 + (radius * angle.cos()) as i32,
                h / 4 + (radius * angle.sin()) as i32,
            )
        })
        .collect();
    fill_polygon(bmp, &star, &Color::rgb(250, 180, 0).into())?;
    draw_polygon(bmp, &star, &BorderSettings::new(Color::BLACK, 3))?;

    let linear: Paint = LinearGradient::new(0.3, sunset()).into();
    fill_triangle(
        bmp,
        Point::new(w as f64 * 0.55, h as f64 * 0.05),
        Point::new(w as f64 * 0.95, h as f64 * 0.4),
        Point::new(w as f64 * 0.6, h as f64 * 0.45),
        &linear,
    )?;

    let border = BorderSettings::new(BLUE, 4);
    let dashed = BorderSettings::new(RED, 2).with_dashes(true);
    rect(bmp, &IntRect::new(10, h / 2 + 10, w / 3, h / 3), Some(&border), Some(&GREEN.into()))?;
    rect(bmp, &IntRect::new(w / 2, h / 2 + 10, w / 3, h / 3), Some(&dashed), None)?;
    Ok(())
}

/// Flood and boundary fills inside outlined shapes.
fn fills(bmp: &mut Bitmap) -> Result<()> {
    let (w, h) = (bmp.width(), bmp.height());
    let left = IntRect::new(8, 8, w / 2 - 16, h - 16);
    let right = IntRect::new(w / 2 + 8, 8, w / 2 - 16, h - 16);
    draw_ellipse(bmp, &left, &BorderSettings::new(Color::BLACK, 1))?;
    draw_ellipse(bmp, &right, &BorderSettings::new(Color::BLACK, 1))?;

    // Obstacles inside the right shape which the boundary fill paints over.
    let inner = IntRect::new(right.x + right.w / 3, right.y + right.h / 3, right.w / 3, right.h / 3);
    fill_ellipse(bmp, &inner, &RED.into())?;

    let center = |r: &IntRect| IntPoint::new(r.x + r.w / 2, r.y + r.h / 2);
    flood_fill(bmp, center(&left), &checker(GREEN, Color::WHITE)?.into())?;
    flood_fill(bmp, IntPoint::new(0, 0), &Color::rgb(230, 230, 250).into())?;
    let linear: Paint = LinearGradient::new(1.2, sunset()).into();
    boundary_fill(bmp, center(&right), &linear, Color::BLACK)?;
    Ok(())
}

/// Translucent layers, a masked blit, brush stencils and a brush stroke.
fn compositing(bmp: &mut Bitmap) -> Result<()> {
    let (w, h) = (bmp.width(), bmp.height());
    bmp.clear_paint(&checker(Color::rgb(200, 200, 200), Color::WHITE)?.into())?;

    let mut layer = Bitmap::with_color(IntSize::new(w / 2, h / 2), Color::TRANSPARENT)?;
    let r = layer.rect();
    fill_ellipse(&mut layer, &r, &BLUE.with_alpha(140).into())?;
    blend(&layer, bmp, IntPoint::new(w / 8, h / 8));
    blend(&layer, bmp, IntPoint::new(w / 3, h / 3));

    // Flattened onto white, then blitted with white as the mask color.
    let mut sprite = Bitmap::with_color(IntSize::new(w / 4, h / 4), Color::TRANSPARENT)?;
    let r = sprite.rect();
    fill_ellipse(&mut sprite, &r, &RED.into())?;
    let sprite = alpha_blended(&sprite, Color::WHITE)?;
    blit_masked(&sprite, bmp, Color::WHITE, IntPoint::new(w * 2 / 3, h / 10));

    let brush = circle_brush(w.min(h) / 8)?;
    let stamp: Paint = LinearGradient::new(0.0, sunset()).into();
    for i in 0..5 {
        let at = IntPoint::new(10 + i * w / 5, h - brush.height() - 10);
        blend_stencil(bmp, &brush, at, &stamp)?;
    }

    let pen = circle_brush(5)?;
    let path = [
        IntPoint::new(w / 10, h / 2),
        IntPoint::new(w / 2, h / 3),
        IntPoint::new(w * 9 / 10, h / 2),
    ];
    stroke_polyline(bmp, &path, &pen, &GREEN.into())?;
    Ok(())
}

/// A small gradient tile enlarged with both filters, one copy turned a
/// quarter and one tilted.
fn resample(canvas: &Bitmap) -> Result<Bitmap> {
    let (w, h) = (canvas.width(), canvas.height());
    let mut out = canvas.clone();

    let mut tile = Bitmap::with_color(IntSize::new(24, 16), Color::WHITE)?;
    let r = tile.rect();
    fill_ellipse(&mut tile, &r, &LinearGradient::new(0.7, sunset()).into())?;
    draw_line(
        &mut tile,
        &IntLineSegment::new(IntPoint::new(0, 15), IntPoint::new(23, 0)),
        &LineSettings::new(Color::BLACK, 1),
    )?;

    let factor = Scale::uniform((w / 2) as f64 / tile.width() as f64);
    let nearest = scale(&tile, factor, ScaleQuality::Nearest)?;
    let bilinear = scale(&tile, factor, ScaleQuality::Bilinear)?;
    let mirrored = scale(&tile, Scale::new(-factor.x, factor.y), ScaleQuality::Bilinear)?;
    blit(&nearest, &mut out, IntPoint::new(0, 0));
    blit(&bilinear, &mut out, IntPoint::new(w / 2, 0));
    blit(&rotate_90cw(&mirrored)?, &mut out, IntPoint::new(0, h / 2));
    let tilted = rotate(&bilinear, 0.5, Color::TRANSPARENT)?;
    blend(&tilted, &mut out, IntPoint::new(w / 2, h / 2));
    Ok(out)
}
