//! Thin and wide Bresenham lines with dashes and caps.
//!
//! Thin lines (width 0 or 1) step the major axis with an integer error
//! term. Wide lines sweep a band: for every step of the center line a short
//! perpendicular Bresenham line is drawn, its start tracking the center line
//! and its far end clipped by a boundary line that steps the same way, so
//! both long edges of the band stay straight.

use crate::basics::{IntLineSegment, IntPoint, IntRect};
use crate::bitmap::Bitmap;
use crate::color::Color;
use crate::color_source::{dispatch_paint, ColorSource, FromColor};
use crate::ellipse::fill_ellipse_with;
use crate::error::Result;
use crate::paint::{LineCap, LineSettings};

/// The geometric part of [`LineSettings`], without the paint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineStyle {
    pub width: i32,
    pub dashed: bool,
    pub cap: LineCap,
}

impl LineStyle {
    pub fn new(width: i32, dashed: bool, cap: LineCap) -> Self {
        Self { width, dashed, cap }
    }

    pub fn with_cap(self, cap: LineCap) -> Self {
        Self { cap, ..self }
    }
}

impl From<&LineSettings> for LineStyle {
    fn from(s: &LineSettings) -> Self {
        Self::new(s.width, s.dashed, s.cap)
    }
}

// ============================================================================
// Public entry points
// ============================================================================

/// Draw a line segment with the settings' paint, width, dashing and cap.
///
/// A gradient paint is rendered over the segment's bounding rectangle grown
/// by the line width.
pub fn draw_line(bmp: &mut Bitmap, line: &IntLineSegment, s: &LineSettings) -> Result<()> {
    let rect = line.bounding_rect().inflated(s.width);
    let style = LineStyle::from(s);
    dispatch_paint!(&s.paint, rect, bmp.rect(), |src| {
        draw_line_with(bmp, &src, line, style);
    });
    Ok(())
}

/// Draw a solid colored line.
pub fn draw_line_color(bmp: &mut Bitmap, line: &IntLineSegment, color: Color, style: LineStyle) {
    draw_line_with(bmp, &FromColor::new(color), line, style);
}

/// Draw connected segments. Interior vertices get round joins; the ends get
/// round caps if the settings ask for them.
pub fn draw_polyline(bmp: &mut Bitmap, points: &[IntPoint], s: &LineSettings) -> Result<()> {
    let rect = crate::basics::bounding_rect(points).inflated(s.width);
    let style = LineStyle::from(s);
    dispatch_paint!(&s.paint, rect, bmp.rect(), |src| {
        draw_polyline_with(bmp, &src, points, style);
    });
    Ok(())
}

// ============================================================================
// Generic rasterizers
// ============================================================================

pub fn draw_line_with<S: ColorSource>(
    bmp: &mut Bitmap,
    src: &S,
    line: &IntLineSegment,
    style: LineStyle,
) {
    if style.width.max(1) > 1 {
        draw_wide_line(bmp, src, line, style);
    } else {
        draw_thin_line(bmp, src, line, style.dashed);
    }
}

pub fn draw_polyline_with<S: ColorSource>(
    bmp: &mut Bitmap,
    src: &S,
    points: &[IntPoint],
    style: LineStyle,
) {
    let Some((&first, rest)) = points.split_first() else {
        return;
    };
    if rest.is_empty() {
        draw_line_with(bmp, src, &IntLineSegment::new(first, first), style);
        return;
    }
    let segment_style = style.with_cap(LineCap::Butt);
    for (i, pair) in points.windows(2).enumerate() {
        draw_line_with(
            bmp,
            src,
            &IntLineSegment::new(pair[0], pair[1]),
            segment_style,
        );
        if i + 2 != points.len() {
            line_circle(bmp, src, pair[1], style.width);
        }
    }
    if style.cap == LineCap::Round {
        line_circle(bmp, src, first, style.width);
        if let Some(&last) = points.last() {
            line_circle(bmp, src, last, style.width);
        }
    }
}

/// Filled circle of diameter `width` centered on `p`, used for round caps
/// and joins.
pub(crate) fn line_circle<S: ColorSource>(bmp: &mut Bitmap, src: &S, p: IntPoint, width: i32) {
    let half = (width - 1) / 2;
    let e = IntPoint::new(half, half);
    fill_ellipse_with(bmp, src, &IntRect::from_corners(p - e, p + e));
}

/// Whether step `step` of a dashed walk is drawn. Dashes alternate on and
/// off runs of `run` steps, starting "on".
#[inline]
fn dash_on(dashed: bool, run: i32, step: i64) -> bool {
    !dashed || (step / run.max(1) as i64) % 2 == 0
}

/// Normalize so the major axis is x and x0 <= x1. Returns the endpoints in
/// that frame and whether x and y were swapped.
fn normalize(line: &IntLineSegment) -> (i32, i32, i32, i32, bool) {
    let (mut x0, mut y0, mut x1, mut y1) = (line.p0.x, line.p0.y, line.p1.x, line.p1.y);
    let steep = (y1 as i64 - y0 as i64).abs() > (x1 as i64 - x0 as i64).abs();
    if steep {
        std::mem::swap(&mut x0, &mut y0);
        std::mem::swap(&mut x1, &mut y1);
    }
    if x0 > x1 {
        std::mem::swap(&mut x0, &mut x1);
        std::mem::swap(&mut y0, &mut y1);
    }
    (x0, y0, x1, y1, steep)
}

/// Walk the thin Bresenham path of `line`, calling `visit` with each pixel
/// and its step index along the major axis.
///
/// Only steps whose major coordinate lies within `bounds` are visited; the
/// error term is advanced past the skipped steps in closed form, so the
/// cost follows the visible part of the line, not its length.
pub(crate) fn walk_line(line: &IntLineSegment, bounds: &IntRect, mut visit: impl FnMut(IntPoint, i64)) {
    let (x0, y0, x1, y1, steep) = normalize(line);
    let (lo, hi) = if steep {
        (bounds.top(), bounds.bottom())
    } else {
        (bounds.left(), bounds.right())
    };
    let (x0, x1) = (x0 as i64, x1 as i64);
    let start = x0.max(lo as i64);
    let end = x1.min(hi as i64);
    if start > end {
        return;
    }
    let dx = x1 - x0;
    let dy = (y1 as i64 - y0 as i64).abs();
    let y_step = if y0 < y1 { 1 } else { -1 };

    // Minor steps taken before `start`: the smallest n with
    // 2 * (skipped * dy - n * dx) <= dx.
    let skipped = start - x0;
    let n = if dx == 0 {
        0
    } else {
        let num = 2 * skipped as i128 * dy as i128 - dx as i128;
        (-((-num).div_euclid(2 * dx as i128))).max(0) as i64
    };
    let mut err = (skipped as i128 * dy as i128 - n as i128 * dx as i128) as i64;
    let mut y = y0 as i64 + n * y_step;

    for x in start..=end {
        err += dy;
        let p = if steep {
            IntPoint::new(y as i32, x as i32)
        } else {
            IntPoint::new(x as i32, y as i32)
        };
        visit(p, x - x0);
        if 2 * err > dx {
            y += y_step;
            err -= dx;
        }
    }
}

fn draw_thin_line<S: ColorSource>(bmp: &mut Bitmap, src: &S, line: &IntLineSegment, dashed: bool) {
    let clip = bmp.rect();
    walk_line(line, &clip, |p, step| {
        if dash_on(dashed, 2, step) {
            src.apply(bmp, p.x, p.y);
        }
    });
}

/// End of the perpendicular walk of `width` pixels, measured in steps along
/// the normalized frame. Diagonal steps count as sqrt(2).
fn band_offset(dx: i32, dy: i32, y_step: i32, width: i32) -> IntPoint {
    let mut p = 2 * dy - dx;
    let mut at = IntPoint::default();
    let mut yp = 0;
    let mut distance = 0.0;
    for xp in 0..width {
        at = IntPoint::new(-yp, -xp);
        if p < 0 {
            p += 2 * dy;
            distance += 1.0;
        } else {
            yp += y_step;
            p += 2 * dy - 2 * dx;
            distance += std::f64::consts::SQRT_2;
        }
        if distance >= width as f64 {
            break;
        }
    }
    at
}

fn draw_wide_line<S: ColorSource>(
    bmp: &mut Bitmap,
    src: &S,
    line: &IntLineSegment,
    style: LineStyle,
) {
    let width = style.width;
    let (x0, y0, x1, y1, steep) = normalize(line);
    let dx = x1 - x0;
    let dy = (y1 - y0).abs();
    let y_step = if y0 < y1 { -1 } else { 1 };

    let plot = |bmp: &mut Bitmap, x: i32, y: i32| {
        if steep {
            src.apply(bmp, y, x);
        } else {
            src.apply(bmp, x, y);
        }
    };

    if dx != 0 {
        // Error terms: center line, the parallel lines' start, the boundary.
        let mut p = 2 * dy - dx;
        let mut pp_start = p;
        let pt = band_offset(dx, dy, y_step, width);
        let mut x_min = x0 + pt.x * y_step;
        let mut y_min = y0 + pt.y * y_step;
        let mut p_bound = p;
        let (shift_x, shift_y) = (y_step * pt.x / 2, y_step * pt.y / 2);

        let mut x_off = 0;
        let mut y = 0;
        let mut i = 0;
        while i - 1 < dx - x_off {
            let on = dash_on(style.dashed, width * 2, i as i64);
            let mut pp = pp_start;
            let mut yp = 0;
            let x_start = x0 + i + x_off;
            let y_start = y0 - y;
            let mut at_x;
            let mut at_y;
            let mut xp = 0;
            loop {
                at_x = x_start - yp * y_step;
                at_y = y_start - xp * y_step;
                if at_x < x_min {
                    break;
                }
                if on {
                    plot(bmp, at_x - shift_x, at_y - shift_y);
                }
                if (y_step == 1 && at_y <= y_min) || (y_step == -1 && at_y >= y_min) {
                    break;
                }
                if pp < 0 {
                    pp += 2 * dy;
                } else {
                    yp += y_step;
                    pp += 2 * dy - 2 * dx;
                }
                xp += 1;
            }

            if at_x == x_min && at_y == y_min {
                x_min += 1;
                if p_bound < 0 {
                    p_bound += 2 * dy;
                } else {
                    y_min -= y_step;
                    p_bound += 2 * dy - 2 * dx;
                }
            }

            if p < 0 {
                p += 2 * dy;
            } else {
                y += y_step;
                p += 2 * dy - 2 * dx;
                if pp_start < 0 {
                    pp_start += 2 * dy;
                } else {
                    pp_start += 2 * dy - 2 * dx;
                    p -= 2 * dy;
                    x_off -= 1;
                }
            }
            i += 1;
        }
    } else {
        log::debug!("zero-length wide line at ({}, {})", line.p0.x, line.p0.y);
    }

    if style.cap == LineCap::Round {
        line_circle(bmp, src, line.p0, width);
        line_circle(bmp, src, line.p1, width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basics::IntSize;

    fn canvas(w: i32, h: i32) -> Bitmap {
        Bitmap::with_color(IntSize::new(w, h), Color::WHITE).unwrap()
    }

    fn seg(x0: i32, y0: i32, x1: i32, y1: i32) -> IntLineSegment {
        IntLineSegment::new(IntPoint::new(x0, y0), IntPoint::new(x1, y1))
    }

    fn is_black(b: &Bitmap, x: i32, y: i32) -> bool {
        b.get_pixel(IntPoint::new(x, y)).unwrap() == Color::BLACK
    }

    fn count_black(b: &Bitmap) -> usize {
        b.pixels().filter(|c| *c == Color::BLACK).count()
    }

    fn thin() -> LineStyle {
        LineStyle::new(1, false, LineCap::Butt)
    }

    #[test]
    fn test_thin_horizontal() {
        let mut bmp = canvas(4, 4);
        draw_line_color(&mut bmp, &seg(0, 0, 3, 0), Color::BLACK, thin());
        for x in 0..4 {
            assert!(is_black(&bmp, x, 0));
        }
        assert_eq!(count_black(&bmp), 4);
    }

    #[test]
    fn test_thin_steep_reversed() {
        let mut bmp = canvas(5, 5);
        draw_line_color(&mut bmp, &seg(2, 4, 2, 0), Color::BLACK, thin());
        for y in 0..5 {
            assert!(is_black(&bmp, 2, y));
        }
        assert_eq!(count_black(&bmp), 5);
    }

    #[test]
    fn test_thin_diagonal_one_pixel_per_column() {
        let mut bmp = canvas(8, 8);
        draw_line_color(&mut bmp, &seg(0, 0, 7, 3), Color::BLACK, thin());
        for x in 0..8 {
            let n = (0..8).filter(|&y| is_black(&bmp, x, y)).count();
            assert_eq!(n, 1, "column {}", x);
        }
        assert!(is_black(&bmp, 0, 0));
        assert!(is_black(&bmp, 7, 3));
    }

    #[test]
    fn test_zero_length_thin_is_one_pixel() {
        for w in [0, 1] {
            let mut bmp = canvas(5, 5);
            let style = LineStyle::new(w, false, LineCap::Butt);
            draw_line_color(&mut bmp, &seg(2, 3, 2, 3), Color::BLACK, style);
            assert_eq!(count_black(&bmp), 1);
            assert!(is_black(&bmp, 2, 3));
        }
    }

    #[test]
    fn test_thin_dashes_two_on_two_off() {
        let mut bmp = canvas(10, 1);
        let style = LineStyle::new(1, true, LineCap::Butt);
        draw_line_color(&mut bmp, &seg(0, 0, 9, 0), Color::BLACK, style);
        let drawn: Vec<bool> = (0..10).map(|x| is_black(&bmp, x, 0)).collect();
        assert_eq!(
            drawn,
            vec![true, true, false, false, true, true, false, false, true, true]
        );
    }

    #[test]
    fn test_wide_horizontal_band() {
        let mut bmp = canvas(14, 12);
        let style = LineStyle::new(3, false, LineCap::Butt);
        draw_line_color(&mut bmp, &seg(1, 5, 11, 5), Color::BLACK, style);
        for x in 1..=11 {
            for y in 4..=6 {
                assert!(is_black(&bmp, x, y), "({}, {})", x, y);
            }
        }
        assert_eq!(count_black(&bmp), 11 * 3);
    }

    #[test]
    fn test_wide_vertical_band() {
        let mut bmp = canvas(12, 14);
        let style = LineStyle::new(3, false, LineCap::Butt);
        draw_line_color(&mut bmp, &seg(5, 1, 5, 11), Color::BLACK, style);
        for y in 1..=11 {
            for x in 4..=6 {
                assert!(is_black(&bmp, x, y), "({}, {})", x, y);
            }
        }
        assert_eq!(count_black(&bmp), 11 * 3);
    }

    #[test]
    fn test_wide_diagonal_covers_center() {
        let mut bmp = canvas(30, 30);
        let style = LineStyle::new(5, false, LineCap::Butt);
        draw_line_color(&mut bmp, &seg(5, 5, 24, 24), Color::BLACK, style);
        for t in 7..=22 {
            assert!(is_black(&bmp, t, t), "center ({}, {})", t, t);
        }
        assert!(!is_black(&bmp, 24, 5));
        assert!(!is_black(&bmp, 5, 24));
        // Clearly wider than a thin line.
        assert!(count_black(&bmp) > 20 * 3);
    }

    #[test]
    fn test_wide_zero_length_butt_draws_nothing() {
        let mut bmp = canvas(9, 9);
        let style = LineStyle::new(5, false, LineCap::Butt);
        draw_line_color(&mut bmp, &seg(4, 4, 4, 4), Color::BLACK, style);
        assert_eq!(count_black(&bmp), 0);
    }

    #[test]
    fn test_wide_zero_length_round_is_dot() {
        let mut bmp = canvas(9, 9);
        let style = LineStyle::new(5, false, LineCap::Round);
        draw_line_color(&mut bmp, &seg(4, 4, 4, 4), Color::BLACK, style);
        assert!(is_black(&bmp, 4, 4));
        assert!(is_black(&bmp, 2, 4));
        assert!(is_black(&bmp, 6, 4));
        assert!(is_black(&bmp, 4, 2));
        assert!(!is_black(&bmp, 0, 0));
        assert!(count_black(&bmp) > 9);
    }

    #[test]
    fn test_round_cap_extends_past_endpoint() {
        let mut butt = canvas(20, 12);
        let mut round = canvas(20, 12);
        let s = LineStyle::new(5, false, LineCap::Butt);
        draw_line_color(&mut butt, &seg(5, 5, 14, 5), Color::BLACK, s);
        draw_line_color(&mut round, &seg(5, 5, 14, 5), Color::BLACK, s.with_cap(LineCap::Round));
        assert!(!is_black(&butt, 3, 5));
        assert!(is_black(&round, 3, 5));
        assert!(is_black(&round, 16, 5));
    }

    #[test]
    fn test_wide_dashes_leave_gaps() {
        let mut bmp = canvas(30, 8);
        let style = LineStyle::new(3, true, LineCap::Butt);
        draw_line_color(&mut bmp, &seg(0, 4, 29, 4), Color::BLACK, style);
        // Runs of twice the width: 6 on, 6 off.
        let row: Vec<bool> = (0..30).map(|x| is_black(&bmp, x, 4)).collect();
        assert!(row[0..6].iter().all(|&b| b));
        assert!(row[6..12].iter().all(|&b| !b));
        assert!(row[12..18].iter().all(|&b| b));
    }

    #[test]
    fn test_clipped_offscreen() {
        let mut bmp = canvas(4, 4);
        draw_line_color(&mut bmp, &seg(-10, 1, 10, 1), Color::BLACK, thin());
        assert_eq!(count_black(&bmp), 4);
        let style = LineStyle::new(7, false, LineCap::Round);
        draw_line_color(&mut bmp, &seg(-50, -50, 60, -40), Color::BLACK, style);
        assert_eq!(count_black(&bmp), 4);
    }

    #[test]
    fn test_thin_clipped_far_offscreen() {
        let mut bmp = canvas(10, 10);
        draw_line_color(&mut bmp, &seg(-300_000, -300_000, 300_000, 300_000), Color::BLACK, thin());
        for t in 0..10 {
            assert!(is_black(&bmp, t, t), "({}, {})", t, t);
        }
        assert_eq!(count_black(&bmp), 10);

        let mut extreme = canvas(10, 10);
        draw_line_color(&mut extreme, &seg(i32::MIN, 5, i32::MAX, 5), Color::BLACK, thin());
        assert_eq!(count_black(&extreme), 10);
    }

    #[test]
    fn test_clipped_walk_matches_full_walk() {
        // A shallow line entering the bounds partway: skipping ahead must
        // land on the same pixels as stepping through.
        let line = seg(-37, -5, 40, 19);
        let mut full = Vec::new();
        walk_line(&line, &IntRect::new(-100, -100, 200, 200), |p, step| full.push((p, step)));
        let bounds = IntRect::new(0, 0, 12, 30);
        let mut clipped = Vec::new();
        walk_line(&line, &bounds, |p, step| clipped.push((p, step)));
        let expected: Vec<_> = full.into_iter().filter(|(p, _)| (0..12).contains(&p.x)).collect();
        assert_eq!(clipped, expected);
        assert_eq!(clipped.len(), 12);
    }

    #[test]
    fn test_dashes_continue_into_clip() {
        let mut bmp = canvas(6, 1);
        let style = LineStyle::new(1, true, LineCap::Butt);
        draw_line_color(&mut bmp, &seg(-3, 0, 5, 0), Color::BLACK, style);
        // Steps from x = -3: on on off off on on off off on.
        let drawn: Vec<bool> = (0..6).map(|x| is_black(&bmp, x, 0)).collect();
        assert_eq!(drawn, vec![false, true, true, false, false, true]);
    }

    #[test]
    fn test_gradient_line_far_offscreen() {
        use crate::color::ColorStop;
        use crate::paint::LinearGradient;
        let g = LinearGradient::new(
            0.0,
            vec![ColorStop::new(0.0, Color::BLACK), ColorStop::new(1.0, Color::WHITE)],
        );
        let s = LineSettings::new(g, 1);
        let mut bmp = canvas(10, 10);
        draw_line(&mut bmp, &seg(-300_000, -300_000, 300_000, 300_000), &s).unwrap();
        // The canvas sits at the middle of the gradient, which blends to gray.
        let c = bmp.get_pixel(IntPoint::new(5, 5)).unwrap();
        assert!(c.r > 100 && c.r < 160, "{:?}", c);
        assert_eq!(bmp.get_pixel(IntPoint::new(5, 4)).unwrap(), Color::WHITE);
    }

    #[test]
    fn test_polyline_joins() {
        let mut bmp = canvas(20, 20);
        let pts = [
            IntPoint::new(2, 2),
            IntPoint::new(15, 2),
            IntPoint::new(15, 15),
        ];
        let s = LineSettings::new(Color::BLACK, 1);
        draw_polyline(&mut bmp, &pts, &s).unwrap();
        assert!(is_black(&bmp, 2, 2));
        assert!(is_black(&bmp, 15, 2));
        assert!(is_black(&bmp, 15, 15));
        assert!(is_black(&bmp, 15, 8));
        assert!(!is_black(&bmp, 2, 15));
    }

    #[test]
    fn test_polyline_single_point() {
        let mut bmp = canvas(5, 5);
        draw_polyline(&mut bmp, &[IntPoint::new(1, 1)], &LineSettings::new(Color::BLACK, 1))
            .unwrap();
        assert_eq!(count_black(&bmp), 1);
        draw_polyline(&mut bmp, &[], &LineSettings::new(Color::BLACK, 1)).unwrap();
        assert_eq!(count_black(&bmp), 1);
    }

    #[test]
    fn test_draw_line_with_pattern_paint() {
        use crate::paint::Pattern;
        let tile = Bitmap::with_color(IntSize::new(2, 2), Color::rgb(255, 0, 0)).unwrap();
        let s = LineSettings::new(Pattern::new(tile), 1);
        let mut bmp = canvas(4, 1);
        draw_line(&mut bmp, &seg(0, 0, 3, 0), &s).unwrap();
        assert!(bmp.pixels().all(|c| c == Color::rgb(255, 0, 0)));
    }
}
