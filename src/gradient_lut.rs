//! Gradient color lookup table.
//!
//! Maps a gradient parameter `t` in [0, 1] to a color through a 256-entry
//! table built once from the color stops, so per-pixel gradient evaluation is
//! a multiply and an index.

use crate::color::{Color, ColorStop};

pub const LUT_SIZE: usize = 256;

/// Color lookup table over the stops of one gradient.
#[derive(Debug, Clone)]
pub struct GradientLut {
    colors: Vec<Color>,
}

impl GradientLut {
    /// Build the table from stops in any order.
    ///
    /// Stops are sorted by offset on a local copy; stops at the same offset
    /// keep their given order, giving a hard edge. No stops yields a fully
    /// transparent table, one stop a solid table.
    pub fn new(stops: &[ColorStop]) -> Self {
        let mut profile: Vec<ColorStop> = stops
            .iter()
            .map(|s| ColorStop::new(s.offset, s.color))
            .collect();
        profile.sort_by(|a, b| a.offset.total_cmp(&b.offset));

        let colors = match profile.as_slice() {
            [] => vec![Color::TRANSPARENT; LUT_SIZE],
            [only] => vec![only.color; LUT_SIZE],
            _ => (0..LUT_SIZE)
                .map(|i| Self::interpolate(&profile, i as f64 / (LUT_SIZE - 1) as f64))
                .collect(),
        };
        Self { colors }
    }

    fn interpolate(profile: &[ColorStop], t: f64) -> Color {
        let first = profile[0];
        let last = profile[profile.len() - 1];
        if t <= first.offset {
            return first.color;
        }
        if t >= last.offset {
            return last.color;
        }
        for pair in profile.windows(2) {
            let (s0, s1) = (pair[0], pair[1]);
            if t >= s0.offset && t <= s1.offset {
                let span = s1.offset - s0.offset;
                if span <= f64::EPSILON {
                    return s1.color;
                }
                return s0.color.gradient(&s1.color, (t - s0.offset) / span);
            }
        }
        last.color
    }

    pub fn size(&self) -> usize {
        self.colors.len()
    }

    pub fn get(&self, index: usize) -> Color {
        self.colors[index.min(LUT_SIZE - 1)]
    }

    /// Color at parameter `t`, clamped to [0, 1].
    #[inline]
    pub fn at(&self, t: f64) -> Color {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        self.colors[(t * (LUT_SIZE - 1) as f64 + 0.5) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::rgb(255, 0, 0);
    const GREEN: Color = Color::rgb(0, 255, 0);
    const BLUE: Color = Color::rgb(0, 0, 255);

    #[test]
    fn test_lut_size() {
        let lut = GradientLut::new(&[]);
        assert_eq!(lut.size(), 256);
        assert_eq!(lut.get(17), Color::TRANSPARENT);
    }

    #[test]
    fn test_two_stops_exact_endpoints() {
        let lut = GradientLut::new(&[ColorStop::new(0.0, RED), ColorStop::new(1.0, BLUE)]);
        assert_eq!(lut.get(0), RED);
        assert_eq!(lut.get(255), BLUE);
        let mid = lut.at(0.5);
        assert!(mid.r > 100 && mid.r < 155, "mid.r={}", mid.r);
        assert!(mid.b > 100 && mid.b < 155, "mid.b={}", mid.b);
    }

    #[test]
    fn test_unsorted_stops() {
        let lut = GradientLut::new(&[
            ColorStop::new(1.0, BLUE),
            ColorStop::new(0.0, RED),
            ColorStop::new(0.5, GREEN),
        ]);
        assert_eq!(lut.at(0.0), RED);
        let mid = lut.at(0.5);
        assert!(mid.g >= 250 && mid.r <= 2 && mid.b <= 2, "mid={:?}", mid);
        assert_eq!(lut.at(1.0), BLUE);
    }

    #[test]
    fn test_single_stop_is_solid() {
        let lut = GradientLut::new(&[ColorStop::new(0.3, GREEN)]);
        assert_eq!(lut.at(0.0), GREEN);
        assert_eq!(lut.at(1.0), GREEN);
    }

    #[test]
    fn test_clamps_outside_stop_range() {
        let lut = GradientLut::new(&[ColorStop::new(0.25, RED), ColorStop::new(0.75, BLUE)]);
        assert_eq!(lut.at(0.1), RED);
        assert_eq!(lut.at(0.9), BLUE);
        assert_eq!(lut.at(-3.0), RED);
        assert_eq!(lut.at(f64::NAN), RED);
    }
}
