//! Paint values and drawing settings.
//!
//! A [`Paint`] says what color goes into each touched pixel. The shape
//! rasterizers decide which pixels are touched.

use crate::basics::{IntPoint, Point};
use crate::bitmap::Bitmap;
use crate::color::{Color, ColorStop};

// ============================================================================
// Pattern
// ============================================================================

/// A bitmap tiled over the plane. The anchor sets the phase of the tiling:
/// target pixel `(x, y)` samples the tile at `(x + anchor.x, y + anchor.y)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    pub bitmap: Bitmap,
    pub anchor: IntPoint,
    /// Carried for object layers that position patterns relative to the
    /// drawn object. The rasterizers do not read it.
    pub object_aligned: bool,
}

impl Pattern {
    pub fn new(bitmap: Bitmap) -> Self {
        Self {
            bitmap,
            anchor: IntPoint::default(),
            object_aligned: false,
        }
    }

    pub fn with_anchor(mut self, anchor: IntPoint) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn with_object_aligned(mut self, aligned: bool) -> Self {
        self.object_aligned = aligned;
        self
    }
}

// ============================================================================
// Gradients
// ============================================================================

/// A gradient along a direction. `angle` is in radians, measured from the
/// positive x axis toward positive y (screen coordinates).
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub angle: f64,
    pub stops: Vec<ColorStop>,
    pub object_aligned: bool,
}

impl LinearGradient {
    pub fn new(angle: f64, stops: Vec<ColorStop>) -> Self {
        Self {
            angle,
            stops,
            object_aligned: false,
        }
    }
}

/// An elliptical gradient. `center` and `radii` are fractions of the
/// rectangle the gradient is rendered into, so `center = (0.5, 0.5)` with
/// `radii = (0.5, 0.5)` fits the rectangle exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub center: Point,
    pub radii: Point,
    pub stops: Vec<ColorStop>,
    pub object_aligned: bool,
}

impl RadialGradient {
    pub fn new(center: Point, radii: Point, stops: Vec<ColorStop>) -> Self {
        Self {
            center,
            radii,
            stops,
            object_aligned: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Gradient {
    Linear(LinearGradient),
    Radial(RadialGradient),
}

impl Gradient {
    pub fn stops(&self) -> &[ColorStop] {
        match self {
            Gradient::Linear(g) => &g.stops,
            Gradient::Radial(g) => &g.stops,
        }
    }

    pub fn object_aligned(&self) -> bool {
        match self {
            Gradient::Linear(g) => g.object_aligned,
            Gradient::Radial(g) => g.object_aligned,
        }
    }
}

impl From<LinearGradient> for Gradient {
    fn from(g: LinearGradient) -> Self {
        Gradient::Linear(g)
    }
}

impl From<RadialGradient> for Gradient {
    fn from(g: RadialGradient) -> Self {
        Gradient::Radial(g)
    }
}

// ============================================================================
// Paint
// ============================================================================

/// The closed set of fill sources.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Color(Color),
    Pattern(Pattern),
    Gradient(Gradient),
}

impl Paint {
    pub fn as_color(&self) -> Option<Color> {
        match self {
            Paint::Color(c) => Some(*c),
            _ => None,
        }
    }
}

impl Default for Paint {
    fn default() -> Self {
        Paint::Color(Color::BLACK)
    }
}

impl From<Color> for Paint {
    fn from(c: Color) -> Self {
        Paint::Color(c)
    }
}

impl From<Pattern> for Paint {
    fn from(p: Pattern) -> Self {
        Paint::Pattern(p)
    }
}

impl From<Gradient> for Paint {
    fn from(g: Gradient) -> Self {
        Paint::Gradient(g)
    }
}

impl From<LinearGradient> for Paint {
    fn from(g: LinearGradient) -> Self {
        Paint::Gradient(g.into())
    }
}

impl From<RadialGradient> for Paint {
    fn from(g: RadialGradient) -> Self {
        Paint::Gradient(g.into())
    }
}

// ============================================================================
// Settings
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
}

/// Stroke settings for lines and polylines. Widths 0 and 1 both draw a
/// thin line.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineSettings {
    pub paint: Paint,
    pub width: i32,
    pub dashed: bool,
    pub cap: LineCap,
}

impl LineSettings {
    pub fn new(paint: impl Into<Paint>, width: i32) -> Self {
        Self {
            paint: paint.into(),
            width,
            dashed: false,
            cap: LineCap::Butt,
        }
    }

    pub fn with_dashes(mut self, dashed: bool) -> Self {
        self.dashed = dashed;
        self
    }

    pub fn with_cap(mut self, cap: LineCap) -> Self {
        self.cap = cap;
        self
    }
}

/// Stroke settings for closed outlines (rectangles, ellipses, polygons).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BorderSettings {
    pub paint: Paint,
    pub width: i32,
    pub dashed: bool,
}

impl BorderSettings {
    pub fn new(paint: impl Into<Paint>, width: i32) -> Self {
        Self {
            paint: paint.into(),
            width,
            dashed: false,
        }
    }

    pub fn with_dashes(mut self, dashed: bool) -> Self {
        self.dashed = dashed;
        self
    }
}

impl From<BorderSettings> for LineSettings {
    fn from(s: BorderSettings) -> Self {
        Self {
            paint: s.paint,
            width: s.width,
            dashed: s.dashed,
            cap: LineCap::Butt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paint_conversions() {
        let p: Paint = Color::WHITE.into();
        assert_eq!(p.as_color(), Some(Color::WHITE));

        let g: Paint = LinearGradient::new(0.0, vec![]).into();
        assert!(matches!(g, Paint::Gradient(Gradient::Linear(_))));
        assert_eq!(g.as_color(), None);
    }

    #[test]
    fn test_settings_builders() {
        let s = LineSettings::new(Color::BLACK, 3)
            .with_dashes(true)
            .with_cap(LineCap::Round);
        assert_eq!(s.width, 3);
        assert!(s.dashed);
        assert_eq!(s.cap, LineCap::Round);

        let l: LineSettings = BorderSettings::new(Color::WHITE, 2).with_dashes(true).into();
        assert_eq!(l.cap, LineCap::Butt);
        assert!(l.dashed);
    }

    #[test]
    fn test_gradient_accessors() {
        let stops = vec![ColorStop::new(0.0, Color::BLACK)];
        let g: Gradient = RadialGradient::new(
            Point::new(0.5, 0.5),
            Point::new(0.5, 0.5),
            stops.clone(),
        )
        .into();
        assert_eq!(g.stops(), &stops[..]);
        assert!(!g.object_aligned());
    }
}
