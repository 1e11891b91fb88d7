//! # bitmap-raster
//!
//! A software 2D rasterizer over in-memory 32-bit bitmaps. Every pixel is
//! stepped by the crate's own integer algorithms:
//!
//! - Thin and wide Bresenham lines with dashes and round or butt caps
//! - Midpoint ellipses: outlines, wide outlines and fills
//! - Even-odd scanline polygon fill and sorted-edge triangle fill
//! - Span flood fill and boundary fill
//! - Alpha compositing, masked blits, stencil blending and brush strokes
//! - Nearest-neighbor and bilinear resampling, flips and rotation
//!
//! Shapes take a [`paint::Paint`]: a solid color, a tiled pattern bitmap or
//! a linear or radial gradient. The paint is resolved once per call into a
//! [`color_source::ColorSource`] and the rasterizer is instantiated for it.
//!
//! ## Conventions
//!
//! - Pixels are stored B, G, R, A with rows padded to 16 bytes.
//! - Drawing outside a bitmap is clipped silently. Checked reads and
//!   out-of-range seeds return [`BitmapError`].
//! - Operations that may allocate, including any drawing with a gradient
//!   paint, return [`Result`].

// Phase 1: Foundation types
pub mod basics;
pub mod color;
pub mod error;

// Phase 2: Pixel storage and paints
pub mod bitmap;
pub mod color_source;
pub mod gradient_lut;
pub mod gradient_render;
pub mod paint;

// Phase 3: Shape rasterizers
pub mod ellipse;
pub mod flood_fill;
pub mod line;
pub mod polygon;

// Phase 4: Whole-bitmap operations
pub mod bitmap_ops;
pub mod brush;
pub mod compositing;
pub mod resample;

// Phase 5: Encoding boundary
pub mod codec_bmp;
#[cfg(feature = "png")]
pub mod codec_png;

pub use error::{BitmapError, Result};
