//! An owned RGBA pixel buffer with row stride.
//!
//! Pixels are 4 bytes in B,G,R,A order. Rows start at multiples of
//! [`Bitmap::stride`], which is the row width in bytes rounded up to
//! [`Bitmap::ROW_ALIGN`]. A bitmap of size 0x0 is the "null" sentinel that
//! [`Bitmap::default`] and [`Bitmap::take`] leave behind.
//!
//! Two families of pixel access exist:
//!
//! - Public: [`Bitmap::get_pixel`] is checked and returns an error for
//!   coordinates outside the bitmap. [`Bitmap::put_pixel`] and
//!   [`Bitmap::blend_pixel`] clip silently.
//! - Crate-internal raw access (`pixel_raw`, `put_raw`) for the inner loops
//!   of the rasterizers, whose callers guarantee in-bounds coordinates.

use log::warn;

use crate::basics::{wrap, IntPoint, IntRect, IntSize};
use crate::color::{mix_channel, Color, OrderBgra};
use crate::error::{BitmapError, Result};

const BPP: usize = OrderBgra::N;

#[derive(Clone, Default)]
pub struct Bitmap {
    width: i32,
    height: i32,
    stride: usize,
    data: Vec<u8>,
}

impl Bitmap {
    /// Row starts are aligned to this many bytes.
    pub const ROW_ALIGN: usize = 16;

    // ========================================================================
    // Construction
    // ========================================================================

    /// Allocate a bitmap of the given size, filled with transparent black.
    ///
    /// Fails with [`BitmapError::InvalidSize`] for non-positive dimensions and
    /// with [`BitmapError::Allocation`] if the buffer cannot be reserved. No
    /// partially constructed bitmap is ever returned.
    pub fn new(size: IntSize) -> Result<Self> {
        if size.w <= 0 || size.h <= 0 {
            return Err(BitmapError::InvalidSize {
                width: size.w,
                height: size.h,
            });
        }
        let stride = Self::stride_for(size.w).ok_or_else(|| alloc_error(size, usize::MAX))?;
        let bytes = stride
            .checked_mul(size.h as usize)
            .ok_or_else(|| alloc_error(size, usize::MAX))?;

        let mut data = Vec::new();
        if data.try_reserve_exact(bytes).is_err() {
            return Err(alloc_error(size, bytes));
        }
        data.resize(bytes, 0);

        Ok(Self {
            width: size.w,
            height: size.h,
            stride,
            data,
        })
    }

    /// Allocate a bitmap filled with `color`.
    pub fn with_color(size: IntSize, color: Color) -> Result<Self> {
        let mut bmp = Self::new(size)?;
        bmp.clear(color);
        Ok(bmp)
    }

    /// Allocate a bitmap filled from a paint.
    pub fn with_paint(size: IntSize, paint: &crate::paint::Paint) -> Result<Self> {
        let mut bmp = Self::new(size)?;
        bmp.clear_paint(paint)?;
        Ok(bmp)
    }

    /// Wrap externally produced pixel bytes (B,G,R,A order).
    ///
    /// `stride` must be at least `width * 4` and `data` must hold
    /// `stride * height` bytes.
    pub fn from_raw_parts(size: IntSize, stride: usize, data: Vec<u8>) -> Result<Self> {
        if size.w <= 0 || size.h <= 0 {
            return Err(BitmapError::InvalidSize {
                width: size.w,
                height: size.h,
            });
        }
        if stride < size.w as usize * BPP {
            return Err(BitmapError::InvalidArgument(format!(
                "stride {} is smaller than {} bytes per row",
                stride,
                size.w as usize * BPP
            )));
        }
        let needed = stride
            .checked_mul(size.h as usize)
            .ok_or_else(|| alloc_error(size, usize::MAX))?;
        if data.len() != needed {
            return Err(BitmapError::InvalidArgument(format!(
                "expected {} bytes of pixel data, got {}",
                needed,
                data.len()
            )));
        }
        Ok(Self {
            width: size.w,
            height: size.h,
            stride,
            data,
        })
    }

    fn stride_for(width: i32) -> Option<usize> {
        let row = (width as usize).checked_mul(BPP)?;
        let aligned = row.checked_add(Self::ROW_ALIGN - 1)?;
        Some(aligned / Self::ROW_ALIGN * Self::ROW_ALIGN)
    }

    /// Move the pixels out, leaving `self` as the null bitmap.
    pub fn take(&mut self) -> Bitmap {
        std::mem::take(self)
    }

    // ========================================================================
    // Geometry
    // ========================================================================

    /// False for the null bitmap.
    pub fn is_ok(&self) -> bool {
        self.width != 0 && self.height != 0
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn size(&self) -> IntSize {
        IntSize::new(self.width, self.height)
    }

    pub fn rect(&self) -> IntRect {
        IntRect::from_size(self.size())
    }

    /// Bytes per row, including alignment padding.
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn contains(&self, p: IntPoint) -> bool {
        self.contains_xy(p.x, p.y)
    }

    #[inline]
    pub(crate) fn contains_xy(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    // ========================================================================
    // Raw bytes and rows
    // ========================================================================

    /// All pixel bytes, `stride * height` long, including row padding.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// The `width * 4` pixel bytes of row `y`.
    ///
    /// # Panics
    /// If `y` is not in `[0, height)`.
    pub fn row(&self, y: i32) -> &[u8] {
        assert!(
            y >= 0 && y < self.height,
            "row {} out of bounds (height={})",
            y,
            self.height
        );
        let start = y as usize * self.stride;
        &self.data[start..start + self.width as usize * BPP]
    }

    /// Mutable variant of [`Bitmap::row`].
    pub fn row_mut(&mut self, y: i32) -> &mut [u8] {
        assert!(
            y >= 0 && y < self.height,
            "row {} out of bounds (height={})",
            y,
            self.height
        );
        let start = y as usize * self.stride;
        let len = self.width as usize * BPP;
        &mut self.data[start..start + len]
    }

    // ========================================================================
    // Pixel access
    // ========================================================================

    #[inline]
    fn offset(&self, x: i32, y: i32) -> usize {
        y as usize * self.stride + x as usize * BPP
    }

    /// Read a pixel without bounds checking against the bitmap rectangle.
    ///
    /// Precondition: `contains_xy(x, y)`. Coordinates outside the bitmap
    /// either read a padding byte or panic on the slice bound.
    #[inline]
    pub(crate) fn pixel_raw(&self, x: i32, y: i32) -> Color {
        debug_assert!(self.contains_xy(x, y));
        let i = self.offset(x, y);
        let p = &self.data[i..i + BPP];
        Color::new(
            p[OrderBgra::R],
            p[OrderBgra::G],
            p[OrderBgra::B],
            p[OrderBgra::A],
        )
    }

    /// Write a pixel without bounds checking. Same precondition as
    /// [`Bitmap::pixel_raw`].
    #[inline]
    pub(crate) fn put_raw(&mut self, x: i32, y: i32, c: Color) {
        debug_assert!(self.contains_xy(x, y));
        let i = self.offset(x, y);
        let p = &mut self.data[i..i + BPP];
        p[OrderBgra::R] = c.r;
        p[OrderBgra::G] = c.g;
        p[OrderBgra::B] = c.b;
        p[OrderBgra::A] = c.a;
    }

    /// Checked read.
    pub fn get_pixel(&self, p: IntPoint) -> Result<Color> {
        if !self.contains(p) {
            return Err(self.out_of_bounds(p));
        }
        Ok(self.pixel_raw(p.x, p.y))
    }

    /// Overwrite a pixel. Writes outside the bitmap are ignored.
    #[inline]
    pub fn put_pixel(&mut self, p: IntPoint, c: Color) {
        self.put_pixel_xy(p.x, p.y, c);
    }

    #[inline]
    pub(crate) fn put_pixel_xy(&mut self, x: i32, y: i32, c: Color) {
        if self.contains_xy(x, y) {
            self.put_raw(x, y, c);
        }
    }

    /// Mix `c` over the pixel by `c.a`. The color channels are blended and the
    /// destination alpha is kept. Writes outside the bitmap are ignored.
    #[inline]
    pub fn blend_pixel(&mut self, p: IntPoint, c: Color) {
        self.blend_pixel_xy(p.x, p.y, c);
    }

    #[inline]
    pub(crate) fn blend_pixel_xy(&mut self, x: i32, y: i32, c: Color) {
        if !self.contains_xy(x, y) {
            return;
        }
        let i = self.offset(x, y);
        let p = &mut self.data[i..i + BPP];
        p[OrderBgra::R] = mix_channel(c.r, p[OrderBgra::R], c.a);
        p[OrderBgra::G] = mix_channel(c.g, p[OrderBgra::G], c.a);
        p[OrderBgra::B] = mix_channel(c.b, p[OrderBgra::B], c.a);
    }

    /// Read as if the bitmap tiled the plane in every direction.
    ///
    /// Returns transparent for the null bitmap.
    #[inline]
    pub fn color_modulo(&self, p: IntPoint) -> Color {
        if !self.is_ok() {
            return Color::TRANSPARENT;
        }
        self.pixel_raw(wrap(p.x, self.width), wrap(p.y, self.height))
    }

    /// Iterate over all pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = Color> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| self.pixel_raw(x, y)))
    }

    /// Fails with [`BitmapError::RectOutside`] unless `r` is non-empty and
    /// lies entirely inside the bitmap.
    pub(crate) fn check_inside(&self, r: &IntRect) -> Result<()> {
        if !self.rect().contains_rect(r) {
            return Err(BitmapError::RectOutside {
                x: r.x,
                y: r.y,
                w: r.w,
                h: r.h,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    fn out_of_bounds(&self, p: IntPoint) -> BitmapError {
        BitmapError::OutOfBounds {
            x: p.x,
            y: p.y,
            width: self.width,
            height: self.height,
        }
    }

    // ========================================================================
    // Whole-bitmap operations
    // ========================================================================

    /// Set every pixel to `c`.
    pub fn clear(&mut self, c: Color) {
        let mut px = [0u8; BPP];
        px[OrderBgra::R] = c.r;
        px[OrderBgra::G] = c.g;
        px[OrderBgra::B] = c.b;
        px[OrderBgra::A] = c.a;
        for y in 0..self.height {
            for chunk in self.row_mut(y).chunks_exact_mut(BPP) {
                chunk.copy_from_slice(&px);
            }
        }
    }

    /// Set every pixel from a paint. Patterns and gradients are copied, not
    /// blended.
    pub fn clear_paint(&mut self, paint: &crate::paint::Paint) -> Result<()> {
        use crate::color_source::ColorSource;

        let rect = self.rect();
        crate::color_source::dispatch_paint!(paint, rect, rect, |src| {
            for y in 0..self.height {
                for x in 0..self.width {
                    let c = src.sample(x, y);
                    self.put_raw(x, y, c);
                }
            }
        });
        Ok(())
    }

    /// Copy out the region `r`, which must lie entirely inside the bitmap.
    pub fn subbitmap(&self, r: &IntRect) -> Result<Bitmap> {
        self.check_inside(r)?;
        let mut dst = Bitmap::new(r.size())?;
        let x0 = r.x as usize * BPP;
        let len = r.w as usize * BPP;
        for y in 0..r.h {
            let src = &self.row(y + r.y)[x0..x0 + len];
            dst.row_mut(y).copy_from_slice(src);
        }
        Ok(dst)
    }
}

fn alloc_error(size: IntSize, bytes: usize) -> BitmapError {
    warn!(
        "bitmap allocation failed: {}x{} ({} bytes)",
        size.w, size.h, bytes
    );
    BitmapError::Allocation {
        width: size.w,
        height: size.h,
        bytes,
    }
}

/// Pixel equality. Row padding is ignored.
impl PartialEq for Bitmap {
    fn eq(&self, other: &Self) -> bool {
        if self.size() != other.size() {
            return false;
        }
        (0..self.height).all(|y| self.row(y) == other.row(y))
    }
}

impl Eq for Bitmap {}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .finish()
    }
}
