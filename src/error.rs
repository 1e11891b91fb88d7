//! Error type shared by every fallible operation in the crate.

use thiserror::Error;

/// Failure signals raised by bitmap construction, checked access and the
/// encoding boundary. Drawing off the edge of a bitmap is never an error.
#[derive(Debug, Error)]
pub enum BitmapError {
    #[error("invalid bitmap size {width}x{height}: both dimensions must be positive")]
    InvalidSize { width: i32, height: i32 },

    #[error("failed to allocate {bytes} bytes for a {width}x{height} bitmap")]
    Allocation { width: i32, height: i32, bytes: usize },

    #[error("pixel ({x}, {y}) is outside the {width}x{height} bitmap")]
    OutOfBounds { x: i32, y: i32, width: i32, height: i32 },

    #[error("rectangle {x},{y} {w}x{h} is not inside the {width}x{height} bitmap")]
    RectOutside {
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        width: i32,
        height: i32,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("malformed image data: {0}")]
    Decode(String),

    #[cfg(feature = "png")]
    #[error(transparent)]
    PngDecode(#[from] png::DecodingError),

    #[cfg(feature = "png")]
    #[error(transparent)]
    PngEncode(#[from] png::EncodingError),
}

pub type Result<T> = std::result::Result<T, BitmapError>;
