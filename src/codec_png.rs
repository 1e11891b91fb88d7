//! PNG encoding and decoding through the `png` crate.
//!
//! Bitmaps are written as 8-bit RGBA. Any PNG can be read: palette and
//! low-depth grey images are expanded, 16-bit channels are stripped to 8
//! bits, and images without alpha become opaque.

use log::debug;
use png::{BitDepth, ColorType, Transformations};

use crate::basics::IntSize;
use crate::bitmap::Bitmap;
use crate::color::Color;
use crate::error::{BitmapError, Result};

/// Encode as an 8-bit RGBA PNG.
pub fn encode(bmp: &Bitmap) -> Result<Vec<u8>> {
    if !bmp.is_ok() {
        return Err(BitmapError::InvalidArgument(
            "cannot encode an empty bitmap".into(),
        ));
    }
    let rgba: Vec<u8> = bmp.pixels().flat_map(|c| [c.r, c.g, c.b, c.a]).collect();

    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, bmp.width() as u32, bmp.height() as u32);
        encoder.set_color(ColorType::Rgba);
        encoder.set_depth(BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&rgba)?;
        writer.finish()?;
    }
    debug!("encoded {}x{} PNG, {} bytes", bmp.width(), bmp.height(), out.len());
    Ok(out)
}

/// Decode a PNG image.
pub fn decode(data: &[u8]) -> Result<Bitmap> {
    let mut decoder = png::Decoder::new(data);
    decoder.set_transformations(
        Transformations::EXPAND | Transformations::STRIP_16 | Transformations::ALPHA,
    );
    let mut reader = decoder.read_info()?;
    let (color_type, depth) = reader.output_color_type();
    if depth != BitDepth::Eight {
        return Err(BitmapError::Decode(format!(
            "unexpected output depth {:?}",
            depth
        )));
    }
    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;

    let (w, h) = (info.width as i32, info.height as i32);
    let channels = match color_type {
        ColorType::Rgba => 4,
        ColorType::Rgb => 3,
        ColorType::GrayscaleAlpha => 2,
        ColorType::Grayscale => 1,
        ColorType::Indexed => {
            return Err(BitmapError::Decode("palette was not expanded".into()));
        }
    };
    let mut bmp = Bitmap::new(IntSize::new(w, h))?;
    let line = info.line_size;
    for y in 0..h {
        let row = &buf[y as usize * line..][..w as usize * channels];
        for (x, px) in row.chunks_exact(channels).enumerate() {
            let c = match *px {
                [r, g, b, a] => Color::new(r, g, b, a),
                [r, g, b] => Color::rgb(r, g, b),
                [v, a] => Color::new(v, v, v, a),
                [v] => Color::rgb(v, v, v),
                _ => Color::TRANSPARENT,
            };
            bmp.put_raw(x as i32, y, c);
        }
    }
    debug!("decoded {}x{} PNG ({:?})", w, h, color_type);
    Ok(bmp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basics::IntPoint;

    #[test]
    fn test_encode_decode() {
        let mut b = Bitmap::with_color(IntSize::new(5, 3), Color::new(10, 20, 30, 40)).unwrap();
        b.put_pixel(IntPoint::new(4, 2), Color::new(250, 0, 125, 255));
        let bytes = encode(&b).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
        assert_eq!(decode(&bytes).unwrap(), b);
    }

    #[test]
    fn test_decode_grey_is_opaque() {
        let mut out = Vec::new();
        {
            let mut enc = png::Encoder::new(&mut out, 2, 1);
            enc.set_color(ColorType::Grayscale);
            enc.set_depth(BitDepth::Eight);
            let mut w = enc.write_header().unwrap();
            w.write_image_data(&[0, 200]).unwrap();
        }
        let b = decode(&out).unwrap();
        assert_eq!(b.get_pixel(IntPoint::new(1, 0)).unwrap(), Color::rgb(200, 200, 200));
    }

    #[test]
    fn test_decode_garbage() {
        assert!(decode(b"not a png").is_err());
    }
}
