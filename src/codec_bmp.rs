//! BMP encoding and decoding.
//!
//! Bitmaps are written as uncompressed 32-bit top-down BMP, whose pixel
//! rows have the same BGRA layout as [`Bitmap`] rows. Uncompressed 24-bit
//! and 32-bit files in either row order can be read; 24-bit pixels become
//! opaque.

use log::debug;

use crate::basics::IntSize;
use crate::bitmap::Bitmap;
use crate::error::{BitmapError, Result};

const FILE_HEADER_LEN: usize = 14;
const INFO_HEADER_LEN: usize = 40;
const BI_RGB: u32 = 0;

/// Encode as a 32-bit top-down BMP file.
pub fn encode(bmp: &Bitmap) -> Result<Vec<u8>> {
    if !bmp.is_ok() {
        return Err(BitmapError::InvalidArgument(
            "cannot encode an empty bitmap".into(),
        ));
    }
    let row_len = bmp.width() as usize * 4;
    let image_len = row_len * bmp.height() as usize;
    let offset = FILE_HEADER_LEN + INFO_HEADER_LEN;
    let file_len = u32::try_from(offset + image_len)
        .map_err(|_| BitmapError::InvalidArgument("bitmap too large for BMP".into()))?;

    let mut out = Vec::with_capacity(offset + image_len);
    // BITMAPFILEHEADER
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&file_len.to_le_bytes());
    out.extend_from_slice(&[0u8; 4]);
    out.extend_from_slice(&(offset as u32).to_le_bytes());
    // BITMAPINFOHEADER, negative height for top-down rows
    out.extend_from_slice(&(INFO_HEADER_LEN as u32).to_le_bytes());
    out.extend_from_slice(&bmp.width().to_le_bytes());
    out.extend_from_slice(&(-bmp.height()).to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&32u16.to_le_bytes());
    out.extend_from_slice(&BI_RGB.to_le_bytes());
    out.extend_from_slice(&(image_len as u32).to_le_bytes());
    out.extend_from_slice(&[0u8; 16]);

    for y in 0..bmp.height() {
        out.extend_from_slice(bmp.row(y));
    }
    debug!("encoded {}x{} BMP, {} bytes", bmp.width(), bmp.height(), out.len());
    Ok(out)
}

fn malformed(msg: impl Into<String>) -> BitmapError {
    BitmapError::Decode(msg.into())
}

fn read_u16(data: &[u8], at: usize) -> Result<u16> {
    data.get(at..at + 2)
        .map(|b| u16::from_le_bytes([b[0], b[1]]))
        .ok_or_else(|| malformed("truncated header"))
}

fn read_u32(data: &[u8], at: usize) -> Result<u32> {
    data.get(at..at + 4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or_else(|| malformed("truncated header"))
}

/// Decode an uncompressed 24-bit or 32-bit BMP file.
pub fn decode(data: &[u8]) -> Result<Bitmap> {
    if data.len() < FILE_HEADER_LEN + INFO_HEADER_LEN || &data[0..2] != b"BM" {
        return Err(malformed("not a BMP file"));
    }
    let pixel_offset = read_u32(data, 10)? as usize;
    let width = read_u32(data, 18)? as i32;
    let height = read_u32(data, 22)? as i32;
    let bpp = read_u16(data, 28)?;
    let compression = read_u32(data, 30)?;

    if compression != BI_RGB {
        return Err(malformed(format!("unsupported compression {}", compression)));
    }
    let bytes_pp = match bpp {
        24 => 3,
        32 => 4,
        other => return Err(malformed(format!("unsupported bit depth {}", other))),
    };
    if width <= 0 || height == 0 || height == i32::MIN {
        return Err(malformed(format!("invalid dimensions {}x{}", width, height)));
    }
    let top_down = height < 0;
    let h = height.abs();

    // Rows are padded to four bytes.
    let stride = (width as usize * bytes_pp + 3) / 4 * 4;
    let needed = stride
        .checked_mul(h as usize)
        .and_then(|n| n.checked_add(pixel_offset))
        .ok_or_else(|| malformed("image size overflows"))?;
    if data.len() < needed {
        return Err(malformed(format!(
            "pixel data truncated: need {} bytes, have {}",
            needed,
            data.len()
        )));
    }

    let mut bmp = Bitmap::new(IntSize::new(width, h))?;
    for y in 0..h {
        let src_y = if top_down { y } else { h - 1 - y };
        let start = pixel_offset + src_y as usize * stride;
        let src = &data[start..start + width as usize * bytes_pp];
        let dst = bmp.row_mut(y);
        if bytes_pp == 4 {
            dst.copy_from_slice(src);
        } else {
            for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(3)) {
                d[..3].copy_from_slice(s);
                d[3] = 255;
            }
        }
    }
    debug!("decoded {}x{} BMP ({} bpp)", width, h, bpp);
    Ok(bmp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basics::IntPoint;
    use crate::color::Color;

    fn sample() -> Bitmap {
        let mut b = Bitmap::with_color(IntSize::new(3, 2), Color::new(1, 2, 3, 4)).unwrap();
        b.put_pixel(IntPoint::new(2, 1), Color::new(200, 100, 50, 255));
        b
    }

    /// A bottom-up 24-bit file with the given BGR rows, top row first.
    fn bmp24(width: i32, rows: &[&[u8]]) -> Vec<u8> {
        let stride = (width as usize * 3 + 3) / 4 * 4;
        let mut out = Vec::new();
        out.extend_from_slice(b"BM");
        out.extend_from_slice(&((54 + stride * rows.len()) as u32).to_le_bytes());
        out.extend_from_slice(&[0; 4]);
        out.extend_from_slice(&54u32.to_le_bytes());
        out.extend_from_slice(&40u32.to_le_bytes());
        out.extend_from_slice(&width.to_le_bytes());
        out.extend_from_slice(&(rows.len() as i32).to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&24u16.to_le_bytes());
        out.extend_from_slice(&[0; 24]);
        for row in rows.iter().rev() {
            let mut padded = row.to_vec();
            padded.resize(stride, 0);
            out.extend_from_slice(&padded);
        }
        out
    }

    #[test]
    fn test_encode_layout() {
        let bytes = encode(&sample()).unwrap();
        assert_eq!(&bytes[0..2], b"BM");
        assert_eq!(bytes.len(), 54 + 3 * 2 * 4);
        assert_eq!(i32::from_le_bytes([bytes[22], bytes[23], bytes[24], bytes[25]]), -2);
        // First pixel, BGRA.
        assert_eq!(&bytes[54..58], &[3, 2, 1, 4]);
    }

    #[test]
    fn test_encode_decode() {
        let b = sample();
        assert_eq!(decode(&encode(&b).unwrap()).unwrap(), b);
        assert!(encode(&Bitmap::default()).is_err());
    }

    #[test]
    fn test_decode_24_bit_bottom_up() {
        let data = bmp24(2, &[&[0, 0, 255, 255, 0, 0], &[0, 255, 0, 9, 8, 7]]);
        let b = decode(&data).unwrap();
        assert_eq!(b.size(), IntSize::new(2, 2));
        assert_eq!(b.get_pixel(IntPoint::new(0, 0)).unwrap(), Color::rgb(255, 0, 0));
        assert_eq!(b.get_pixel(IntPoint::new(1, 0)).unwrap(), Color::rgb(0, 0, 255));
        assert_eq!(b.get_pixel(IntPoint::new(0, 1)).unwrap(), Color::rgb(0, 255, 0));
        assert_eq!(b.get_pixel(IntPoint::new(1, 1)).unwrap(), Color::rgb(7, 8, 9));
    }

    #[test]
    fn test_decode_rejects_malformed() {
        assert!(matches!(decode(b"BM"), Err(BitmapError::Decode(_))));
        assert!(matches!(decode(&[0u8; 60]), Err(BitmapError::Decode(_))));
        let mut truncated = encode(&sample()).unwrap();
        truncated.truncate(60);
        assert!(matches!(decode(&truncated), Err(BitmapError::Decode(_))));
        let mut depth = encode(&sample()).unwrap();
        depth[28] = 8;
        assert!(matches!(decode(&depth), Err(BitmapError::Decode(_))));
    }
}
