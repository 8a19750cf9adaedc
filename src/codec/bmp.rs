//! BMP decode/encode adapter, built on the `image` crate. BMP has no
//! lossy quality knob, so `encode` ignores the quality parameter entirely
//! (this is expected, not an oversight).
//!
//! Unlike JPEG and WebP, BMP's decoder doesn't support decoding from a
//! memory span in the `image` crate, so this adapter always streams
//! through a buffered file reader rather than attempting a memory map.

use std::fs::File;
use std::path::Path;

use image::codecs::bmp::BmpEncoder;
use image::{ImageEncoder, ImageReader};

use crate::codec::{channels_to_extended_color_type, dynamic_image_to_pixel_buffer};
use crate::error::BatchError;
use crate::model::PixelBuffer;

pub fn decode(path: &Path) -> Result<PixelBuffer, BatchError> {
    let reader = ImageReader::open(path).map_err(|_| BatchError::FileNotFound(path.to_path_buf()))?;
    let dynamic_image = reader
        .with_guessed_format()
        .map_err(|e| BatchError::Decode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?
        .decode()
        .map_err(|e| BatchError::Decode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    Ok(dynamic_image_to_pixel_buffer(dynamic_image))
}

pub fn encode(path: &Path, buffer: &PixelBuffer) -> Result<(), BatchError> {
    let mut file = File::create(path).map_err(|e| BatchError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;
    let color_type = channels_to_extended_color_type(buffer.channels)?;
    let mut encoder = BmpEncoder::new(&mut file);
    encoder
        .write_image(&buffer.pixels, buffer.width, buffer.height, color_type)
        .map_err(|e| BatchError::Encode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_then_decode_round_trip_is_byte_identical() {
        let mut pixels = vec![0u8; 5 * 3 * 3];
        for (i, p) in pixels.iter_mut().enumerate() {
            *p = (i * 13) as u8;
        }
        let buffer = PixelBuffer::new(pixels.clone(), 5, 3, 3);
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.bmp");
        encode(&out, &buffer).unwrap();
        let decoded = decode(&out).unwrap();
        assert_eq!((decoded.width, decoded.height, decoded.channels), (5, 3, 3));
        assert_eq!(decoded.pixels, pixels);
    }
}
