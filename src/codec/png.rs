//! PNG decode/encode adapter, built on the `image` crate.
//!
//! Decoding memory-maps the file and decodes straight from the mapped
//! region, falling back to streamed file I/O if mapping fails (e.g. on a
//! filesystem that doesn't support it). `quality` is mapped onto the
//! encoder's coarse `CompressionType` buckets, since PNG has no continuous
//! quality knob: the spec's `9 - floor((quality-1)*9/99)` compression
//! level is bucketed into `image`'s handful of presets (see `DESIGN.md`).

use std::fs::File;
use std::path::Path;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ImageEncoder, ImageReader};
use memmap2::Mmap;

use crate::codec::{channels_to_extended_color_type, dynamic_image_to_pixel_buffer};
use crate::error::BatchError;
use crate::model::PixelBuffer;

pub fn decode(path: &Path) -> Result<PixelBuffer, BatchError> {
    let file = File::open(path).map_err(|_| BatchError::FileNotFound(path.to_path_buf()))?;

    let dynamic_image = match unsafe { Mmap::map(&file) } {
        Ok(mmap) => image::load_from_memory(&mmap[..]).map_err(|e| BatchError::Decode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?,
        Err(_) => ImageReader::open(path)
            .map_err(|e| BatchError::Decode {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?
            .decode()
            .map_err(|e| BatchError::Decode {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?,
    };

    Ok(dynamic_image_to_pixel_buffer(dynamic_image))
}

pub fn encode(path: &Path, buffer: &PixelBuffer, quality: u8) -> Result<(), BatchError> {
    let file = File::create(path).map_err(|e| BatchError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;
    let color_type = channels_to_extended_color_type(buffer.channels)?;
    let encoder = PngEncoder::new_with_quality(file, quality_to_compression(quality), FilterType::Adaptive);
    encoder
        .write_image(&buffer.pixels, buffer.width, buffer.height, color_type)
        .map_err(|e| BatchError::Encode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

/// `9 - floor((quality - 1) * 9 / 99)`, clamped to [0, 9], then bucketed
/// into `image`'s `CompressionType` presets (it has no numeric level API).
fn quality_to_compression(quality: u8) -> CompressionType {
    let quality = quality.clamp(1, 100) as u32;
    let level = 9u32.saturating_sub(((quality - 1) * 9) / 99);
    match level {
        0..=2 => CompressionType::Fast,
        3..=6 => CompressionType::Default,
        _ => CompressionType::Best,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_extremes_map_to_opposite_compression_buckets() {
        assert_eq!(quality_to_compression(100), CompressionType::Fast);
        assert_eq!(quality_to_compression(1), CompressionType::Best);
    }

    #[test]
    fn encode_then_decode_round_trips_dimensions_and_channels() {
        let buffer = PixelBuffer::new(vec![200u8; 3 * 3 * 4], 3, 3, 4);
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.png");
        encode(&out, &buffer, 50).unwrap();
        let decoded = decode(&out).unwrap();
        assert_eq!((decoded.width, decoded.height, decoded.channels), (3, 3, 4));
        assert_eq!(decoded.pixels, buffer.pixels);
    }

    #[test]
    fn encode_then_decode_round_trip_is_byte_identical_for_rgb() {
        let mut pixels = vec![0u8; 4 * 2 * 3];
        for (i, p) in pixels.iter_mut().enumerate() {
            *p = (i * 7) as u8;
        }
        let buffer = PixelBuffer::new(pixels.clone(), 4, 2, 3);
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("lossless.png");
        encode(&out, &buffer, 85).unwrap();
        let decoded = decode(&out).unwrap();
        assert_eq!(decoded.pixels, pixels);
    }
}
