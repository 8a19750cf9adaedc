//! JPEG decode/encode adapter.
//!
//! Decoding goes through `jpeg-decoder` directly rather than through the
//! `image` crate's high-level reader, because only the low-level decoder
//! exposes the integer downscale-on-decode hint (`Decoder::scale`) this
//! adapter needs (`image` always decodes at full resolution). Encoding goes
//! through `image`'s `JpegEncoder`, which is the common path shared with
//! the other formats' encoders.

use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use jpeg_decoder::{Decoder, PixelFormat};
use memmap2::Mmap;

use crate::core::BufferPool;
use crate::error::BatchError;
use crate::model::PixelBuffer;

/// Decodes `path`, requesting the decoder produce roughly `hint_w x hint_h`
/// pixels when that's strictly smaller than the stored dimensions. The
/// decoder only supports 1/2, 1/4 and 1/8 integer sub-scales, so the actual
/// output size may differ from the hint, so callers resample to the exact
/// target regardless.
pub fn decode(path: &Path, hint_w: u32, hint_h: u32) -> Result<PixelBuffer, BatchError> {
    let file = File::open(path).map_err(|_| BatchError::FileNotFound(path.to_path_buf()))?;

    match unsafe { Mmap::map(&file) } {
        Ok(mmap) => decode_from_reader(Cursor::new(&mmap[..]), hint_w, hint_h, path),
        Err(_) => decode_from_reader(BufReader::new(file), hint_w, hint_h, path),
    }
}

fn decode_from_reader<R: Read>(
    reader: R,
    hint_w: u32,
    hint_h: u32,
    path: &Path,
) -> Result<PixelBuffer, BatchError> {
    let mut decoder = Decoder::new(reader);

    if hint_w > 0 && hint_h > 0 && hint_w <= u16::MAX as u32 && hint_h <= u16::MAX as u32 {
        // Errors here mean the scale request was rejected (e.g. metadata
        // not read yet); fall back to full-resolution decode rather than
        // failing the whole item over a hint.
        let _ = decoder.scale(hint_w as u16, hint_h as u16);
    }

    let pixels = decoder.decode().map_err(|e| BatchError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let info = decoder.info().ok_or_else(|| BatchError::Decode {
        path: path.to_path_buf(),
        reason: "decoder produced no image metadata".into(),
    })?;

    let channels = match info.pixel_format {
        PixelFormat::L8 => 1,
        PixelFormat::L16 => {
            return Err(BatchError::UnsupportedFormat(
                "16-bit JPEG pipelines are not supported".into(),
            ))
        }
        PixelFormat::RGB24 => 3,
        PixelFormat::CMYK32 => 4,
    };

    Ok(PixelBuffer::new(
        pixels,
        info.width as u32,
        info.height as u32,
        channels,
    ))
}

/// Encodes `buffer` as JPEG at `quality` (1-100). 4-channel input is
/// stripped to 3 channels first, using a scratch buffer borrowed from
/// `pool` when one is supplied (the pipeline gives each encode worker its
/// own pool; the worker-pool path passes `None` and allocates per call).
pub fn encode(
    path: &Path,
    buffer: &PixelBuffer,
    quality: u8,
    pool: Option<&BufferPool>,
) -> Result<(), BatchError> {
    let file = File::create(path).map_err(|e| BatchError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut encoder = JpegEncoder::new_with_quality(file, quality);

    match buffer.channels {
        1 => encoder
            .encode(&buffer.pixels, buffer.width, buffer.height, ExtendedColorType::L8)
            .map_err(|e| BatchError::Encode {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }),
        3 => encoder
            .encode(&buffer.pixels, buffer.width, buffer.height, ExtendedColorType::Rgb8)
            .map_err(|e| BatchError::Encode {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }),
        4 => {
            let rgb_len = buffer.width as usize * buffer.height as usize * 3;
            let mut rgb = match pool {
                Some(pool) => pool.acquire(rgb_len),
                None => Vec::with_capacity(rgb_len),
            };
            rgb.resize(rgb_len, 0);
            strip_alpha_channel(&buffer.pixels, &mut rgb);

            let result = encoder
                .encode(&rgb, buffer.width, buffer.height, ExtendedColorType::Rgb8)
                .map_err(|e| BatchError::Encode {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });

            if let Some(pool) = pool {
                pool.release(rgb, rgb_len);
            }
            result
        }
        other => Err(BatchError::UnsupportedFormat(format!(
            "jpeg encode does not support {other}-channel input"
        ))),
    }
}

/// De-interleaves RGBA into RGB, dropping the alpha byte of each pixel.
/// Written as a chunked iterator pass rather than a manual index loop so
/// the compiler can auto-vectorize it; see `DESIGN.md` for why this
/// adapter doesn't reach for hand-written SIMD intrinsics.
fn strip_alpha_channel(rgba: &[u8], rgb: &mut [u8]) {
    for (src, dst) in rgba.chunks_exact(4).zip(rgb.chunks_exact_mut(3)) {
        dst.copy_from_slice(&src[..3]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_alpha_channel_drops_every_fourth_byte() {
        let rgba = [1, 2, 3, 255, 4, 5, 6, 128];
        let mut rgb = [0u8; 6];
        strip_alpha_channel(&rgba, &mut rgb);
        assert_eq!(rgb, [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn encode_rejects_two_channel_input() {
        let buffer = PixelBuffer::new(vec![0u8; 8], 2, 2, 2);
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.jpg");
        assert!(matches!(
            encode(&out, &buffer, 85, None),
            Err(BatchError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn encode_rgb_then_decode_round_trip_dimensions() {
        let buffer = PixelBuffer::new(vec![128u8; 4 * 4 * 3], 4, 4, 3);
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.jpg");
        encode(&out, &buffer, 90, None).unwrap();
        let decoded = decode(&out, 0, 0).unwrap();
        assert_eq!((decoded.width, decoded.height), (4, 4));
    }
}
