//! WebP decode/encode adapter.
//!
//! Decoding goes through the `image` crate (its bundled `image-webp`
//! decoder reads both lossy and lossless streams). Encoding goes through
//! the separate `webp` crate instead: `image`'s WebP encoder only produces
//! lossless output, with no quality parameter, which can't satisfy the
//! quality contract every other lossy format here honors. This is the one
//! adapter in the set not grounded directly in the teacher crate (see
//! `DESIGN.md` for the substitution rationale).

use std::path::Path;

use crate::codec::dynamic_image_to_pixel_buffer;
use crate::error::BatchError;
use crate::model::PixelBuffer;

pub fn decode(path: &Path) -> Result<PixelBuffer, BatchError> {
    let bytes = std::fs::read(path).map_err(|_| BatchError::FileNotFound(path.to_path_buf()))?;
    let dynamic_image = image::load_from_memory(&bytes).map_err(|e| BatchError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(dynamic_image_to_pixel_buffer(dynamic_image))
}

/// WebP has no grayscale mode; per spec.md §4.3, single- and two-channel
/// input is rejected rather than silently widened: callers that want
/// grayscale-to-WebP must convert to RGB themselves first.
pub fn encode(path: &Path, buffer: &PixelBuffer, quality: u8) -> Result<(), BatchError> {
    let encoder = match buffer.channels {
        3 => webp::Encoder::from_rgb(&buffer.pixels, buffer.width, buffer.height),
        4 => webp::Encoder::from_rgba(&buffer.pixels, buffer.width, buffer.height),
        other => {
            return Err(BatchError::UnsupportedFormat(format!(
                "webp encode does not support {other}-channel input; convert to RGB first"
            )))
        }
    };

    let encoded = encoder.encode(quality as f32);
    std::fs::write(path, &*encoded).map_err(|e| BatchError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}
