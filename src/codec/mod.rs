//! # Codec adapters
//!
//! Thin, uniform wrappers over the JPEG/PNG/WebP/BMP libraries: every format
//! exposes the same `decode(path, hint_w, hint_h) -> PixelBuffer` and
//! `encode(path, &PixelBuffer, quality, pool) -> ()` shape, so the pipeline
//! and dispatcher never branch on format except to pick which adapter to
//! call. Each adapter is a no-throw island: codec panics or library errors
//! are caught here and turned into [`BatchError`] values before crossing
//! back into the stage that called them.

pub mod bmp;
pub mod detect;
pub mod jpeg;
pub mod png;
pub mod webp;

use std::path::Path;

use crate::core::BufferPool;
use crate::error::BatchError;
use crate::model::PixelBuffer;

pub use detect::{detect_input_format, output_format_from_extension, Format};

/// Detects the input format from its magic bytes, then decodes it.
/// `hint_w`/`hint_h` are a request, not a guarantee: only JPEG's decoder
/// honors them, and only to pick a supported integer sub-scale.
pub fn decode(path: &Path, hint_w: u32, hint_h: u32) -> Result<PixelBuffer, BatchError> {
    match detect_input_format(path)? {
        Format::Jpeg => jpeg::decode(path, hint_w, hint_h),
        Format::Png => png::decode(path),
        Format::WebP => webp::decode(path),
        Format::Bmp => bmp::decode(path),
    }
}

/// Derives the output format from `path`'s extension and encodes `buffer`
/// to it. `pool`, when given, is used only by the JPEG adapter to borrow a
/// scratch buffer for its RGBA-to-RGB strip.
pub fn encode(
    path: &Path,
    buffer: &PixelBuffer,
    quality: u8,
    pool: Option<&BufferPool>,
) -> Result<(), BatchError> {
    match output_format_from_extension(path) {
        Format::Jpeg => jpeg::encode(path, buffer, quality, pool),
        Format::Png => png::encode(path, buffer, quality),
        Format::WebP => webp::encode(path, buffer, quality),
        Format::Bmp => bmp::encode(path, buffer),
    }
}

/// Splits a decoded `image::DynamicImage` into the channel layout it
/// actually carries, rather than always widening to RGBA (PNG and BMP
/// inputs are frequently grayscale or RGB), and keeping the narrower layout
/// saves a resample's worth of memory and bandwidth downstream.
pub(crate) fn dynamic_image_to_pixel_buffer(img: image::DynamicImage) -> PixelBuffer {
    use image::DynamicImage;
    let (width, height) = (img.width(), img.height());
    match img {
        DynamicImage::ImageLuma8(buf) => PixelBuffer::new(buf.into_raw(), width, height, 1),
        DynamicImage::ImageLumaA8(buf) => PixelBuffer::new(buf.into_raw(), width, height, 2),
        DynamicImage::ImageRgb8(buf) => PixelBuffer::new(buf.into_raw(), width, height, 3),
        DynamicImage::ImageRgba8(buf) => PixelBuffer::new(buf.into_raw(), width, height, 4),
        other => {
            let rgba = other.to_rgba8();
            PixelBuffer::new(rgba.into_raw(), width, height, 4)
        }
    }
}

/// Picks the `image` crate's `ExtendedColorType` matching a [`PixelBuffer`]'s
/// channel count, for encoders that take an explicit color type.
pub(crate) fn channels_to_extended_color_type(
    channels: u8,
) -> Result<image::ExtendedColorType, BatchError> {
    match channels {
        1 => Ok(image::ExtendedColorType::L8),
        2 => Ok(image::ExtendedColorType::La8),
        3 => Ok(image::ExtendedColorType::Rgb8),
        4 => Ok(image::ExtendedColorType::Rgba8),
        other => Err(BatchError::UnsupportedFormat(format!(
            "unsupported channel count: {other}"
        ))),
    }
}
