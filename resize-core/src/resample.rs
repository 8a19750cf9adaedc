// SPDX-License-Identifier: MIT
//! # Resampler
//!
//! Pure function: given a source pixel buffer, its size and channel count,
//! and a target size and filter, produces a destination pixel buffer of the
//! target size. Backed by `fast_image_resize`'s SIMD convolution kernels.
//!
//! Edge samples are clamped at the image boundary (no wrap, no mirror);
//! this is `fast_image_resize`'s native convolution behavior and requires no
//! extra handling here.

use fast_image_resize as fir;
use fir::images::{TypedImage, TypedImageRef};
use fir::pixels::{U8, U8x2, U8x3, U8x4};
use fir::{ResizeOptions, Resizer};

/// Resampling kernel selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Filter {
    Mitchell,
    CatmullRom,
    Box,
    Triangle,
}

impl From<Filter> for fir::FilterType {
    fn from(f: Filter) -> Self {
        match f {
            Filter::Mitchell => fir::FilterType::Mitchell,
            Filter::CatmullRom => fir::FilterType::CatmullRom,
            Filter::Box => fir::FilterType::Box,
            // fast_image_resize's Bilinear is the triangle (linear) kernel.
            Filter::Triangle => fir::FilterType::Bilinear,
        }
    }
}

/// Downscale ratio at or above which a requested MITCHELL filter is silently
/// substituted for TRIANGLE: materially cheaper, no perceptible quality
/// loss at this degree of downscaling.
const MITCHELL_DEGRADE_RATIO: f64 = 3.0;

#[derive(Debug)]
pub enum ResampleError {
    InvalidDimensions,
    UnsupportedChannelCount(u8),
    Fir(fir::ResizeError),
    ImageBuf(fir::ImageBufferError),
}

impl std::fmt::Display for ResampleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResampleError::InvalidDimensions => write!(f, "source or destination dimensions must be positive"),
            ResampleError::UnsupportedChannelCount(c) => write!(f, "unsupported channel count: {c}"),
            ResampleError::Fir(e) => write!(f, "resize error: {e}"),
            ResampleError::ImageBuf(e) => write!(f, "image buffer error: {e}"),
        }
    }
}

impl std::error::Error for ResampleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResampleError::Fir(e) => Some(e),
            ResampleError::ImageBuf(e) => Some(e),
            _ => None,
        }
    }
}

impl From<fir::ResizeError> for ResampleError {
    fn from(e: fir::ResizeError) -> Self {
        Self::Fir(e)
    }
}
impl From<fir::ImageBufferError> for ResampleError {
    fn from(e: fir::ImageBufferError) -> Self {
        Self::ImageBuf(e)
    }
}

/// If `filter` is MITCHELL and the larger-axis downscale ratio is at least
/// [`MITCHELL_DEGRADE_RATIO`], substitute TRIANGLE. Otherwise return `filter`
/// unchanged.
pub fn effective_filter(src_w: u32, src_h: u32, dst_w: u32, dst_h: u32, filter: Filter) -> Filter {
    if filter != Filter::Mitchell {
        return filter;
    }
    let ratio_w = src_w as f64 / dst_w.max(1) as f64;
    let ratio_h = src_h as f64 / dst_h.max(1) as f64;
    if ratio_w.max(ratio_h) >= MITCHELL_DEGRADE_RATIO {
        Filter::Triangle
    } else {
        Filter::Mitchell
    }
}

/// Resize a tightly-packed `channels`-per-pixel buffer from `src_w x src_h`
/// to `dst_w x dst_h`, applying the Mitchell-to-Triangle downscale policy.
///
/// `channels` must be in `{1, 2, 3, 4}`. Fails only on non-positive
/// dimensions or an unsupported channel count.
pub fn resize(
    src: &[u8],
    src_w: u32,
    src_h: u32,
    channels: u8,
    dst_w: u32,
    dst_h: u32,
    filter: Filter,
) -> Result<Vec<u8>, ResampleError> {
    if src_w == 0 || src_h == 0 || dst_w == 0 || dst_h == 0 {
        return Err(ResampleError::InvalidDimensions);
    }

    let filter = effective_filter(src_w, src_h, dst_w, dst_h, filter);
    let opts = ResizeOptions::new()
        .resize_alg(fir::ResizeAlg::Convolution(filter.into()))
        .use_alpha(false);

    let mut resizer = Resizer::new();
    let mut dst = vec![0u8; dst_w as usize * dst_h as usize * channels as usize];

    match channels {
        1 => {
            let src_view = TypedImageRef::<U8>::from_buffer(src_w, src_h, src)?;
            let mut dst_view = TypedImage::<U8>::from_buffer(dst_w, dst_h, &mut dst)?;
            resizer.resize_typed(&src_view, &mut dst_view, &opts)?;
        }
        2 => {
            let src_view = TypedImageRef::<U8x2>::from_buffer(src_w, src_h, src)?;
            let mut dst_view = TypedImage::<U8x2>::from_buffer(dst_w, dst_h, &mut dst)?;
            resizer.resize_typed(&src_view, &mut dst_view, &opts)?;
        }
        3 => {
            let src_view = TypedImageRef::<U8x3>::from_buffer(src_w, src_h, src)?;
            let mut dst_view = TypedImage::<U8x3>::from_buffer(dst_w, dst_h, &mut dst)?;
            resizer.resize_typed(&src_view, &mut dst_view, &opts)?;
        }
        4 => {
            let src_view = TypedImageRef::<U8x4>::from_buffer(src_w, src_h, src)?;
            let mut dst_view = TypedImage::<U8x4>::from_buffer(dst_w, dst_h, &mut dst)?;
            resizer.resize_typed(&src_view, &mut dst_view, &opts)?;
        }
        other => return Err(ResampleError::UnsupportedChannelCount(other)),
    }

    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mitchell_degrades_to_triangle_past_ratio_three() {
        assert_eq!(
            effective_filter(3000, 3000, 500, 500, Filter::Mitchell),
            Filter::Triangle
        );
    }

    #[test]
    fn mitchell_survives_mild_downscale() {
        assert_eq!(
            effective_filter(1000, 1000, 500, 500, Filter::Mitchell),
            Filter::Mitchell
        );
    }

    #[test]
    fn non_mitchell_filters_never_degrade() {
        assert_eq!(
            effective_filter(3000, 3000, 500, 500, Filter::CatmullRom),
            Filter::CatmullRom
        );
    }

    #[test]
    fn resize_upscale_1x1_to_10x10() {
        let src = vec![128u8; 4];
        let out = resize(&src, 1, 1, 4, 10, 10, Filter::Triangle).unwrap();
        assert_eq!(out.len(), 10 * 10 * 4);
    }

    #[test]
    fn resize_downscale_100x100_to_1x1() {
        let src = vec![200u8; 100 * 100 * 3];
        let out = resize(&src, 100, 100, 3, 1, 1, Filter::Box).unwrap();
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn resize_rejects_zero_dimensions() {
        let src = vec![0u8; 16];
        assert!(matches!(
            resize(&src, 0, 4, 4, 10, 10, Filter::Box),
            Err(ResampleError::InvalidDimensions)
        ));
    }

    #[test]
    fn resize_grayscale_single_channel() {
        let src = vec![10u8; 8 * 8];
        let out = resize(&src, 8, 8, 1, 4, 4, Filter::CatmullRom).unwrap();
        assert_eq!(out.len(), 16);
    }
}
