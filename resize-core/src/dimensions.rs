// SPDX-License-Identifier: MIT
//! # Dimension Solver
//!
//! Pure arithmetic for turning an input size and a resize mode into concrete
//! output dimensions. No allocation, no I/O, never fails: any input below
//! 1px on either axis is clamped to 1.

/// How the target output size is derived from the input size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ResizeMode {
    /// Scale both axes by the same percentage (e.g. 0.5 = half size).
    ScalePercent(f64),
    /// Fix the output width; height follows if `keep_aspect_ratio`.
    FitWidth(u32),
    /// Fix the output height; width follows if `keep_aspect_ratio`.
    FitHeight(u32),
    /// Fix both axes, or fit within them when `keep_aspect_ratio`.
    ExactSize(u32, u32),
}

/// Compute output dimensions for `(in_w, in_h)` under `mode`.
///
/// Rounding is half-away-from-zero (`f64::round`'s native behavior). The
/// result is always clamped to at least 1x1. This function never fails.
pub fn solve(in_w: u32, in_h: u32, mode: ResizeMode, keep_aspect_ratio: bool) -> (u32, u32) {
    let (in_w_f, in_h_f) = (in_w as f64, in_h as f64);

    let (out_w, out_h) = match mode {
        ResizeMode::ScalePercent(scale) => (in_w_f * scale, in_h_f * scale),
        ResizeMode::FitWidth(target_width) => {
            let out_w = target_width as f64;
            let out_h = if keep_aspect_ratio {
                in_h_f * out_w / in_w_f
            } else {
                in_h_f
            };
            (out_w, out_h)
        }
        ResizeMode::FitHeight(target_height) => {
            let out_h = target_height as f64;
            let out_w = if keep_aspect_ratio {
                in_w_f * out_h / in_h_f
            } else {
                in_w_f
            };
            (out_w, out_h)
        }
        ResizeMode::ExactSize(target_width, target_height) => {
            if keep_aspect_ratio {
                let scale = (target_width as f64 / in_w_f).min(target_height as f64 / in_h_f);
                (in_w_f * scale, in_h_f * scale)
            } else {
                (target_width as f64, target_height as f64)
            }
        }
    };

    (clamp_round(out_w), clamp_round(out_h))
}

fn clamp_round(v: f64) -> u32 {
    (v.round() as i64).max(1) as u32
}
