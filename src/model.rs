//! # Data model
//!
//! The entities the batch engine passes between its stages. None of these
//! types know how to decode, resize, or encode anything: they are plain
//! data, moved by value between the dispatcher, the pipeline stages, and the
//! codec adapters.

use std::path::PathBuf;

use resize_core::dimensions::ResizeMode;
use resize_core::resample::Filter;

use crate::error::BatchError;

/// Immutable per-task resize specification.
#[derive(Clone, Copy, Debug)]
pub struct ResizeRequest {
    pub mode: ResizeMode,
    pub keep_aspect_ratio: bool,
    /// 1-100, applies to lossy encoders; ignored by BMP.
    pub quality: u8,
    pub filter: Filter,
}

impl ResizeRequest {
    pub fn new(mode: ResizeMode, filter: Filter) -> Self {
        Self {
            mode,
            keep_aspect_ratio: true,
            quality: 85,
            filter,
        }
    }

    /// Validates option ranges that the dimension solver itself never
    /// checks (it clamps instead of failing). Called once per request by
    /// the dispatcher before any work is scheduled.
    pub fn validate(&self) -> Result<(), BatchError> {
        if !(1..=100).contains(&self.quality) {
            return Err(BatchError::InvalidOption {
                field: "quality".into(),
                reason: format!("must be in 1..=100, got {}", self.quality),
            });
        }
        match self.mode {
            ResizeMode::ScalePercent(scale) if scale <= 0.0 => {
                return Err(BatchError::InvalidOption {
                    field: "scale_percent".into(),
                    reason: format!("must be positive, got {scale}"),
                });
            }
            ResizeMode::FitWidth(0) => {
                return Err(BatchError::InvalidOption {
                    field: "target_width".into(),
                    reason: "must be positive".into(),
                });
            }
            ResizeMode::FitHeight(0) => {
                return Err(BatchError::InvalidOption {
                    field: "target_height".into(),
                    reason: "must be positive".into(),
                });
            }
            ResizeMode::ExactSize(0, _) | ResizeMode::ExactSize(_, 0) => {
                return Err(BatchError::InvalidOption {
                    field: "target_width/target_height".into(),
                    reason: "both must be positive".into(),
                });
            }
            _ => {}
        }
        Ok(())
    }
}

/// One unit of work: an input file, an output file, and the request to
/// apply. The output path's extension determines the output format.
#[derive(Clone, Debug)]
pub struct BatchItem {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub request: ResizeRequest,
}

/// Scheduling and failure-handling knobs shared by an entire batch call.
#[derive(Clone, Copy, Debug)]
pub struct BatchOptions {
    /// 0 means adaptive (see [`BatchOptions::resolved_thread_count`]).
    pub num_threads: usize,
    pub stop_on_error: bool,
    /// Selects the pipeline scheduler over the worker-pool scheduler when
    /// the batch is large enough (see [`crate::dispatch`]).
    pub max_speed: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            num_threads: 0,
            stop_on_error: false,
            max_speed: true,
        }
    }
}

impl BatchOptions {
    /// Thread count the dispatcher should use for a batch of `batch_size`
    /// items when `num_threads == 0`.
    pub fn resolved_thread_count(&self, batch_size: usize) -> usize {
        if self.num_threads != 0 {
            return self.num_threads;
        }
        match batch_size {
            n if n < 5 => 1,
            n if n < 20 => 2,
            n if n < 50 => 4,
            _ => 8,
        }
    }
}

/// A decoded or resized in-flight image: raw samples plus enough metadata
/// to reinterpret them. Exclusively owned by whichever stage currently
/// holds it, and ownership transfers with the value when it moves between
/// queues.
#[derive(Clone, Debug)]
pub struct PixelBuffer {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// 1 (grayscale), 2 (grayscale+alpha), 3 (RGB) or 4 (RGBA).
    pub channels: u8,
}

impl PixelBuffer {
    pub fn new(pixels: Vec<u8>, width: u32, height: u32, channels: u8) -> Self {
        Self {
            pixels,
            width,
            height,
            channels,
        }
    }

    pub fn byte_len(&self) -> usize {
        self.width as usize * self.height as usize * self.channels as usize
    }
}

/// Outcome of a completed `batch_resize`/`batch_resize_custom` call.
/// `errors` is in completion order, not input order; the core makes no
/// stable-ordering guarantee (see `SPEC_FULL.md` §1, spec.md §5).
#[derive(Clone, Debug, Default)]
pub struct BatchResult {
    pub total: usize,
    pub success_count: usize,
    pub failed_count: usize,
    pub errors: Vec<String>,
}

impl BatchResult {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    pub fn record_success(&mut self) {
        self.success_count += 1;
    }

    pub fn record_failure(&mut self, message: String) {
        self.failed_count += 1;
        self.errors.push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_request_rejects_out_of_range_quality() {
        let mut req = ResizeRequest::new(ResizeMode::ScalePercent(0.5), Filter::Box);
        req.quality = 0;
        assert!(req.validate().is_err());
        req.quality = 101;
        assert!(req.validate().is_err());
        req.quality = 85;
        assert!(req.validate().is_ok());
    }

    #[test]
    fn resize_request_rejects_non_positive_scale() {
        let req = ResizeRequest::new(ResizeMode::ScalePercent(0.0), Filter::Box);
        assert!(req.validate().is_err());
    }

    #[test]
    fn batch_options_thread_count_adapts_to_batch_size() {
        let opts = BatchOptions::default();
        assert_eq!(opts.resolved_thread_count(3), 1);
        assert_eq!(opts.resolved_thread_count(10), 2);
        assert_eq!(opts.resolved_thread_count(30), 4);
        assert_eq!(opts.resolved_thread_count(200), 8);
    }

    #[test]
    fn batch_options_explicit_thread_count_wins() {
        let opts = BatchOptions {
            num_threads: 16,
            ..Default::default()
        };
        assert_eq!(opts.resolved_thread_count(3), 16);
    }

    #[test]
    fn batch_result_tracks_counts_and_errors() {
        let mut result = BatchResult::new(3);
        result.record_success();
        result.record_success();
        result.record_failure("boom".into());
        assert_eq!(result.total, 3);
        assert_eq!(result.success_count + result.failed_count, result.total);
        assert_eq!(result.errors, vec!["boom".to_string()]);
    }
}
