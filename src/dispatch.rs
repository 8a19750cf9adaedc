//! # Batch dispatcher
//!
//! The two public entry points (`batch_resize`, `batch_resize_custom`)
//! choose between the pipeline processor and a plain worker-pool fan-out,
//! and own the one concern the pipeline deliberately leaves out:
//! `stop_on_error`.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use tracing::{info, instrument};

use crate::codec;
use crate::core::{BufferPool, WorkerPool};
use crate::error::BatchError;
use crate::model::{BatchItem, BatchOptions, BatchResult, ResizeRequest};
use crate::pipeline;
use resize_core::dimensions::solve;
use resize_core::resample::resize as resample;

/// Below this batch size, or whenever `max_speed` is false, the pipeline
/// processor's per-stage worker pools cost more to spin up than they save.
const PIPELINE_MIN_BATCH_SIZE: usize = 20;

/// Builds one [`BatchItem`] per input by joining its filename onto
/// `output_dir`, applying `request` uniformly to all of them, then
/// delegates to [`batch_resize_custom`].
#[instrument(skip(input_paths, request, options))]
pub fn batch_resize(
    input_paths: &[PathBuf],
    output_dir: &Path,
    request: ResizeRequest,
    options: BatchOptions,
) -> BatchResult {
    let items = input_paths
        .iter()
        .map(|input_path| BatchItem {
            input_path: input_path.clone(),
            output_path: output_dir.join(file_name_or_whole_path(input_path)),
            request,
        })
        .collect();
    batch_resize_custom(items, options)
}

fn file_name_or_whole_path(path: &Path) -> PathBuf {
    path.file_name().map(PathBuf::from).unwrap_or_else(|| path.to_path_buf())
}

/// Runs `items` to completion, picking the pipeline processor when
/// `options.max_speed` is set and the batch is large enough to amortize its
/// per-stage worker pools, and a worker-pool fan-out otherwise.
#[instrument(skip(items, options))]
pub fn batch_resize_custom(items: Vec<BatchItem>, options: BatchOptions) -> BatchResult {
    let mut result = BatchResult::new(items.len());

    // Every item gets its own validation outcome, even on the `batch_resize`
    // path where all items share one request: that keeps `errors.len()`
    // equal to `failed_count`, and total equal to success_count + failed_count,
    // regardless of how many items turn out to share the same bad option.
    let mut valid_items = Vec::with_capacity(items.len());
    for item in items {
        match item.request.validate() {
            Ok(()) => valid_items.push(item),
            Err(e) => result.record_failure(e.to_string()),
        }
    }

    if valid_items.is_empty() {
        return result;
    }

    let use_pipeline =
        options.max_speed && valid_items.len() >= PIPELINE_MIN_BATCH_SIZE && !options.stop_on_error;
    info!(
        batch_size = valid_items.len(),
        use_pipeline, "dispatching batch"
    );

    let run = if use_pipeline {
        pipeline::run(valid_items)
    } else {
        run_worker_pool(valid_items, options)
    };

    result.success_count += run.success_count;
    result.failed_count += run.failed_count;
    result.errors.extend(run.errors);
    result
}

/// Worker-pool fan-out: one task per item on a fixed thread count, each
/// running the single-image resize path end to end. Honors
/// `stop_on_error` via a shared flag each task checks before starting.
fn run_worker_pool(items: Vec<BatchItem>, options: BatchOptions) -> BatchResult {
    let total = items.len();
    let thread_count = options.resolved_thread_count(total);
    let result = std::sync::Arc::new(Mutex::new(BatchResult::new(total)));
    let aborted = std::sync::Arc::new(AtomicBool::new(false));

    let mut pool = WorkerPool::new(thread_count, "worker");
    for item in items {
        let result = result.clone();
        let aborted = aborted.clone();
        let stop_on_error = options.stop_on_error;
        pool.enqueue(move || {
            if stop_on_error && aborted.load(Ordering::Relaxed) {
                return;
            }
            let pool = BufferPool::new();
            match resize_one(&item, &pool) {
                Ok(()) => {
                    result.lock().unwrap().record_success();
                }
                Err(e) => {
                    if stop_on_error {
                        aborted.store(true, Ordering::Relaxed);
                    }
                    result.lock().unwrap().record_failure(e.to_string());
                }
            }
        });
    }
    pool.wait();
    drop(pool);

    info!(total, "worker-pool batch complete");
    std::sync::Arc::try_unwrap(result)
        .expect("worker pool joined before result is unwrapped")
        .into_inner()
        .unwrap()
}

/// detect format -> solve dimensions -> decode with hint -> resample ->
/// encode -> release buffers. Used by every worker-pool task.
fn resize_one(item: &BatchItem, pool: &BufferPool) -> Result<(), BatchError> {
    let hint = decode_hint(&item.request);
    let source = codec::decode(&item.input_path, hint.0, hint.1)?;

    let (out_w, out_h) = solve(
        source.width,
        source.height,
        item.request.mode,
        item.request.keep_aspect_ratio,
    );
    let channels = source.channels;
    let resized = resample(
        &source.pixels,
        source.width,
        source.height,
        channels,
        out_w,
        out_h,
        item.request.filter,
    )
    .map_err(|e| BatchError::Resize(e.to_string()))?;
    drop(source);

    let buffer = crate::model::PixelBuffer::new(resized, out_w, out_h, channels);
    codec::encode(&item.output_path, &buffer, item.request.quality, Some(pool))
}

fn decode_hint(request: &ResizeRequest) -> (u32, u32) {
    match request.mode {
        resize_core::dimensions::ResizeMode::ExactSize(w, h) => (w, h),
        _ => (0, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ResizeRequest;
    use resize_core::dimensions::ResizeMode;
    use resize_core::resample::Filter;

    fn write_test_png(path: &std::path::Path, w: u32, h: u32) {
        let buffer = crate::model::PixelBuffer::new(vec![64u8; (w * h * 3) as usize], w, h, 3);
        codec::encode(path, &buffer, 90, None).unwrap();
    }

    #[test]
    fn small_batch_uses_worker_pool_and_resizes_every_item() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("out");
        std::fs::create_dir_all(&out_dir).unwrap();

        let mut inputs = Vec::new();
        for i in 0..3 {
            let input = dir.path().join(format!("in{i}.png"));
            write_test_png(&input, 10, 10);
            inputs.push(input);
        }

        let request = ResizeRequest::new(ResizeMode::ScalePercent(0.5), Filter::Box);
        let result = batch_resize(&inputs, &out_dir, request, BatchOptions::default());
        assert_eq!(result.total, 3);
        assert_eq!(result.success_count, 3);
    }

    #[test]
    fn invalid_request_fails_whole_batch_up_front() {
        let dir = tempfile::tempdir().unwrap();
        let mut request = ResizeRequest::new(ResizeMode::ScalePercent(0.5), Filter::Box);
        request.quality = 0;
        let result = batch_resize(&[dir.path().join("missing.png")], dir.path(), request, BatchOptions::default());
        assert_eq!(result.failed_count, 1);
        assert_eq!(result.success_count, 0);
    }

    #[test]
    fn heterogeneous_batch_keeps_invariant_when_some_requests_are_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("out");
        std::fs::create_dir_all(&out_dir).unwrap();

        let good_request = ResizeRequest::new(ResizeMode::ScalePercent(0.5), Filter::Box);
        let mut bad_request = good_request;
        bad_request.quality = 0;

        let mut items = Vec::new();
        for i in 0..10 {
            let input = dir.path().join(format!("in{i}.png"));
            write_test_png(&input, 10, 10);
            items.push(crate::model::BatchItem {
                input_path: input,
                output_path: out_dir.join(format!("out{i}.png")),
                request: good_request,
            });
        }
        items.push(crate::model::BatchItem {
            input_path: dir.path().join("in0.png"),
            output_path: out_dir.join("out_bad.png"),
            request: bad_request,
        });

        let result = batch_resize_custom(items, BatchOptions::default());
        assert_eq!(result.total, 11);
        assert_eq!(result.success_count, 10);
        assert_eq!(result.failed_count, 1);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.success_count + result.failed_count, result.total);
    }

    #[test]
    fn stop_on_error_short_circuits_remaining_items() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("out");
        std::fs::create_dir_all(&out_dir).unwrap();

        let mut inputs = vec![dir.path().join("missing.png")];
        for i in 0..5 {
            let input = dir.path().join(format!("in{i}.png"));
            write_test_png(&input, 10, 10);
            inputs.push(input);
        }

        let request = ResizeRequest::new(ResizeMode::ScalePercent(0.5), Filter::Box);
        let options = BatchOptions {
            stop_on_error: true,
            num_threads: 1,
            ..Default::default()
        };
        let result = batch_resize(&inputs, &out_dir, request, options);
        assert_eq!(result.total, 6);
        assert!(result.failed_count >= 1);
        assert!(result.success_count < 5);
    }
}
