//! # Pipeline processor
//!
//! Three stages (decode, resize, encode), connected by two bounded
//! queues, each stage backed by its own [`WorkerPool`]. Runs one batch to
//! completion and exits; nothing here outlives a single
//! [`crate::dispatch::batch_resize_custom`] call.
//!
//! Backpressure is end-to-end by construction: if the encode stage is
//! slow, `resize_queue` fills, resize workers block on push, `decode_queue`
//! fills, decode workers block, and upstream demand settles to match
//! downstream throughput without any stage needing to know about the
//! others' speed.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;

use tracing::{info, instrument};

use crate::codec;
use crate::core::{BoundedQueue, BufferPool, WorkerPool};
use crate::error::BatchError;
use crate::model::{BatchItem, BatchResult, ResizeRequest};
use resize_core::dimensions::solve;
use resize_core::resample::resize as resample;

const DECODE_WORKERS: usize = 4;
const RESIZE_WORKERS: usize = 8;
const ENCODE_WORKERS: usize = 4;

/// One item in flight between stages: either a payload to keep working on,
/// or an error already associated with this item, forwarded unchanged to
/// the next stage so it still counts toward `failed_count`.
struct StageItem {
    output_path: PathBuf,
    request: ResizeRequest,
    payload: Result<crate::model::PixelBuffer, String>,
}

/// Runs the three-stage pipeline over `items` and returns the aggregated
/// result. `stop_on_error` is intentionally not threaded through here:
/// per spec.md §4.7/§4.8, the pipeline path always completes; the
/// dispatcher avoids selecting it when `stop_on_error` is set.
#[instrument(skip(items))]
pub fn run(items: Vec<BatchItem>) -> BatchResult {
    let total = items.len();
    let result = Arc::new(Mutex::new(BatchResult::new(total)));

    let decode_queue = BoundedQueue::<StageItem>::new(crate::core::queue::DEFAULT_CAPACITY);
    let resize_queue = BoundedQueue::<StageItem>::new(crate::core::queue::DEFAULT_CAPACITY);

    // All three pools are created and start their workers running before any
    // task is enqueued, so resize and encode workers are already parked on
    // their queue's `pop()` when decode starts producing, so decode_queue's
    // capacity bound gets to actually throttle decode the moment resize falls
    // behind, rather than filling up unobserved.
    let mut decode_workers = WorkerPool::new(DECODE_WORKERS, "decode");
    let mut resize_workers = WorkerPool::new(RESIZE_WORKERS, "resize");
    let mut encode_workers = WorkerPool::new(ENCODE_WORKERS, "encode");

    {
        let resize_sender = resize_queue.sender();
        let decode_receiver = decode_queue.receiver();
        for _ in 0..RESIZE_WORKERS {
            let decode_receiver = decode_receiver.clone();
            let resize_sender = resize_sender.clone();
            resize_workers.enqueue(move || {
                while let Some(item) = decode_receiver.pop() {
                    run_resize_task(item, &resize_sender);
                }
            });
        }
    }

    {
        let resize_receiver = resize_queue.receiver();
        for _ in 0..ENCODE_WORKERS {
            let resize_receiver = resize_receiver.clone();
            let result = result.clone();
            encode_workers.enqueue(move || {
                let pool = BufferPool::new();
                while let Some(item) = resize_receiver.pop() {
                    run_encode_task(item, &pool, &result);
                }
            });
        }
    }

    {
        let sender = decode_queue.sender();
        for item in items {
            let sender = sender.clone();
            decode_workers.enqueue(move || run_decode_task(item, &sender));
        }
    }

    // Join in dependency order: decode finishing drops its queue's last
    // sender clones, which closes decode_queue and lets the resize
    // drain-loops above fall out of their `while let` and return; dropping
    // the resize pool then closes resize_queue the same way for encode.
    decode_workers.wait();
    drop(decode_workers);
    drop(decode_queue);

    resize_workers.wait();
    drop(resize_workers);
    drop(resize_queue);

    encode_workers.wait();
    drop(encode_workers);

    info!(total, "pipeline batch complete");
    // Every Arc clone lived inside an encode-worker closure; those workers
    // have been joined by the `drop(encode_workers)` above, so this is the
    // only strong reference left.
    Arc::try_unwrap(result)
        .expect("encode workers joined before result is unwrapped")
        .into_inner()
        .unwrap()
}

#[instrument(skip(sender), fields(input = %item.input_path.display()))]
fn run_decode_task(item: BatchItem, sender: &crate::core::QueueSender<StageItem>) {
    let hint = decode_hint(&item.request);
    let payload = codec::decode(&item.input_path, hint.0, hint.1).map_err(|e| e.to_string());
    let _ = sender.push(StageItem {
        output_path: item.output_path,
        request: item.request,
        payload,
    });
}

/// Only EXACT_SIZE gives both axes without needing the input's own
/// dimensions; every other mode depends on the input size to compute at
/// least one axis, so no decode-time hint can be derived for them.
fn decode_hint(request: &ResizeRequest) -> (u32, u32) {
    match request.mode {
        resize_core::dimensions::ResizeMode::ExactSize(w, h) => (w, h),
        _ => (0, 0),
    }
}

#[instrument(skip(item, sender))]
fn run_resize_task(item: StageItem, sender: &crate::core::QueueSender<StageItem>) {
    let payload = match item.payload {
        Err(e) => Err(e),
        Ok(src) => {
            let (out_w, out_h) = solve(
                src.width,
                src.height,
                item.request.mode,
                item.request.keep_aspect_ratio,
            );
            resample(
                &src.pixels,
                src.width,
                src.height,
                src.channels,
                out_w,
                out_h,
                item.request.filter,
            )
            .map(|pixels| crate::model::PixelBuffer::new(pixels, out_w, out_h, src.channels))
            .map_err(|e| BatchError::Resize(e.to_string()).to_string())
        }
    };
    let _ = sender.push(StageItem {
        output_path: item.output_path,
        request: item.request,
        payload,
    });
}

#[instrument(skip(item, pool, result))]
fn run_encode_task(item: StageItem, pool: &BufferPool, result: &Mutex<BatchResult>) {
    let outcome = match item.payload {
        Err(message) => Err(message),
        Ok(buffer) => codec::encode(&item.output_path, &buffer, item.request.quality, Some(pool))
            .map_err(|e| e.to_string()),
    };
    let mut result = result.lock().unwrap();
    match outcome {
        Ok(()) => result.record_success(),
        Err(message) => result.record_failure(message),
    }
}
