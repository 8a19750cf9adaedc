//! # imgforge
//!
//! A high-throughput batch image resizing engine. Given a list of input
//! images and a resize request, decodes, resamples and re-encodes every
//! image, choosing between two scheduling strategies depending on batch
//! size:
//!
//! - A **pipeline processor** ([`pipeline`]) for large batches: three
//!   concurrent stages (decode, resize, encode), each backed by its own
//!   worker pool, connected by bounded queues so back-pressure flows
//!   end-to-end.
//! - A **worker-pool fan-out** for small batches or when `stop_on_error`
//!   is set: one task per image, run to completion independently.
//!
//! ## Architecture
//!
//! - **Dimension solving and resampling** ([`resize_core`]): pure
//!   functions with no I/O, usable outside the batch engine.
//! - **Codec adapters** ([`codec`]): a uniform decode/encode contract over
//!   JPEG, PNG, WebP and BMP.
//! - **Core infrastructure** ([`core`]): the buffer pool, bounded queue and
//!   worker pool the schedulers are built from.
//! - **Batch dispatcher** ([`dispatch`]): the public entry points,
//!   `batch_resize` and `batch_resize_custom`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use imgforge::{batch_resize, BatchOptions, ResizeRequest};
//! use resize_core::dimensions::ResizeMode;
//! use resize_core::resample::Filter;
//! use std::path::PathBuf;
//!
//! let inputs = vec![PathBuf::from("photo1.jpg"), PathBuf::from("photo2.png")];
//! let request = ResizeRequest::new(ResizeMode::FitWidth(800), Filter::Mitchell);
//! let result = batch_resize(&inputs, "out/".as_ref(), request, BatchOptions::default());
//! println!("{} succeeded, {} failed", result.success_count, result.failed_count);
//! ```
//!
//! ## Non-goals
//!
//! Animated images (only the first/only frame is processed), color
//! management (no ICC profile handling, no gamma-correct resampling),
//! EXIF metadata (dropped on re-encode), 16-bit pipelines (8-bit per
//! channel throughout), in-memory sources (every input is a file path),
//! and streaming resize of images too large to fit in memory.

pub mod codec;
pub mod config;
pub mod core;
pub mod dispatch;
pub mod error;
pub mod model;
pub mod pipeline;

pub use config::{FilterArg, ModeArg, ResizeConfig};
pub use dispatch::{batch_resize, batch_resize_custom};
pub use error::BatchError;
pub use model::{BatchItem, BatchOptions, BatchResult, PixelBuffer, ResizeRequest};

pub use resize_core;
