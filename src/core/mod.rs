//! # Core Infrastructure Module
//!
//! Fundamental infrastructure shared by the pipeline and worker-pool
//! schedulers: buffer reuse, the inter-stage bounded queue, and the fixed
//! thread pool each stage runs its workers on.

pub mod buffer_pool;
pub mod queue;
pub mod worker_pool;

pub use buffer_pool::BufferPool;
pub use queue::{BoundedQueue, QueueClosed, QueueReceiver, QueueSender};
pub use worker_pool::WorkerPool;
