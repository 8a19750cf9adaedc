//! # Buffer Pool Module
//!
//! A thread-safe freelist of byte buffers keyed by capacity, used by the
//! encode stage to amortize intermediate-format conversions (e.g. stripping
//! the alpha channel off an RGBA buffer before a JPEG encode). The pipeline
//! gives each encode worker its own pool rather than sharing one across the
//! stage, which eliminates contention entirely instead of just reducing it.

use std::sync::Mutex;

/// Entries the pool will hold before it starts freeing released buffers
/// instead of keeping them.
const MAX_POOL_ENTRIES: usize = 32;

pub struct BufferPool {
    entries: Mutex<Vec<(usize, Vec<u8>)>>,
}

impl BufferPool {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Returns a buffer with capacity at least `size`. Removes and returns
    /// the first suitable entry in the pool (first-fit); allocates a fresh
    /// buffer if none fits.
    pub fn acquire(&self, size: usize) -> Vec<u8> {
        let mut entries = self.entries.lock().unwrap();
        if let Some(pos) = entries.iter().position(|(capacity, _)| *capacity >= size) {
            let (_, buf) = entries.remove(pos);
            buf
        } else {
            Vec::with_capacity(size)
        }
    }

    /// Returns `buf` to the pool under its recorded `capacity`, unless the
    /// pool is already at [`MAX_POOL_ENTRIES`], in which case it is freed.
    /// Entries are never shrunk before being stored.
    pub fn release(&self, buf: Vec<u8>, capacity: usize) {
        let mut entries = self.entries.lock().unwrap();
        if entries.len() < MAX_POOL_ENTRIES {
            entries.push((capacity, buf));
        }
    }

    /// `(entry_count, total_reserved_capacity)`, for diagnostics only.
    pub fn stats(&self) -> (usize, usize) {
        let entries = self.entries.lock().unwrap();
        let total_capacity = entries.iter().map(|(capacity, _)| *capacity).sum();
        (entries.len(), total_capacity)
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new()
    }
}
