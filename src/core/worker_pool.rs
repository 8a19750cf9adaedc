//! # Worker Pool
//!
//! A fixed-size set of worker threads draining a single FIFO task queue.
//! `wait()` blocks until the queue is empty and no task is currently in
//! flight, tracked with a [`crossbeam::sync::WaitGroup`] rather than a
//! hand-rolled counter-plus-condvar: each enqueued task carries a clone of
//! the wait group and drops it when it finishes, so `wait()` is simply
//! "block until every clone is gone". The destructor stops accepting new
//! work and joins every worker thread.

use crossbeam::channel::{unbounded, Sender};
use crossbeam::sync::WaitGroup;
use std::thread::JoinHandle;

type Task = Box<dyn FnOnce() + Send + 'static>;

pub struct WorkerPool {
    sender: Option<Sender<Task>>,
    workers: Vec<JoinHandle<()>>,
    wait_group: WaitGroup,
}

impl WorkerPool {
    pub fn new(num_workers: usize, name: &str) -> Self {
        let (sender, receiver) = unbounded::<Task>();
        let workers = (0..num_workers)
            .map(|index| {
                let receiver = receiver.clone();
                std::thread::Builder::new()
                    .name(format!("{name}-{index}"))
                    .spawn(move || {
                        for task in receiver.iter() {
                            task();
                        }
                    })
                    .expect("failed to spawn worker thread")
            })
            .collect();
        Self {
            sender: Some(sender),
            workers,
            wait_group: WaitGroup::new(),
        }
    }

    /// Schedules `task` to run on the next free worker. Panics if called
    /// after [`WorkerPool::wait`] has dropped the send side; callers
    /// enqueue all work for a batch before the first `wait()`.
    pub fn enqueue(&self, task: impl FnOnce() + Send + 'static) {
        let guard = self.wait_group.clone();
        let sender = self
            .sender
            .as_ref()
            .expect("enqueue called after the pool stopped accepting work");
        let _ = sender.send(Box::new(move || {
            task();
            drop(guard);
        }));
    }

    /// Blocks until every task enqueued so far has run to completion.
    pub fn wait(&mut self) {
        let wait_group = std::mem::replace(&mut self.wait_group, WaitGroup::new());
        wait_group.wait();
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.sender.take();
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn wait_blocks_until_all_enqueued_tasks_complete() {
        let pool = WorkerPool::new(4, "test");
        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..50 {
            let counter = counter.clone();
            pool.enqueue(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        let mut pool = pool;
        pool.wait();
        assert_eq!(counter.load(Ordering::SeqCst), 50);
    }

    #[test]
    fn drop_joins_all_workers() {
        let counter = Arc::new(AtomicUsize::new(0));
        {
            let pool = WorkerPool::new(2, "test-drop");
            for _ in 0..10 {
                let counter = counter.clone();
                pool.enqueue(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                });
            }
        }
        assert_eq!(counter.load(Ordering::SeqCst), 10);
    }
}
