//! # Bounded Queue
//!
//! A FIFO channel with a fixed capacity, blocking push and pop, and a
//! terminal "done" signal: the link between adjacent pipeline stages.
//!
//! Rather than hand-rolling a mutex-and-condvar ring buffer, `set_done` is
//! expressed the idiomatic way: the last [`QueueSender`] being dropped
//! closes the underlying channel, which wakes every blocked `push`/`pop`
//! the same way an explicit terminal flag would. A stage signals "done" by
//! dropping its senders once its worker pool has drained; there is
//! deliberately no explicit `set_done()` method to call out of sequence.

use crossbeam::channel::{Receiver, Sender, TryRecvError};

/// Default queue capacity, sized so that at most a few hundred megabytes of
/// decoded pixel data are in flight between stages for typical photo-sized
/// inputs (see spec.md §5's memory-budget invariant). Callers with larger
/// average image sizes should construct a smaller capacity explicitly.
pub const DEFAULT_CAPACITY: usize = 32;

pub struct BoundedQueue<T> {
    sender: Sender<T>,
    receiver: Receiver<T>,
}

impl<T> BoundedQueue<T> {
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = crossbeam::channel::bounded(capacity);
        Self { sender, receiver }
    }

    /// A handle producers clone and drop independently; the queue is "done"
    /// once every clone (including this original) has been dropped.
    pub fn sender(&self) -> QueueSender<T> {
        QueueSender(self.sender.clone())
    }

    /// A handle consumers clone and drain independently.
    pub fn receiver(&self) -> QueueReceiver<T> {
        QueueReceiver(self.receiver.clone())
    }
}

/// Queue is closed: either every sender has been dropped (normal
/// completion) or, for [`QueueReceiver::try_pop`], the queue is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueClosed;

#[derive(Clone)]
pub struct QueueSender<T>(Sender<T>);

impl<T> QueueSender<T> {
    /// Blocks while the queue is full; fails once every receiver has
    /// dropped (no consumer left to observe the push).
    pub fn push(&self, item: T) -> Result<(), QueueClosed> {
        self.0.send(item).map_err(|_| QueueClosed)
    }
}

#[derive(Clone)]
pub struct QueueReceiver<T>(Receiver<T>);

impl<T> QueueReceiver<T> {
    /// Blocks while the queue is empty and not done; returns `None` once
    /// the queue is empty and every sender has been dropped.
    pub fn pop(&self) -> Option<T> {
        self.0.recv().ok()
    }

    /// Non-blocking pop, for drain loops that want to distinguish
    /// "temporarily empty" from "closed".
    pub fn try_pop(&self) -> Result<T, QueueClosed> {
        match self.0.try_recv() {
            Ok(item) => Ok(item),
            Err(TryRecvError::Empty) => Err(QueueClosed),
            Err(TryRecvError::Disconnected) => Err(QueueClosed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn push_then_pop_round_trips() {
        let queue = BoundedQueue::new(4);
        let sender = queue.sender();
        let receiver = queue.receiver();
        sender.push(42).unwrap();
        assert_eq!(receiver.pop(), Some(42));
    }

    #[test]
    fn pop_drains_remainder_then_reports_done() {
        let queue = BoundedQueue::new(4);
        let sender = queue.sender();
        let receiver = queue.receiver();
        sender.push(1).unwrap();
        sender.push(2).unwrap();
        drop(sender);
        assert_eq!(receiver.pop(), Some(1));
        assert_eq!(receiver.pop(), Some(2));
        assert_eq!(receiver.pop(), None);
    }

    #[test]
    fn push_blocks_on_full_queue_until_consumer_drains() {
        let queue = BoundedQueue::new(1);
        let sender = queue.sender();
        let receiver = queue.receiver();
        sender.push(1).unwrap();

        let sender2 = sender.clone();
        let handle = thread::spawn(move || sender2.push(2));

        thread::sleep(Duration::from_millis(20));
        assert_eq!(receiver.pop(), Some(1));
        assert!(handle.join().unwrap().is_ok());
        assert_eq!(receiver.pop(), Some(2));
    }

    #[test]
    fn push_after_done_fails() {
        let queue: BoundedQueue<i32> = BoundedQueue::new(4);
        let sender = queue.sender();
        let receiver = queue.receiver();
        drop(receiver);
        assert_eq!(sender.push(1), Err(QueueClosed));
    }
}
