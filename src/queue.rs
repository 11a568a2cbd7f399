use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

use crate::frame::Frame;
use crate::port::PortHandle;

/// Default number of (frame, ingress port) pairs the queue holds before
/// producers start blocking.
pub static DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Bounded FIFO of (frame, ingress port) pairs between the receiver tasks
/// and the switching loop.
///
/// Many producers, one consumer. Order within a single producer is
/// preserved, order across producers is whatever the lock hands out. Both
/// ends park on a condvar instead of spinning: `pop` waits for an item,
/// `push` waits for room, so an idle switch consumes no CPU.
pub struct FrameQueue {
    inner: Mutex<VecDeque<(Frame, PortHandle)>>,
    capacity: usize,
    not_empty: Condvar,
    not_full: Condvar,
}

impl FrameQueue {
    pub fn new() -> Self {
        FrameQueue::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        FrameQueue {
            inner: Mutex::new(VecDeque::new()),
            capacity: capacity,
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
        }
    }

    /// Appends one pair to the queue. Blocks while the queue is at
    /// capacity; the backpressure ends up in the kernel socket queue of the
    /// ingress port.
    pub fn push(&self, frame: Frame, port: PortHandle) {
        let mut queue = self.inner.lock().unwrap();
        while queue.len() >= self.capacity {
            queue = self.not_full.wait(queue).unwrap();
        }
        queue.push_back((frame, port));
        self.not_empty.notify_one();
    }

    /// Removes and returns the oldest pair, parking the calling thread
    /// until one is available.
    pub fn pop(&self) -> (Frame, PortHandle) {
        let mut queue = self.inner.lock().unwrap();
        loop {
            if let Some(pair) = queue.pop_front() {
                self.not_full.notify_one();
                return pair;
            }
            queue = self.not_empty.wait(queue).unwrap();
        }
    }

    /// Number of pairs currently queued.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for FrameQueue {
    fn default() -> Self {
        FrameQueue::new()
    }
}
