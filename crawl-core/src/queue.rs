use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, SendTimeoutError, Sender};
use std::time::Duration;

/// A fixed-capacity, multi-producer multi-consumer FIFO queue.
///
/// Built directly on a bounded channel: a bounded channel's blocking and
/// timed send/receive already satisfy the queue contract in full, so there
/// is nothing to hand-roll beyond a `clear` (channels have no built-in
/// drain) and a thin API that matches the spec's vocabulary.
pub struct BoundedQueue<T> {
    tx: Sender<T>,
    rx: Receiver<T>,
}

impl<T> BoundedQueue<T> {
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = bounded(capacity);
        BoundedQueue { tx, rx }
    }

    /// Blocks until there is space, then enqueues `item` at the tail.
    pub fn push(&self, item: T) {
        // A closed channel can only happen if every handle were dropped,
        // which can't occur while `self` is alive to hold one of each.
        let _ = self.tx.send(item);
    }

    /// Blocks until non-empty, then removes and returns the head.
    pub fn pop(&self) -> T {
        self.rx.recv().expect("queue sender outlives every receiver")
    }

    /// Like `push`, but gives up and returns `false` if `item` couldn't be
    /// enqueued within `timeout`.
    pub fn push_for(&self, item: T, timeout: Duration) -> bool {
        match self.tx.send_timeout(item, timeout) {
            Ok(()) => true,
            Err(SendTimeoutError::Timeout(_)) => false,
            Err(SendTimeoutError::Disconnected(_)) => false,
        }
    }

    /// Like `pop`, but gives up and returns `None` if nothing arrived
    /// within `timeout`.
    pub fn pop_for(&self, timeout: Duration) -> Option<T> {
        match self.rx.recv_timeout(timeout) {
            Ok(item) => Some(item),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Discards every buffered element in O(size) without waking blocked
    /// waiters to consume them. Capacity is unchanged.
    pub fn clear(&self) {
        while self.rx.try_recv().is_ok() {}
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.rx.capacity().unwrap_or(usize::MAX)
    }
}

impl<T> Clone for BoundedQueue<T> {
    fn clone(&self) -> Self {
        BoundedQueue {
            tx: self.tx.clone(),
            rx: self.rx.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn push_then_pop_is_fifo() {
        let q = BoundedQueue::new(4);
        q.push(1);
        q.push(2);
        q.push(3);
        assert_eq!(q.pop(), 1);
        assert_eq!(q.pop(), 2);
        assert_eq!(q.pop(), 3);
    }

    #[test]
    fn size_never_exceeds_capacity() {
        let q: BoundedQueue<u8> = BoundedQueue::new(2);
        assert!(q.push_for(1, Duration::from_millis(10)));
        assert!(q.push_for(2, Duration::from_millis(10)));
        assert!(!q.push_for(3, Duration::from_millis(10)));
        assert!(q.len() <= q.capacity());
    }

    #[test]
    fn pop_for_times_out_on_empty_queue() {
        let q: BoundedQueue<u8> = BoundedQueue::new(1);
        assert_eq!(q.pop_for(Duration::from_millis(20)), None);
    }

    #[test]
    fn clear_drops_buffered_items_without_waking_pop() {
        let q = BoundedQueue::new(4);
        q.push("a");
        q.push("b");
        q.clear();
        assert!(q.is_empty());
        assert_eq!(q.pop_for(Duration::from_millis(20)), None);
    }

    #[test]
    fn blocked_pop_wakes_on_push_from_another_thread() {
        let q: BoundedQueue<u8> = BoundedQueue::new(1);
        let producer = q.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            producer.push(42);
        });
        assert_eq!(q.pop(), 42);
        handle.join().unwrap();
    }
}
