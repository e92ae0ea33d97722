//! Single-producer, single-consumer queues with an explicit end marker.
//!
//! The audio queue is bounded: `put` blocks while it is full, which is what
//! throttles synthesis to the speed of playback. The display queue is
//! unbounded. Each queue carries exactly one `QueueItem::End`, sent by
//! `QueueSender::close`, after every real item.

use crossbeam_channel::{Receiver, Sender};
use thiserror::Error;

/// An element travelling through a pipeline queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueItem<T> {
    Item(T),
    /// No further items will arrive.
    End,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    #[error("queue already closed")]
    Closed,
    #[error("consumer has gone away")]
    Disconnected,
}

/// Producer half. Not `Clone`: each queue has one producer.
#[derive(Debug)]
pub struct QueueSender<T> {
    tx: Sender<QueueItem<T>>,
    closed: bool,
}

/// Consumer half.
#[derive(Debug)]
pub struct QueueReceiver<T> {
    rx: Receiver<QueueItem<T>>,
}

/// Creates a queue holding at most `capacity` undelivered elements.
///
/// A capacity of 0 is treated as 1; a rendezvous queue would leave no room
/// for the end marker while the consumer is busy.
pub fn bounded<T>(capacity: usize) -> (QueueSender<T>, QueueReceiver<T>) {
    let (tx, rx) = crossbeam_channel::bounded(capacity.max(1));
    (QueueSender { tx, closed: false }, QueueReceiver { rx })
}

/// Creates a queue that never blocks the producer.
pub fn unbounded<T>() -> (QueueSender<T>, QueueReceiver<T>) {
    let (tx, rx) = crossbeam_channel::unbounded();
    (QueueSender { tx, closed: false }, QueueReceiver { rx })
}

impl<T> QueueSender<T> {
    /// Enqueues an item, blocking while a bounded queue is full.
    pub fn put(&self, item: T) -> Result<(), QueueError> {
        if self.closed {
            return Err(QueueError::Closed);
        }
        self.tx
            .send(QueueItem::Item(item))
            .map_err(|_| QueueError::Disconnected)
    }

    /// Enqueues the end marker, once.
    ///
    /// Returns true if this call delivered the marker. Later calls, and calls
    /// after the consumer has gone away, return false.
    pub fn close(&mut self) -> bool {
        if self.closed {
            return false;
        }
        self.closed = true;
        self.tx.send(QueueItem::End).is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Elements currently waiting, end marker included.
    pub fn len(&self) -> usize {
        self.tx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tx.is_empty()
    }

    /// `None` for unbounded queues.
    pub fn capacity(&self) -> Option<usize> {
        self.tx.capacity()
    }
}

impl<T> QueueReceiver<T> {
    /// Blocks until an element is available.
    ///
    /// Returns `None` if the producer was dropped without closing the queue
    /// and nothing is left to read.
    pub fn get(&self) -> Option<QueueItem<T>> {
        self.rx.recv().ok()
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.rx.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_fifo_order_then_end() {
        let (mut tx, rx) = unbounded();
        tx.put("a").unwrap();
        tx.put("b").unwrap();
        tx.put("c").unwrap();
        assert!(tx.close());

        assert_eq!(rx.get(), Some(QueueItem::Item("a")));
        assert_eq!(rx.get(), Some(QueueItem::Item("b")));
        assert_eq!(rx.get(), Some(QueueItem::Item("c")));
        assert_eq!(rx.get(), Some(QueueItem::End));
    }

    #[test]
    fn test_close_sends_exactly_one_end_marker() {
        let (mut tx, rx) = bounded::<u32>(3);
        assert!(tx.close());
        assert!(!tx.close());
        assert!(tx.is_closed());
        drop(tx);

        assert_eq!(rx.get(), Some(QueueItem::End));
        // Producer gone, nothing left
        assert_eq!(rx.get(), None);
    }

    #[test]
    fn test_put_after_close_is_rejected() {
        let (mut tx, rx) = unbounded();
        tx.close();
        assert_eq!(tx.put(1), Err(QueueError::Closed));
        assert_eq!(rx.len(), 1);
    }

    #[test]
    fn test_put_to_dropped_consumer_is_disconnected() {
        let (mut tx, rx) = bounded(1);
        drop(rx);
        assert_eq!(tx.put(1), Err(QueueError::Disconnected));
        assert!(!tx.close());
    }

    #[test]
    fn test_bounded_capacity_reported() {
        let (tx, rx) = bounded::<u8>(3);
        assert_eq!(tx.capacity(), Some(3));
        assert_eq!(rx.capacity(), Some(3));

        let (tx, _rx) = unbounded::<u8>();
        assert_eq!(tx.capacity(), None);
    }

    #[test]
    fn test_zero_capacity_is_raised_to_one() {
        let (tx, _rx) = bounded::<u8>(0);
        assert_eq!(tx.capacity(), Some(1));
    }

    #[test]
    fn test_put_blocks_while_full() {
        let (tx, rx) = bounded(2);
        tx.put(1).unwrap();
        tx.put(2).unwrap();
        assert_eq!(tx.len(), 2);

        let producer = thread::spawn(move || {
            // Blocks until the consumer takes one
            tx.put(3).unwrap();
            tx
        });

        thread::sleep(Duration::from_millis(50));
        assert!(!producer.is_finished());
        assert_eq!(rx.len(), 2);

        assert_eq!(rx.get(), Some(QueueItem::Item(1)));
        let tx = producer.join().unwrap();
        assert_eq!(tx.len(), 2);
        assert_eq!(rx.get(), Some(QueueItem::Item(2)));
        assert_eq!(rx.get(), Some(QueueItem::Item(3)));
    }

    #[test]
    fn test_get_blocks_while_empty() {
        let (mut tx, rx) = unbounded::<&str>();

        let consumer = thread::spawn(move || rx.get());
        thread::sleep(Duration::from_millis(50));
        assert!(!consumer.is_finished());

        tx.close();
        assert_eq!(consumer.join().unwrap(), Some(QueueItem::End));
    }
}
