//! Cross-thread event bridge between a worker and the UI thread
//!
//! Workers hold a [`Publisher`]; the UI owns the matching [`EventDrain`] and
//! empties it once per tick. Publishing never blocks and never fails loudly:
//! when the UI side has gone away the event is simply dropped.

use std::sync::mpsc::{self, Receiver, Sender};

use crate::events::ProgressEvent;

/// Create a connected publisher/drain pair over an unbounded FIFO channel.
pub fn channel<E>() -> (Publisher<E>, EventDrain<E>) {
    let (tx, rx) = mpsc::channel();
    (Publisher { tx }, EventDrain { rx })
}

/// Sending half. Cheap to clone, safe to move into a worker thread.
#[derive(Debug)]
pub struct Publisher<E = ProgressEvent> {
    tx: Sender<E>,
}

impl<E> Clone for Publisher<E> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<E> Publisher<E> {
    /// Append an event to the queue.
    pub fn publish(&self, event: E) {
        // Receiver dropped means the UI is closing; nobody is left to tell.
        let _ = self.tx.send(event);
    }
}

/// Receiving half, owned by the UI thread.
#[derive(Debug)]
pub struct EventDrain<E = ProgressEvent> {
    rx: Receiver<E>,
}

impl<E> EventDrain<E> {
    /// Remove and return everything currently queued, oldest first.
    pub fn drain_all(&self) -> Vec<E> {
        self.rx.try_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_drain_empty_returns_nothing() {
        let (_publisher, drain) = channel::<u32>();
        assert!(drain.drain_all().is_empty());
    }

    #[test]
    fn test_fifo_order_single_drain() {
        let (publisher, drain) = channel();
        publisher.publish("E1");
        publisher.publish("E2");
        publisher.publish("E3");
        assert_eq!(drain.drain_all(), vec!["E1", "E2", "E3"]);
        assert!(drain.drain_all().is_empty());
    }

    #[test]
    fn test_fifo_under_concurrent_publish_and_drain() {
        let (publisher, drain) = channel();
        let worker = thread::spawn(move || {
            for i in 0..2_000u32 {
                publisher.publish(i);
                if i % 250 == 0 {
                    thread::sleep(Duration::from_millis(1));
                }
            }
        });

        let mut seen = Vec::new();
        while !worker.is_finished() {
            seen.extend(drain.drain_all());
            thread::sleep(Duration::from_micros(200));
        }
        worker.join().unwrap();
        seen.extend(drain.drain_all());

        let expected: Vec<u32> = (0..2_000).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_publish_after_drain_dropped_does_not_panic() {
        let (publisher, drain) = channel();
        drop(drain);
        publisher.publish(ProgressEvent::info("nobody listening"));
        publisher.publish(ProgressEvent::Status("still fine".into()));
    }

    #[test]
    fn test_cloned_publishers_share_queue() {
        let (publisher, drain) = channel();
        let ui_side = publisher.clone();
        publisher.publish(1);
        ui_side.publish(2);
        publisher.publish(3);
        assert_eq!(drain.drain_all(), vec![1, 2, 3]);
    }
}
