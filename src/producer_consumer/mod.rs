//! # Producer / consumer
//!
//! The smallest bounded buffer: a single slot, a mutex and two condvars.
//! - the producer waits on `emptied` while the slot is full
//! - the consumer waits on `filled` while the slot is empty
//!
//! Both wait in a loop, a condvar may wake up for no reason.
//! Nothing is shared with the dining philosophers.

use std::{
    io,
    sync::{Condvar, Mutex, MutexGuard, PoisonError},
    thread,
};

use tracing::info;

/// How many items get through the slot.
pub const MAX_ITEMS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Empty,
    Full(usize),
    /// one side is gone, the other one shouldn't wait for it
    Closed,
}

pub struct Buffer {
    slot: Mutex<Slot>,
    filled: Condvar,
    emptied: Condvar,
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Buffer {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(Slot::Empty),
            filled: Condvar::new(),
            emptied: Condvar::new(),
        }
    }

    /// Waits for the slot to empty, then fills it. false if the buffer got closed.
    pub fn put(&self, item: usize) -> bool {
        let mut slot = self.lock();
        while let Slot::Full(_) = *slot {
            slot = self.emptied.wait(slot).unwrap_or_else(PoisonError::into_inner);
        }
        if *slot == Slot::Closed {
            return false;
        }
        *slot = Slot::Full(item);
        info!("Producing {item}");
        self.filled.notify_one();
        true
    }

    /// Waits for an item. None if the buffer got closed.
    pub fn take(&self) -> Option<usize> {
        let mut slot = self.lock();
        while *slot == Slot::Empty {
            slot = self.filled.wait(slot).unwrap_or_else(PoisonError::into_inner);
        }
        let Slot::Full(item) = *slot else {
            return None;
        };
        info!("Consuming {item}");
        *slot = Slot::Empty;
        self.emptied.notify_one();
        Some(item)
    }

    /// Lets both sides out of their waits for good.
    pub fn close(&self) {
        *self.lock() = Slot::Closed;
        self.filled.notify_all();
        self.emptied.notify_all();
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Passes 1..=items from a producer thread to a consumer thread, returns what the consumer got.
pub fn run(items: usize) -> io::Result<Vec<usize>> {
    let buffer = Buffer::new();

    thread::scope(|s| {
        let consumer = thread::Builder::new()
            .name("consumer".to_string())
            .spawn_scoped(s, || (1..=items).map_while(|_| buffer.take()).collect::<Vec<_>>())?;

        let producer = thread::Builder::new()
            .name("producer".to_string())
            .spawn_scoped(s, || (1..=items).all(|item| buffer.put(item)));

        if let Err(e) = producer {
            // the consumer would wait forever otherwise
            buffer.close();
            return Err(e);
        }

        consumer
            .join()
            .map_err(|_| io::Error::other("the consumer panicked"))
    })
}

#[cfg(test)]
mod test {
    use std::{thread::scope, thread::sleep, time::Duration};

    use super::*;

    #[test]
    fn test_everything_arrives_in_order() {
        let consumed = run(MAX_ITEMS).unwrap();
        assert_eq!(consumed, (1..=MAX_ITEMS).collect::<Vec<_>>());
    }

    #[test]
    fn test_nothing_to_pass() {
        assert!(run(0).unwrap().is_empty());
    }

    #[test]
    fn test_producer_waits_for_room() {
        let buffer = Buffer::new();
        assert!(buffer.put(1));

        scope(|s| {
            let producer = s.spawn(|| buffer.put(2));
            sleep(Duration::from_millis(20));
            // the slot is still taken by 1
            assert!(!producer.is_finished());
            assert_eq!(buffer.take(), Some(1));
            assert!(producer.join().unwrap());
        });

        assert_eq!(buffer.take(), Some(2));
    }

    #[test]
    fn test_close_releases_waiters() {
        let buffer = Buffer::new();
        scope(|s| {
            let consumer = s.spawn(|| buffer.take());
            sleep(Duration::from_millis(20));
            buffer.close();
            assert_eq!(consumer.join().unwrap(), None);
        });
        assert!(!buffer.put(1));
    }
}
