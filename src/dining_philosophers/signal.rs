//! # Wait signals
//!
//! Every philosopher owns one endpoint to park on while it's hungry but its forks are taken.
//! The interface is the condvar's one: `wait` takes the guard, unlocks the mutex, sleeps, re-locks,
//! and gives the guard back. A wake-up is a hint only, the caller re-checks its condition.
//!
//! [Condvar] is what the dinner runs on. The trait exists so tests can count or disturb notifications.

use std::sync::{Condvar, MutexGuard, PoisonError};

pub trait WaitSignal: Send + Sync {
    /// Releases the guard's mutex while waiting, returns it locked again.
    /// May return without a notification.
    fn wait<'a, Y>(&self, guard: MutexGuard<'a, Y>) -> MutexGuard<'a, Y>;

    /// Wakes the single thread parked on this endpoint, if any.
    fn notify_one(&self);
}

impl WaitSignal for Condvar {
    fn wait<'a, Y>(&self, guard: MutexGuard<'a, Y>) -> MutexGuard<'a, Y> {
        // a poisoned table is still consistent, transitions don't panic halfway
        Condvar::wait(self, guard).unwrap_or_else(PoisonError::into_inner)
    }

    fn notify_one(&self) {
        Condvar::notify_one(self)
    }
}
