//! # The table
//!
//! One mutex guards the whole [StateTable], there are no per-fork locks and no lock ordering to get wrong.
//! The price is that unrelated philosophers serialize on the same lock for their (short) transitions.
//!
//! Forks aren't modelled at all: "both neighbours aren't eating" is exactly "both forks are free".
//!
//! ## Taking forks
//! Go hungry, then wait on the own signal until [StateTable::can_proceed] holds.
//! It's a loop: a wake-up only says "look again". It could be spurious or a neighbour may have grabbed
//! the fork between the notification and us re-locking the mutex.
//!
//! ## Putting forks down
//! Go back to thinking and poke exactly those neighbours who can eat now. Nobody else's situation has changed,
//! so nobody else is woken.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use tracing::trace;

use super::signal::WaitSignal;
use super::state::{ActorState, StateTable};

pub struct DiningTable<S = Condvar> {
    state: Mutex<StateTable>,
    // one per seat, created once and never resized
    signals: Box<[S]>,
}

impl<S: WaitSignal + Default> DiningTable<S> {
    /// A table with everybody thinking.
    pub fn new(philosophers: usize) -> Self {
        Self::from_table(StateTable::new(philosophers))
    }

    /// A table in an arbitrary state, with a fresh signal per seat.
    pub fn from_table(table: StateTable) -> Self {
        let signals = (0..table.len()).map(|_| S::default()).collect();
        Self {
            state: Mutex::new(table),
            signals,
        }
    }
}

impl<S: WaitSignal> DiningTable<S> {
    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    /// Blocks until philosopher `i` is the one eating.
    pub fn take_forks(&self, i: usize) {
        let mut table = self.lock();
        table.advance(i, ActorState::Hungry);

        while !table.can_proceed(i) {
            trace!(philosopher = i, "forks are busy, waiting");
            table = self.signals[i].wait(table);
        }

        table.advance(i, ActorState::Eating);
        debug_assert!(table.is_exclusive(), "neighbours eat together: {table:?}");
    }

    /// Philosopher `i` is done eating, hand the forks to whoever of the two neighbours can use them.
    pub fn put_forks(&self, i: usize) {
        let mut table = self.lock();
        table.advance(i, ActorState::Thinking);

        let (left, right) = (table.left(i), table.right(i));
        if table.can_proceed(left) {
            trace!(philosopher = i, neighbour = left, "waking up");
            self.signals[left].notify_one();
        }
        // with two seats (or one) both sides are the same neighbour
        if right != left && table.can_proceed(right) {
            trace!(philosopher = i, neighbour = right, "waking up");
            self.signals[right].notify_one();
        }
    }

    /// A consistent copy of the states, taken under the lock.
    pub fn snapshot(&self) -> Vec<ActorState> {
        self.lock().as_slice().to_vec()
    }

    /// How many transitions happened so far.
    pub fn transitions(&self) -> u64 {
        self.lock().transitions()
    }

    #[cfg(test)]
    pub(crate) fn signal(&self, i: usize) -> &S {
        &self.signals[i]
    }

    fn lock(&self) -> MutexGuard<'_, StateTable> {
        // nothing panics while the table is half-updated, so a poisoned lock still guards valid data
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
