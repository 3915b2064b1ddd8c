//! # The dinner
//!
//! A thread per philosopher, each one moves its own index and a clone of the table's [Arc].
//! Nobody starts eating before everybody is seated: a spawn failure halfway cancels the dinner instead of
//! running it with half the ring.
//!
//! Dropping the last [Arc] after the joins frees the mutex and the condvars, nothing to destroy by hand.

use std::{
    sync::{Arc, Condvar, Mutex, PoisonError},
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use tracing::{debug, error, info, warn};

use super::config::DinnerConfig;
use super::error::DinnerError;
use super::philosopher::Philosopher;
use super::signal::WaitSignal;
use super::state::ActorState;
use super::table::DiningTable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// meals eaten, per philosopher
    pub meals: Vec<usize>,
    pub final_states: Vec<ActorState>,
}

impl Report {
    pub fn total_meals(&self) -> usize {
        self.meals.iter().sum()
    }
}

pub struct Dinner<S = Condvar> {
    config: DinnerConfig,
    table: Arc<DiningTable<S>>,
}

impl Dinner {
    pub fn new(config: DinnerConfig) -> Self {
        Self {
            table: Arc::new(DiningTable::new(config.philosophers)),
            config,
        }
    }
}

impl<S: WaitSignal + 'static> Dinner<S> {
    /// A dinner around a prepared table, e.g. with instrumented signals.
    pub fn with_table(config: DinnerConfig, table: DiningTable<S>) -> Result<Self, DinnerError> {
        if table.len() != config.philosophers {
            return Err(DinnerError::TableSize {
                expected: config.philosophers,
                actual: table.len(),
            });
        }
        Ok(Self {
            config,
            table: Arc::new(table),
        })
    }

    /// The shared table, to watch the dinner from the outside.
    pub fn table(&self) -> Arc<DiningTable<S>> {
        Arc::clone(&self.table)
    }

    /// Seats everybody and waits until each philosopher ate all its meals.
    pub fn run(self) -> Result<Report, DinnerError> {
        let seated = self.seat_everyone()?;
        self.finish(seated)
    }

    /// Same as [Dinner::run], but gives up with [DinnerError::Stalled] once the table hasn't changed for `patience`.
    ///
    /// Philosophers stuck at a stalled table stay parked, there's no way to cancel them.
    /// `patience` has to be longer than the think and eat pauses, they don't count as progress.
    pub fn run_with_watchdog(self, patience: Duration) -> Result<Report, DinnerError> {
        let seated = self.seat_everyone()?;

        let poll = (patience / 10).max(Duration::from_millis(1));
        let mut seen = self.table.transitions();
        let mut since = Instant::now();

        while !seated.iter().all(JoinHandle::is_finished) {
            thread::sleep(poll);

            let transitions = self.table.transitions();
            if transitions != seen {
                seen = transitions;
                since = Instant::now();
            } else if since.elapsed() >= patience {
                let states = self.table.snapshot();
                let parked = seated.iter().filter(|h| !h.is_finished()).count();
                warn!(?states, parked, "the dinner is stuck, leaving the rest parked");
                return Err(DinnerError::Stalled {
                    waited: since.elapsed(),
                    states,
                });
            }
        }

        self.finish(seated)
    }

    fn seat_everyone(&self) -> Result<Vec<JoinHandle<usize>>, DinnerError> {
        let DinnerConfig {
            philosophers,
            max_meals,
            think_time,
            eat_time,
        } = self.config;
        if philosophers == 0 {
            return Err(DinnerError::EmptyTable);
        }
        info!(philosophers, max_meals, "seating philosophers");

        let gate = Arc::new(StartGate::new());
        let mut seated = Vec::with_capacity(philosophers);

        for index in 0..philosophers {
            let philosopher = Philosopher::new(index, max_meals).with_pauses(think_time, eat_time);
            let table = Arc::clone(&self.table);
            let ticket = Arc::clone(&gate);

            let spawned = thread::Builder::new()
                .name(format!("philosopher-{index}"))
                .spawn(move || {
                    if ticket.pass() {
                        philosopher.dine(&table)
                    } else {
                        0
                    }
                });

            match spawned {
                Ok(handle) => seated.push(handle),
                Err(source) => {
                    error!(index, %source, "failed to seat a philosopher, cancelling the dinner");
                    gate.cancel();
                    for handle in seated {
                        // they leave without eating, a panic here changes nothing
                        let _ = handle.join();
                    }
                    return Err(DinnerError::Spawn { index, source });
                }
            }
        }

        gate.open();
        debug!(philosophers, "everybody is seated");
        Ok(seated)
    }

    fn finish(self, seated: Vec<JoinHandle<usize>>) -> Result<Report, DinnerError> {
        let meals = seated
            .into_iter()
            .enumerate()
            .map(|(index, handle)| handle.join().map_err(|_| DinnerError::Panicked { index }))
            .collect::<Result<Vec<_>, _>>()?;

        let report = Report {
            meals,
            final_states: self.table.snapshot(),
        };
        debug!(total_meals = report.total_meals(), "everybody left the table");
        Ok(report)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gate {
    Closed,
    Open,
    Cancelled,
}

/// Holds philosophers until the whole ring is seated.
struct StartGate {
    gate: Mutex<Gate>,
    changed: Condvar,
}

impl StartGate {
    fn new() -> Self {
        Self {
            gate: Mutex::new(Gate::Closed),
            changed: Condvar::new(),
        }
    }

    fn open(&self) {
        self.set(Gate::Open);
    }

    fn cancel(&self) {
        self.set(Gate::Cancelled);
    }

    fn set(&self, to: Gate) {
        *self.gate.lock().unwrap_or_else(PoisonError::into_inner) = to;
        self.changed.notify_all();
    }

    /// Blocks while the gate is closed. true - go ahead, false - the dinner is off
    fn pass(&self) -> bool {
        let gate = self.gate.lock().unwrap_or_else(PoisonError::into_inner);
        let gate = self
            .changed
            .wait_while(gate, |gate| *gate == Gate::Closed)
            .unwrap_or_else(PoisonError::into_inner);
        *gate == Gate::Open
    }
}
