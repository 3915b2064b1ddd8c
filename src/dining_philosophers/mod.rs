//! # Dining philosophers
//!
//! N philosophers sit around a round table with a fork between each pair of neighbours.
//! A philosopher needs both forks to eat, so neighbours can't eat at the same time.
//!
//! The solution here is the monitor one: instead of a lock per fork, a single mutex guards a table of states
//! (thinking / hungry / eating), and every philosopher has its own condition variable to wait on.
//! - a hungry philosopher eats only if neither neighbour is eating, otherwise it waits on its own condvar
//! - a philosopher that stops eating checks both neighbours and wakes exactly those who can eat now
//!
//! There's no deadlock by construction: nobody ever holds one fork while waiting for the other.
//! There's no fairness either: a philosopher can be overtaken by its neighbours again and again.
//!
//! ## Three philosophers
//! With three seats the two neighbours of a philosopher are neighbours of each other as well.
//! Putting forks down makes both of them eligible and signals both, although only one can eat.
//! A version that trusts a single wake-up lets both eat, this one re-checks after waking up so the
//! late one goes back to sleep. The configuration stays a known weak spot of the signalling scheme;
//! see [dinner::Dinner::run_with_watchdog] for how it's detected rather than assumed to complete.
//!
//! See the unit tests of each submodule.

pub mod config;
pub mod dinner;
pub mod error;
pub mod philosopher;
pub mod signal;
pub mod state;
pub mod table;

pub use config::{DinnerConfig, MAX_MEALS, PHILOSOPHERS};
pub use dinner::{Dinner, Report};
pub use error::DinnerError;
pub use state::{ActorState, StateTable};
pub use table::DiningTable;

/// Runs a whole dinner on the standard condvars.
pub fn run(config: DinnerConfig) -> Result<Report, DinnerError> {
    Dinner::new(config).run()
}
