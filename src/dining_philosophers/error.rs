use std::time::Duration;

use super::state::ActorState;

#[derive(Debug, thiserror::Error)]
pub enum DinnerError {
    #[error("a table needs at least one philosopher")]
    EmptyTable,

    #[error("the table has {actual} seats, but {expected} philosophers are invited")]
    TableSize { expected: usize, actual: usize },

    #[error("failed to seat philosopher {index}: {source}")]
    Spawn {
        index: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("philosopher {index} panicked")]
    Panicked { index: usize },

    #[error("no progress for {waited:?}, the table is stuck at {states:?}")]
    Stalled {
        waited: Duration,
        states: Vec<ActorState>,
    },
}
