pub mod dining_philosophers;
pub mod producer_consumer;
