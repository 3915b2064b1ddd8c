use std::{thread, time::Duration};

use tracing::info;

use super::signal::WaitSignal;
use super::table::DiningTable;

/// A seat at the table plus the appetite of whoever sits there.
#[derive(Debug, Clone)]
pub struct Philosopher {
    pub index: usize,
    pub max_meals: usize,
    pub think_time: Duration,
    pub eat_time: Duration,
}

impl Philosopher {
    pub fn new(index: usize, max_meals: usize) -> Self {
        Self {
            index,
            max_meals,
            think_time: Duration::ZERO,
            eat_time: Duration::ZERO,
        }
    }

    pub fn with_pauses(mut self, think_time: Duration, eat_time: Duration) -> Self {
        self.think_time = think_time;
        self.eat_time = eat_time;
        self
    }

    /// think, take forks, eat, put forks down; `max_meals` times, returns the number of meals eaten.
    /// Thinking and eating happen outside the table's lock.
    pub fn dine<S: WaitSignal>(&self, table: &DiningTable<S>) -> usize {
        info!("Hi, I'm philosopher #{}.", self.index);

        let mut meals = 0;
        while meals < self.max_meals {
            self.think();
            table.take_forks(self.index);
            meals += 1;
            self.eat(meals);
            table.put_forks(self.index);
        }
        meals
    }

    fn think(&self) {
        info!("Philosopher {} is thinking...", self.index);
        pause(self.think_time);
    }

    fn eat(&self, serving: usize) {
        info!("Philosopher {} ate serving #{}.", self.index, serving);
        pause(self.eat_time);
    }
}

fn pause(time: Duration) {
    if !time.is_zero() {
        thread::sleep(time);
    }
}
