use std::time::Duration;

use super::error::DinnerError;

/// The number of philosophers. The classic problem uses 5.
pub const PHILOSOPHERS: usize = 5;
/// How many times each philosopher eats before leaving.
pub const MAX_MEALS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DinnerConfig {
    pub philosophers: usize,
    pub max_meals: usize,
    /// spent outside the lock before every meal
    pub think_time: Duration,
    /// spent outside the lock holding the forks
    pub eat_time: Duration,
}

impl DinnerConfig {
    pub fn new(philosophers: usize, max_meals: usize) -> Result<Self, DinnerError> {
        if philosophers == 0 {
            return Err(DinnerError::EmptyTable);
        }
        Ok(Self {
            philosophers,
            max_meals,
            think_time: Duration::ZERO,
            eat_time: Duration::ZERO,
        })
    }

    pub fn with_pauses(mut self, think_time: Duration, eat_time: Duration) -> Self {
        self.think_time = think_time;
        self.eat_time = eat_time;
        self
    }
}

impl Default for DinnerConfig {
    fn default() -> Self {
        Self {
            philosophers: PHILOSOPHERS,
            max_meals: MAX_MEALS,
            think_time: Duration::ZERO,
            eat_time: Duration::ZERO,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_config() {
        assert!(matches!(DinnerConfig::new(0, 5), Err(DinnerError::EmptyTable)));

        let config = DinnerConfig::new(7, 3).unwrap();
        assert_eq!((config.philosophers, config.max_meals), (7, 3));

        let default = DinnerConfig::default();
        assert_eq!(default, DinnerConfig::new(5, 5).unwrap());
    }
}
