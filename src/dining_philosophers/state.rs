//! # State table
//!
//! One [ActorState] per philosopher, arranged in a ring. The table itself knows nothing about locking:
//! [DiningTable](super::table::DiningTable) keeps it behind its single mutex, so every method here
//! is called with the lock held.

use strum_macros::{Display, EnumIter};

/// What a philosopher is up to right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ActorState {
    #[default]
    Thinking,
    Hungry,
    Eating,
}

impl ActorState {
    /// The only legal successor: thinking -> hungry -> eating -> thinking
    pub fn next(self) -> Self {
        match self {
            Self::Thinking => Self::Hungry,
            Self::Hungry => Self::Eating,
            Self::Eating => Self::Thinking,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateTable {
    states: Vec<ActorState>,
    // bumped on every transition, lets observers tell a busy ring from a stuck one
    transitions: u64,
}

impl StateTable {
    /// Everybody starts thinking.
    pub fn new(philosophers: usize) -> Self {
        Self::from_states(vec![ActorState::Thinking; philosophers])
    }

    /// A table in an arbitrary state, handy for fixtures
    pub fn from_states(states: Vec<ActorState>) -> Self {
        Self {
            states,
            transitions: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn as_slice(&self) -> &[ActorState] {
        &self.states
    }

    pub fn get(&self, i: usize) -> ActorState {
        self.states[i]
    }

    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    /// The neighbour sitting to the left, wraps around 0
    pub fn left(&self, i: usize) -> usize {
        (i + self.len() - 1) % self.len()
    }

    /// The neighbour sitting to the right, wraps around N-1
    pub fn right(&self, i: usize) -> usize {
        (i + 1) % self.len()
    }

    /// Moves philosopher `i` one step along its cycle.
    /// Skipping or reversing a step is a protocol bug, hence the debug assertion.
    pub fn advance(&mut self, i: usize, to: ActorState) {
        debug_assert_eq!(
            self.states[i].next(),
            to,
            "philosopher {i} can't go from {} to {to}",
            self.states[i]
        );
        self.states[i] = to;
        self.transitions += 1;
    }

    /// Can `i` start eating right now?
    /// True iff it's hungry and neither neighbour is eating.
    pub fn can_proceed(&self, i: usize) -> bool {
        self.states[i] == ActorState::Hungry
            && self.states[self.left(i)] != ActorState::Eating
            && self.states[self.right(i)] != ActorState::Eating
    }

    /// No two ring-adjacent philosophers are eating.
    /// A lone philosopher has no neighbour to conflict with.
    pub fn is_exclusive(&self) -> bool {
        (0..self.len()).all(|i| {
            let right = self.right(i);
            right == i
                || !(self.states[i] == ActorState::Eating && self.states[right] == ActorState::Eating)
        })
    }
}

#[cfg(test)]
mod test {
    use strum::IntoEnumIterator;

    use super::ActorState::*;
    use super::*;

    #[test]
    fn test_ring_arithmetic() {
        let table = StateTable::new(5);
        assert_eq!(table.left(0), 4);
        assert_eq!(table.right(4), 0);
        assert_eq!(table.left(3), 2);
        assert_eq!(table.right(3), 4);

        // a table for one: you're your own neighbour
        let lonely = StateTable::new(1);
        assert_eq!(lonely.left(0), 0);
        assert_eq!(lonely.right(0), 0);
    }

    #[test]
    fn test_cycle_order() {
        // three steps bring every state back to itself
        for state in ActorState::iter() {
            assert_eq!(state.next().next().next(), state);
            assert_ne!(state.next(), state);
        }
        assert_eq!(ActorState::default(), Thinking);
        assert_eq!(Hungry.to_string(), "hungry");
    }

    #[test]
    fn test_can_proceed_fixture() {
        let table = StateTable::from_states(vec![Hungry, Eating, Thinking, Hungry, Thinking]);
        // 0 is hungry but 1 is eating
        assert!(!table.can_proceed(0));
        // 1 is eating already, 2 and 4 aren't hungry
        assert!(!table.can_proceed(1));
        assert!(!table.can_proceed(2));
        assert!(!table.can_proceed(4));
        // 3 is hungry and both 2 and 4 are thinking
        assert!(table.can_proceed(3));
    }

    #[test]
    fn test_hungry_neighbours_dont_block() {
        // only eating blocks, hungry neighbours are fair competitors
        let table = StateTable::from_states(vec![Hungry, Hungry, Hungry, Thinking, Thinking]);
        assert!(table.can_proceed(0));
        assert!(table.can_proceed(1));
        assert!(table.can_proceed(2));
    }

    #[test]
    fn test_no_adjacent_eligibility_next_to_an_eater() {
        // whoever sits next to an eater is never eligible, for every placement of the eater
        for n in [2, 4, 5, 7] {
            for eater in 0..n {
                let mut states = vec![Hungry; n];
                states[eater] = Eating;
                let table = StateTable::from_states(states);
                assert!(!table.can_proceed(table.left(eater)));
                assert!(!table.can_proceed(table.right(eater)));
            }
        }
    }

    #[test]
    fn test_three_is_a_degenerate_ring() {
        // 1 has just put its forks down: both its neighbours become eligible at once,
        // yet with three seats those two neighbours sit next to each other
        let table = StateTable::from_states(vec![Hungry, Thinking, Hungry]);
        assert!(table.can_proceed(table.left(1)));
        assert!(table.can_proceed(table.right(1)));
        assert_eq!(table.right(2), 0);

        // with any other size the two neighbours of a releaser never touch
        for n in [4, 5, 6, 7] {
            let table = StateTable::new(n);
            let (l, r) = (table.left(1), table.right(1));
            assert!(table.right(r) != l && table.left(l) != r);
        }
    }

    #[test]
    fn test_exclusivity_check() {
        assert!(StateTable::from_states(vec![Eating, Hungry, Eating, Thinking]).is_exclusive());
        assert!(!StateTable::from_states(vec![Eating, Thinking, Thinking, Eating]).is_exclusive());
        assert!(!StateTable::from_states(vec![Thinking, Eating, Eating]).is_exclusive());
        assert!(StateTable::from_states(vec![Eating]).is_exclusive());
    }

    #[test]
    fn test_advance_counts_transitions() {
        let mut table = StateTable::new(2);
        table.advance(0, Hungry);
        table.advance(0, Eating);
        table.advance(0, Thinking);
        assert_eq!(table.transitions(), 3);
        assert_eq!(table.as_slice(), &[Thinking, Thinking]);
    }

    #[test]
    #[should_panic]
    #[cfg(debug_assertions)]
    fn test_advance_rejects_skipping() {
        let mut table = StateTable::new(2);
        table.advance(1, Eating);
    }
}
