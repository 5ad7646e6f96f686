//! Dense Q-table over the full gridworld state space

use crate::gridworld::{Action, NUM_ACTIONS, StateIndex, StateSpace};

/// Q-table mapping (state, action) pairs to Q-values
///
/// Laid out as `[length, width, 4, 3, 3, 3, 6]` in row-major order and
/// initialised to zero. Indices come from the same [`StateSpace`], so
/// lookups never go out of bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct QTable {
    space: StateSpace,
    q_values: Vec<f64>,
}

impl QTable {
    /// Create a zeroed Q-table for a state space
    pub fn new(space: StateSpace) -> Self {
        Self {
            space,
            q_values: vec![0.0; space.num_states() * NUM_ACTIONS],
        }
    }

    pub fn space(&self) -> StateSpace {
        self.space
    }

    /// Dimensions of the table including the action axis
    pub fn shape(&self) -> [usize; 7] {
        let [l, w, o, m0, m1, m2] = self.space.shape();
        [l, w, o, m0, m1, m2, NUM_ACTIONS]
    }

    /// Get Q-value for a state-action pair
    pub fn get(&self, state: StateIndex, action: Action) -> f64 {
        self.q_values[state.get() * NUM_ACTIONS + action.index()]
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: StateIndex, action: Action, value: f64) {
        self.q_values[state.get() * NUM_ACTIONS + action.index()] = value;
    }

    /// All action values of one state, in action index order
    pub fn row(&self, state: StateIndex) -> &[f64] {
        let start = state.get() * NUM_ACTIONS;
        &self.q_values[start..start + NUM_ACTIONS]
    }

    /// Get maximum Q-value over all actions in a state
    pub fn max_q(&self, state: StateIndex) -> f64 {
        self.row(state)
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Reset all Q-values to zero
    pub fn reset(&mut self) {
        self.q_values.fill(0.0);
    }

    /// Total number of entries
    pub fn len(&self) -> usize {
        self.q_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.q_values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> QTable {
        QTable::new(StateSpace::new(2, 3))
    }

    #[test]
    fn test_qtable_initialization() {
        let qtable = table();
        assert_eq!(qtable.len(), 2 * 3 * 4 * 27 * 6);
        assert_eq!(qtable.shape(), [2, 3, 4, 3, 3, 3, 6]);
        let s = qtable.space().state_index(17).unwrap();
        assert!(qtable.row(s).iter().all(|&q| q == 0.0));
    }

    #[test]
    fn test_qtable_set_get() {
        let mut qtable = table();
        let s = qtable.space().state_index(40).unwrap();
        qtable.set(s, Action::Left, 1.5);
        assert_eq!(qtable.get(s, Action::Left), 1.5);
        assert_eq!(qtable.row(s)[Action::Left.index()], 1.5);

        let neighbour = qtable.space().state_index(41).unwrap();
        assert_eq!(qtable.get(neighbour, Action::Left), 0.0);
    }

    #[test]
    fn test_max_q() {
        let mut qtable = table();
        let s = qtable.space().state_index(3).unwrap();
        qtable.set(s, Action::Up, 0.5);
        qtable.set(s, Action::Right, 1.5);
        qtable.set(s, Action::TurnLeft, 0.8);
        assert_eq!(qtable.max_q(s), 1.5);

        qtable.reset();
        assert_eq!(qtable.max_q(s), 0.0);
    }
}
