//! Decaying epsilon-greedy exploration state

use serde::{Deserialize, Serialize};

/// Exploration rate with multiplicative decay.
///
/// The rate decays after every action selection, not per episode, and
/// never drops below `min_epsilon` (or below its starting value when that
/// is already smaller than the floor).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpsilonGreedy {
    epsilon: f64,
    decay_rate: f64,
    min_epsilon: f64,
}

impl EpsilonGreedy {
    /// Create an explorer with the given rate and per-call decay factor
    pub fn new(epsilon: f64, decay_rate: f64) -> Self {
        Self {
            epsilon,
            decay_rate,
            min_epsilon: 0.0,
        }
    }

    /// Set the floor the rate decays towards
    pub fn with_min_epsilon(mut self, min_epsilon: f64) -> Self {
        self.min_epsilon = min_epsilon;
        self
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn decay_rate(&self) -> f64 {
        self.decay_rate
    }

    pub fn min_epsilon(&self) -> f64 {
        self.min_epsilon
    }

    /// Whether a uniform draw in `[0, 1)` selects exploration
    pub fn explores(&self, draw: f64) -> bool {
        draw < self.epsilon
    }

    /// Apply one decay step
    pub fn decay(&mut self) {
        let floor = self.min_epsilon.min(self.epsilon);
        self.epsilon = (self.epsilon * self.decay_rate).max(floor);
    }
}
