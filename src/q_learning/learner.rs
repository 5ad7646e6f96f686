//! Q-learning update rule

use rand::Rng;

use crate::{
    Result,
    gridworld::{Action, AgentState, Gridworld, NUM_ACTIONS, StateSpace},
    policy::{PolicyDomain, PolicyTable},
    ports::ValueModel,
    q_learning::q_table::QTable,
    utils::choose_maximizer,
};

/// Q-learning rule (off-policy TD control)
///
/// Owns its Q-table exclusively; the environment never reads it.
#[derive(Debug, Clone)]
pub struct QLearning {
    q_table: QTable,
    /// Learning rate α
    learning_rate: f64,
    /// Discount factor γ
    discount_factor: f64,
}

impl QLearning {
    /// Create a learner sized for `world`, discounting with the world's γ
    pub fn new(world: &Gridworld, learning_rate: f64) -> Self {
        Self::with_space(world.state_space(), learning_rate, world.discount())
    }

    /// Create a learner for an explicit state space and discount factor
    pub fn with_space(space: StateSpace, learning_rate: f64, discount_factor: f64) -> Self {
        Self {
            q_table: QTable::new(space),
            learning_rate,
            discount_factor,
        }
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn discount_factor(&self) -> f64 {
        self.discount_factor
    }

    /// Current estimate `Q(s, a)`
    pub fn lookahead(&self, state: &AgentState, action: Action) -> Result<f64> {
        let s = self.q_table.space().encode(state)?;
        Ok(self.q_table.get(s, action))
    }

    /// Q-learning update
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
    ///
    /// Returns the TD error.
    pub fn update(
        &mut self,
        state: &AgentState,
        action: Action,
        reward: f64,
        next_state: &AgentState,
    ) -> Result<f64> {
        let space = self.q_table.space();
        let s = space.encode(state)?;
        let s_next = space.encode(next_state)?;

        let current_q = self.q_table.get(s, action);
        let td_target = reward + self.discount_factor * self.q_table.max_q(s_next);
        let td_error = td_target - current_q;
        self.q_table
            .set(s, action, current_q + self.learning_rate * td_error);
        Ok(td_error)
    }

    /// Greedy policy over the full state space, ties broken uniformly
    pub fn extract_policy<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<PolicyTable> {
        let space = self.q_table.space();
        let actions = (0..space.num_states())
            .map(|raw| {
                let s = space.state_index(raw)?;
                let best = choose_maximizer(self.q_table.row(s), rng).unwrap_or(0);
                Ok(Action::ALL[best])
            })
            .collect::<Result<Vec<_>>>()?;
        PolicyTable::new(space, PolicyDomain::FullState, actions)
    }

    /// Reset all Q-values to zero
    pub fn reset(&mut self) {
        self.q_table.reset();
    }

    /// Number of actions per state
    pub fn num_actions(&self) -> usize {
        NUM_ACTIONS
    }
}

impl ValueModel for QLearning {
    fn lookahead(&self, state: &AgentState, action: Action) -> Result<f64> {
        QLearning::lookahead(self, state, action)
    }

    fn update(
        &mut self,
        state: &AgentState,
        action: Action,
        reward: f64,
        next_state: &AgentState,
    ) -> Result<()> {
        QLearning::update(self, state, action, reward, next_state).map(|_| ())
    }

    fn name(&self) -> &str {
        "Q-Learning"
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::{
        Error,
        gridworld::{GridGeometry, Orientation, Pose, Position},
    };

    fn states() -> (AgentState, AgentState) {
        let geometry = GridGeometry::new(3, 3, &[Position::new(1, 1)], Position::new(2, 2)).unwrap();
        let s = AgentState::observe(&geometry, Pose::new(Position::new(0, 0), Orientation::East));
        let s_next = AgentState::observe(&geometry, Pose::new(Position::new(0, 1), Orientation::East));
        (s, s_next)
    }

    #[test]
    fn test_q_learning_update() {
        let (s, s_next) = states();
        let mut learner = QLearning::with_space(StateSpace::new(3, 3), 0.5, 0.99);

        // Seed next-state values; Q(s) is still zero so the bootstrap term vanishes.
        learner.update(&s_next, Action::Up, 2.0, &s).unwrap();
        learner.update(&s_next, Action::Down, 4.0, &s).unwrap();
        assert_eq!(learner.lookahead(&s_next, Action::Up).unwrap(), 1.0);
        assert_eq!(learner.lookahead(&s_next, Action::Down).unwrap(), 2.0);

        // Q(s,r) = 0.0 + 0.5 * (1.0 + 0.99 * 2.0 - 0.0) = 1.49
        let td_error = learner.update(&s, Action::Right, 1.0, &s_next).unwrap();
        assert!((td_error - 2.98).abs() < 1e-12);
        assert!((learner.lookahead(&s, Action::Right).unwrap() - 1.49).abs() < 1e-12);
    }

    #[test]
    fn test_repeated_update_uses_changed_value() {
        let (s, s_next) = states();
        let mut learner = QLearning::with_space(StateSpace::new(3, 3), 0.5, 0.9);

        learner.update(&s, Action::Left, 1.0, &s_next).unwrap();
        let first = learner.lookahead(&s, Action::Left).unwrap();
        learner.update(&s, Action::Left, 1.0, &s_next).unwrap();
        let second = learner.lookahead(&s, Action::Left).unwrap();

        assert_eq!(first, 0.5);
        assert_eq!(second, first + 0.5 * (1.0 - first));
    }

    #[test]
    fn test_foreign_state_is_rejected() {
        let (s, _) = states();
        let learner = QLearning::with_space(StateSpace::new(1, 1), 0.5, 0.9);
        let geometry = GridGeometry::new(3, 3, &[], Position::new(0, 0)).unwrap();
        let far = AgentState::observe(&geometry, Pose::new(Position::new(2, 2), Orientation::North));
        assert!(matches!(
            learner.lookahead(&far, Action::Up),
            Err(Error::StateOutOfRange { .. })
        ));
        assert!(learner.lookahead(&s, Action::Up).is_ok());
    }

    #[test]
    fn test_extract_policy_follows_best_action() {
        let (s, s_next) = states();
        let mut learner = QLearning::with_space(StateSpace::new(3, 3), 1.0, 0.0);
        learner.update(&s, Action::TurnLeft, 5.0, &s_next).unwrap();

        let mut rng = StdRng::seed_from_u64(8);
        let policy = learner.extract_policy(&mut rng).unwrap();
        assert_eq!(policy.domain(), PolicyDomain::FullState);
        assert_eq!(policy.action_for(&s).unwrap(), Action::TurnLeft);
    }
}
