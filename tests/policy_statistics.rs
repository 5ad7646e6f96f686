//! Statistical behaviour of the action-selection policies

mod common;

use common::{chi_squared_critical, chi_squared_homogeneity, chi_squared_uniform, pose};
use gridworld_rl::{
    Result,
    gridworld::{Action, AgentState, GridGeometry, NUM_ACTIONS, Orientation, Position},
    policy::Policy,
    ports::ValueModel,
};
use rand::{SeedableRng, rngs::StdRng};

struct FixedValues([f64; NUM_ACTIONS]);

impl ValueModel for FixedValues {
    fn lookahead(&self, _state: &AgentState, action: Action) -> Result<f64> {
        Ok(self.0[action.index()])
    }

    fn name(&self) -> &str {
        "fixed-values"
    }
}

fn state() -> AgentState {
    let geometry = GridGeometry::new(3, 3, &[], Position::new(2, 2)).unwrap();
    AgentState::observe(&geometry, pose(1, 1, Orientation::North))
}

fn sample(policy: &mut Policy, model: &FixedValues, trials: usize, seed: u64) -> [usize; NUM_ACTIONS] {
    let mut rng = StdRng::seed_from_u64(seed);
    let state = state();
    let mut counts = [0; NUM_ACTIONS];
    for _ in 0..trials {
        let action = policy.next_action(model, &state, &mut rng).unwrap();
        counts[action.index()] += 1;
    }
    counts
}

#[test]
fn greedy_splits_ties_evenly() {
    let model = FixedValues([1.0, 5.0, 0.0, 5.0, -1.0, 2.0]);
    let counts = sample(&mut Policy::Greedy, &model, 10_000, 1);

    assert_eq!(counts[0] + counts[2] + counts[4] + counts[5], 0);
    let tied = [counts[Action::Right.index()], counts[Action::Left.index()]];
    assert!(chi_squared_uniform(&tied) < chi_squared_critical(1, 0.001));
}

#[test]
fn random_policy_is_uniform() {
    let model = FixedValues([0.0; NUM_ACTIONS]);
    let counts = sample(&mut Policy::Random, &model, 12_000, 2);
    assert!(chi_squared_uniform(&counts) < chi_squared_critical(NUM_ACTIONS - 1, 0.001));
}

#[test]
fn full_exploration_is_indistinguishable_from_random() {
    let model = FixedValues([0.0, 9.0, 0.0, 0.0, 0.0, 0.0]);
    let explore = sample(&mut Policy::epsilon_greedy(1.0, 1.0), &model, 12_000, 3);
    let random = sample(&mut Policy::Random, &model, 12_000, 4);
    assert!(
        chi_squared_homogeneity(&explore, &random) < chi_squared_critical(NUM_ACTIONS - 1, 0.001)
    );
}

#[test]
fn zero_exploration_always_matches_greedy() {
    let model = FixedValues([0.0, 0.0, 0.0, 3.0, 0.0, 0.0]);
    let counts = sample(&mut Policy::epsilon_greedy(0.0, 0.9), &model, 1_000, 5);
    assert_eq!(counts[Action::Left.index()], 1_000);
}

#[test]
fn decayed_exploration_respects_the_floor() {
    use gridworld_rl::policy::EpsilonGreedy;

    let model = FixedValues([0.0; NUM_ACTIONS]);
    let mut policy = Policy::EpsilonGreedy(EpsilonGreedy::new(1.0, 0.5).with_min_epsilon(0.1));
    sample(&mut policy, &model, 20, 6);
    assert_eq!(policy.epsilon(), Some(0.1));
}
