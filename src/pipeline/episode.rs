//! Single-episode driver

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    gridworld::{Gridworld, StepOutcome},
    policy::Policy,
    ports::{Observer, ValueModel},
    utils::policy_score,
};

/// Per-episode limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeConfig {
    /// Stop after this many steps even if the destination was not reached
    pub max_steps: usize,
    /// Feed transitions to the model when the policy asks for it
    pub learn: bool,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self {
            max_steps: 100,
            learn: true,
        }
    }
}

/// Result of one episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeResult {
    /// Number of actions taken
    pub steps: usize,
    /// Whether the agent ended on the destination
    pub reached_destination: bool,
    /// Number of steps blocked by an obstacle or the grid boundary
    pub collisions: usize,
    /// Number of steps lost to actuator slip
    pub slips: usize,
    /// Undiscounted sum of rewards
    pub total_reward: f64,
    /// Discounted return under the environment's discount factor
    pub discounted_return: f64,
    /// Reward of every step, in order
    pub rewards: Vec<f64>,
}

/// Run one episode from the world's current state.
///
/// The episode ends as soon as the agent stands on the destination or
/// after `config.max_steps` actions. Transitions are passed to
/// `model.update` only when `config.learn` is set and the policy reports
/// [`Policy::requires_model_update`].
pub fn run_episode<M, R>(
    world: &mut Gridworld,
    policy: &mut Policy,
    model: &mut M,
    config: &EpisodeConfig,
    rng: &mut R,
) -> Result<EpisodeResult>
where
    M: ValueModel + ?Sized,
    R: Rng + ?Sized,
{
    drive(world, policy, model, config, rng, 0, &mut [])
}

pub(crate) fn drive<M, R>(
    world: &mut Gridworld,
    policy: &mut Policy,
    model: &mut M,
    config: &EpisodeConfig,
    rng: &mut R,
    episode: usize,
    observers: &mut [Box<dyn Observer>],
) -> Result<EpisodeResult>
where
    M: ValueModel + ?Sized,
    R: Rng + ?Sized,
{
    let mut rewards = Vec::new();
    let mut collisions = 0;
    let mut slips = 0;

    while rewards.len() < config.max_steps && !world.at_destination() {
        let state = *world.state();
        let action = policy.next_action(&*model, &state, rng)?;
        let transition = world.step(action, rng);

        match transition.outcome {
            StepOutcome::Collision | StepOutcome::OutOfBounds => collisions += 1,
            StepOutcome::Slipped => slips += 1,
            _ => {}
        }
        if config.learn && policy.requires_model_update() {
            model.update(&state, action, transition.reward, &transition.state)?;
        }
        for observer in observers.iter_mut() {
            observer.on_step(episode, rewards.len(), &state, action, &transition)?;
        }
        rewards.push(transition.reward);
    }

    Ok(EpisodeResult {
        steps: rewards.len(),
        reached_destination: world.at_destination(),
        collisions,
        slips,
        total_reward: rewards.iter().sum(),
        discounted_return: policy_score(&rewards, world.discount()),
        rewards,
    })
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::{
        gridworld::{Dynamics, GridGeometry, Orientation, Pose, Position},
        q_learning::QLearning,
    };

    fn corridor() -> Gridworld {
        // A - - D
        let geometry = GridGeometry::new(1, 4, &[], Position::new(0, 3)).unwrap();
        let mut dynamics = Dynamics::default();
        dynamics.fail_chance = 0.0;
        Gridworld::from_parts(
            geometry,
            dynamics,
            Pose::new(Position::new(0, 0), Orientation::East),
        )
    }

    fn any_learned(learner: &QLearning) -> bool {
        let table = learner.q_table();
        let space = table.space();
        (0..space.num_states()).any(|raw| table.max_q(space.state_index(raw).unwrap()) != 0.0)
    }

    #[test]
    fn episode_stops_at_max_steps() {
        let mut world = corridor();
        let mut learner = QLearning::new(&world, 0.5);
        let mut policy = Policy::Random;
        let mut rng = StdRng::seed_from_u64(0);
        let config = EpisodeConfig {
            max_steps: 2,
            learn: true,
        };
        let result = run_episode(&mut world, &mut policy, &mut learner, &config, &mut rng).unwrap();
        assert!(result.steps <= 2);
        assert_eq!(result.rewards.len(), result.steps);
        // Random never asks for learning.
        assert!(!any_learned(&learner));
    }

    #[test]
    fn learning_episode_reaches_destination() {
        let mut world = corridor();
        let mut learner = QLearning::new(&world, 0.5);
        let mut policy = Policy::epsilon_greedy(1.0, 1.0);
        let mut rng = StdRng::seed_from_u64(1);
        let config = EpisodeConfig {
            max_steps: 10_000,
            learn: true,
        };
        let result = run_episode(&mut world, &mut policy, &mut learner, &config, &mut rng).unwrap();
        assert!(result.reached_destination);
        assert_eq!(*result.rewards.last().unwrap(), 10.0);
        assert!((result.total_reward - result.rewards.iter().sum::<f64>()).abs() < 1e-12);

        // The final move onto the destination was learned.
        assert!(any_learned(&learner));
    }
}
