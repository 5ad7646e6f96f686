//! Multi-episode training and evaluation

use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::episode::{self, EpisodeConfig, EpisodeResult};
use crate::{
    Error, Result,
    gridworld::Gridworld,
    policy::Policy,
    ports::{Observer, ValueModel},
};

/// Training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Number of episodes
    pub episodes: usize,

    /// Step limit per episode
    pub max_steps: usize,

    /// Seed of the caller's generator, kept for reports
    pub seed: Option<u64>,

    /// Also redraw the destination at the start of every episode
    pub reset_destination: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 500,
            max_steps: 100,
            seed: None,
            reset_destination: false,
        }
    }
}

/// Aggregate result of a training or evaluation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Name of the model that was driven
    pub model: String,

    /// Name of the policy that chose actions
    pub policy: String,

    /// Total episodes run
    pub episodes: usize,

    /// Episodes that ended on the destination
    pub successes: usize,

    /// Fraction of episodes that ended on the destination
    pub success_rate: f64,

    /// Mean number of steps per episode
    pub mean_steps: f64,

    /// Mean undiscounted reward per episode
    pub mean_reward: f64,

    /// Mean discounted return per episode
    pub mean_discounted_return: f64,

    /// Exploration rate left after the run, for exploring policies
    pub final_epsilon: Option<f64>,
}

impl TrainingResult {
    /// Summarise a sequence of episodes
    pub fn from_episodes(model: &str, policy: &Policy, episodes: &[EpisodeResult]) -> Self {
        let count = episodes.len();
        let mean = |f: fn(&EpisodeResult) -> f64| {
            if count == 0 {
                0.0
            } else {
                episodes.iter().map(f).sum::<f64>() / count as f64
            }
        };
        let successes = episodes.iter().filter(|e| e.reached_destination).count();

        Self {
            model: model.to_string(),
            policy: policy.name().to_string(),
            episodes: count,
            successes,
            success_rate: if count == 0 {
                0.0
            } else {
                successes as f64 / count as f64
            },
            mean_steps: mean(|e| e.steps as f64),
            mean_reward: mean(|e| e.total_reward),
            mean_discounted_return: mean(|e| e.discounted_return),
            final_epsilon: policy.epsilon(),
        }
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path).map_err(|source| Error::Io {
            operation: format!("create {}", path.display()),
            source,
        })?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| Error::Io {
            operation: format!("open {}", path.display()),
            source,
        })?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Drives a model and a policy through repeated episodes of one environment
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingPipeline {
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Run `config.episodes` episodes, feeding transitions back to `model`
    /// whenever the policy asks for it.
    ///
    /// Every episode starts from a fresh agent placement (and destination,
    /// when `reset_destination` is set).
    pub fn run<M, R>(
        &mut self,
        world: &mut Gridworld,
        model: &mut M,
        policy: &mut Policy,
        rng: &mut R,
    ) -> Result<TrainingResult>
    where
        M: ValueModel + ?Sized,
        R: Rng + ?Sized,
    {
        self.drive(world, model, policy, rng, true)
    }

    /// Like [`run`](Self::run) but never updates the model
    pub fn evaluate<M, R>(
        &mut self,
        world: &mut Gridworld,
        model: &mut M,
        policy: &mut Policy,
        rng: &mut R,
    ) -> Result<TrainingResult>
    where
        M: ValueModel + ?Sized,
        R: Rng + ?Sized,
    {
        self.drive(world, model, policy, rng, false)
    }

    fn drive<M, R>(
        &mut self,
        world: &mut Gridworld,
        model: &mut M,
        policy: &mut Policy,
        rng: &mut R,
        learn: bool,
    ) -> Result<TrainingResult>
    where
        M: ValueModel + ?Sized,
        R: Rng + ?Sized,
    {
        if let Policy::Fixed(table) = policy {
            table.check_space(world.state_space())?;
        }

        let episode_config = EpisodeConfig {
            max_steps: self.config.max_steps,
            learn,
        };

        for observer in &mut self.observers {
            observer.on_training_start(self.config.episodes)?;
        }

        let mut episodes = Vec::with_capacity(self.config.episodes);
        for episode in 0..self.config.episodes {
            world.reset_agent(rng)?;
            if self.config.reset_destination {
                world.reset_destination(rng)?;
            }

            for observer in &mut self.observers {
                observer.on_episode_start(episode)?;
            }

            let result = episode::drive(
                world,
                policy,
                model,
                &episode_config,
                rng,
                episode,
                &mut self.observers,
            )?;
            debug!(
                episode,
                steps = result.steps,
                reached = result.reached_destination,
                reward = result.total_reward,
                epsilon = policy.epsilon(),
                "episode finished"
            );

            for observer in &mut self.observers {
                observer.on_episode_end(episode, &result)?;
            }
            episodes.push(result);
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        let summary = TrainingResult::from_episodes(model.name(), policy, &episodes);
        info!(
            model = %summary.model,
            policy = %summary.policy,
            episodes = summary.episodes,
            success_rate = summary.success_rate,
            mean_reward = summary.mean_reward,
            learn,
            "run complete"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};
    use tempfile::tempdir;

    use super::*;
    use crate::{
        config::GridworldConfig,
        gridworld::StateSpace,
        policy::{PolicyDomain, PolicyTable},
        q_learning::QLearning,
    };

    fn world(rng: &mut StdRng) -> Gridworld {
        Gridworld::new(&GridworldConfig::new(4), rng).unwrap()
    }

    #[test]
    fn training_counts_every_episode() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut world = world(&mut rng);
        let mut learner = QLearning::new(&world, 0.2);
        let mut policy = Policy::epsilon_greedy(1.0, 0.999);
        let mut pipeline = TrainingPipeline::new(TrainingConfig {
            episodes: 25,
            max_steps: 50,
            seed: None,
            reset_destination: true,
        });

        let result = pipeline
            .run(&mut world, &mut learner, &mut policy, &mut rng)
            .unwrap();
        assert_eq!(result.episodes, 25);
        assert!(result.successes <= 25);
        assert!(result.mean_steps <= 50.0);
        assert_eq!(result.model, "Q-Learning");
        assert!(result.final_epsilon.unwrap() < 1.0);
    }

    #[test]
    fn fixed_policy_for_other_grid_is_rejected() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut world = world(&mut rng);
        let mut learner = QLearning::new(&world, 0.1);
        let space = StateSpace::new(3, 3);
        let table = PolicyTable::new(
            space,
            PolicyDomain::Pose,
            vec![crate::gridworld::Action::Up; space.num_poses()],
        )
        .unwrap();
        let mut policy = Policy::fixed(table);

        let mut pipeline = TrainingPipeline::new(TrainingConfig::default());
        assert!(matches!(
            pipeline.evaluate(&mut world, &mut learner, &mut policy, &mut rng),
            Err(Error::PolicyDomainMismatch { .. })
        ));
    }

    #[test]
    fn result_round_trips_through_json_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("summary.json");
        let result = TrainingResult::from_episodes("Q-Learning", &Policy::Greedy, &[]);
        result.save(&path).unwrap();
        assert_eq!(TrainingResult::load(&path).unwrap(), result);
        assert_eq!(result.success_rate, 0.0);
    }
}
