//! Train command - online Q-learning with epsilon-greedy exploration

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use tracing::info;

use super::{sanitize_summary_path, write_summary};
use crate::{
    cli::{
        config::GridArgs,
        output::{print_grid, print_kv, print_result, print_section},
    },
    config::GridworldConfig,
    gridworld::Gridworld,
    pipeline::{
        MetricsObserver, MetricsSummary, ProgressObserver, SharedObserver, TrainingConfig,
        TrainingPipeline, TrainingResult,
    },
    policy::{EpsilonGreedy, Policy},
    q_learning::QLearning,
};

#[derive(Parser, Debug)]
#[command(about = "Train a Q-learning agent on a random gridworld")]
pub struct TrainArgs {
    #[command(flatten)]
    pub grid: GridArgs,

    /// Number of training episodes
    #[arg(long, short = 'e', default_value_t = 500)]
    pub episodes: usize,

    /// Step limit per episode
    #[arg(long, default_value_t = 100)]
    pub max_steps: usize,

    /// Learning rate α
    #[arg(long, default_value_t = 0.1)]
    pub learning_rate: f64,

    /// Initial exploration rate
    #[arg(long, default_value_t = 1.0)]
    pub epsilon: f64,

    /// Multiplicative epsilon decay applied after every action choice
    #[arg(long, default_value_t = 0.999)]
    pub epsilon_decay: f64,

    /// Floor for the decayed exploration rate
    #[arg(long, default_value_t = 0.01)]
    pub min_epsilon: f64,

    /// Redraw the destination at the start of every episode
    #[arg(long, default_value_t = false)]
    pub reset_destination: bool,

    /// Number of greedy evaluation episodes after training
    #[arg(long, default_value_t = 100)]
    pub eval_episodes: usize,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Show progress bar
    #[arg(long, default_value_t = false)]
    pub progress: bool,
}

#[derive(Debug, Serialize)]
struct TrainingSummaryFile {
    config: GridworldConfig,
    seed: Option<u64>,
    learning_rate: f64,
    training: TrainingResult,
    metrics: MetricsSummary,
    evaluation: Option<TrainingResult>,
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let config = args.grid.to_config()?;
    let mut rng = args.grid.rng();
    let mut world = Gridworld::new(&config, &mut rng)?;
    let mut learner = QLearning::new(&world, args.learning_rate);
    let mut policy = Policy::EpsilonGreedy(
        EpsilonGreedy::new(args.epsilon, args.epsilon_decay).with_min_epsilon(args.min_epsilon),
    );

    print_section("Gridworld");
    print_kv(
        "Size",
        &format!("{}x{}", world.geometry().length(), world.geometry().width()),
    );
    print_kv("Obstacles", &world.geometry().obstacles().len().to_string());
    print_kv("States", &world.num_states().to_string());
    print_grid(&world);

    let training_config = TrainingConfig {
        episodes: args.episodes,
        max_steps: args.max_steps,
        seed: args.grid.seed,
        reset_destination: args.reset_destination,
    };

    let (metrics_observer, metrics) = SharedObserver::new(MetricsObserver::new());
    let mut pipeline =
        TrainingPipeline::new(training_config.clone()).with_observer(Box::new(metrics_observer));
    if args.progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }

    info!(episodes = args.episodes, "starting Q-learning");
    let training = pipeline.run(&mut world, &mut learner, &mut policy, &mut rng)?;

    print_section("Training");
    print_result(&training);
    let metrics = metrics
        .lock()
        .map(|observer| observer.summary())
        .unwrap_or_else(|poisoned| poisoned.into_inner().summary());
    print_kv("Collisions", &metrics.collisions.to_string());
    print_kv("Slips", &metrics.slips.to_string());

    let evaluation = if args.eval_episodes > 0 {
        let mut greedy = Policy::Greedy;
        let mut evaluator = TrainingPipeline::new(TrainingConfig {
            episodes: args.eval_episodes,
            ..training_config
        });
        let result = evaluator.evaluate(&mut world, &mut learner, &mut greedy, &mut rng)?;
        print_section("Greedy evaluation");
        print_result(&result);
        Some(result)
    } else {
        None
    };

    if let Some(raw) = &args.summary {
        let path = sanitize_summary_path(raw, "training_summary.json");
        let summary = TrainingSummaryFile {
            config,
            seed: args.grid.seed,
            learning_rate: args.learning_rate,
            training,
            metrics,
            evaluation,
        };
        write_summary(&path, &summary)?;
    }

    Ok(())
}
