//! Plan command - value iteration on a random gridworld

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use serde::Serialize;

use super::{sanitize_summary_path, write_summary};
use crate::{
    cli::{
        config::GridArgs,
        output::{print_grid, print_kv, print_result, print_section},
    },
    config::GridworldConfig,
    gridworld::Gridworld,
    pipeline::{TrainingConfig, TrainingPipeline, TrainingResult},
    planning::{SweepMode, Termination, ValueIteration, ValueIterationConfig},
    policy::Policy,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SweepArg {
    /// Update values in place during a sweep
    InPlace,
    /// Read a snapshot taken before each sweep
    Synchronous,
}

impl From<SweepArg> for SweepMode {
    fn from(arg: SweepArg) -> Self {
        match arg {
            SweepArg::InPlace => SweepMode::InPlace,
            SweepArg::Synchronous => SweepMode::Synchronous,
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Solve a random gridworld with value iteration")]
pub struct PlanArgs {
    #[command(flatten)]
    pub grid: GridArgs,

    /// Stop once the largest per-sweep change is at most this
    #[arg(long, default_value_t = 1e-4)]
    pub threshold: f64,

    /// Maximum number of sweeps
    #[arg(long, default_value_t = 1000)]
    pub max_iterations: usize,

    /// Sweep mode
    #[arg(long, value_enum, default_value = "in-place")]
    pub sweep: SweepArg,

    /// Number of episodes used to evaluate the extracted policy
    #[arg(long, default_value_t = 100)]
    pub eval_episodes: usize,

    /// Step limit per evaluation episode
    #[arg(long, default_value_t = 100)]
    pub max_steps: usize,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct PlanSummaryFile {
    config: GridworldConfig,
    seed: Option<u64>,
    termination: Termination,
    evaluation: Option<TrainingResult>,
}

pub fn execute(args: PlanArgs) -> Result<()> {
    let config = args.grid.to_config()?;
    let mut rng = args.grid.rng();
    let mut world = Gridworld::new(&config, &mut rng)?;

    print_section("Gridworld");
    print_grid(&world);

    let mut planner = ValueIteration::new(
        &world,
        ValueIterationConfig {
            residual_threshold: args.threshold,
            max_iterations: args.max_iterations,
            sweep: args.sweep.into(),
            ..ValueIterationConfig::default()
        },
    );
    let termination = planner.solve()?;

    print_section("Value iteration");
    print_kv(
        "Status",
        if termination.converged() {
            "converged"
        } else {
            "iteration budget exhausted"
        },
    );
    print_kv("Sweeps", &termination.sweeps().to_string());
    print_kv("Residual", &format!("{:.3e}", termination.residual()));

    let evaluation = if args.eval_episodes > 0 {
        let mut policy = Policy::fixed(planner.extract_policy(&mut rng)?);
        let mut evaluator = TrainingPipeline::new(TrainingConfig {
            episodes: args.eval_episodes,
            max_steps: args.max_steps,
            seed: args.grid.seed,
            reset_destination: false,
        });
        let result = evaluator.evaluate(&mut world, &mut planner, &mut policy, &mut rng)?;
        print_section("Policy evaluation");
        print_result(&result);
        Some(result)
    } else {
        None
    };

    if let Some(raw) = &args.summary {
        let path = sanitize_summary_path(raw, "plan_summary.json");
        let summary = PlanSummaryFile {
            config,
            seed: args.grid.seed,
            termination,
            evaluation,
        };
        write_summary(&path, &summary)?;
    }

    Ok(())
}
