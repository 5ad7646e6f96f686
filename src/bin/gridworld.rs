//! Gridworld CLI - train and plan on random obstacle grids

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gridworld")]
#[command(version, about = "Tabular learning and planning on a partially observable gridworld", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a Q-learning agent, then evaluate it greedily
    Train(Box<gridworld_rl::cli::commands::train::TrainArgs>),

    /// Solve a layout with value iteration and evaluate the extracted policy
    Plan(gridworld_rl::cli::commands::plan::PlanArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => gridworld_rl::cli::commands::train::execute(*args),
        Commands::Plan(args) => gridworld_rl::cli::commands::plan::execute(args),
    }
}
