//! Shared command-line arguments

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use rand::{SeedableRng, rngs::StdRng};

use crate::config::GridworldConfig;

/// Grid layout and dynamics flags shared by every command
///
/// Flags override the values read from `--config`.
#[derive(Args, Debug, Clone, Default)]
pub struct GridArgs {
    /// JSON file with a full gridworld configuration
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of rows
    #[arg(long, short = 'l')]
    pub length: Option<usize>,

    /// Number of columns (defaults to the length)
    #[arg(long, short = 'w')]
    pub width: Option<usize>,

    /// Number of obstacles (defaults to floor(sqrt(length * width)))
    #[arg(long)]
    pub obstacles: Option<usize>,

    /// Probability that an action is not executed
    #[arg(long)]
    pub fail_chance: Option<f64>,

    /// Discount factor γ
    #[arg(long)]
    pub discount: Option<f64>,

    /// Read off-grid sensor cells as obstacles
    #[arg(long, default_value_t = false)]
    pub sense_walls: bool,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,
}

impl GridArgs {
    /// Resolve the configuration file and flag overrides into one validated config
    pub fn to_config(&self) -> Result<GridworldConfig> {
        let mut config = match &self.config {
            Some(path) => GridworldConfig::load(path)
                .with_context(|| format!("loading gridworld config {}", path.display()))?,
            None => GridworldConfig::default(),
        };

        if let Some(length) = self.length {
            config.length = length;
        }
        if let Some(width) = self.width {
            config = config.with_width(width);
        }
        if let Some(count) = self.obstacles {
            config = config.with_obstacle_count(count);
        }
        if let Some(fail_chance) = self.fail_chance {
            config = config.with_fail_chance(fail_chance);
        }
        if let Some(discount) = self.discount {
            config = config.with_discount(discount);
        }
        if self.sense_walls {
            config = config.with_sense_walls(true);
        }

        config.validate()?;
        Ok(config)
    }

    /// Seeded generator, or one drawn from the thread RNG when no seed was given
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        }
    }
}
