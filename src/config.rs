//! Configuration types for environments.

use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Reward magnitudes reported by the environment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Reward for moving into an obstacle
    pub collision: f64,
    /// Reward for moving onto the destination
    pub destination: f64,
    /// Reward for every other step, including turns and slips
    pub default: f64,
    /// Reward for trying to leave the grid
    pub out_of_bounds: f64,
    /// When false, leaving the grid is treated as a collision and pays `collision`
    pub separate_out_of_bounds_reward: bool,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            collision: -1.0,
            destination: 10.0,
            default: 0.0,
            out_of_bounds: -1.0,
            separate_out_of_bounds_reward: true,
        }
    }
}

/// Configuration for building a [`Gridworld`](crate::gridworld::Gridworld).
///
/// Every field has a default, so a JSON file only needs to list overrides.
///
/// # Examples
///
/// ```
/// use gridworld_rl::config::GridworldConfig;
///
/// let config = GridworldConfig::new(6)
///     .with_width(4)
///     .with_obstacle_count(3)
///     .with_fail_chance(0.0);
/// assert_eq!(config.obstacle_count(), 3);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridworldConfig {
    /// Number of rows
    pub length: usize,
    /// Number of columns; `None` makes the grid square
    pub width: Option<usize>,
    /// Number of obstacles; `None` uses floor(sqrt(length * width))
    pub obstacle_count: Option<usize>,
    pub rewards: RewardConfig,
    /// Probability that a commanded action is not executed
    pub fail_chance: f64,
    /// Discount factor
    pub discount: f64,
    /// Read off-grid sensor probes as obstacles instead of free cells
    pub sense_walls: bool,
}

impl GridworldConfig {
    /// Create a square configuration of the given side with default parameters
    pub fn new(length: usize) -> Self {
        Self {
            length,
            ..Self::default()
        }
    }

    /// Load a configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open config {}", path.display()),
            source,
        })?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_obstacle_count(mut self, count: usize) -> Self {
        self.obstacle_count = Some(count);
        self
    }

    pub fn with_rewards(mut self, rewards: RewardConfig) -> Self {
        self.rewards = rewards;
        self
    }

    pub fn with_fail_chance(mut self, fail_chance: f64) -> Self {
        self.fail_chance = fail_chance;
        self
    }

    pub fn with_discount(mut self, discount: f64) -> Self {
        self.discount = discount;
        self
    }

    pub fn with_sense_walls(mut self, sense_walls: bool) -> Self {
        self.sense_walls = sense_walls;
        self
    }

    /// Effective number of columns
    pub fn width(&self) -> usize {
        self.width.unwrap_or(self.length)
    }

    /// Effective number of obstacles
    pub fn obstacle_count(&self) -> usize {
        self.obstacle_count
            .unwrap_or_else(|| ((self.length * self.width()) as f64).sqrt().floor() as usize)
    }

    /// Check that the configuration describes a buildable environment
    pub fn validate(&self) -> Result<()> {
        let (length, width) = (self.length, self.width());
        if length == 0 || width == 0 {
            return Err(Error::InvalidConfiguration {
                message: format!("grid dimensions must be positive, got {length}x{width}"),
            });
        }
        let cells = length * width;
        if cells < 2 {
            return Err(Error::InvalidConfiguration {
                message: "grid needs at least two cells for a source and a destination"
                    .to_string(),
            });
        }
        let requested = self.obstacle_count();
        if requested > cells - 2 {
            return Err(Error::TooManyObstacles {
                requested,
                capacity: cells - 2,
            });
        }
        if !(0.0..=1.0).contains(&self.fail_chance) {
            return Err(Error::InvalidConfiguration {
                message: format!("fail_chance {} must lie in [0, 1]", self.fail_chance),
            });
        }
        if !(0.0..=1.0).contains(&self.discount) {
            return Err(Error::InvalidConfiguration {
                message: format!("discount {} must lie in [0, 1]", self.discount),
            });
        }
        Ok(())
    }
}

impl Default for GridworldConfig {
    fn default() -> Self {
        Self {
            length: 10,
            width: None,
            obstacle_count: None,
            rewards: RewardConfig::default(),
            fail_chance: 0.1,
            discount: 0.9,
            sense_walls: false,
        }
    }
}
