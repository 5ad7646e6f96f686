//! Online tabular Q-learning
//!
//! Q-learning is off-policy temporal difference control: every observed
//! transition moves `Q(s,a)` toward `r + γ max_a' Q(s',a')`, whatever
//! policy produced the action.
//!
//! ## Usage Example
//!
//! ```
//! use gridworld_rl::{
//!     config::GridworldConfig,
//!     gridworld::{Action, Gridworld},
//!     q_learning::QLearning,
//! };
//! use rand::{SeedableRng, rngs::StdRng};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let mut world = Gridworld::new(&GridworldConfig::new(4), &mut rng).unwrap();
//! let mut learner = QLearning::new(&world, 0.1);
//!
//! let before = *world.state();
//! let reward = world.take_action(Action::TurnRight, &mut rng);
//! learner.update(&before, Action::TurnRight, reward, world.state()).unwrap();
//! ```

pub mod learner;
pub mod q_table;

pub use learner::QLearning;
pub use q_table::QTable;
