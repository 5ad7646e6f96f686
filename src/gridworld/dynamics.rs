//! Transition model.
//!
//! Transitions are pure functions of the layout, the current state, the
//! action and a uniform draw. Nothing here mutates shared state, so the
//! planner can probe any state without disturbing a running episode.

use serde::{Deserialize, Serialize};

use super::{
    action::Action,
    geometry::GridGeometry,
    state::{AgentState, Pose},
};
use crate::config::{GridworldConfig, RewardConfig};

/// What happened during a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    /// The actuator slipped; nothing changed
    Slipped,
    /// The heading rotated in place
    Turned,
    /// The agent moved onto a free cell
    Moved,
    /// The agent moved onto the destination
    ReachedDestination,
    /// The move was blocked by an obstacle
    Collision,
    /// The move would have left the grid
    OutOfBounds,
}

impl StepOutcome {
    pub fn changed_state(self) -> bool {
        matches!(
            self,
            StepOutcome::Turned | StepOutcome::Moved | StepOutcome::ReachedDestination
        )
    }
}

/// Result of applying an action
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub state: AgentState,
    pub reward: f64,
    pub outcome: StepOutcome,
}

/// Stochastic transition parameters shared by online stepping and planning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dynamics {
    pub rewards: RewardConfig,
    /// Probability that a commanded action is not executed
    pub fail_chance: f64,
    /// Discount factor used by learners and planners
    pub discount: f64,
}

impl Dynamics {
    pub fn new(rewards: RewardConfig, fail_chance: f64, discount: f64) -> Self {
        Self {
            rewards,
            fail_chance,
            discount,
        }
    }

    pub fn from_config(config: &GridworldConfig) -> Self {
        Self::new(config.rewards, config.fail_chance, config.discount)
    }

    /// Whether a uniform draw in `[0, 1)` lets the action execute
    pub fn acts(&self, draw: f64) -> bool {
        draw < 1.0 - self.fail_chance
    }

    /// Deterministic effect of an action that does execute.
    ///
    /// Returns the successor pose, the reward and the outcome.
    pub fn act(&self, geometry: &GridGeometry, pose: Pose, action: Action) -> (Pose, f64, StepOutcome) {
        let rewards = &self.rewards;
        let Some(delta) = action.delta() else {
            let orientation = match action {
                Action::TurnRight => pose.orientation.turned_right(),
                _ => pose.orientation.turned_left(),
            };
            return (
                Pose::new(pose.position, orientation),
                rewards.default,
                StepOutcome::Turned,
            );
        };

        let (row, col) = pose.position.offset(delta);
        let Some(candidate) = geometry.cell_at(row, col) else {
            let reward = if rewards.separate_out_of_bounds_reward {
                rewards.out_of_bounds
            } else {
                rewards.collision
            };
            return (pose, reward, StepOutcome::OutOfBounds);
        };

        if geometry.is_obstacle(candidate) {
            return (pose, rewards.collision, StepOutcome::Collision);
        }

        let next = Pose::new(candidate, pose.orientation);
        if candidate == geometry.destination() {
            (next, rewards.destination, StepOutcome::ReachedDestination)
        } else {
            (next, rewards.default, StepOutcome::Moved)
        }
    }

    /// Full stochastic step driven by an externally supplied draw.
    ///
    /// A draw at or above `1 - fail_chance` is a slip: the state is kept and
    /// the default reward is reported whatever the action was.
    pub fn step(
        &self,
        geometry: &GridGeometry,
        state: &AgentState,
        action: Action,
        draw: f64,
    ) -> Transition {
        if !self.acts(draw) {
            return Transition {
                state: *state,
                reward: self.rewards.default,
                outcome: StepOutcome::Slipped,
            };
        }

        let (pose, reward, outcome) = self.act(geometry, state.pose(), action);
        let state = if outcome.changed_state() {
            AgentState::observe(geometry, pose)
        } else {
            *state
        };
        Transition {
            state,
            reward,
            outcome,
        }
    }
}

impl Default for Dynamics {
    fn default() -> Self {
        Self::from_config(&GridworldConfig::default())
    }
}
