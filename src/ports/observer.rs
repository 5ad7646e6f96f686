//! Observer port - abstraction for training observation and data collection

use crate::{
    Result,
    gridworld::{Action, AgentState, Transition},
    pipeline::EpisodeResult,
};

/// Observer trait for monitoring training and evaluation runs
///
/// The methods are called in this order:
/// 1. `on_training_start(total_episodes)` once
/// 2. for each episode: `on_episode_start`, `on_step` per step, `on_episode_end`
/// 3. `on_training_end()` once
///
/// Every method defaults to a no-op.
pub trait Observer: Send {
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        Ok(())
    }

    /// Called after the environment applied `action` from `state`
    fn on_step(
        &mut self,
        _episode: usize,
        _step: usize,
        _state: &AgentState,
        _action: Action,
        _transition: &Transition,
    ) -> Result<()> {
        Ok(())
    }

    fn on_episode_end(&mut self, _episode: usize, _result: &EpisodeResult) -> Result<()> {
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
