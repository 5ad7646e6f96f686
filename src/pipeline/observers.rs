//! Observer implementations for training runs
//!
//! Observers collect data during a run without coupling the episode loop
//! to any particular output.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use super::episode::EpisodeResult;
use crate::{
    Result,
    gridworld::{Action, AgentState, NUM_ACTIONS, StepOutcome, Transition},
    ports::Observer,
};

/// Progress bar observer - shows episode progress and the running success count
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    successes: usize,
    finished: usize,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            successes: 0,
            finished: 0,
        }
    }

    fn message(&self) -> String {
        format!("reached {}/{}", self.successes, self.finished)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        self.successes = 0;
        self.finished = 0;
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize, result: &EpisodeResult) -> Result<()> {
        self.finished += 1;
        if result.reached_destination {
            self.successes += 1;
        }
        if let Some(pb) = &self.progress_bar {
            pb.set_position(episode as u64 + 1);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Metrics observer - tracks per-episode and per-step statistics
#[derive(Debug, Default)]
pub struct MetricsObserver {
    episodes: usize,
    successes: usize,
    steps: Vec<usize>,
    returns: Vec<f64>,
    collisions: usize,
    slips: usize,
    action_counts: [usize; NUM_ACTIONS],
}

impl MetricsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fraction of finished episodes that reached the destination
    pub fn success_rate(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.successes as f64 / self.episodes as f64
        }
    }

    pub fn avg_episode_length(&self) -> f64 {
        if self.steps.is_empty() {
            0.0
        } else {
            self.steps.iter().sum::<usize>() as f64 / self.steps.len() as f64
        }
    }

    pub fn avg_discounted_return(&self) -> f64 {
        if self.returns.is_empty() {
            0.0
        } else {
            self.returns.iter().sum::<f64>() / self.returns.len() as f64
        }
    }

    /// Times each action was chosen, in action index order
    pub fn action_counts(&self) -> &[usize; NUM_ACTIONS] {
        &self.action_counts
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            episodes: self.episodes,
            successes: self.successes,
            success_rate: self.success_rate(),
            avg_episode_length: self.avg_episode_length(),
            avg_discounted_return: self.avg_discounted_return(),
            collisions: self.collisions,
            slips: self.slips,
            action_counts: self.action_counts,
        }
    }
}

/// Summary of collected metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub episodes: usize,
    pub successes: usize,
    pub success_rate: f64,
    pub avg_episode_length: f64,
    pub avg_discounted_return: f64,
    pub collisions: usize,
    pub slips: usize,
    pub action_counts: [usize; NUM_ACTIONS],
}

impl Observer for MetricsObserver {
    fn on_step(
        &mut self,
        _episode: usize,
        _step: usize,
        _state: &AgentState,
        action: Action,
        transition: &Transition,
    ) -> Result<()> {
        self.action_counts[action.index()] += 1;
        match transition.outcome {
            StepOutcome::Collision | StepOutcome::OutOfBounds => self.collisions += 1,
            StepOutcome::Slipped => self.slips += 1,
            _ => {}
        }
        Ok(())
    }

    fn on_episode_end(&mut self, _episode: usize, result: &EpisodeResult) -> Result<()> {
        self.episodes += 1;
        if result.reached_destination {
            self.successes += 1;
        }
        self.steps.push(result.steps);
        self.returns.push(result.discounted_return);
        Ok(())
    }
}

/// Hands an observer to a pipeline while keeping a handle to read it afterwards
pub struct SharedObserver<O> {
    inner: Arc<Mutex<O>>,
}

impl<O: Observer> SharedObserver<O> {
    /// Wrap `observer`, returning the pipeline half and the caller's handle
    pub fn new(observer: O) -> (Self, Arc<Mutex<O>>) {
        let inner = Arc::new(Mutex::new(observer));
        (
            Self {
                inner: Arc::clone(&inner),
            },
            inner,
        )
    }

    fn lock(&self) -> MutexGuard<'_, O> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<O: Observer> Observer for SharedObserver<O> {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        self.lock().on_training_start(total_episodes)
    }

    fn on_episode_start(&mut self, episode: usize) -> Result<()> {
        self.lock().on_episode_start(episode)
    }

    fn on_step(
        &mut self,
        episode: usize,
        step: usize,
        state: &AgentState,
        action: Action,
        transition: &Transition,
    ) -> Result<()> {
        self.lock().on_step(episode, step, state, action, transition)
    }

    fn on_episode_end(&mut self, episode: usize, result: &EpisodeResult) -> Result<()> {
        self.lock().on_episode_end(episode, result)
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.lock().on_training_end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode(steps: usize, reached: bool, discounted_return: f64) -> EpisodeResult {
        EpisodeResult {
            steps,
            reached_destination: reached,
            collisions: 0,
            slips: 0,
            total_reward: discounted_return,
            discounted_return,
            rewards: vec![0.0; steps],
        }
    }

    #[test]
    fn test_metrics_summary() {
        let mut metrics = MetricsObserver::new();
        metrics.on_episode_end(0, &episode(4, true, 8.0)).unwrap();
        metrics.on_episode_end(1, &episode(10, false, -2.0)).unwrap();

        let summary = metrics.summary();
        assert_eq!(summary.episodes, 2);
        assert_eq!(summary.successes, 1);
        assert_eq!(summary.success_rate, 0.5);
        assert_eq!(summary.avg_episode_length, 7.0);
        assert_eq!(summary.avg_discounted_return, 3.0);
    }

    #[test]
    fn test_shared_observer_exposes_state() {
        let (mut shared, handle) = SharedObserver::new(MetricsObserver::new());
        shared.on_episode_end(0, &episode(3, true, 1.0)).unwrap();
        let metrics = handle.lock().unwrap();
        assert_eq!(metrics.summary().successes, 1);
    }

    #[test]
    fn test_empty_metrics() {
        let summary = MetricsObserver::new().summary();
        assert_eq!(summary.success_rate, 0.0);
        assert_eq!(summary.avg_episode_length, 0.0);
    }
}
