//! Value model port - what a policy reads and an episode driver feeds

use crate::{
    Result,
    gridworld::{Action, AgentState},
};

/// An estimator of action values over gridworld states.
///
/// Policies query [`ValueModel::lookahead`] to rank actions; the episode
/// driver calls [`ValueModel::update`] after every transition when the
/// active policy asks for learning.
///
/// # Examples
///
/// ```
/// use gridworld_rl::{
///     Result,
///     gridworld::{Action, AgentState},
///     ports::ValueModel,
/// };
///
/// /// Prefers turning right everywhere
/// struct Spinner;
///
/// impl ValueModel for Spinner {
///     fn lookahead(&self, _state: &AgentState, action: Action) -> Result<f64> {
///         Ok(if action == Action::TurnRight { 1.0 } else { 0.0 })
///     }
///
///     fn name(&self) -> &str {
///         "spinner"
///     }
/// }
/// ```
pub trait ValueModel {
    /// Estimated value of taking `action` in `state`.
    ///
    /// # Errors
    ///
    /// Returns an error if `state` lies outside the model's state space.
    fn lookahead(&self, state: &AgentState, action: Action) -> Result<f64>;

    /// Learn from one observed transition.
    ///
    /// The default implementation does nothing, which suits frozen models
    /// such as a converged planner.
    fn update(
        &mut self,
        _state: &AgentState,
        _action: Action,
        _reward: f64,
        _next_state: &AgentState,
    ) -> Result<()> {
        Ok(())
    }

    /// Name used in logs and summaries
    fn name(&self) -> &str;
}
