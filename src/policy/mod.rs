//! Action-selection policies
//!
//! Every variant answers the same question, "which action now?", through
//! [`Policy::next_action`], and reports through
//! [`Policy::requires_model_update`] whether the driving loop should feed
//! the resulting transition back to the model.
//!
//! | Variant | Reads model | Random draws | Triggers learning |
//! |---------|-------------|--------------|-------------------|
//! | Random | no | uniform action | no |
//! | Greedy | yes | tie-break | no |
//! | EpsilonGreedy | yes | explore + tie-break | yes |
//! | Fixed | no | none | no |

pub mod epsilon;
pub mod table;

use rand::Rng;

pub use epsilon::EpsilonGreedy;
pub use table::{PolicyDomain, PolicyTable};

use crate::{
    Result,
    gridworld::{Action, AgentState, NUM_ACTIONS},
    ports::ValueModel,
    utils::choose_maximizer,
};

/// Tagged action-selection strategy
#[derive(Debug, Clone, PartialEq)]
pub enum Policy {
    /// Uniform draw over the action set
    Random,
    /// Arg-max of the model's lookahead, ties broken uniformly
    Greedy,
    /// Random with probability epsilon, otherwise greedy; epsilon decays per call
    EpsilonGreedy(EpsilonGreedy),
    /// Playback of a precomputed state -> action table
    Fixed(PolicyTable),
}

impl Policy {
    pub fn epsilon_greedy(epsilon: f64, decay_rate: f64) -> Self {
        Policy::EpsilonGreedy(EpsilonGreedy::new(epsilon, decay_rate))
    }

    pub fn fixed(table: PolicyTable) -> Self {
        Policy::Fixed(table)
    }

    /// Choose the next action for `state`.
    ///
    /// # Errors
    ///
    /// Propagates state encoding errors from the model or the fixed table.
    pub fn next_action<M, R>(&mut self, model: &M, state: &AgentState, rng: &mut R) -> Result<Action>
    where
        M: ValueModel + ?Sized,
        R: Rng + ?Sized,
    {
        match self {
            Policy::Random => Ok(random_action(rng)),
            Policy::Greedy => greedy_action(model, state, rng),
            Policy::EpsilonGreedy(explorer) => {
                let action = if explorer.explores(rng.random::<f64>()) {
                    random_action(rng)
                } else {
                    greedy_action(model, state, rng)?
                };
                explorer.decay();
                Ok(action)
            }
            Policy::Fixed(table) => table.action_for(state),
        }
    }

    /// Whether transitions produced under this policy should update the model
    pub fn requires_model_update(&self) -> bool {
        matches!(self, Policy::EpsilonGreedy(_))
    }

    /// Current exploration rate, if the policy explores
    pub fn epsilon(&self) -> Option<f64> {
        match self {
            Policy::EpsilonGreedy(explorer) => Some(explorer.epsilon()),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Policy::Random => "random",
            Policy::Greedy => "greedy",
            Policy::EpsilonGreedy(_) => "epsilon-greedy",
            Policy::Fixed(_) => "fixed",
        }
    }
}

fn random_action<R: Rng + ?Sized>(rng: &mut R) -> Action {
    Action::ALL[rng.random_range(0..NUM_ACTIONS)]
}

/// Arg-max over the model's action values with a uniform tie-break
pub fn greedy_action<M, R>(model: &M, state: &AgentState, rng: &mut R) -> Result<Action>
where
    M: ValueModel + ?Sized,
    R: Rng + ?Sized,
{
    let mut values = [0.0; NUM_ACTIONS];
    for action in Action::ALL {
        values[action.index()] = model.lookahead(state, action)?;
    }
    let best = choose_maximizer(&values, rng).unwrap_or(0);
    Ok(Action::ALL[best])
}
