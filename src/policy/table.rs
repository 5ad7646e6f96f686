//! Precomputed state -> action mappings

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    gridworld::{Action, AgentState, StateSpace},
};

/// Which part of the state a [`PolicyTable`] is keyed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyDomain {
    /// The full 6-tuple (position, orientation, observation)
    FullState,
    /// Position and orientation only
    Pose,
}

/// A total mapping from states of one [`StateSpace`] to actions
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyTable {
    space: StateSpace,
    domain: PolicyDomain,
    actions: Vec<Action>,
}

impl PolicyTable {
    /// Wrap per-state actions listed in index order of `domain`
    pub fn new(space: StateSpace, domain: PolicyDomain, actions: Vec<Action>) -> Result<Self> {
        let expected = match domain {
            PolicyDomain::FullState => space.num_states(),
            PolicyDomain::Pose => space.num_poses(),
        };
        if actions.len() != expected {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "policy table for a {} grid needs {expected} entries, got {}",
                    space.describe(),
                    actions.len()
                ),
            });
        }
        Ok(Self {
            space,
            domain,
            actions,
        })
    }

    pub fn space(&self) -> StateSpace {
        self.space
    }

    pub fn domain(&self) -> PolicyDomain {
        self.domain
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Fail unless the table was built for `space`
    pub fn check_space(&self, space: StateSpace) -> Result<()> {
        if self.space == space {
            Ok(())
        } else {
            Err(Error::PolicyDomainMismatch {
                expected: self.space.describe(),
                actual: space.describe(),
            })
        }
    }

    /// Action prescribed for `state`
    pub fn action_for(&self, state: &AgentState) -> Result<Action> {
        let index = match self.domain {
            PolicyDomain::FullState => self.space.encode(state)?.get(),
            PolicyDomain::Pose => self.space.encode_pose(state.pose())?.get(),
        };
        Ok(self.actions[index])
    }
}
