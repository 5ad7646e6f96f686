//! Orientation-aware, partially observed gridworld
//!
//! The environment is split into a static [`GridGeometry`], the per-step
//! [`AgentState`] and a pure transition model ([`Dynamics`]). [`Gridworld`]
//! ties the three together for online episodes, while planners work on
//! geometry snapshots through [`Dynamics::act`] directly.

pub mod action;
pub mod dynamics;
pub mod encoding;
pub mod environment;
pub mod geometry;
pub mod state;

pub use action::{Action, NUM_ACTIONS, NUM_ORIENTATIONS, Orientation};
pub use dynamics::{Dynamics, StepOutcome, Transition};
pub use encoding::{NUM_OBSERVATIONS, PoseIndex, StateIndex, StateSpace};
pub use environment::Gridworld;
pub use geometry::{GridGeometry, Marker, NUM_MARKERS, Position};
pub use state::{AgentState, Observation, Pose};
