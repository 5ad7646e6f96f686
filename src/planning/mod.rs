//! Offline planning by value iteration
//!
//! The planner sweeps every pose of a layout snapshot until the largest
//! per-sweep change drops below a threshold, then extracts a greedy policy
//! that [`Policy::Fixed`](crate::policy::Policy::Fixed) can replay.

pub mod value_iteration;

pub use value_iteration::{SweepMode, Termination, ValueIteration, ValueIterationConfig};
