//! Tabular learning and planning on a partially observable gridworld
//!
//! This crate provides:
//! - A rectangular grid with random obstacles, a destination and an agent
//!   that senses the three cells ahead of it and whose actions slip with a
//!   fixed probability
//! - Online Q-learning over the full (position, orientation, observation) state
//! - Offline value iteration over (position, orientation)
//! - Random, greedy, epsilon-greedy and fixed-table policies
//! - Episode, training and evaluation pipelines with pluggable observers

pub mod cli;
pub mod config;
pub mod error;
pub mod gridworld;
pub mod pipeline;
pub mod planning;
pub mod policy;
pub mod ports;
pub mod q_learning;
pub mod utils;

pub use config::{GridworldConfig, RewardConfig};
pub use error::{Error, Result};
pub use gridworld::{Action, AgentState, Gridworld, Orientation, Position};
