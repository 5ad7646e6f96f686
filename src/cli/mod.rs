//! Command-line interface for the gridworld toolkit
//!
//! `train` runs online Q-learning on a random layout; `plan` solves the
//! same kind of layout offline with value iteration.

pub mod commands;
pub mod config;
pub mod output;
