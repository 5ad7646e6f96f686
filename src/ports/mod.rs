//! Ports (trait boundaries) between the domain and its drivers.
//!
//! The episode driver only talks to value estimators and observers through
//! these traits, so learners, planners and reporting adapters stay
//! interchangeable.

pub mod model;
pub mod observer;

pub use model::ValueModel;
pub use observer::Observer;
