//! Error types for the gridworld crate

use thiserror::Error;

/// Main error type for the gridworld crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error(
        "cannot place {requested} obstacles: at most {capacity} cells remain after source and destination"
    )]
    TooManyObstacles { requested: usize, capacity: usize },

    #[error(
        "state ({row}, {col}, orientation {orientation}) is outside a {length}x{width} state space"
    )]
    StateOutOfRange {
        row: usize,
        col: usize,
        orientation: usize,
        length: usize,
        width: usize,
    },

    #[error("{kind} index {index} is out of range (must be below {bound})")]
    IndexOutOfRange {
        kind: &'static str,
        index: usize,
        bound: usize,
    },

    #[error("unknown action '{symbol}' (expected one of u, r, d, l, tr, tl)")]
    UnknownAction { symbol: String },

    #[error("no free cell available for the {what}")]
    NoFreeCell { what: &'static str },

    #[error("policy table covers a {expected} grid but the state belongs to a {actual} grid")]
    PolicyDomainMismatch { expected: String, actual: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
